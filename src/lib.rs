pub mod config;
pub mod error;
pub mod ingest;
pub mod eval;
pub mod compare;
pub mod views;

pub use config::Config;
pub use error::{RagdashError, Result};
pub use eval::{delta, extract_metrics, normalize, ExtractionProfile, Metric, MetricMap, NormalizedMap};
pub use compare::{aggregate_deltas, compare_model, load_delta_table, DeltaReport, DeltaTable, ModelComparison};
