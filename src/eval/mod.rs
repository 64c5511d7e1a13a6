//! Metric pipeline: fixed metric set, per-table aggregation, deltas, normalization.

pub mod map;
pub mod metric;
pub mod metrics;

pub use map::{MetricMap, MetricValues, NormalizedMap};
pub use metric::{ExtractionProfile, Metric, MetricGroup};
pub use metrics::{delta, extract_metrics, mean, normalize};
