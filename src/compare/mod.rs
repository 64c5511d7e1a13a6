//! Cross-model comparison: pair base and RAG tables, build per-model delta tables.

pub mod finetuned;
pub mod pairing;
pub mod quantized;

pub use finetuned::{finetuned_delta, finetuned_metrics, FINETUNED_METRICS};
pub use pairing::{Pairing, PairingRule};
pub use quantized::{load_quantized, QuantizedVariant};

use crate::config::Config;
use crate::error::{RagdashError, Result};
use crate::eval::{delta, extract_metrics, normalize, ExtractionProfile, Metric, MetricMap, NormalizedMap};
use crate::ingest::{discover_tables, ResultTable, TableFilter, TableSource};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Model identity → delta map, ordered by identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DeltaTable {
    rows: BTreeMap<String, MetricMap>,
}

impl DeltaTable {
    pub fn insert(&mut self, model: impl Into<String>, deltas: MetricMap) {
        self.rows.insert(model.into(), deltas);
    }

    pub fn get(&self, model: &str) -> Option<&MetricMap> {
        self.rows.get(model)
    }

    pub fn models(&self) -> impl Iterator<Item = &str> + '_ {
        self.rows.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetricMap)> + '_ {
        self.rows.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Union of the metrics carried by all rows, in report order.
    pub fn metrics(&self) -> Vec<Metric> {
        let mut metrics: Vec<Metric> = self.rows.values().flat_map(|m| m.keys()).collect();
        metrics.sort();
        metrics.dedup();
        metrics
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A model left out of a delta table, and why.
#[derive(Debug)]
pub struct SkippedModel {
    pub model: String,
    pub reason: RagdashError,
}

/// Result of a cross-model aggregation: the table plus every model that was left out.
#[derive(Debug, Default)]
pub struct DeltaReport {
    pub table: DeltaTable,
    pub skipped: Vec<SkippedModel>,
}

impl DeltaReport {
    fn skip(&mut self, model: &str, reason: RagdashError) {
        log::info!("Skipping {}: {}", model, reason);
        self.skipped.push(SkippedModel {
            model: model.to_string(),
            reason,
        });
    }
}

/// Pair in-memory base and variant metric maps and compute their deltas.
///
/// Each entry is `(identifier, metrics)`. Base models without a counterpart
/// are left out of the table and listed in `skipped`. A variant named exactly
/// after one base model is never paired with another.
pub fn aggregate_deltas(
    base: &[(String, MetricMap)],
    variants: &[(String, MetricMap)],
    pairing: &Pairing,
) -> DeltaReport {
    let identities: Vec<&str> = base.iter().map(|(identity, _)| identity.as_str()).collect();
    let assigned = pairing.assign(&identities, variants, |(name, _)| name.as_str());

    let mut report = DeltaReport::default();
    for ((identity, base_metrics), variant) in base.iter().zip(assigned) {
        match variant {
            Some((_, variant_metrics)) => {
                report.table.insert(identity.clone(), delta(base_metrics, variant_metrics));
            }
            None => report.skip(identity, RagdashError::NoCounterpart(identity.clone())),
        }
    }
    report
}

fn load_summary(path: &Path) -> Result<MetricMap> {
    let table = ResultTable::from_path(path)?;
    Ok(extract_metrics(&table, ExtractionProfile::Summary))
}

/// Delta table over every base table in `data.base_dir` with a paired table in
/// `data.variant_dir`, plus the fine-tuned entry when configured.
///
/// Problems with one model (no counterpart, unreadable table) are reported in
/// `skipped` and do not affect the others. Only unreadable directories fail the call.
pub fn load_delta_table(config: &Config) -> Result<DeltaReport> {
    let bases = discover_tables(config.base_dir(), TableFilter::AnyCsv)?;
    let variants = discover_tables(config.variant_dir(), TableFilter::AnyCsv)?;
    let identities: Vec<&str> = bases.iter().map(|s| s.identity.as_str()).collect();
    let assigned = config
        .pairing
        .assign(&identities, &variants, |s| s.file_name.as_str());
    let mut report = DeltaReport::default();

    for (base, variant) in bases.iter().zip(assigned) {
        let Some(variant) = variant else {
            report.skip(&base.identity, RagdashError::NoCounterpart(base.identity.clone()));
            continue;
        };
        log::debug!("Pairing {} with {}", base.file_name, variant.file_name);

        match load_summary(&base.path).and_then(|b| Ok((b, load_summary(&variant.path)?))) {
            Ok((base_metrics, variant_metrics)) => {
                report.table.insert(base.identity.clone(), delta(&base_metrics, &variant_metrics));
            }
            Err(e) => report.skip(&base.identity, e),
        }
    }

    if let Some(finetuned) = &config.finetuned {
        match finetuned_delta(finetuned, &bases) {
            Ok(d) => report.table.insert(finetuned.key.clone(), d),
            Err(e) => {
                log::warn!("Fine-tuned entry unavailable: {}", e);
                report.skipped.push(SkippedModel {
                    model: finetuned.key.clone(),
                    reason: e,
                });
            }
        }
    }

    log::info!(
        "Delta table: {} models ({} skipped)",
        report.table.len(),
        report.skipped.len()
    );
    Ok(report)
}

/// Selectable model identities: base tables whose name mentions `evaluation`.
pub fn list_models(config: &Config) -> Result<Vec<String>> {
    let mut models: Vec<String> = discover_tables(config.base_dir(), TableFilter::Evaluation)?
        .into_iter()
        .map(|s| s.identity)
        .collect();
    models.sort();
    models.dedup();
    Ok(models)
}

/// Base vs RAG metrics of one model, with its quantized builds when configured.
#[derive(Debug, Clone, Serialize)]
pub struct ModelComparison {
    pub model: String,
    pub base_source: PathBuf,
    pub variant_source: PathBuf,
    pub base: MetricMap,
    pub variant: MetricMap,
    pub quantized: Vec<QuantizedVariant>,
}

impl ModelComparison {
    pub fn delta(&self) -> MetricMap {
        delta(&self.base, &self.variant)
    }

    pub fn normalized_base(&self) -> NormalizedMap {
        normalize(&self.base)
    }

    pub fn normalized_variant(&self) -> NormalizedMap {
        normalize(&self.variant)
    }
}

fn find_base<'a>(bases: &'a [TableSource], model: &str) -> Option<&'a TableSource> {
    bases
        .iter()
        .find(|s| s.identity == model)
        .or_else(|| bases.iter().find(|s| s.file_name.to_lowercase().contains(model)))
}

/// Load the base and RAG tables of one model.
///
/// Fails with [`RagdashError::ModelNotFound`] when no base table mentions the
/// model and with [`RagdashError::NoCounterpart`] when a base table exists
/// but no variant pairs with it.
pub fn compare_model(config: &Config, model: &str) -> Result<ModelComparison> {
    let model = model.trim().to_lowercase();
    if model.is_empty() {
        return Err(RagdashError::InvalidInput("model name must not be empty".to_string()));
    }

    let bases = discover_tables(config.base_dir(), TableFilter::AnyCsv)?;
    let base = find_base(&bases, &model).ok_or_else(|| RagdashError::ModelNotFound(model.clone()))?;

    let variants = discover_tables(config.variant_dir(), TableFilter::AnyCsv)?;
    // Variants named after another base model are not candidates
    let mut identities: Vec<&str> = bases.iter().map(|s| s.identity.as_str()).collect();
    let position = match identities.iter().position(|id| *id == model) {
        Some(i) => i,
        None => {
            identities.push(&model);
            identities.len() - 1
        }
    };
    let variant = config
        .pairing
        .assign(&identities, &variants, |s| s.file_name.as_str())
        .swap_remove(position)
        .ok_or_else(|| RagdashError::NoCounterpart(model.clone()))?;

    let quantized = match &config.quantized {
        Some(q) if q.applies_to(&model) => load_quantized(q)?,
        _ => Vec::new(),
    };

    Ok(ModelComparison {
        base: load_summary(&base.path)?,
        variant: load_summary(&variant.path)?,
        base_source: base.path.clone(),
        variant_source: variant.path.clone(),
        model,
        quantized,
    })
}
