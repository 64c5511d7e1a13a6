use crate::compare::DeltaTable;
use crate::eval::Metric;
use serde::Serialize;

/// Model × metric grid of deltas with a symmetric color bound.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heatmap {
    pub models: Vec<String>,
    pub metrics: Vec<Metric>,
    /// `cells[model][metric]`
    pub cells: Vec<Vec<Option<f64>>>,
    /// Largest absolute delta; the color scale spans `-bound..=bound`.
    pub bound: f64,
}

pub fn heatmap(table: &DeltaTable) -> Heatmap {
    let metrics = table.metrics();
    let mut models = Vec::with_capacity(table.len());
    let mut cells = Vec::with_capacity(table.len());
    for (model, deltas) in table.iter() {
        models.push(model.to_string());
        cells.push(metrics.iter().map(|m| deltas.get(*m)).collect::<Vec<_>>());
    }
    let bound = cells
        .iter()
        .flatten()
        .flatten()
        .map(|v: &f64| v.abs())
        .fold(0.0, f64::max);
    Heatmap {
        models,
        metrics,
        cells,
        bound,
    }
}
