use crate::eval::Metric;
use crate::ingest::ResultTable;
use serde::Serialize;

/// Axes of the parallel-coordinates view, in display order.
pub const PARALLEL_METRICS: [Metric; 7] = [
    Metric::Bleu,
    Metric::Rouge1F1,
    Metric::Rouge2F1,
    Metric::RougeLF1,
    Metric::BertScore,
    Metric::F1,
    Metric::Readability,
];

/// Per-sample values, each axis min-max scaled to `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParallelCoordinates {
    pub metrics: Vec<Metric>,
    /// One entry per complete row, values in `metrics` order.
    pub rows: Vec<Vec<f64>>,
}

impl ParallelCoordinates {
    /// Scaled values of one axis across all rows.
    pub fn column(&self, metric: Metric) -> Option<Vec<f64>> {
        let idx = self.metrics.iter().position(|m| *m == metric)?;
        Some(self.rows.iter().map(|r| r[idx]).collect())
    }
}

/// Build parallel coordinates from a sample-level table. Rows missing any
/// axis are dropped; an axis with a single distinct value maps to 0.5.
pub fn parallel_coordinates(table: &ResultTable) -> ParallelCoordinates {
    let mut rows: Vec<Vec<f64>> = table
        .rows
        .iter()
        .filter_map(|row| {
            PARALLEL_METRICS
                .iter()
                .map(|m| m.value_in(row))
                .collect::<Option<Vec<f64>>>()
        })
        .collect();

    for idx in 0..PARALLEL_METRICS.len() {
        let (min, max) = rows.iter().map(|r| r[idx]).fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        for row in rows.iter_mut() {
            row[idx] = if min != max { (row[idx] - min) / (max - min) } else { 0.5 };
        }
    }

    ParallelCoordinates {
        metrics: PARALLEL_METRICS.to_vec(),
        rows,
    }
}
