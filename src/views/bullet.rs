use crate::eval::{Metric, MetricValues};
use serde::Serialize;

/// Headroom of the reference bar over the larger of the two values.
const REFERENCE_HEADROOM: f64 = 1.4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BulletRow {
    pub metric: Metric,
    pub base: f64,
    pub variant: f64,
    /// Length of the background reference bar.
    pub reference: f64,
}

/// Bullet rows sorted by base value, largest first. Metrics absent on either side are skipped.
pub fn bullet(base: &impl MetricValues, variant: &impl MetricValues) -> Vec<BulletRow> {
    let mut rows: Vec<BulletRow> = base
        .metrics()
        .into_iter()
        .filter_map(|metric| {
            let (b, v) = (base.value(metric)?, variant.value(metric)?);
            Some(BulletRow {
                metric,
                base: b,
                variant: v,
                reference: b.abs().max(v.abs()) * REFERENCE_HEADROOM,
            })
        })
        .collect();
    rows.sort_by(|a, b| b.base.total_cmp(&a.base));
    rows
}
