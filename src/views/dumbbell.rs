use crate::eval::{Metric, MetricGroup, MetricValues};
use serde::Serialize;
use std::cmp::Ordering;

/// One metric's base and variant values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DumbbellRow {
    pub metric: Metric,
    pub base: Option<f64>,
    pub variant: Option<f64>,
    pub delta: Option<f64>,
}

/// Dumbbell rows split by value range.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dumbbell {
    pub quality: Vec<DumbbellRow>,
    pub performance: Vec<DumbbellRow>,
}

/// Build dumbbell rows for every metric `base` carries, sorted by ascending
/// delta with absent deltas last. Metrics in `exclude` are left out of the
/// performance group only.
pub fn dumbbell(base: &impl MetricValues, variant: &impl MetricValues, exclude: &[Metric]) -> Dumbbell {
    let mut rows: Vec<DumbbellRow> = base
        .metrics()
        .into_iter()
        .map(|metric| {
            let b = base.value(metric);
            let v = variant.value(metric);
            DumbbellRow {
                metric,
                base: b,
                variant: v,
                delta: b.zip(v).map(|(b, v)| v - b),
            }
        })
        .collect();
    rows.sort_by(|a, b| by_delta(a.delta, b.delta));

    let mut out = Dumbbell::default();
    for row in rows {
        match row.metric.group() {
            MetricGroup::Quality => out.quality.push(row),
            MetricGroup::Performance if !exclude.contains(&row.metric) => out.performance.push(row),
            MetricGroup::Performance => {}
        }
    }
    out
}

fn by_delta(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Axis range over the defined base and variant values, padded by 10% of the
/// span (or 0.1 when all values coincide). `None` when nothing is defined.
pub fn axis_range(rows: &[DumbbellRow]) -> Option<(f64, f64)> {
    let values = rows.iter().flat_map(|r| [r.base, r.variant]).flatten();
    let (min, max) = values.fold(None, |acc: Option<(f64, f64)>, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })?;
    let buffer = if max != min { (max - min) * 0.1 } else { 0.1 };
    Some((min - buffer, max + buffer))
}
