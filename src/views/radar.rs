use crate::eval::{Metric, NormalizedMap};
use serde::Serialize;

/// Base and variant values scaled onto one shared `[0, 1]` range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Radar {
    pub metrics: Vec<Metric>,
    pub base: Vec<f64>,
    pub variant: Vec<f64>,
}

/// Scale both maps with a single min/max taken over all their values, so the
/// two polygons stay comparable. A flat input maps to 0.5 everywhere.
pub fn radar(base: &NormalizedMap, variant: &NormalizedMap) -> Radar {
    let metrics: Vec<Metric> = base.keys().collect();
    let raw = |m: &NormalizedMap| -> Vec<f64> { metrics.iter().map(|k| m.get(*k).unwrap_or(0.0)).collect() };
    let (base_raw, variant_raw) = (raw(base), raw(variant));

    let (min, max) = base_raw
        .iter()
        .chain(variant_raw.iter())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
    let scale = |v: f64| if max != min { (v - min) / (max - min) } else { 0.5 };

    Radar {
        base: base_raw.into_iter().map(scale).collect(),
        variant: variant_raw.into_iter().map(scale).collect(),
        metrics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radar_shared_scale() {
        let base = NormalizedMap::from_entries([(Metric::Bleu, 0.0), (Metric::Latency, -2.0)]);
        let variant = NormalizedMap::from_entries([(Metric::Bleu, 2.0), (Metric::Latency, -1.0)]);
        let chart = radar(&base, &variant);
        assert_eq!(chart.metrics, vec![Metric::Bleu, Metric::Latency]);
        assert_eq!(chart.base, vec![0.5, 0.0]);
        assert_eq!(chart.variant, vec![1.0, 0.25]);
    }

    #[test]
    fn test_radar_flat() {
        let base = NormalizedMap::from_entries([(Metric::Bleu, 1.0)]);
        let chart = radar(&base, &base);
        assert_eq!(chart.base, vec![0.5]);
    }
}
