use super::metric::Metric;
use serde::Serialize;
use std::collections::BTreeMap;

/// Read access shared by raw and normalized metric maps.
pub trait MetricValues {
    /// Metrics carried by the map, in report order.
    fn metrics(&self) -> Vec<Metric>;

    /// Value of `metric`, `None` when absent or not carried.
    fn value(&self, metric: Metric) -> Option<f64>;
}

/// Metric name → value or absent, over a key set fixed at construction.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct MetricMap {
    values: BTreeMap<Metric, Option<f64>>,
}

impl MetricMap {
    /// Every metric in `metrics` present and absent.
    pub fn absent(metrics: &[Metric]) -> Self {
        Self {
            values: metrics.iter().map(|m| (*m, None)).collect(),
        }
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (Metric, Option<f64>)>) -> Self {
        Self {
            values: entries.into_iter().collect(),
        }
    }

    /// Set a value, adding the key if it was not carried.
    pub fn set(&mut self, metric: Metric, value: Option<f64>) {
        self.values.insert(metric, value);
    }

    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.values.get(&metric).copied().flatten()
    }

    pub fn contains(&self, metric: Metric) -> bool {
        self.values.contains_key(&metric)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, Option<f64>)> + '_ {
        self.values.iter().map(|(m, v)| (*m, *v))
    }

    pub fn keys(&self) -> impl Iterator<Item = Metric> + '_ {
        self.values.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True when no carried metric has a value.
    pub fn is_all_absent(&self) -> bool {
        self.values.values().all(Option::is_none)
    }
}

impl MetricValues for MetricMap {
    fn metrics(&self) -> Vec<Metric> {
        self.keys().collect()
    }

    fn value(&self, metric: Metric) -> Option<f64> {
        self.get(metric)
    }
}

/// A metric map reoriented so that higher always means better; never absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct NormalizedMap {
    values: BTreeMap<Metric, f64>,
}

impl NormalizedMap {
    pub fn from_entries(entries: impl IntoIterator<Item = (Metric, f64)>) -> Self {
        Self {
            values: entries.into_iter().collect(),
        }
    }

    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.values.get(&metric).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        self.values.iter().map(|(m, v)| (*m, *v))
    }

    pub fn keys(&self) -> impl Iterator<Item = Metric> + '_ {
        self.values.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl MetricValues for NormalizedMap {
    fn metrics(&self) -> Vec<Metric> {
        self.keys().collect()
    }

    fn value(&self, metric: Metric) -> Option<f64> {
        self.get(metric)
    }
}
