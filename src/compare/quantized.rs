use crate::config::QuantizedConfig;
use crate::error::Result;
use crate::eval::{extract_metrics, ExtractionProfile, MetricMap};
use crate::ingest::ResultTable;
use serde::Serialize;

/// Extended metrics of one quantized build (e.g. `4bit`) of a model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuantizedVariant {
    pub label: String,
    pub metrics: MetricMap,
}

/// Load every configured quantized variant, in label order.
///
/// A configured file that does not exist is logged and skipped; a file that
/// exists but cannot be read as a table is an error.
pub fn load_quantized(config: &QuantizedConfig) -> Result<Vec<QuantizedVariant>> {
    let mut variants = Vec::with_capacity(config.variants.len());
    for (label, path) in &config.variants {
        if !path.is_file() {
            log::warn!("Quantized result file not found ({}): {}", label, path.display());
            continue;
        }
        let table = ResultTable::from_path(path)?;
        variants.push(QuantizedVariant {
            label: label.clone(),
            metrics: extract_metrics(&table, ExtractionProfile::Extended),
        });
    }
    Ok(variants)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::Metric;
    use std::collections::BTreeMap;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_quantized_skips_missing_files() {
        let temp_dir = TempDir::new().unwrap();
        let q8 = temp_dir.path().join("q8.csv");
        fs::write(
            &q8,
            "BLEU,ROUGE-1 F1,ROUGE-2 F1,ROUGE-L F1,Latency\n0.2,0.4,0.1,0.3,1.5\n0.4,0.6,0.3,0.5,2.5\n",
        )
        .unwrap();

        let mut paths = BTreeMap::new();
        paths.insert("4bit".to_string(), temp_dir.path().join("absent.csv"));
        paths.insert("8bit".to_string(), q8);
        let config = QuantizedConfig {
            model: "falcon".to_string(),
            variants: paths,
        };

        let variants = load_quantized(&config).unwrap();
        assert_eq!(variants.len(), 1);
        assert_eq!(variants[0].label, "8bit");
        let m = &variants[0].metrics;
        assert_eq!(m.len(), 11);
        assert!((m.get(Metric::Rouge2F1).unwrap() - 0.2).abs() < 1e-9);
        assert!((m.get(Metric::Latency).unwrap() - 2.0).abs() < 1e-9);
        assert_eq!(m.get(Metric::Perplexity), None);
    }
}
