use crate::config::FinetunedConfig;
use crate::error::{RagdashError, Result};
use crate::eval::{delta, extract_metrics, ExtractionProfile, Metric, MetricMap};
use crate::ingest::{ResultTable, TableSource};

/// Metrics a fine-tuned record carries. Perplexity, latency, throughput and
/// hallucination are not produced by the fine-tuning evaluation and stay absent.
pub const FINETUNED_METRICS: [Metric; 5] = [
    Metric::Bleu,
    Metric::Rouge1F1,
    Metric::BertScore,
    Metric::F1,
    Metric::Readability,
];

/// Summary-set metric map from the first row of a fine-tuned result table.
pub fn finetuned_metrics(table: &ResultTable) -> Result<MetricMap> {
    let row = table.first_row().ok_or_else(|| {
        RagdashError::InvalidInput(format!("fine-tuned table has no rows: {}", table.source))
    })?;

    let mut metrics = MetricMap::absent(&Metric::SUMMARY);
    for metric in FINETUNED_METRICS {
        metrics.set(metric, metric.value_in(row));
    }
    Ok(metrics)
}

/// Delta of the fine-tuned record against its baseline model's base table.
///
/// `bases` is the discovered base table list; the baseline is matched by exact identity.
pub fn finetuned_delta(config: &FinetunedConfig, bases: &[TableSource]) -> Result<MetricMap> {
    let baseline = config.baseline.to_lowercase();
    let base_source = bases
        .iter()
        .find(|s| s.identity == baseline)
        .ok_or_else(|| RagdashError::ModelNotFound(baseline.clone()))?;

    if !config.path.is_file() {
        return Err(RagdashError::ModelNotFound(format!(
            "{} ({})",
            config.key,
            config.path.display()
        )));
    }

    let base_metrics = extract_metrics(&ResultTable::from_path(&base_source.path)?, ExtractionProfile::Summary);
    let finetuned = finetuned_metrics(&ResultTable::from_path(&config.path)?)?;
    Ok(delta(&base_metrics, &finetuned))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::{discover_tables, TableFilter};
    use std::fs;
    use tempfile::TempDir;

    const FINETUNED_CSV: &str = "\
Prompt,BLEU,ROUGE-1,ROUGE-2,ROUGE-L,BERTScore,F1,Readability
first,0.5,0.6,0.3,0.5,0.9,0.7,\"{'flesch_reading_ease': 70.0}\"
second,0.1,0.1,0.1,0.1,0.1,0.1,\"{'flesch_reading_ease': 10.0}\"
";

    const BASE_CSV: &str = "\
Perplexity,BLEU,ROUGE,BERTScore,F1,Readability,Latency,Throughput (tokens/sec)
10,0.25,\"{'rouge1': Score(precision=0.5, recall=0.5, fmeasure=0.5)}\",0.8,0.5,\"{'flesch_reading_ease': 60.0}\",2.0,5.0
";

    #[test]
    fn test_finetuned_metrics_first_row_only() {
        let table = ResultTable::from_reader("ft", FINETUNED_CSV.as_bytes()).unwrap();
        let metrics = finetuned_metrics(&table).unwrap();
        assert_eq!(metrics.len(), 9);
        assert_eq!(metrics.get(Metric::Bleu), Some(0.5));
        assert_eq!(metrics.get(Metric::Rouge1F1), Some(0.6));
        assert_eq!(metrics.get(Metric::Readability), Some(70.0));
        for metric in [Metric::Perplexity, Metric::Latency, Metric::Throughput, Metric::Hallucination] {
            assert_eq!(metrics.get(metric), None, "{}", metric);
        }
    }

    #[test]
    fn test_finetuned_metrics_empty_table() {
        let table = ResultTable::from_reader("ft", "BLEU\n".as_bytes()).unwrap();
        assert!(matches!(finetuned_metrics(&table), Err(RagdashError::InvalidInput(_))));
    }

    #[test]
    fn test_finetuned_delta() {
        let temp_dir = TempDir::new().unwrap();
        let base_dir = temp_dir.path().join("base");
        fs::create_dir_all(&base_dir).unwrap();
        fs::write(base_dir.join("falcon_evaluation_results.csv"), BASE_CSV).unwrap();
        let ft_path = temp_dir.path().join("finetuned.csv");
        fs::write(&ft_path, FINETUNED_CSV).unwrap();

        let bases = discover_tables(&base_dir, TableFilter::AnyCsv).unwrap();
        let config = FinetunedConfig {
            path: ft_path,
            baseline: "Falcon".to_string(),
            key: "falcon_finetuned".to_string(),
        };
        let d = finetuned_delta(&config, &bases).unwrap();
        assert!((d.get(Metric::Bleu).unwrap() - 0.25).abs() < 1e-9);
        assert!((d.get(Metric::Readability).unwrap() - 10.0).abs() < 1e-9);
        assert_eq!(d.get(Metric::Perplexity), None);
        assert_eq!(d.get(Metric::Latency), None);
    }

    #[test]
    fn test_finetuned_delta_missing_inputs() {
        let temp_dir = TempDir::new().unwrap();
        let config = FinetunedConfig {
            path: temp_dir.path().join("absent.csv"),
            baseline: "falcon".to_string(),
            key: "falcon_finetuned".to_string(),
        };
        assert!(matches!(finetuned_delta(&config, &[]), Err(RagdashError::ModelNotFound(_))));

        let bases = vec![TableSource {
            identity: "falcon".to_string(),
            file_name: "falcon_evaluation_results.csv".to_string(),
            path: temp_dir.path().join("falcon_evaluation_results.csv"),
        }];
        assert!(matches!(finetuned_delta(&config, &bases), Err(RagdashError::ModelNotFound(_))));
    }
}
