//! Metric math: per-table aggregation, base/variant deltas, and normalization.

use super::map::{MetricMap, NormalizedMap};
use super::metric::{ExtractionProfile, Metric};
use crate::ingest::ResultTable;

/// Arithmetic mean of the given values; `None` when there are none.
pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Aggregate one result table into a metric map.
///
/// Each metric of the profile is the mean of its defined values over the
/// rows the profile includes. A metric with no defined value (including one
/// whose column is missing from the table) is absent.
pub fn extract_metrics(table: &ResultTable, profile: ExtractionProfile) -> MetricMap {
    let rows: Vec<_> = table.rows.iter().filter(|r| profile.includes(r)).collect();
    if rows.len() < table.rows.len() {
        log::debug!(
            "{}: {} of {} rows lack ROUGE or Perplexity, excluded",
            table.source,
            table.rows.len() - rows.len(),
            table.rows.len()
        );
    }

    MetricMap::from_entries(profile.metrics().iter().map(|metric| {
        let value = mean(rows.iter().filter_map(|row| metric.value_in(row)));
        (*metric, value)
    }))
}

/// Per-metric `variant - base`; absent if either side is absent.
///
/// The result carries the key set of `base`.
pub fn delta(base: &MetricMap, variant: &MetricMap) -> MetricMap {
    MetricMap::from_entries(base.iter().map(|(metric, base_value)| {
        let d = match (base_value, variant.get(metric)) {
            (Some(b), Some(v)) => Some(v - b),
            _ => None,
        };
        (metric, d)
    }))
}

/// Reorient a metric map so higher is better.
///
/// Lower-is-better metrics are negated. Absent values become `0.0`, which
/// is a lossy substitution: zero is not neutral on every metric's scale.
pub fn normalize(metrics: &MetricMap) -> NormalizedMap {
    NormalizedMap::from_entries(metrics.iter().map(|(metric, value)| {
        let normalized = match value {
            None => 0.0,
            Some(v) if metric.lower_is_better() => -v,
            Some(v) => v,
        };
        (metric, normalized)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::ResultTable;

    const TOLERANCE: f64 = 1e-9;

    fn table(csv: &str) -> ResultTable {
        ResultTable::from_reader("mem", csv.as_bytes()).unwrap()
    }

    fn map(entries: &[(Metric, Option<f64>)]) -> MetricMap {
        MetricMap::from_entries(entries.iter().copied())
    }

    const HEADER: &str = "Perplexity,BLEU,ROUGE,BERTScore,F1,Readability,Latency,Throughput (tokens/sec)";

    fn row(ppl: &str, bleu: &str, rouge1: &str, fre: &str) -> String {
        format!(
            "{},{},\"{{'rouge1': Score(precision=0.5, recall=0.5, fmeasure={}), 'rouge2': Score(precision=0.2, recall=0.2, fmeasure=0.2), 'rougeL': Score(precision=0.4, recall=0.4, fmeasure=0.4)}}\",0.8,0.4,\"{{'flesch_reading_ease': {}}}\",2.0,5.0",
            ppl, bleu, rouge1, fre
        )
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(Vec::<f64>::new()), None);
        assert_eq!(mean(vec![1.0, 2.0, 6.0]), Some(3.0));
    }

    #[test]
    fn test_extract_metrics_means() {
        let csv = format!("{}\n{}\n{}\n", HEADER, row("10", "0.3", "0.5", "60"), row("20", "0.5", "0.7", "40"));
        let metrics = extract_metrics(&table(&csv), ExtractionProfile::Summary);
        assert_eq!(metrics.len(), 9);
        assert!((metrics.get(Metric::Perplexity).unwrap() - 15.0).abs() < TOLERANCE);
        assert!((metrics.get(Metric::Bleu).unwrap() - 0.4).abs() < TOLERANCE);
        assert!((metrics.get(Metric::Rouge1F1).unwrap() - 0.6).abs() < TOLERANCE);
        assert!((metrics.get(Metric::Readability).unwrap() - 50.0).abs() < TOLERANCE);
        assert!((metrics.get(Metric::Throughput).unwrap() - 5.0).abs() < TOLERANCE);
        // No Hallucination column: absent, not an error
        assert!(metrics.contains(Metric::Hallucination));
        assert_eq!(metrics.get(Metric::Hallucination), None);
    }

    #[test]
    fn test_extract_metrics_skips_unparseable_cells() {
        let csv = format!("{}\n{}\n{}\n", HEADER, row("10", "abc", "0.5", "60"), row("20", "0.5", "0.7", "40"));
        let metrics = extract_metrics(&table(&csv), ExtractionProfile::Summary);
        assert!((metrics.get(Metric::Bleu).unwrap() - 0.5).abs() < TOLERANCE);
    }

    #[test]
    fn test_extract_metrics_zero_valid_rows() {
        let csv = format!("{}\n{}\n{}\n", HEADER, row("", "0.3", "0.5", "60"), row("", "0.5", "0.7", "40"));
        let metrics = extract_metrics(&table(&csv), ExtractionProfile::Summary);
        assert_eq!(metrics.len(), 9);
        assert!(metrics.is_all_absent());
    }

    #[test]
    fn test_extract_metrics_missing_required_column() {
        let csv = "Perplexity,BLEU\n10,0.3\n";
        assert!(extract_metrics(&table(csv), ExtractionProfile::Summary).is_all_absent());
        // The extended profile keeps every row
        let extended = extract_metrics(&table(csv), ExtractionProfile::Extended);
        assert_eq!(extended.len(), 11);
        assert_eq!(extended.get(Metric::Bleu), Some(0.3));
        assert_eq!(extended.get(Metric::Rouge2F1), None);
    }

    #[test]
    fn test_extract_metrics_extended_rouge_variants() {
        let csv = format!("{}\n{}\n", HEADER, row("10", "0.3", "0.5", "60"));
        let metrics = extract_metrics(&table(&csv), ExtractionProfile::Extended);
        assert_eq!(metrics.get(Metric::Rouge2F1), Some(0.2));
        assert_eq!(metrics.get(Metric::RougeLF1), Some(0.4));
    }

    #[test]
    fn test_extract_metrics_row_order_invariant() {
        let rows = [
            row("10", "0.3", "0.5", "60"),
            row("12.5", "0.1", "0.25", "70.5"),
            row("7", "0.9", "0.75", "33"),
        ];
        let forward = format!("{}\n{}\n{}\n{}\n", HEADER, rows[0], rows[1], rows[2]);
        let reverse = format!("{}\n{}\n{}\n{}\n", HEADER, rows[2], rows[0], rows[1]);
        let a = extract_metrics(&table(&forward), ExtractionProfile::Summary);
        let b = extract_metrics(&table(&reverse), ExtractionProfile::Summary);
        for metric in Metric::SUMMARY {
            match (a.get(metric), b.get(metric)) {
                (Some(x), Some(y)) => assert!((x - y).abs() < TOLERANCE, "{}", metric),
                (x, y) => assert_eq!(x, y, "{}", metric),
            }
        }
    }

    #[test]
    fn test_delta_absence_and_arithmetic() {
        let base = map(&[
            (Metric::Perplexity, Some(10.0)),
            (Metric::Bleu, Some(0.3)),
            (Metric::Latency, None),
            (Metric::F1, Some(0.4)),
        ]);
        let variant = map(&[
            (Metric::Perplexity, Some(8.0)),
            (Metric::Bleu, Some(0.35)),
            (Metric::Latency, Some(1.0)),
            (Metric::F1, None),
        ]);
        let d = delta(&base, &variant);
        assert_eq!(d.len(), 4);
        assert!((d.get(Metric::Perplexity).unwrap() + 2.0).abs() < TOLERANCE);
        assert!((d.get(Metric::Bleu).unwrap() - 0.05).abs() < TOLERANCE);
        assert_eq!(d.get(Metric::Latency), None);
        assert_eq!(d.get(Metric::F1), None);
    }

    #[test]
    fn test_normalize() {
        let metrics = map(&[
            (Metric::Perplexity, Some(10.0)),
            (Metric::Latency, Some(2.0)),
            (Metric::Hallucination, Some(0.1)),
            (Metric::Bleu, Some(0.3)),
            (Metric::Throughput, Some(5.0)),
            (Metric::F1, None),
            (Metric::Readability, None),
        ]);
        let normalized = normalize(&metrics);
        assert_eq!(normalized.len(), metrics.len());
        assert_eq!(normalized.get(Metric::Perplexity), Some(-10.0));
        assert_eq!(normalized.get(Metric::Latency), Some(-2.0));
        assert_eq!(normalized.get(Metric::Bleu), Some(0.3));
        assert_eq!(normalized.get(Metric::Throughput), Some(5.0));
        assert_eq!(normalized.get(Metric::Hallucination), Some(-0.1));
        assert_eq!(normalized.get(Metric::F1), Some(0.0));
        assert_eq!(normalized.get(Metric::Readability), Some(0.0));
    }

    #[test]
    fn test_end_to_end_base_vs_rag() {
        let base = format!("{}\n{}\n", HEADER, row("10", "0.3", "0.5", "60"));
        let rag = format!("{}\n{}\n", HEADER, row("8", "0.35", "0.5", "60"));
        let base = extract_metrics(&table(&base), ExtractionProfile::Summary);
        let rag = extract_metrics(&table(&rag), ExtractionProfile::Summary);
        let d = delta(&base, &rag);

        assert!((d.get(Metric::Perplexity).unwrap() + 2.0).abs() < TOLERANCE);
        assert!((d.get(Metric::Bleu).unwrap() - 0.05).abs() < TOLERANCE);
        for metric in [Metric::Rouge1F1, Metric::BertScore, Metric::F1, Metric::Readability, Metric::Latency, Metric::Throughput] {
            assert!(d.get(metric).unwrap().abs() < TOLERANCE, "{}", metric);
        }
        assert_eq!(d.get(Metric::Hallucination), None);

        let n = normalize(&d);
        assert!((n.get(Metric::Perplexity).unwrap() - 2.0).abs() < TOLERANCE);
        assert!((n.get(Metric::Bleu).unwrap() - 0.05).abs() < TOLERANCE);
        assert_eq!(n.get(Metric::Hallucination), Some(0.0));
    }
}
