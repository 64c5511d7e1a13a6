//! The fixed metric vocabulary and how each metric is read from a result row.

use crate::ingest::ResultRow;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named evaluation metric. Ordering follows the report column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Metric {
    #[serde(rename = "Perplexity")]
    Perplexity,
    #[serde(rename = "BLEU")]
    Bleu,
    #[serde(rename = "ROUGE-1 F1")]
    Rouge1F1,
    #[serde(rename = "ROUGE-2 F1")]
    Rouge2F1,
    #[serde(rename = "ROUGE-L F1")]
    RougeLF1,
    #[serde(rename = "BERTScore")]
    BertScore,
    #[serde(rename = "F1")]
    F1,
    #[serde(rename = "Readability (FRE)")]
    Readability,
    #[serde(rename = "Latency")]
    Latency,
    #[serde(rename = "Throughput")]
    Throughput,
    #[serde(rename = "Hallucination")]
    Hallucination,
}

/// Chart grouping by value range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MetricGroup {
    /// Scores on a roughly 0..1 scale
    Quality,
    /// Latency, throughput, readability and other wide-range values
    Performance,
}

impl Metric {
    /// The nine-metric summary set.
    pub const SUMMARY: [Metric; 9] = [
        Metric::Perplexity,
        Metric::Bleu,
        Metric::Rouge1F1,
        Metric::BertScore,
        Metric::F1,
        Metric::Readability,
        Metric::Latency,
        Metric::Throughput,
        Metric::Hallucination,
    ];

    /// Summary set plus ROUGE-2 and ROUGE-L.
    pub const EXTENDED: [Metric; 11] = [
        Metric::Perplexity,
        Metric::Bleu,
        Metric::Rouge1F1,
        Metric::Rouge2F1,
        Metric::RougeLF1,
        Metric::BertScore,
        Metric::F1,
        Metric::Readability,
        Metric::Latency,
        Metric::Throughput,
        Metric::Hallucination,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Metric::Perplexity => "Perplexity",
            Metric::Bleu => "BLEU",
            Metric::Rouge1F1 => "ROUGE-1 F1",
            Metric::Rouge2F1 => "ROUGE-2 F1",
            Metric::RougeLF1 => "ROUGE-L F1",
            Metric::BertScore => "BERTScore",
            Metric::F1 => "F1",
            Metric::Readability => "Readability (FRE)",
            Metric::Latency => "Latency",
            Metric::Throughput => "Throughput",
            Metric::Hallucination => "Hallucination",
        }
    }

    /// Smaller raw values mean a better model.
    pub fn lower_is_better(&self) -> bool {
        matches!(self, Metric::Perplexity | Metric::Latency | Metric::Hallucination)
    }

    pub fn group(&self) -> MetricGroup {
        match self {
            Metric::Bleu
            | Metric::Rouge1F1
            | Metric::Rouge2F1
            | Metric::RougeLF1
            | Metric::BertScore
            | Metric::F1 => MetricGroup::Quality,
            Metric::Perplexity
            | Metric::Readability
            | Metric::Latency
            | Metric::Throughput
            | Metric::Hallucination => MetricGroup::Performance,
        }
    }

    /// Read this metric from one row; `None` when the row has no usable value.
    pub fn value_in(&self, row: &ResultRow) -> Option<f64> {
        match self {
            Metric::Perplexity => row.perplexity.get(),
            Metric::Bleu => row.bleu.get(),
            Metric::Rouge1F1 => row.rouge.value().and_then(|r| r.rouge1),
            Metric::Rouge2F1 => row.rouge.value().and_then(|r| r.rouge2),
            Metric::RougeLF1 => row.rouge.value().and_then(|r| r.rouge_l),
            Metric::BertScore => row.bert_score.get(),
            Metric::F1 => row.f1.get(),
            Metric::Readability => row.readability.value().and_then(|r| r.flesch_reading_ease()),
            Metric::Latency => row.latency.get(),
            Metric::Throughput => row.throughput.get(),
            Metric::Hallucination => row.hallucination.get(),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which metric set is extracted and whether incomplete rows are dropped first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractionProfile {
    /// Nine summary metrics over rows that carry both ROUGE and Perplexity.
    #[default]
    Summary,
    /// Eleven metrics over every row.
    Extended,
}

impl ExtractionProfile {
    pub fn metrics(&self) -> &'static [Metric] {
        match self {
            ExtractionProfile::Summary => &Metric::SUMMARY,
            ExtractionProfile::Extended => &Metric::EXTENDED,
        }
    }

    pub fn includes(&self, row: &ResultRow) -> bool {
        match self {
            ExtractionProfile::Summary => row.has_required_fields(),
            ExtractionProfile::Extended => true,
        }
    }
}
