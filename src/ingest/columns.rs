/// Recognized result table columns.
///
/// Header names are matched exactly (case-sensitive). Pre-split ROUGE and
/// precomputed readability columns accept the alternative names used by
/// fine-tuned and quantized result files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Perplexity,
    Bleu,
    Rouge,
    Rouge1,
    Rouge2,
    RougeL,
    BertScore,
    F1,
    Readability,
    ReadabilityFre,
    Latency,
    Throughput,
    Hallucination,
}

impl Column {
    pub const ALL: [Column; 13] = [
        Column::Perplexity,
        Column::Bleu,
        Column::Rouge,
        Column::Rouge1,
        Column::Rouge2,
        Column::RougeL,
        Column::BertScore,
        Column::F1,
        Column::Readability,
        Column::ReadabilityFre,
        Column::Latency,
        Column::Throughput,
        Column::Hallucination,
    ];

    /// Accepted header names.
    pub fn headers(&self) -> &'static [&'static str] {
        match self {
            Column::Perplexity => &["Perplexity"],
            Column::Bleu => &["BLEU"],
            Column::Rouge => &["ROUGE"],
            Column::Rouge1 => &["ROUGE-1", "ROUGE-1 F1"],
            Column::Rouge2 => &["ROUGE-2", "ROUGE-2 F1"],
            Column::RougeL => &["ROUGE-L", "ROUGE-L F1"],
            Column::BertScore => &["BERTScore"],
            Column::F1 => &["F1"],
            Column::Readability => &["Readability"],
            Column::ReadabilityFre => &["Readability (FRE)"],
            Column::Latency => &["Latency"],
            Column::Throughput => &["Throughput (tokens/sec)"],
            Column::Hallucination => &["Hallucination"],
        }
    }

    pub fn from_header(header: &str) -> Option<Column> {
        let header = header.trim_start_matches('\u{feff}');
        Column::ALL
            .into_iter()
            .find(|c| c.headers().contains(&header))
    }
}
