//! Result tables: one CSV file of evaluation samples for one model configuration.

use super::columns::Column;
use super::parsers::{parse_readability, parse_rouge, Readability, RougeF1};
use crate::error::Result;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::Path;

/// Tokens read as "no value", mirroring the usual CSV/dataframe NA spellings.
const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// One field of a result row.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell<T> {
    /// Column absent from the table, or an NA token in this row.
    Missing,
    /// Text present but not decodable as `T`.
    Invalid,
    Value(T),
}

impl<T> Default for Cell<T> {
    fn default() -> Self {
        Cell::Missing
    }
}

impl<T> Cell<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Cell::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }
}

impl Cell<f64> {
    pub fn get(&self) -> Option<f64> {
        self.value().copied()
    }
}

/// One evaluation sample with an explicit optional field per recognized column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultRow {
    pub perplexity: Cell<f64>,
    pub bleu: Cell<f64>,
    pub rouge: Cell<RougeF1>,
    pub bert_score: Cell<f64>,
    pub f1: Cell<f64>,
    pub readability: Cell<Readability>,
    pub latency: Cell<f64>,
    pub throughput: Cell<f64>,
    pub hallucination: Cell<f64>,
}

impl ResultRow {
    /// Build a row from raw cells keyed by column.
    pub fn from_cells(cells: &BTreeMap<Column, &str>) -> Self {
        let raw = |column: Column| cells.get(&column).copied().filter(|s| !is_na(s));
        let numeric = |column: Column| numeric_cell(raw(column));

        Self {
            perplexity: numeric(Column::Perplexity),
            bleu: numeric(Column::Bleu),
            rouge: rouge_cell(
                raw(Column::Rouge),
                [raw(Column::Rouge1), raw(Column::Rouge2), raw(Column::RougeL)],
            ),
            bert_score: numeric(Column::BertScore),
            f1: numeric(Column::F1),
            readability: readability_cell(raw(Column::Readability), raw(Column::ReadabilityFre)),
            latency: numeric(Column::Latency),
            throughput: numeric(Column::Throughput),
            hallucination: numeric(Column::Hallucination),
        }
    }

    /// Rows lacking ROUGE or Perplexity are excluded from summary aggregation.
    pub fn has_required_fields(&self) -> bool {
        !self.rouge.is_missing() && !self.perplexity.is_missing()
    }
}

fn is_na(raw: &str) -> bool {
    NA_TOKENS.contains(&raw.trim())
}

/// Numeric coercion: anything that is not a finite-or-infinite float is `Invalid`.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

fn numeric_cell(raw: Option<&str>) -> Cell<f64> {
    match raw {
        None => Cell::Missing,
        Some(s) => parse_number(s).map_or(Cell::Invalid, Cell::Value),
    }
}

/// Pre-split F-measure columns take precedence over the composite record.
fn rouge_cell(composite: Option<&str>, split: [Option<&str>; 3]) -> Cell<RougeF1> {
    if composite.is_none() && split.iter().all(Option::is_none) {
        return Cell::Missing;
    }
    let [r1, r2, rl] = split.map(|s| s.and_then(parse_number));
    let from_split = RougeF1 { rouge1: r1, rouge2: r2, rouge_l: rl };
    let merged = match composite {
        Some(text) => from_split.or(parse_rouge(text)),
        None => from_split,
    };
    if merged.is_empty() {
        Cell::Invalid
    } else {
        Cell::Value(merged)
    }
}

fn readability_cell(report: Option<&str>, fre: Option<&str>) -> Cell<Readability> {
    if let Some(fre) = fre.and_then(parse_number) {
        return Cell::Value(Readability::from_fre(fre));
    }
    match report {
        Some(text) => parse_readability(text).map_or(Cell::Invalid, Cell::Value),
        None if fre.is_some() => Cell::Invalid,
        None => Cell::Missing,
    }
}

/// An ordered sequence of result rows loaded from one source.
#[derive(Debug, Clone, Default)]
pub struct ResultTable {
    /// Source identifier, usually the file path.
    pub source: String,
    /// Recognized columns present in the header.
    pub columns: BTreeSet<Column>,
    pub rows: Vec<ResultRow>,
}

impl ResultTable {
    /// Load a CSV result table from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(&path.display().to_string(), file)
    }

    /// Load a CSV result table from any reader. Unrecognized columns are ignored.
    pub fn from_reader<R: Read>(source: &str, reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let index: Vec<(usize, Column)> = csv_reader
            .headers()?
            .iter()
            .enumerate()
            .filter_map(|(i, h)| Column::from_header(h).map(|c| (i, c)))
            .collect();
        let columns: BTreeSet<Column> = index.iter().map(|(_, c)| *c).collect();

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            let cells: BTreeMap<Column, &str> = index
                .iter()
                .filter_map(|(i, c)| record.get(*i).map(|v| (*c, v)))
                .collect();
            rows.push(ResultRow::from_cells(&cells));
        }

        log::debug!("Loaded {} rows ({} recognized columns) from {}", rows.len(), columns.len(), source);
        Ok(Self {
            source: source.to_string(),
            columns,
            rows,
        })
    }

    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    pub fn first_row(&self) -> Option<&ResultRow> {
        self.rows.first()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const CSV: &str = "\
Prompt,Perplexity,BLEU,ROUGE,BERTScore,F1,Readability,Latency,Throughput (tokens/sec)
q1,10,0.3,\"{'rouge1': Score(precision=0.5, recall=0.5, fmeasure=0.5)}\",0.8,0.4,\"{'flesch_reading_ease': 60}\",2.0,5.0
q2,,0.2,\"{'rouge1': Score(precision=0.1, recall=0.1, fmeasure=0.1)}\",0.7,0.3,garbage,1.0,abc
";

    #[test]
    fn test_from_reader_typed_rows() {
        let table = ResultTable::from_reader("mem", CSV.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.has_column(Column::Rouge));
        assert!(!table.has_column(Column::Hallucination));

        let first = &table.rows[0];
        assert_eq!(first.perplexity, Cell::Value(10.0));
        assert_eq!(first.rouge.value().and_then(|r| r.rouge1), Some(0.5));
        assert_eq!(
            first.readability.value().and_then(Readability::flesch_reading_ease),
            Some(60.0)
        );
        assert!(first.hallucination.is_missing());
        assert!(first.has_required_fields());

        let second = &table.rows[1];
        assert!(second.perplexity.is_missing());
        assert_eq!(second.readability, Cell::Invalid);
        assert_eq!(second.throughput, Cell::Invalid);
        assert!(!second.has_required_fields());
    }

    #[test]
    fn test_pre_split_rouge_and_precomputed_fre() {
        let csv = "BLEU,ROUGE-1,ROUGE-2,ROUGE-L,Readability (FRE)\n0.1,0.44,0.2,0.3,55.5\n";
        let table = ResultTable::from_reader("mem", csv.as_bytes()).unwrap();
        let row = &table.rows[0];
        let rouge = row.rouge.value().copied().unwrap();
        assert_eq!(rouge.rouge1, Some(0.44));
        assert_eq!(rouge.rouge_l, Some(0.3));
        assert_eq!(
            row.readability.value().and_then(Readability::flesch_reading_ease),
            Some(55.5)
        );
    }

    #[test]
    fn test_na_tokens_are_missing() {
        let csv = "Perplexity,BLEU,ROUGE\nNaN,n/a,\n";
        let table = ResultTable::from_reader("mem", csv.as_bytes()).unwrap();
        let row = &table.rows[0];
        assert!(row.perplexity.is_missing());
        assert!(row.bleu.is_missing());
        assert!(row.rouge.is_missing());
    }

    #[test]
    fn test_unparseable_rouge_is_invalid_not_missing() {
        let csv = "Perplexity,ROUGE\n3.0,not a record\n";
        let table = ResultTable::from_reader("mem", csv.as_bytes()).unwrap();
        assert_eq!(table.rows[0].rouge, Cell::Invalid);
        assert!(table.rows[0].has_required_fields());
    }

    #[test]
    fn test_from_path_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = ResultTable::from_path(&temp_dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, crate::error::RagdashError::Io(_)));
    }

    #[test]
    fn test_from_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("falcon_evaluation_results.csv");
        fs::write(&path, CSV).unwrap();
        let table = ResultTable::from_path(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.source.contains("falcon_evaluation_results.csv"));
    }
}
