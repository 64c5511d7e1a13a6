use super::literal::{parse_literal, Literal};
use serde::Serialize;
use std::collections::BTreeMap;

/// Key of the Flesch Reading Ease score inside a readability report.
pub const FLESCH_READING_EASE: &str = "flesch_reading_ease";

/// Readability report: index name → score. Non-numeric entries are dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Readability {
    pub scores: BTreeMap<String, f64>,
}

impl Readability {
    /// Report holding only a precomputed FRE value.
    pub fn from_fre(fre: f64) -> Self {
        let mut scores = BTreeMap::new();
        scores.insert(FLESCH_READING_EASE.to_string(), fre);
        Self { scores }
    }

    pub fn get(&self, index: &str) -> Option<f64> {
        self.scores.get(index).copied()
    }

    pub fn flesch_reading_ease(&self) -> Option<f64> {
        self.get(FLESCH_READING_EASE)
    }
}

/// Decode a serialized readability mapping. `None` unless the text is a dict literal.
pub fn parse_readability(text: &str) -> Option<Readability> {
    let lit = match parse_literal(text) {
        Ok(lit) => lit,
        Err(e) => {
            log::debug!("Readability report not a literal: {}", e);
            return None;
        }
    };
    let Literal::Dict(entries) = lit else {
        return None;
    };
    let scores = entries
        .iter()
        .filter_map(|(k, v)| match k {
            Literal::Str(name) => v.as_f64().map(|score| (name.clone(), score)),
            _ => None,
        })
        .collect();
    Some(Readability { scores })
}

/// Flesch Reading Ease from a serialized readability report.
pub fn extract_fre(text: &str) -> Option<f64> {
    parse_readability(text).and_then(|r| r.flesch_reading_ease())
}
