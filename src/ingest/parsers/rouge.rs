use super::literal::{parse_literal, Literal};
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// F-measures of the three ROUGE variants carried by one result row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RougeF1 {
    pub rouge1: Option<f64>,
    pub rouge2: Option<f64>,
    pub rouge_l: Option<f64>,
}

impl RougeF1 {
    /// True when no variant could be extracted.
    pub fn is_empty(&self) -> bool {
        self.rouge1.is_none() && self.rouge2.is_none() && self.rouge_l.is_none()
    }

    /// Fill variants missing here from `other`.
    pub fn or(self, other: RougeF1) -> RougeF1 {
        RougeF1 {
            rouge1: self.rouge1.or(other.rouge1),
            rouge2: self.rouge2.or(other.rouge2),
            rouge_l: self.rouge_l.or(other.rouge_l),
        }
    }
}

/// Keys of the composite record, in `RougeF1` field order.
const ROUGE_KEYS: [&str; 3] = ["rouge1", "rouge2", "rougeL"];

/// Position of `fmeasure` in a positional `Score(precision, recall, fmeasure)`.
const FMEASURE_POSITION: usize = 2;

/// Extract the F-measures from a serialized composite ROUGE record.
///
/// The structural literal parser is tried first; if it fails or finds no
/// scores, a `fmeasure=` regex scan is used instead. Never errors: anything
/// unrecoverable comes back as `None` for that variant.
pub fn parse_rouge(text: &str) -> RougeF1 {
    let structural = match parse_literal(text) {
        Ok(lit) => from_literal(&lit),
        Err(e) => {
            log::debug!("ROUGE record not a literal ({}), scanning for fmeasure", e);
            RougeF1::default()
        }
    };
    if !structural.is_empty() {
        return structural;
    }
    from_regex(text)
}

fn from_literal(lit: &Literal) -> RougeF1 {
    let fmeasure = |key: &str| {
        lit.get(key)
            .and_then(|score| score.attr("fmeasure", FMEASURE_POSITION))
            .and_then(Literal::as_f64)
    };
    RougeF1 {
        rouge1: fmeasure(ROUGE_KEYS[0]),
        rouge2: fmeasure(ROUGE_KEYS[1]),
        rouge_l: fmeasure(ROUGE_KEYS[2]),
    }
}

fn fallback_patterns() -> &'static [Regex; 3] {
    static PATTERNS: OnceLock<[Regex; 3]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        ROUGE_KEYS.map(|key| {
            Regex::new(&format!(r"{}.*?fmeasure=([\d.]+)", key)).expect("Invalid regex pattern")
        })
    })
}

fn from_regex(text: &str) -> RougeF1 {
    let [r1, r2, rl] = fallback_patterns();
    let scan = |re: &Regex| {
        re.captures(text)
            .and_then(|cap| cap.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok())
    };
    RougeF1 {
        rouge1: scan(r1),
        rouge2: scan(r2),
        rouge_l: scan(rl),
    }
}
