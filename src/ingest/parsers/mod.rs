//! Embedded-field parsers: structured text stored inside result table cells.
//!
//! Every extractor here is best-effort. A cell that cannot be decoded yields
//! `None` for the sub-fields being extracted and never aborts the table.

pub mod literal;
pub mod readability;
pub mod rouge;

pub use literal::{parse_literal, Literal};
pub use readability::{extract_fre, parse_readability, Readability, FLESCH_READING_EASE};
pub use rouge::{parse_rouge, RougeF1};
