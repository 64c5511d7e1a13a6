pub mod columns;
pub mod metadata;
pub mod parsers;
pub mod table;
pub mod walker;

pub use columns::Column;
pub use metadata::{model_identity, variant_identity};
pub use parsers::{extract_fre, parse_literal, parse_readability, parse_rouge, Literal, Readability, RougeF1};
pub use table::{Cell, ResultRow, ResultTable};
pub use walker::{discover_tables, TableFilter, TableSource};
