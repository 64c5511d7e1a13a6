use thiserror::Error;

/// Main error type for ragdash
#[derive(Error, Debug)]
pub enum RagdashError {
    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader errors (malformed table, unreadable header)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// No base result table exists for the requested model
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// A base table exists but no variant table pairs with it
    #[error("No comparison counterpart for model: {0}")]
    NoCounterpart(String),

    /// Parse errors (embedded literal text)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Convenient Result type using RagdashError
pub type Result<T> = std::result::Result<T, RagdashError>;
