//! Error types shared across crates

use thiserror::Error;

/// Validation failures for records built from untrusted input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required field is absent or empty
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Page numbers are 1-based
    #[error("Invalid page number: {0} (pages start at 1)")]
    InvalidPage(u32),

    /// A page range whose start lies after its end
    #[error("Invalid page range: {start}-{end}")]
    InvalidPageRange {
        /// First page of the range
        start: u32,
        /// Last page of the range
        end: u32,
    },
}

/// Errors that can occur during embedding generation
#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// Invalid input text
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Backend failed to produce a vector
    #[error("Embedding backend failed: {0}")]
    Backend(String),

    /// The backend returned a vector of an unexpected size
    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimension the model advertises
        expected: usize,
        /// Dimension actually returned
        actual: usize,
    },
}
