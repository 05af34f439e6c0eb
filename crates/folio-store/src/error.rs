//! Error types for the storage layer

use folio_domain::DomainError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// A required input file does not exist
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A line of a record file is not valid JSON for the expected record
    #[error("{}:{line}: {reason}", path.display())]
    Parse {
        /// Record file
        path: PathBuf,
        /// 1-based line number
        line: usize,
        /// Parser message
        reason: String,
    },

    /// A record parsed but violates its invariants
    #[error("{}:{line}: {source}", path.display())]
    InvalidRecord {
        /// Record file
        path: PathBuf,
        /// 1-based line number
        line: usize,
        /// Validation failure
        source: DomainError,
    },

    /// Vector and query dimensions disagree
    #[error("Invalid embedding dimension: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Index dimension
        expected: usize,
        /// Dimension provided
        actual: usize,
    },

    /// Index directory contents are inconsistent
    #[error("Corrupt index: {0}")]
    CorruptIndex(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
