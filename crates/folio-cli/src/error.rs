//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// PDF discovery, extraction or page file error
    #[error(transparent)]
    Ingest(#[from] folio_ingest::IngestError),

    /// Record file or index error
    #[error(transparent)]
    Store(#[from] folio_store::StoreError),

    /// Backend construction error
    #[error(transparent)]
    Llm(#[from] folio_llm::LlmError),

    /// Retrieval or generation error
    #[error(transparent)]
    Rag(#[from] folio_rag::RagError),

    /// Evaluation error
    #[error(transparent)]
    Eval(#[from] folio_eval::EvalError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
