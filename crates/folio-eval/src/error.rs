//! Error types for evaluation runs

use folio_rag::RagError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during an evaluation run
#[derive(Error, Debug)]
pub enum EvalError {
    /// Question file does not exist
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// No row with a question
    #[error("questions.csv is empty or invalid.")]
    NoQuestions,

    /// Malformed question file or unwritable report
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Retrieval or generation failed
    #[error(transparent)]
    Rag(#[from] RagError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
