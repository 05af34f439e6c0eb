//! Error types for ingestion

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while turning a PDF into page records
#[derive(Error, Debug)]
pub enum IngestError {
    /// The input directory must hold exactly one PDF
    #[error("Expected exactly 1 PDF in {}, found {found}", dir.display())]
    PdfCount {
        /// Directory that was scanned
        dir: PathBuf,
        /// Number of PDFs found
        found: usize,
    },

    /// The PDF could not be opened or parsed
    #[error("Failed to read PDF {}: {reason}", path.display())]
    Pdf {
        /// Offending file
        path: PathBuf,
        /// Parser message
        reason: String,
    },

    /// A record built from the PDF failed validation
    #[error("Invalid record: {0}")]
    Record(#[from] folio_domain::DomainError),

    /// Writing the page record file failed
    #[error("Store error: {0}")]
    Store(#[from] folio_store::StoreError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
