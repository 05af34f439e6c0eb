//! Error types for retrieval and answering

use folio_domain::EmbeddingError;
use folio_store::StoreError;
use thiserror::Error;

/// Errors raised while indexing, retrieving or answering
#[derive(Error, Debug)]
pub enum RagError {
    /// The chunk file held no records
    #[error("No chunks to index.")]
    NoChunks,

    /// Index, metadata or page file problem
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The embedding model failed
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    /// Inconsistent answering setup
    #[error("Configuration error: {0}")]
    Config(String),

    /// The text-generation call failed
    #[error("Generation failed: {0}")]
    Generation(String),
}
