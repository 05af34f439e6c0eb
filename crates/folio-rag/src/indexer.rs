//! Chunk file → vector index directory

use crate::error::RagError;
use folio_domain::traits::EmbeddingModel;
use folio_domain::EmbeddingError;
use folio_store::{read_chunks, VectorStore};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

/// Chunks embedded per model call
pub const DEFAULT_BATCH_SIZE: usize = 32;

/// What [`build_index`] wrote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexSummary {
    /// Number of indexed chunks
    pub chunks: usize,
    /// Vector dimension
    pub dim: usize,
}

/// Embed every chunk of `chunks_path` and save the index into `index_dir`
///
/// Metadata line `i` of the written index describes chunk `i` of the input
/// file. An existing index in `index_dir` is replaced.
///
/// # Errors
///
/// Returns error if:
/// - The chunk file is missing or malformed
/// - The chunk file holds no records ([`RagError::NoChunks`])
/// - The embedder fails or returns vectors of the wrong length
pub fn build_index<E>(
    chunks_path: &Path,
    index_dir: &Path,
    embedder: &E,
    batch_size: usize,
) -> Result<IndexSummary, RagError>
where
    E: EmbeddingModel + ?Sized,
{
    let chunks = read_chunks(chunks_path)?;
    if chunks.is_empty() {
        return Err(RagError::NoChunks);
    }

    let dim = embedder.dimension();
    let mut store = VectorStore::new(dim, chunks.len());
    for (n, batch) in chunks.chunks(batch_size.max(1)).enumerate() {
        let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
        let vectors = embedder.embed_batch(&texts)?;
        if vectors.len() != batch.len() {
            return Err(EmbeddingError::Backend(format!(
                "{} vectors returned for {} texts",
                vectors.len(),
                batch.len()
            ))
            .into());
        }
        debug!("Embedded batch {} ({} chunks)", n + 1, batch.len());
        for (vector, chunk) in vectors.into_iter().zip(batch) {
            store.add(vector, chunk.clone())?;
        }
    }
    store.save(index_dir)?;

    info!("Indexed {} chunks (dim={}) into {}", store.len(), dim, index_dir.display());
    Ok(IndexSummary {
        chunks: store.len(),
        dim,
    })
}
