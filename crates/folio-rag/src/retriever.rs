//! Query embedding plus nearest-neighbour search

use crate::error::RagError;
use folio_domain::traits::EmbeddingModel;
use folio_domain::RetrievalHit;
use folio_store::{StoreError, VectorStore};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Retriever settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrieverConfig {
    /// Hits returned per query
    pub top_k: usize,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self { top_k: 8 }
    }
}

/// Ranks indexed chunks against a question
///
/// Holds the loaded index read-only for its whole lifetime.
pub struct Retriever {
    store: VectorStore,
    embedder: Box<dyn EmbeddingModel>,
    config: RetrieverConfig,
}

impl Retriever {
    /// Wrap an in-memory store
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DimensionMismatch`] when the embedder does not
    /// produce vectors of the index dimension.
    pub fn new<E>(store: VectorStore, embedder: E, config: RetrieverConfig) -> Result<Self, RagError>
    where
        E: EmbeddingModel + 'static,
    {
        if embedder.dimension() != store.dimension() {
            return Err(StoreError::DimensionMismatch {
                expected: store.dimension(),
                actual: embedder.dimension(),
            }
            .into());
        }
        Ok(Self {
            store,
            embedder: Box::new(embedder),
            config,
        })
    }

    /// Load the index saved in `index_dir`
    pub fn open<E>(index_dir: &Path, embedder: E, config: RetrieverConfig) -> Result<Self, RagError>
    where
        E: EmbeddingModel + 'static,
    {
        Self::new(VectorStore::load(index_dir)?, embedder, config)
    }

    /// Top [`RetrieverConfig::top_k`] hits for `query`, best first
    pub fn retrieve(&self, query: &str) -> Result<Vec<RetrievalHit>, RagError> {
        self.retrieve_k(query, self.config.top_k)
    }

    /// Top `k` hits for `query`, best first
    pub fn retrieve_k(&self, query: &str, k: usize) -> Result<Vec<RetrievalHit>, RagError> {
        let vector = self.embedder.embed(query)?;
        let hits = self.store.search(&vector, k)?;
        debug!("Retrieved {} hits for {:?}", hits.len(), query);
        Ok(hits)
    }

    /// Settings in use
    pub fn config(&self) -> &RetrieverConfig {
        &self.config
    }

    /// Number of indexed chunks
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// True when the index is empty
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_domain::{chunk_id, ChunkRecord};
    use folio_store::HashingEmbedder;

    fn store(embedder: &HashingEmbedder, texts: &[&str]) -> VectorStore {
        let mut store = VectorStore::new(embedder.dimension(), texts.len());
        for (i, text) in texts.iter().enumerate() {
            let page = i as u32 + 1;
            let chunk = ChunkRecord::new(chunk_id("d", page, page, i), "d", "d.pdf", page, page, *text).unwrap();
            store.add(embedder.embed(text).unwrap(), chunk).unwrap();
        }
        store
    }

    #[test]
    fn test_retrieve_respects_top_k() {
        let embedder = HashingEmbedder::new(64);
        let store = store(&embedder, &["alpha beta", "gamma delta", "epsilon zeta", "eta theta"]);
        let retriever = Retriever::new(store, embedder, RetrieverConfig { top_k: 2 }).unwrap();

        let hits = retriever.retrieve("gamma delta").unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].chunk.page_start, 2);
        assert!(hits[0].score >= hits[1].score);
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let store = store(&HashingEmbedder::new(64), &["alpha"]);
        let result = Retriever::new(store, HashingEmbedder::new(32), RetrieverConfig::default());
        match result {
            Err(RagError::Store(StoreError::DimensionMismatch { expected, actual })) => {
                assert_eq!(expected, 64);
                assert_eq!(actual, 32);
            }
            _ => panic!("Expected DimensionMismatch"),
        }
    }

    #[test]
    fn test_query_without_tokens_is_an_embedding_error() {
        let embedder = HashingEmbedder::new(16);
        let retriever = Retriever::new(store(&embedder, &["alpha"]), embedder, RetrieverConfig::default()).unwrap();
        assert!(matches!(retriever.retrieve("  "), Err(RagError::Embedding(_))));
    }
}
