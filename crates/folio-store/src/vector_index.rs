//! HNSW Vector Index for Semantic Search
//!
//! A thin wrapper around `hnsw_rs` holding fixed-dimension vectors under
//! dense internal ids `0..len`. Ids are assigned in insertion order, which is
//! what lets [`crate::VectorStore`] pair vector `i` with metadata line `i`.
//!
//! # HNSW Parameters
//!
//! - **M**: Number of bi-directional links per node (default: 16)
//!   Higher M = better accuracy but more memory
//! - **efConstruction**: Size of dynamic candidate list during construction (default: 200)
//!   Higher efConstruction = better index quality but slower build
//! - **efSearch**: Size of dynamic candidate list during search (default: 64)
//!   Higher efSearch = better recall but slower queries

use crate::error::StoreError;
use hnsw_rs::prelude::*;

const DEFAULT_M: usize = 16;
const DEFAULT_EF_CONSTRUCTION: usize = 200;
const MAX_LAYERS: usize = 16;
/// Default candidate list size during search
pub const DEFAULT_EF_SEARCH: usize = 64;

/// Nearest-neighbour index over cosine distance
///
/// # Examples
///
/// ```
/// use folio_store::VectorIndex;
///
/// let mut index = VectorIndex::new(3, 10);
/// index.add(&[1.0, 0.0, 0.0]).unwrap();
/// index.add(&[0.0, 1.0, 0.0]).unwrap();
///
/// let results = index.search(&[0.9, 0.1, 0.0], 1, 64).unwrap();
/// assert_eq!(results[0].0, 0);
/// ```
pub struct VectorIndex {
    /// Expected embedding dimension
    dimension: usize,

    hnsw: Hnsw<'static, f32, DistCosine>,

    /// Number of vectors inserted, also the next internal id
    len: usize,
}

impl VectorIndex {
    /// Create an empty index
    ///
    /// # Parameters
    ///
    /// - `dimension`: Embedding vector dimension (e.g., 384 for MiniLM)
    /// - `capacity`: Expected number of vectors, used to size the graph
    pub fn new(dimension: usize, capacity: usize) -> Self {
        let max_elements = capacity.max(1_000);
        let nb_layer = MAX_LAYERS.min((max_elements as f32).ln().trunc() as usize);

        let hnsw = Hnsw::<'static, f32, DistCosine>::new(
            DEFAULT_M,
            max_elements,
            nb_layer,
            DEFAULT_EF_CONSTRUCTION,
            DistCosine {},
        );

        Self {
            dimension,
            hnsw,
            len: 0,
        }
    }

    /// Add a vector and return its internal id
    pub fn add(&mut self, embedding: &[f32]) -> Result<usize, StoreError> {
        self.check_dimension(embedding)?;

        let internal_id = self.len;
        let embedding_vec = embedding.to_vec();
        self.hnsw.insert((&embedding_vec, internal_id));
        self.len += 1;

        Ok(internal_id)
    }

    /// Search for the k nearest neighbours of `query`
    ///
    /// Returns `(internal_id, similarity)` pairs, most similar first, where
    /// similarity is `1 - cosine distance`.
    pub fn search(&self, query: &[f32], k: usize, ef_search: usize) -> Result<Vec<(usize, f32)>, StoreError> {
        self.check_dimension(query)?;
        if self.len == 0 || k == 0 {
            return Ok(Vec::new());
        }

        let mut results: Vec<(usize, f32)> = self
            .hnsw
            .search(query, k, ef_search.max(k))
            .into_iter()
            .map(|neighbour| (neighbour.d_id, 1.0 - neighbour.distance))
            .collect();
        results.sort_by(|a, b| b.1.total_cmp(&a.1));

        Ok(results)
    }

    fn check_dimension(&self, vector: &[f32]) -> Result<(), StoreError> {
        if vector.len() != self.dimension {
            return Err(StoreError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        Ok(())
    }

    /// Embedding dimension accepted by the index
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Get the number of vectors in the index
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
