//! Embedding helpers and the offline hashing embedder
//!
//! [`HashingEmbedder`] maps text to a bag of lowercase alphanumeric tokens
//! and hashes each token into one of `dimension` buckets with a hash-derived
//! sign (the "hashing trick"). Texts sharing words get similar vectors, so
//! retrieval behaves sensibly without any model files or network access.
//!
//! # Examples
//!
//! ```rust
//! use folio_domain::traits::EmbeddingModel;
//! use folio_store::embedding::{cosine_similarity, HashingEmbedder};
//!
//! let model = HashingEmbedder::new(384);
//! let a = model.embed("inverse document frequency").unwrap();
//! let b = model.embed("document frequency").unwrap();
//! let c = model.embed("recurrent networks").unwrap();
//! assert!(cosine_similarity(&a, &b) > cosine_similarity(&a, &c));
//! ```
//!
//! Vectors come from the standard library's `DefaultHasher` with its fixed
//! keys; an index and its queries must be embedded by the same build.

use folio_domain::traits::EmbeddingModel;
use folio_domain::EmbeddingError;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Deterministic bag-of-tokens embedding model
#[derive(Debug, Clone, Copy)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    /// Create a new hashing embedder
    ///
    /// # Parameters
    ///
    /// - `dimension`: Number of hash buckets (e.g., 384)
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn token_hash(token: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        token.hash(&mut hasher);
        hasher.finish()
    }
}

impl EmbeddingModel for HashingEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if self.dimension == 0 {
            return Err(EmbeddingError::InvalidInput("dimension must be greater than 0".to_string()));
        }

        let mut embedding = vec![0.0f32; self.dimension];
        let mut tokens = 0usize;
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let hash = Self::token_hash(&token.to_lowercase());
            let bucket = (hash % self.dimension as u64) as usize;
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            embedding[bucket] += sign;
            tokens += 1;
        }

        if tokens == 0 {
            return Err(EmbeddingError::InvalidInput(
                "Text without any word cannot be embedded".to_string(),
            ));
        }

        l2_normalize(&mut embedding);
        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Scale `vector` to unit length; zero vectors are left untouched
pub fn l2_normalize(vector: &mut [f32]) {
    let magnitude: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if magnitude > 0.0 {
        for value in vector.iter_mut() {
            *value /= magnitude;
        }
    }
}

/// Calculate cosine similarity between two embedding vectors
///
/// Returns a value in `[-1, 1]`; 0.0 when either vector is zero or the
/// lengths differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    dot_product / (magnitude_a * magnitude_b)
}
