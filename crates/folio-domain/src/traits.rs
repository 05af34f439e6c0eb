//! Trait definitions for external collaborators
//!
//! These traits define the boundaries between the pipeline and the
//! backends it drives. Implementations live in other crates.

use crate::chat::{ChatMessage, Completion};
use crate::error::EmbeddingError;

/// Maps text to fixed-length float vectors
///
/// Implemented by `folio-store` (hashing embedder) and `folio-llm`
/// (HTTP embedding backends).
pub trait EmbeddingModel {
    /// Embed a single text
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Embed several texts, preserving order
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        texts.iter().map(|text| self.embed(text)).collect()
    }

    /// Dimension of the produced vectors
    fn dimension(&self) -> usize;
}

impl<T: EmbeddingModel + ?Sized> EmbeddingModel for Box<T> {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        (**self).embed(text)
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        (**self).embed_batch(texts)
    }

    fn dimension(&self) -> usize {
        (**self).dimension()
    }
}

/// Hosted or local text generation
///
/// Implemented by the infrastructure layer (`folio-llm`).
pub trait LlmProvider {
    /// Error type for generation
    type Error;

    /// Run one chat completion
    fn chat(&self, messages: &[ChatMessage]) -> Result<Completion, Self::Error>;
}

impl<T: LlmProvider + ?Sized> LlmProvider for Box<T> {
    type Error = T::Error;

    fn chat(&self, messages: &[ChatMessage]) -> Result<Completion, Self::Error> {
        (**self).chat(messages)
    }
}
