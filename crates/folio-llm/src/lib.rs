//! Folio LLM Provider Layer
//!
//! Text-generation and embedding backends behind the `folio-domain` traits.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `GroqProvider`: Hosted OpenAI-compatible chat completions (Groq by default)
//! - `OllamaProvider`: Local Ollama chat API
//! - `OllamaEmbedder`: Local Ollama embeddings API
//!
//! The HTTP providers are async internally; their trait implementations
//! drive a current-thread runtime per call, so they must not be called from
//! inside another tokio runtime. A failed request is returned as is, never
//! retried.
//!
//! # Examples
//!
//! ```
//! use folio_domain::traits::LlmProvider;
//! use folio_domain::ChatMessage;
//! use folio_llm::MockProvider;
//!
//! let provider = MockProvider::new("Hello from LLM!");
//! let completion = provider.chat(&[ChatMessage::user("test prompt")]).unwrap();
//! assert_eq!(completion.text, "Hello from LLM!");
//! ```

#![warn(missing_docs)]

pub mod groq;
mod mock;
pub mod ollama;

use std::future::Future;
use thiserror::Error;

pub use groq::{GenerationConfig, GroqProvider};
pub use mock::MockProvider;
pub use ollama::{OllamaEmbedder, OllamaProvider};

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// API key absent from the environment
    #[error("Missing {0} (export it or add it to .env)")]
    MissingCredential(String),

    /// The blocking runtime could not be started
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// Run a future to completion on a fresh current-thread runtime
pub(crate) fn block_on<F: Future>(future: F) -> Result<F::Output, LlmError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| LlmError::Runtime(e.to_string()))?;
    Ok(runtime.block_on(future))
}

/// Map a non-success HTTP status to an error
pub(crate) async fn status_error(response: reqwest::Response, model: &str) -> LlmError {
    let status = response.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return LlmError::ModelNotAvailable(model.to_string());
    }
    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    LlmError::Communication(format!("HTTP {}: {}", status, error_text))
}
