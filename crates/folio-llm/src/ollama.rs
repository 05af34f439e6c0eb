//! Ollama Provider Implementation
//!
//! Chat and embedding backends for a local Ollama instance.
//!
//! # Examples
//!
//! ```no_run
//! use folio_domain::traits::EmbeddingModel;
//! use folio_llm::OllamaEmbedder;
//!
//! let embedder = OllamaEmbedder::new("http://localhost:11434", "nomic-embed-text", 768).unwrap();
//! let vector = embedder.embed("attention heads").unwrap();
//! assert_eq!(vector.len(), 768);
//! ```

use crate::groq::GenerationConfig;
use crate::{block_on, status_error, LlmError};
use folio_domain::traits::{EmbeddingModel, LlmProvider};
use folio_domain::{ChatMessage, Completion, EmbeddingError, TokenUsage};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default timeout for Ollama requests (60 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Chat provider for a local Ollama instance
pub struct OllamaProvider {
    endpoint: String,
    config: GenerationConfig,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: OllamaResponseMessage,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[derive(Deserialize)]
struct OllamaResponseMessage {
    #[serde(default)]
    content: String,
}

impl OllamaChatResponse {
    fn into_completion(self) -> Completion {
        let usage = match (self.prompt_eval_count, self.eval_count) {
            (None, None) => None,
            (prompt, completion) => Some(TokenUsage {
                prompt_tokens: prompt,
                completion_tokens: completion,
                total_tokens: Some(prompt.unwrap_or(0) + completion.unwrap_or(0)),
            }),
        };
        Completion {
            text: self.message.content,
            usage,
        }
    }
}

fn build_client(timeout_secs: u64) -> Result<reqwest::Client, LlmError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))
}

impl OllamaProvider {
    /// Create a new Ollama chat provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g., "http://localhost:11434")
    /// - `config`: Model and sampling settings
    pub fn new(endpoint: impl Into<String>, config: GenerationConfig) -> Result<Self, LlmError> {
        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            config,
            client: build_client(DEFAULT_TIMEOUT_SECS)?,
        })
    }

    /// Replace the request timeout
    pub fn with_timeout(mut self, timeout_secs: u64) -> Result<Self, LlmError> {
        self.client = build_client(timeout_secs)?;
        Ok(self)
    }

    /// Run one chat completion against `/api/chat`
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Ollama is not running
    /// - Model is not available
    /// - Response format is invalid
    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<Completion, LlmError> {
        let url = format!("{}/api/chat", self.endpoint);
        let request_body = OllamaChatRequest {
            model: &self.config.model,
            messages,
            stream: false,
            options: OllamaOptions {
                temperature: self.config.temperature,
                num_predict: self.config.max_tokens,
            },
        };

        debug!("POST {} model={}", url, self.config.model);
        let response = self
            .client
            .post(&url)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(status_error(response, &self.config.model).await);
        }

        let body: OllamaChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;
        Ok(body.into_completion())
    }
}

impl LlmProvider for OllamaProvider {
    type Error = LlmError;

    fn chat(&self, messages: &[ChatMessage]) -> Result<Completion, Self::Error> {
        block_on(self.complete(messages))?
    }
}

/// Embedding backend over Ollama's `/api/embeddings`
///
/// Vectors are L2-normalized before being returned unless disabled with
/// [`OllamaEmbedder::with_normalize`].
pub struct OllamaEmbedder {
    endpoint: String,
    model: String,
    dimension: usize,
    normalize: bool,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct OllamaEmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct OllamaEmbeddingResponse {
    embedding: Vec<f32>,
}

impl OllamaEmbedder {
    /// Create a new embedder
    ///
    /// `dimension` is the vector length the model is expected to produce;
    /// responses of any other length are rejected.
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        dimension: usize,
    ) -> Result<Self, LlmError> {
        if dimension == 0 {
            return Err(LlmError::Other("Embedding dimension must be positive".to_string()));
        }
        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            dimension,
            normalize: true,
            client: build_client(DEFAULT_TIMEOUT_SECS)?,
        })
    }

    /// Toggle L2 normalization of returned vectors
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Replace the request timeout
    pub fn with_timeout(mut self, timeout_secs: u64) -> Result<Self, LlmError> {
        self.client = build_client(timeout_secs)?;
        Ok(self)
    }

    /// Model name
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn embed_async(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        let url = format!("{}/api/embeddings", self.endpoint);
        let response = self
            .client
            .post(&url)
            .json(&OllamaEmbeddingRequest {
                model: &self.model,
                prompt: text,
            })
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(status_error(response, &self.model).await);
        }

        let body: OllamaEmbeddingResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;
        Ok(body.embedding)
    }

    fn finish(&self, mut vector: Vec<f32>) -> Result<Vec<f32>, EmbeddingError> {
        if vector.len() != self.dimension {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        if !self.normalize {
            return Ok(vector);
        }
        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm == 0.0 {
            return Err(EmbeddingError::Backend("Model returned a zero vector".to_string()));
        }
        vector.iter_mut().for_each(|x| *x /= norm);
        Ok(vector)
    }
}

fn backend_error(e: LlmError) -> EmbeddingError {
    EmbeddingError::Backend(e.to_string())
}

impl EmbeddingModel for OllamaEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::InvalidInput("empty text".to_string()));
        }
        let vector = block_on(self.embed_async(text))
            .map_err(backend_error)?
            .map_err(backend_error)?;
        self.finish(vector)
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if let Some(blank) = texts.iter().position(|t| t.trim().is_empty()) {
            return Err(EmbeddingError::InvalidInput(format!("empty text at position {}", blank)));
        }
        let raw = block_on(async {
            let mut out = Vec::with_capacity(texts.len());
            for text in texts {
                out.push(self.embed_async(text).await?);
            }
            Ok::<_, LlmError>(out)
        })
        .map_err(backend_error)?
        .map_err(backend_error)?;
        raw.into_iter().map(|v| self.finish(v)).collect()
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ollama_provider_creation() {
        let provider = OllamaProvider::new("http://localhost:11434/", GenerationConfig::default()).unwrap();
        assert_eq!(provider.endpoint, "http://localhost:11434");
        assert_eq!(provider.config.model, "llama-3.1-8b-instant");
    }

    #[test]
    fn test_chat_request_options() {
        let messages = vec![ChatMessage::user("hi")];
        let request = OllamaChatRequest {
            model: "llama3",
            messages: &messages,
            stream: false,
            options: OllamaOptions {
                temperature: 0.5,
                num_predict: 100,
            },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["stream"], false);
        assert_eq!(json["options"]["num_predict"], 100);
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn test_chat_response_usage() {
        let body: OllamaChatResponse = serde_json::from_str(
            r#"{"message":{"role":"assistant","content":"ok"},"done":true,
                "prompt_eval_count":20,"eval_count":5}"#,
        )
        .unwrap();
        let completion = body.into_completion();
        assert_eq!(completion.text, "ok");
        let usage = completion.usage.unwrap();
        assert_eq!(usage.prompt_tokens, Some(20));
        assert_eq!(usage.completion_tokens, Some(5));
        assert_eq!(usage.total_tokens, Some(25));
    }

    #[test]
    fn test_chat_response_without_counts() {
        let body: OllamaChatResponse =
            serde_json::from_str(r#"{"message":{"role":"assistant","content":"ok"}}"#).unwrap();
        assert!(body.into_completion().usage.is_none());
    }

    #[test]
    fn test_embedder_rejects_zero_dimension() {
        assert!(OllamaEmbedder::new(DEFAULT_ENDPOINT, "nomic-embed-text", 0).is_err());
    }

    #[test]
    fn test_embedder_normalizes_and_checks_dimension() {
        let embedder = OllamaEmbedder::new(DEFAULT_ENDPOINT, "nomic-embed-text", 2).unwrap();
        let vector = embedder.finish(vec![3.0, 4.0]).unwrap();
        assert!((vector[0] - 0.6).abs() < 1e-6);
        assert!((vector[1] - 0.8).abs() < 1e-6);

        match embedder.finish(vec![1.0, 0.0, 0.0]) {
            Err(EmbeddingError::DimensionMismatch { expected, actual }) => {
                assert_eq!(expected, 2);
                assert_eq!(actual, 3);
            }
            _ => panic!("Expected DimensionMismatch"),
        }
    }

    #[test]
    fn test_embedder_without_normalization() {
        let embedder = OllamaEmbedder::new(DEFAULT_ENDPOINT, "nomic-embed-text", 2)
            .unwrap()
            .with_normalize(false);
        assert_eq!(embedder.finish(vec![3.0, 4.0]).unwrap(), vec![3.0, 4.0]);
    }

    #[test]
    fn test_embedder_rejects_blank_text() {
        let embedder = OllamaEmbedder::new(DEFAULT_ENDPOINT, "nomic-embed-text", 4).unwrap();
        assert!(matches!(embedder.embed("   "), Err(EmbeddingError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_ollama_error_handling() {
        let provider = OllamaProvider::new("http://localhost:99999", GenerationConfig::default()).unwrap();
        let result = provider.complete(&[ChatMessage::user("test")]).await;
        match result {
            Err(LlmError::Communication(_)) => {}
            _ => panic!("Expected Communication error"),
        }
    }

    // Requires a running Ollama instance
    #[tokio::test]
    #[ignore]
    async fn test_ollama_chat_integration() {
        let config = GenerationConfig {
            model: "llama3".to_string(),
            ..GenerationConfig::default()
        };
        let provider = OllamaProvider::new(DEFAULT_ENDPOINT, config).unwrap();
        let completion = provider
            .complete(&[ChatMessage::user("Say 'hello' and nothing else")])
            .await
            .unwrap();
        assert!(!completion.text.is_empty());
    }
}
