//! Embedding and generation backends selected by configuration.

use crate::config::{EmbeddingBackend, EmbeddingConfig, LlmBackend, LlmConfig};
use crate::error::Result;
use folio_domain::traits::{EmbeddingModel, LlmProvider};
use folio_llm::{GenerationConfig, GroqProvider, LlmError, OllamaEmbedder, OllamaProvider};
use folio_store::HashingEmbedder;
use tracing::debug;

/// Any configured embedding backend.
pub type DynEmbedder = Box<dyn EmbeddingModel>;

/// Any configured generation backend.
pub type DynProvider = Box<dyn LlmProvider<Error = LlmError>>;

/// Build the configured embedder.
pub fn embedder(config: &EmbeddingConfig) -> Result<DynEmbedder> {
    debug!("Embedding backend {:?} (dim={})", config.provider, config.dimension);
    Ok(match config.provider {
        EmbeddingBackend::Hashing => Box::new(HashingEmbedder::new(config.dimension)),
        EmbeddingBackend::Ollama => Box::new(OllamaEmbedder::new(
            config.endpoint.clone(),
            config.model.clone(),
            config.dimension,
        )?),
    })
}

/// Build the configured generation backend.
///
/// `model`, `temperature` and `max_tokens` are the values after command
/// line overrides. A Groq backend fails here when its key is not set.
pub fn provider(
    config: &LlmConfig,
    model: String,
    temperature: f32,
    max_tokens: u32,
) -> Result<DynProvider> {
    let generation = GenerationConfig {
        model,
        temperature,
        max_tokens,
    };
    debug!("Generation backend {:?} model={}", config.provider, generation.model);

    Ok(match config.provider {
        LlmBackend::Groq => {
            let endpoint = config
                .endpoint
                .clone()
                .unwrap_or_else(|| folio_llm::groq::DEFAULT_ENDPOINT.to_string());
            Box::new(
                GroqProvider::from_env_var(endpoint, &config.api_key_env, generation)?
                    .with_timeout(config.timeout_secs)?,
            )
        }
        LlmBackend::Ollama => {
            let endpoint = config
                .endpoint
                .clone()
                .unwrap_or_else(|| folio_llm::ollama::DEFAULT_ENDPOINT.to_string());
            Box::new(OllamaProvider::new(endpoint, generation)?.with_timeout(config.timeout_secs)?)
        }
    })
}
