//! Groq Provider Implementation
//!
//! Talks to any OpenAI-compatible `chat/completions` endpoint; the defaults
//! point at Groq's hosted API.
//!
//! # Examples
//!
//! ```no_run
//! use folio_domain::traits::LlmProvider;
//! use folio_domain::ChatMessage;
//! use folio_llm::{GenerationConfig, GroqProvider};
//!
//! // Reads the key from GROQ_API_KEY
//! let provider = GroqProvider::from_env(GenerationConfig::default()).unwrap();
//! let reply = provider.chat(&[ChatMessage::user("Define perplexity.")]).unwrap();
//! println!("{}", reply.text);
//! ```

use crate::{block_on, status_error, LlmError};
use folio_domain::traits::LlmProvider;
use folio_domain::{ChatMessage, Completion, TokenUsage};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default API base URL
pub const DEFAULT_ENDPOINT: &str = "https://api.groq.com/openai/v1";

/// Default model
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// Environment variable holding the API key
pub const DEFAULT_API_KEY_ENV: &str = "GROQ_API_KEY";

/// Default timeout for LLM requests (60 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Sampling settings sent with every request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Model name
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Upper bound on generated tokens
    pub max_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.2,
            max_tokens: 700,
        }
    }
}

/// Hosted chat-completion provider
pub struct GroqProvider {
    endpoint: String,
    api_key: String,
    config: GenerationConfig,
    client: reqwest::Client,
}

/// Request body for the chat completions API
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

/// Response from the chat completions API
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<TokenUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl GroqProvider {
    /// Create a provider with an explicit endpoint and key
    ///
    /// # Parameters
    ///
    /// - `endpoint`: API base URL, without the `/chat/completions` suffix
    /// - `api_key`: Bearer token
    /// - `config`: Model and sampling settings
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        config: GenerationConfig,
    ) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::MissingCredential("API key".to_string()));
        }
        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key,
            config,
            client: build_client(DEFAULT_TIMEOUT_SECS)?,
        })
    }

    /// Create a provider for the default endpoint, reading `GROQ_API_KEY`
    pub fn from_env(config: GenerationConfig) -> Result<Self, LlmError> {
        Self::from_env_var(DEFAULT_ENDPOINT, DEFAULT_API_KEY_ENV, config)
    }

    /// Create a provider reading its key from `key_var`
    pub fn from_env_var(
        endpoint: impl Into<String>,
        key_var: &str,
        config: GenerationConfig,
    ) -> Result<Self, LlmError> {
        match std::env::var(key_var) {
            Ok(key) if !key.trim().is_empty() => Self::new(endpoint, key, config),
            _ => Err(LlmError::MissingCredential(key_var.to_string())),
        }
    }

    /// Replace the request timeout
    pub fn with_timeout(mut self, timeout_secs: u64) -> Result<Self, LlmError> {
        self.client = build_client(timeout_secs)?;
        Ok(self)
    }

    /// Settings in use
    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Run one chat completion
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The endpoint cannot be reached
    /// - The model is unknown (`404`)
    /// - The API rejects the request
    /// - The response has no choices or cannot be parsed
    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<Completion, LlmError> {
        let url = format!("{}/chat/completions", self.endpoint);
        let request_body = ChatRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        debug!("POST {} model={} messages={}", url, self.config.model, messages.len());
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(status_error(response, &self.config.model).await);
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;
        into_completion(body)
    }
}

fn build_client(timeout_secs: u64) -> Result<reqwest::Client, LlmError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))
}

fn into_completion(body: ChatResponse) -> Result<Completion, LlmError> {
    let choice = body
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::InvalidResponse("Response has no choices".to_string()))?;
    Ok(Completion {
        text: choice.message.content.unwrap_or_default(),
        usage: body.usage,
    })
}

impl LlmProvider for GroqProvider {
    type Error = LlmError;

    fn chat(&self, messages: &[ChatMessage]) -> Result<Completion, Self::Error> {
        block_on(self.complete(messages))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(endpoint: &str) -> GroqProvider {
        GroqProvider::new(endpoint, "test-key", GenerationConfig::default()).unwrap()
    }

    #[test]
    fn test_default_generation_config() {
        let config = GenerationConfig::default();
        assert_eq!(config.model, "llama-3.1-8b-instant");
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.max_tokens, 700);
    }

    #[test]
    fn test_endpoint_trailing_slash_trimmed() {
        assert_eq!(provider("https://example.test/v1/").endpoint, "https://example.test/v1");
    }

    #[test]
    fn test_missing_key_variable() {
        let result = GroqProvider::from_env_var(
            DEFAULT_ENDPOINT,
            "FOLIO_TEST_KEY_THAT_IS_NEVER_SET",
            GenerationConfig::default(),
        );
        match result {
            Err(LlmError::MissingCredential(var)) => assert_eq!(var, "FOLIO_TEST_KEY_THAT_IS_NEVER_SET"),
            _ => panic!("Expected MissingCredential"),
        }
    }

    #[test]
    fn test_blank_key_rejected() {
        let result = GroqProvider::new(DEFAULT_ENDPOINT, "  ", GenerationConfig::default());
        assert!(matches!(result, Err(LlmError::MissingCredential(_))));
    }

    #[test]
    fn test_request_shape() {
        let messages = vec![ChatMessage::system("rules"), ChatMessage::user("question")];
        let request = ChatRequest {
            model: "m",
            messages: &messages,
            temperature: 0.2,
            max_tokens: 600,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "m");
        assert_eq!(json["max_tokens"], 600);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "question");
    }

    #[test]
    fn test_response_with_usage() {
        let body: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"Answer"}}],
                "usage":{"prompt_tokens":12,"completion_tokens":3,"total_tokens":15}}"#,
        )
        .unwrap();
        let completion = into_completion(body).unwrap();
        assert_eq!(completion.text, "Answer");
        let usage = completion.usage.unwrap();
        assert_eq!(usage.prompt_tokens, Some(12));
        assert_eq!(usage.total_tokens, Some(15));
    }

    #[test]
    fn test_response_without_content_or_usage() {
        let body: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#).unwrap();
        let completion = into_completion(body).unwrap();
        assert_eq!(completion.text, "");
        assert!(completion.usage.is_none());
    }

    #[test]
    fn test_response_without_choices() {
        let body: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(into_completion(body), Err(LlmError::InvalidResponse(_))));
    }

    #[test]
    fn test_unreachable_endpoint_is_not_retried() {
        let result = provider("http://localhost:99999").chat(&[ChatMessage::user("test")]);
        assert!(matches!(result, Err(LlmError::Communication(_))));
    }
}
