//! Deterministic provider for tests

use crate::LlmError;
use folio_domain::traits::LlmProvider;
use folio_domain::{ChatMessage, Completion, Role, TokenUsage};
use std::sync::{Arc, Mutex, MutexGuard};

/// Marker stored in place of a response to make a prompt fail
const ERROR_SENTINEL: &str = "ERROR";

/// Mock LLM provider for deterministic testing
///
/// A registered response is returned when its key occurs in the last user
/// message; keys are tried in registration order. The provider records
/// every request, so tests can inspect the prompt that was sent.
///
/// # Examples
///
/// ```
/// use folio_domain::traits::LlmProvider;
/// use folio_domain::ChatMessage;
/// use folio_llm::MockProvider;
///
/// let mut provider = MockProvider::default();
/// provider.add_response("prompt1", "response1");
///
/// let reply = provider.chat(&[ChatMessage::user("prompt1")]).unwrap();
/// assert_eq!(reply.text, "response1");
/// assert_eq!(provider.call_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    usage: Option<TokenUsage>,
    responses: Arc<Mutex<Vec<(String, String)>>>,
    requests: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            usage: None,
            responses: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Report this usage with every completion
    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = Some(usage);
        self
    }

    /// Answer `response` to prompts containing `key`
    pub fn add_response(&mut self, key: impl Into<String>, response: impl Into<String>) {
        lock(&self.responses).push((key.into(), response.into()));
    }

    /// Fail prompts containing `key`
    pub fn add_error(&mut self, key: impl Into<String>) {
        lock(&self.responses).push((key.into(), ERROR_SENTINEL.to_string()));
    }

    /// Get the number of times chat was called
    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// Messages of the most recent call
    pub fn last_request(&self) -> Option<Vec<ChatMessage>> {
        lock(&self.requests).last().cloned()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProvider for MockProvider {
    type Error = LlmError;

    fn chat(&self, messages: &[ChatMessage]) -> Result<Completion, Self::Error> {
        lock(&self.requests).push(messages.to_vec());

        let prompt = messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default();

        let text = match lock(&self.responses)
            .iter()
            .find(|(key, _)| prompt.contains(key.as_str()))
            .map(|(_, response)| response)
        {
            Some(response) if response == ERROR_SENTINEL => {
                return Err(LlmError::Other("Mock error".to_string()));
            }
            Some(response) => response.clone(),
            None => self.default_response.clone(),
        };

        Ok(Completion {
            text,
            usage: self.usage,
        })
    }
}

// A poisoned lock only means another test thread panicked mid-update.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
