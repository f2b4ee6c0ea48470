//! Mock provider implementation for testing.

use super::{ProviderError, TextProvider};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Mock text provider for testing.
///
/// Counts `generate` calls so tests can assert the relay short-circuited
/// before reaching the provider.
pub struct MockTextProvider {
    enabled: bool,
    reply: Option<String>,
    calls: AtomicUsize,
}

impl MockTextProvider {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            reply: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Fix the reply text instead of echoing the prompt.
    pub fn with_reply(mut self, reply: impl Into<String>) -> Self {
        self.reply = Some(reply.into());
        self
    }

    /// Number of `generate` calls received so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if !self.enabled {
            return Err(ProviderError::ApiError(
                "Mock text provider forced failure".to_string(),
            ));
        }

        Ok(self
            .reply
            .clone()
            .unwrap_or_else(|| format!("Mock response for: {}", prompt)))
    }
}
