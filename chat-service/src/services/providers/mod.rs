//! AI provider abstraction and implementations.
//!
//! The relay handler only sees the `TextProvider` trait, so the concrete
//! backend can be swapped between Gemini and the in-crate mock.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Provider returned no reply text")]
    EmptyReply,
}

/// Trait for text generation providers (e.g., Gemini).
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Generate a reply for the given prompt. A single best-effort call:
    /// no retry, no timeout override.
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}
