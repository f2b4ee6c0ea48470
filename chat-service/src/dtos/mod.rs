//! Request and response payloads for the chat API.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/chat`.
///
/// `prompt` stays optional at the serde level so a `{}` body reaches the
/// handler's validation (HTTP 400) instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

/// Successful reply from the relay.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// Error body shared by every failure response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
