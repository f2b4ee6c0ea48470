//! The relay endpoint: `POST /api/chat`.

use crate::dtos::{ChatRequest, ChatResponse, ErrorResponse};
use crate::services::providers::ProviderError;
use crate::startup::AppState;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// User-facing message for an empty or missing prompt.
pub const EMPTY_PROMPT_MESSAGE: &str = "Prompt tidak boleh kosong.";

/// User-facing message when the Gemini client was never initialized.
pub const NOT_INITIALIZED_MESSAGE: &str =
    "Model Gemini belum diinisialisasi. Periksa kunci API Anda di file .env.";

/// Generic user-facing message for provider failures. The underlying error
/// stays in the server log and never reaches the caller.
pub const PROVIDER_FAILURE_MESSAGE: &str =
    "Terjadi kesalahan saat berkomunikasi dengan Gemini AI. Silakan coba lagi nanti.";

/// Failures of a single relay call.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("prompt is empty or missing")]
    EmptyPrompt,

    #[error("text provider is not initialized")]
    NotInitialized,

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ChatError::EmptyPrompt => (StatusCode::BAD_REQUEST, EMPTY_PROMPT_MESSAGE),
            ChatError::NotInitialized => {
                (StatusCode::INTERNAL_SERVER_ERROR, NOT_INITIALIZED_MESSAGE)
            }
            ChatError::Provider(_) => (StatusCode::INTERNAL_SERVER_ERROR, PROVIDER_FAILURE_MESSAGE),
        };

        (
            status,
            Json(ErrorResponse {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}

/// Relay a prompt to the configured text provider.
///
/// Validation and readiness run before the provider is touched: an empty or
/// missing prompt answers 400, an unconfigured provider answers 500, and
/// only then is the trimmed prompt forwarded.
#[tracing::instrument(skip(state, req), fields(prompt_len))]
pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ChatError> {
    let prompt = req
        .prompt
        .as_deref()
        .map(str::trim)
        .filter(|prompt| !prompt.is_empty())
        .ok_or(ChatError::EmptyPrompt)?;

    tracing::Span::current().record("prompt_len", prompt.len());

    let provider = state
        .text_provider
        .as_ref()
        .ok_or(ChatError::NotInitialized)?;

    let reply = provider.generate(prompt).await.map_err(|e| {
        tracing::error!(error = %e, "Text provider call failed");
        ChatError::from(e)
    })?;

    Ok(Json(ChatResponse { reply }))
}
