//! Application startup and lifecycle management.

use crate::config::ChatConfig;
use crate::handlers::app::{health_check, readiness_check};
use crate::handlers::chat::chat;
use crate::services::providers::TextProvider;
use crate::services::providers::gemini::{GeminiConfig, GeminiTextProvider};
use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post},
};
use service_core::error::AppError;
use service_core::middleware::tracing::request_id_middleware;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ChatConfig,
    /// `None` when no API key was provided at startup; chat calls then
    /// answer with the not-initialized error while the server keeps
    /// running.
    pub text_provider: Option<Arc<dyn TextProvider>>,
}

/// Build the HTTP router: the chat endpoint, probes, CORS for the browser
/// UI, request tracing, and the static chat UI as the fallback.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .fallback_service(ServeDir::new("chat-service/static"))
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    ///
    /// The Gemini client is constructed only when an API key is present;
    /// otherwise the server starts degraded and every chat call reports
    /// the missing initialization.
    pub async fn build(config: ChatConfig) -> Result<Self, AppError> {
        let text_provider: Option<Arc<dyn TextProvider>> = match &config.gemini.api_key {
            Some(api_key) => {
                let provider = GeminiTextProvider::new(GeminiConfig {
                    api_key: api_key.clone(),
                    model: config.gemini.model.clone(),
                });

                tracing::info!(
                    model = %config.gemini.model,
                    "Initialized Gemini text provider"
                );

                Some(Arc::new(provider))
            }
            None => {
                tracing::warn!(
                    "GEMINI_API_KEY is not set; chat requests will fail until it is configured"
                );
                None
            }
        };

        let state = AppState {
            config: config.clone(),
            text_provider,
        };

        // Bind up front (port 0 = random port for testing).
        let address = config.common.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind listener to {}: {}", address, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the server until a shutdown signal arrives.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);

        tracing::info!("Chat relay listening on port {}", self.port);

        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
