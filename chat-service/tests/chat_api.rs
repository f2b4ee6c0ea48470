//! In-process tests for the relay endpoint, driving the router directly
//! with mock providers so no network or environment is involved.

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use chat_service::config::{ChatConfig, GeminiSettings};
use chat_service::dtos::{ChatResponse, ErrorResponse};
use chat_service::handlers::chat::{
    EMPTY_PROMPT_MESSAGE, NOT_INITIALIZED_MESSAGE, PROVIDER_FAILURE_MESSAGE,
};
use chat_service::services::providers::TextProvider;
use chat_service::services::providers::mock::MockTextProvider;
use chat_service::startup::{AppState, build_router};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::util::ServiceExt;

fn test_state(text_provider: Option<Arc<dyn TextProvider>>) -> AppState {
    AppState {
        config: ChatConfig {
            common: service_core::config::Config {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            gemini: GeminiSettings {
                api_key: None,
                model: "gemini-2.0-flash".to_string(),
            },
        },
        text_provider,
    }
}

fn chat_request(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("failed to read body")
        .to_bytes()
        .to_vec()
}

#[tokio::test]
async fn whitespace_prompt_returns_400_without_calling_provider() {
    let mock = Arc::new(MockTextProvider::new(true));
    let provider: Arc<dyn TextProvider> = mock.clone();
    let app = build_router(test_state(Some(provider)));

    let response = app
        .oneshot(chat_request(serde_json::json!({"prompt": "   "})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: ErrorResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body.error, EMPTY_PROMPT_MESSAGE);
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn missing_prompt_field_returns_400() {
    let mock = Arc::new(MockTextProvider::new(true));
    let provider: Arc<dyn TextProvider> = mock.clone();
    let app = build_router(test_state(Some(provider)));

    let response = app
        .oneshot(chat_request(serde_json::json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn successful_generation_returns_provider_reply_verbatim() {
    let mock = Arc::new(MockTextProvider::new(true).with_reply("Hi there!"));
    let provider: Arc<dyn TextProvider> = mock.clone();
    let app = build_router(test_state(Some(provider)));

    let response = app
        .oneshot(chat_request(serde_json::json!({"prompt": "Hello"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body: ChatResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body.reply, "Hi there!");
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn prompt_is_trimmed_before_reaching_provider() {
    // The echo mock reveals exactly what the handler forwarded.
    let mock = Arc::new(MockTextProvider::new(true));
    let provider: Arc<dyn TextProvider> = mock.clone();
    let app = build_router(test_state(Some(provider)));

    let response = app
        .oneshot(chat_request(serde_json::json!({"prompt": "  Halo  "})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body: ChatResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body.reply, "Mock response for: Halo");
}

#[tokio::test]
async fn unconfigured_provider_returns_500_with_not_initialized_message() {
    let app = build_router(test_state(None));

    let response = app
        .oneshot(chat_request(serde_json::json!({"prompt": "Hello"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: ErrorResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body.error, NOT_INITIALIZED_MESSAGE);
}

#[tokio::test]
async fn provider_failure_returns_generic_message_without_detail() {
    let mock = Arc::new(MockTextProvider::new(false));
    let provider: Arc<dyn TextProvider> = mock.clone();
    let app = build_router(test_state(Some(provider)));

    let response = app
        .oneshot(chat_request(serde_json::json!({"prompt": "Hello"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let raw = body_bytes(response).await;
    let text = String::from_utf8(raw.clone()).unwrap();
    assert!(!text.contains("forced failure"), "body leaked: {}", text);

    let body: ErrorResponse = serde_json::from_slice(&raw).unwrap();
    assert_eq!(body.error, PROVIDER_FAILURE_MESSAGE);
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn ready_returns_ok_when_provider_is_configured() {
    let provider: Arc<dyn TextProvider> = Arc::new(MockTextProvider::new(true));
    let app = build_router(test_state(Some(provider)));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/ready")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn ready_returns_503_when_provider_is_missing() {
    let app = build_router(test_state(None));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/ready")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
