use axum::http::HeaderValue;
use axum::{extract::Request, middleware::Next, response::Response};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Ensure every request and its response carry an `x-request-id` header.
///
/// An id supplied by the caller is kept so ids stay stable across hops;
/// otherwise a fresh v4 UUID is minted.
pub async fn request_id_middleware(mut req: Request, next: Next) -> Response {
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let Ok(value) = HeaderValue::from_str(&request_id) else {
        // Unrepresentable id from the caller; pass the request through
        // untouched rather than failing it.
        return next.run(req).await;
    };

    req.headers_mut().insert(REQUEST_ID_HEADER, value.clone());

    let mut response = next.run(req).await;
    response.headers_mut().insert(REQUEST_ID_HEADER, value);
    response
}
