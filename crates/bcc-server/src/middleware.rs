use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Correlation id for one request; handlers echo it in the response `meta`.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Reuses a caller-supplied `x-request-id` or mints a UUIDv4, exposes it to
/// handlers as a [`RequestId`] extension and copies it onto the response.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = match req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
    {
        Some(incoming) if !incoming.is_empty() => incoming.to_owned(),
        _ => Uuid::new_v4().to_string(),
    };

    tracing::debug!(request_id = %id, method = %req.method(), path = req.uri().path(), "request received");
    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;
    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, val);
    }
    res
}
