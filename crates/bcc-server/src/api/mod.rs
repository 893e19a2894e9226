mod catalog;
mod coupons;
mod download;
mod generate;

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post, MethodRouter},
    Extension, Json, Router,
};
use bcc_client::{BigCommerceClient, ClientError};
use bcc_core::AppConfig;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::middleware::{request_id, RequestId, REQUEST_ID_HEADER};

/// Page served at `/`.
pub const PAGE_FILE: &str = "coupon-manager.html";

const SERVICE_NAME: &str = "BigCommerce Coupon Manager API";

#[derive(Clone)]
pub struct AppState {
    pub client: Arc<BigCommerceClient>,
    pub config: Arc<AppConfig>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    service: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn new(request_id: String, data: T) -> Self {
        Self {
            data,
            meta: ResponseMeta::new(request_id),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" | "create_failed" => StatusCode::BAD_REQUEST,
            "conflict" => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Listing failures degrade to an empty list so the page still renders.
pub(super) fn or_empty<T>(result: Result<Vec<T>, ClientError>, what: &'static str) -> Vec<T> {
    result.unwrap_or_else(|e| {
        tracing::warn!(error = %e, what, "listing failed; returning empty list");
        Vec::new()
    })
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(REQUEST_ID_HEADER)])
}

fn api_router() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/products", get(catalog::list_catalog))
        .route("/api/existing-coupons", get(coupons::list_coupons))
        .route("/api/coupons", get(coupons::list_coupons))
        .route("/api/generate-coupons", post(generate::generate_coupons))
        .route(
            "/api/create-single-coupon",
            post(coupons::create_single_coupon),
        )
}

/// Builds the full application: JSON API, the management page at `/`, static
/// files from the public dir, and generated exports as the last resort.
pub fn build_app(state: AppState) -> Router {
    let page = ServeFile::new(state.config.public_dir.join(PAGE_FILE));
    let exports: MethodRouter = get(download::download_export).with_state(state.clone());
    let statics = ServeDir::new(&state.config.public_dir).fallback(exports);

    api_router()
        .route_service("/", page)
        .fallback_service(statics)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http())
                .layer(build_cors()),
        )
        .with_state(state)
}

async fn health(Extension(req_id): Extension<RequestId>) -> impl IntoResponse {
    Json(ApiResponse::new(
        req_id.0,
        HealthData {
            status: "ok",
            service: SERVICE_NAME,
        },
    ))
}

#[cfg(test)]
#[path = "router_test.rs"]
mod tests;
