use axum::{extract::State, Extension, Json};
use bcc_client::CatalogItem;
use serde::Serialize;

use crate::middleware::RequestId;

use super::{or_empty, ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct CatalogData {
    products: Vec<CatalogItem>,
    categories: Vec<CatalogItem>,
}

/// Products and categories for the targeting picker. Fetched one after the
/// other to stay inside the store's request quota.
pub(super) async fn list_catalog(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<CatalogData>> {
    let products = or_empty(state.client.list_products().await, "products");
    let categories = or_empty(state.client.list_categories().await, "categories");

    tracing::info!(
        products = products.len(),
        categories = categories.len(),
        "catalog fetched"
    );

    Json(ApiResponse::new(
        req_id.0,
        CatalogData {
            products,
            categories,
        },
    ))
}
