use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use bcc_client::{AppliesTo, AppliesToEntity, Coupon, CouponPayload, DiscountType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{or_empty, ApiError, ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct CouponSummary {
    id: i64,
    code: String,
    name: String,
    #[serde(rename = "type")]
    discount_type: String,
    amount: Decimal,
    enabled: bool,
    date_created: Option<String>,
}

impl From<Coupon> for CouponSummary {
    fn from(c: Coupon) -> Self {
        Self {
            id: c.id,
            code: c.code,
            name: c.name,
            discount_type: c.discount_type,
            amount: c.amount,
            enabled: c.enabled,
            date_created: c.date_created,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct CouponList {
    coupons: Vec<CouponSummary>,
}

/// Serves both `/api/existing-coupons` and `/api/coupons`.
pub(super) async fn list_coupons(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<CouponList>> {
    let coupons: Vec<CouponSummary> = or_empty(state.client.list_coupons().await, "coupons")
        .into_iter()
        .map(CouponSummary::from)
        .collect();

    tracing::info!(count = coupons.len(), "coupons fetched");
    Json(ApiResponse::new(req_id.0, CouponList { coupons }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SingleCouponRequest {
    code: String,
    #[serde(default)]
    name: Option<String>,
    discount: Decimal,
    #[serde(default)]
    product_ids: Vec<i64>,
    #[serde(default)]
    targeting: Option<AppliesToEntity>,
    #[serde(default = "one")]
    max_uses_per_customer: u32,
    #[serde(default)]
    max_uses: Option<u32>,
    #[serde(default)]
    min_purchase: Decimal,
    #[serde(default)]
    expiry_date: Option<String>,
}

fn one() -> u32 {
    1
}

impl SingleCouponRequest {
    fn into_payload(self) -> Result<CouponPayload, &'static str> {
        let code = self.code.trim().to_owned();
        if code.is_empty() {
            return Err("code must not be blank");
        }
        if self.product_ids.is_empty() {
            return Err("at least one target id is required");
        }

        let name = self
            .name
            .map(|n| n.trim().to_owned())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| code.clone());

        Ok(CouponPayload {
            code,
            name,
            discount_type: DiscountType::PercentageDiscount,
            amount: self.discount,
            enabled: true,
            max_uses: self.max_uses,
            max_uses_per_customer: Some(self.max_uses_per_customer),
            min_purchase: self.min_purchase,
            expires: Some(bcc_core::resolve_expiry(self.expiry_date.as_deref())),
            applies_to: Some(AppliesTo {
                entity: self.targeting.unwrap_or(AppliesToEntity::Products),
                ids: self.product_ids,
            }),
        })
    }
}

pub(super) async fn create_single_coupon(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<SingleCouponRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Coupon>>, ApiError> {
    let Json(request) =
        body.map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.body_text()))?;
    let payload = request
        .into_payload()
        .map_err(|msg| ApiError::new(req_id.0.clone(), "validation_error", msg))?;

    match state.client.create_coupon(&payload).await {
        Ok(coupon) => {
            tracing::info!(code = %coupon.code, id = coupon.id, "single coupon created");
            Ok(Json(ApiResponse::new(req_id.0, coupon)))
        }
        Err(failure) => {
            tracing::warn!(code = %payload.code, error = %failure, "single coupon create failed");
            Err(ApiError::new(req_id.0, "create_failed", failure.message))
        }
    }
}
