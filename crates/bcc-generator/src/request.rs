//! Batch generation parameters and their validation.

use bcc_client::{AppliesTo, AppliesToEntity, CouponPayload, DiscountType};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

/// Largest batch accepted when no explicit limit is configured.
pub const DEFAULT_MAX_BATCH: u32 = 800;

/// Why a [`GenerationRequest`] was rejected before any remote call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("code prefix must not be blank")]
    BlankCodePrefix,

    #[error("name prefix must not be blank")]
    BlankNamePrefix,

    #[error("quantity must be between 1 and {max}, got {quantity}")]
    QuantityOutOfRange { quantity: i64, max: u32 },

    #[error("at least one target id is required")]
    NoTargets,
}

/// One bulk-generation run as submitted by the management page or the CLI.
///
/// Field names follow the page's JSON body (`codePrefix`, `productIds`, ...).
/// `productIds` carries category ids when `targeting` is `categories`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub quantity: i64,
    pub code_prefix: String,
    pub name_prefix: String,
    #[serde(rename = "productIds", default)]
    pub target_ids: Vec<i64>,
    #[serde(default = "default_targeting")]
    pub targeting: AppliesToEntity,
    #[serde(default = "default_discount")]
    pub discount: Decimal,
    #[serde(default = "default_max_uses_per_customer")]
    pub max_uses_per_customer: u32,
    #[serde(default)]
    pub max_uses: Option<u32>,
    #[serde(default)]
    pub min_purchase: Decimal,
    #[serde(default)]
    pub expiry_date: Option<String>,
}

fn default_targeting() -> AppliesToEntity {
    AppliesToEntity::Products
}

fn default_discount() -> Decimal {
    Decimal::ONE_HUNDRED
}

fn default_max_uses_per_customer() -> u32 {
    1
}

impl GenerationRequest {
    /// A request with the page's defaults: 100% off, one use per customer,
    /// no minimum purchase, default expiry.
    #[must_use]
    pub fn new(
        quantity: u32,
        code_prefix: impl Into<String>,
        name_prefix: impl Into<String>,
        targeting: AppliesToEntity,
        target_ids: Vec<i64>,
    ) -> Self {
        Self {
            quantity: i64::from(quantity),
            code_prefix: code_prefix.into(),
            name_prefix: name_prefix.into(),
            target_ids,
            targeting,
            discount: default_discount(),
            max_uses_per_customer: default_max_uses_per_customer(),
            max_uses: None,
            min_purchase: Decimal::ZERO,
            expiry_date: None,
        }
    }

    /// Checks the request against `max_batch` and returns the validated
    /// quantity.
    ///
    /// # Errors
    ///
    /// Returns the first [`RequestError`] found, checking prefixes, then
    /// quantity, then targets.
    pub fn validate(&self, max_batch: u32) -> Result<u32, RequestError> {
        if self.code_prefix.trim().is_empty() {
            return Err(RequestError::BlankCodePrefix);
        }
        if self.name_prefix.trim().is_empty() {
            return Err(RequestError::BlankNamePrefix);
        }
        let quantity = u32::try_from(self.quantity)
            .ok()
            .filter(|q| (1..=max_batch).contains(q))
            .ok_or(RequestError::QuantityOutOfRange {
                quantity: self.quantity,
                max: max_batch,
            })?;
        if self.target_ids.is_empty() {
            return Err(RequestError::NoTargets);
        }
        Ok(quantity)
    }

    /// Payload for one unit. Everything except `code` and `name` is identical
    /// across a batch.
    #[must_use]
    pub fn payload(&self, code: &str, name: &str, expires: &str) -> CouponPayload {
        CouponPayload {
            code: code.to_owned(),
            name: name.to_owned(),
            discount_type: DiscountType::PercentageDiscount,
            amount: self.discount,
            enabled: true,
            max_uses: self.max_uses,
            max_uses_per_customer: Some(self.max_uses_per_customer),
            min_purchase: self.min_purchase,
            expires: Some(expires.to_owned()),
            applies_to: Some(AppliesTo {
                entity: self.targeting,
                ids: self.target_ids.clone(),
            }),
        }
    }
}
