//! Wire types for the BigCommerce coupon and catalog endpoints.
//!
//! ## Observed shapes
//!
//! `GET /v2/coupons` returns a bare JSON array. Monetary fields (`amount`,
//! `min_purchase`) arrive as decimal strings such as `"100.0000"`. `expires`
//! is an RFC-2822 timestamp or an empty string when the coupon never expires.
//! `restricted_to` and `shipping_methods` are usually arrays but have been
//! seen as objects, so they are kept as raw JSON.
//!
//! `GET /v3/catalog/*` wraps items in a `{"data": [...], "meta": {...}}`
//! envelope; only `id` and `name` are kept.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Catalog entity kinds a coupon can be scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppliesToEntity {
    Products,
    Categories,
}

impl fmt::Display for AppliesToEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppliesToEntity::Products => write!(f, "products"),
            AppliesToEntity::Categories => write!(f, "categories"),
        }
    }
}

impl FromStr for AppliesToEntity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "products" => Ok(AppliesToEntity::Products),
            "categories" => Ok(AppliesToEntity::Categories),
            other => Err(format!(
                "unknown entity \"{other}\" (expected products or categories)"
            )),
        }
    }
}

/// The catalog entities a coupon discounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliesTo {
    pub entity: AppliesToEntity,
    #[serde(default)]
    pub ids: Vec<i64>,
}

/// Discount kinds accepted by the coupon write endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    PerItemDiscount,
    #[serde(alias = "percentage")]
    PercentageDiscount,
    #[serde(alias = "fixed")]
    PerTotalDiscount,
    ShippingDiscount,
    FreeShipping,
    Promotion,
}

impl FromStr for DiscountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "per_item_discount" => Ok(DiscountType::PerItemDiscount),
            "percentage_discount" | "percentage" => Ok(DiscountType::PercentageDiscount),
            "per_total_discount" | "fixed" => Ok(DiscountType::PerTotalDiscount),
            "shipping_discount" => Ok(DiscountType::ShippingDiscount),
            "free_shipping" => Ok(DiscountType::FreeShipping),
            "promotion" => Ok(DiscountType::Promotion),
            other => Err(format!("unknown discount type \"{other}\"")),
        }
    }
}

/// A coupon as returned by `GET /v2/coupons` and `POST /v2/coupons`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coupon {
    pub id: i64,
    pub code: String,
    #[serde(default)]
    pub name: String,
    /// Kept as a string so unfamiliar discount kinds do not break listing.
    #[serde(rename = "type", default)]
    pub discount_type: String,
    #[serde(default)]
    pub amount: Decimal,
    #[serde(default)]
    pub min_purchase: Decimal,
    #[serde(default)]
    pub max_uses: Option<u32>,
    #[serde(default)]
    pub max_uses_per_customer: Option<u32>,
    #[serde(default)]
    pub num_uses: u32,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub expires: Option<String>,
    #[serde(default)]
    pub date_created: Option<String>,
    #[serde(default)]
    pub applies_to: Option<AppliesTo>,
    #[serde(default)]
    pub restricted_to: serde_json::Value,
    #[serde(default)]
    pub shipping_methods: serde_json::Value,
}

/// Body for `POST /v2/coupons`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouponPayload {
    pub code: String,
    pub name: String,
    #[serde(rename = "type")]
    pub discount_type: DiscountType,
    pub amount: Decimal,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_uses: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_uses_per_customer: Option<u32>,
    #[serde(default)]
    pub min_purchase: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applies_to: Option<AppliesTo>,
}

fn enabled_by_default() -> bool {
    true
}

/// A product or category reduced to what the management page needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}
