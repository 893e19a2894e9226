//! Page-number pagination for BigCommerce list endpoints.
//!
//! Every list endpoint takes `?page=N&limit=M` with `N` starting at 1. There is
//! no cursor or total: the caller keeps requesting pages until one comes back
//! empty.
//!
//! ## Page shapes
//!
//! - v2 (`/v2/coupons`) returns a bare JSON array, and answers past the last
//!   page with `204 No Content` and an empty body.
//! - v3 (`/v3/catalog/*`) wraps the array: `{"data": [...], "meta": {...}}`.

use serde::de::DeserializeOwned;

use crate::error::ClientError;

/// Hard ceiling on pages requested for one listing.
pub const MAX_PAGES: u32 = 10_000;

/// A paginated collection exposed by the store API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Coupons,
    Products,
    Categories,
}

impl Resource {
    /// Path relative to the store root.
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Resource::Coupons => "v2/coupons",
            Resource::Products => "v3/catalog/products",
            Resource::Categories => "v3/catalog/categories",
        }
    }
}

/// Parses one page body into items. Empty bodies and empty arrays are empty
/// pages.
///
/// # Errors
///
/// Returns [`ClientError::Deserialize`] if the body is not JSON, is neither an
/// array nor a `data` envelope, or an item does not match `T`.
pub fn parse_page<T: DeserializeOwned>(body: &str, context: &str) -> Result<Vec<T>, ClientError> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    let deserialize_err = |source: serde_json::Error| ClientError::Deserialize {
        context: context.to_string(),
        source,
    };

    let value: serde_json::Value = serde_json::from_str(body).map_err(deserialize_err)?;
    let items = match value {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(mut envelope) => match envelope.remove("data") {
            Some(serde_json::Value::Array(items)) => items,
            Some(serde_json::Value::Null) | None => Vec::new(),
            Some(other) => {
                return Err(deserialize_err(<serde_json::Error as serde::de::Error>::custom(format!(
                    "expected `data` to be an array, got {other}"
                ))))
            }
        },
        serde_json::Value::Null => Vec::new(),
        other => {
            return Err(deserialize_err(<serde_json::Error as serde::de::Error>::custom(format!(
                "expected an array or a data envelope, got {other}"
            ))))
        }
    };

    items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(deserialize_err))
        .collect()
}
