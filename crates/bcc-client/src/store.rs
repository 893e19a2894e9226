//! The two store operations the generation workflow depends on.

use crate::client::BigCommerceClient;
use crate::error::ClientError;
use crate::remote_error::CreateFailure;
use crate::types::{Coupon, CouponPayload};

/// Coupon persistence as seen by the generation workflow.
///
/// Implemented by [`BigCommerceClient`]; tests substitute an in-memory store.
pub trait CouponStore {
    /// Every coupon currently in the store.
    async fn list_coupons(&self) -> Result<Vec<Coupon>, ClientError>;

    /// Creates one coupon, classifying any failure.
    async fn create_coupon(&self, payload: &CouponPayload) -> Result<Coupon, CreateFailure>;
}

impl CouponStore for BigCommerceClient {
    async fn list_coupons(&self) -> Result<Vec<Coupon>, ClientError> {
        BigCommerceClient::list_coupons(self).await
    }

    async fn create_coupon(&self, payload: &CouponPayload) -> Result<Coupon, CreateFailure> {
        BigCommerceClient::create_coupon(self, payload).await
    }
}

impl<S: CouponStore> CouponStore for &S {
    async fn list_coupons(&self) -> Result<Vec<Coupon>, ClientError> {
        (**self).list_coupons().await
    }

    async fn create_coupon(&self, payload: &CouponPayload) -> Result<Coupon, CreateFailure> {
        (**self).create_coupon(payload).await
    }
}
