pub mod client;
pub mod error;
pub mod pagination;
pub mod rate_limit;
pub mod remote_error;
pub mod store;
pub mod types;

pub use client::{BigCommerceClient, ClientSettings};
pub use error::ClientError;
pub use pagination::Resource;
pub use rate_limit::RequestPacer;
pub use remote_error::{
    normalize_remote_error, ConflictMatcher, CreateFailure, RawRemoteError, RemoteErrorKind,
};
pub use store::CouponStore;
pub use types::{AppliesTo, AppliesToEntity, CatalogItem, Coupon, CouponPayload, DiscountType};
