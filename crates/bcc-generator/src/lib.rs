//! Bulk coupon generation: request validation, the per-unit create loop, and
//! the outcomes it reports.

pub mod outcome;
pub mod request;
pub mod workflow;

pub use outcome::{CouponOutcome, GenerationReport, OutcomeStatus};
pub use request::{GenerationRequest, RequestError, DEFAULT_MAX_BATCH};
pub use workflow::{run_generation, GenerationContext, GenerationPolicy};
