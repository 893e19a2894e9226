//! Timestamped output names. The epoch-millis stamp keeps consecutive runs
//! from overwriting each other.

use chrono::{DateTime, Utc};

pub const GENERATION_PREFIX: &str = "generated-coupons-";

#[must_use]
pub fn generation_filename(now: DateTime<Utc>) -> String {
    format!(
        "{GENERATION_PREFIX}{}-{}.xlsx",
        now.format("%Y-%m-%d"),
        now.timestamp_millis()
    )
}

#[must_use]
pub fn coupon_export_filename(now: DateTime<Utc>) -> String {
    format!(
        "all-coupons-export-{}_{}.csv",
        now.format("%Y-%m-%d"),
        now.timestamp_millis()
    )
}

#[must_use]
pub fn coupon_report_filename(now: DateTime<Utc>) -> String {
    format!(
        "coupon-report-{}_{}.xlsx",
        now.format("%Y-%m-%d"),
        now.timestamp_millis()
    )
}
