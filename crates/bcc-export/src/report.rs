//! Status report for a list of coupon codes.

use bcc_client::Coupon;
use chrono::{DateTime, Utc};

use crate::sheet::{Cell, Sheet};
use crate::sheets::{join_ids, join_json_list};

pub const REPORT_SHEET: &str = "Coupon Report";
pub const REPORT_COLUMNS: [&str; 18] = [
    "Coupon Code",
    "Exists",
    "ID",
    "Name",
    "Type",
    "Amount",
    "Min Purchase",
    "Max Uses",
    "Max Uses Per Customer",
    "Times Used",
    "Used",
    "Expires",
    "Status",
    "Applies To Entity",
    "Applies To IDs",
    "Restricted To",
    "Shipping Methods",
    "Date Created",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStatus {
    NotFound,
    Expired,
    Active,
    Disabled,
}

impl ReportStatus {
    /// Expiry wins over the enabled flag. Unparseable expiry dates count as
    /// not expired.
    #[must_use]
    pub fn of(coupon: &Coupon, now: DateTime<Utc>) -> Self {
        let expired = coupon
            .expires
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .and_then(|e| DateTime::parse_from_rfc2822(e.trim()).ok())
            .is_some_and(|at| at < now);

        if expired {
            ReportStatus::Expired
        } else if coupon.enabled {
            ReportStatus::Active
        } else {
            ReportStatus::Disabled
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ReportStatus::NotFound => "Not Found",
            ReportStatus::Expired => "Expired",
            ReportStatus::Active => "Active",
            ReportStatus::Disabled => "Disabled",
        }
    }
}

/// Result of looking up one requested code.
#[derive(Debug, Clone)]
pub enum ReportEntry {
    NotFound(String),
    Found(Box<Coupon>),
}

impl ReportEntry {
    #[must_use]
    pub fn status(&self, now: DateTime<Utc>) -> ReportStatus {
        match self {
            ReportEntry::NotFound(_) => ReportStatus::NotFound,
            ReportEntry::Found(coupon) => ReportStatus::of(coupon, now),
        }
    }
}

fn or_label(value: String, label: &str) -> Cell {
    if value.is_empty() {
        Cell::text(label)
    } else {
        Cell::Text(value)
    }
}

#[must_use]
pub fn coupon_report_sheet(entries: &[ReportEntry], now: DateTime<Utc>) -> Sheet {
    let mut sheet = Sheet::new(REPORT_SHEET, REPORT_COLUMNS);

    for entry in entries {
        let status = Cell::text(entry.status(now).as_str());
        let coupon = match entry {
            ReportEntry::NotFound(code) => {
                let mut row = vec![Cell::text(code), Cell::text("No")];
                row.resize(12, Cell::Empty);
                row.push(status);
                sheet.push_row(row);
                continue;
            }
            ReportEntry::Found(coupon) => coupon,
        };

        let limit = |value: Option<u32>| match value {
            Some(n) if n > 0 => Cell::Integer(i64::from(n)),
            _ => Cell::text("Unlimited"),
        };
        let (entity, ids) = match &coupon.applies_to {
            Some(scope) => (
                Cell::text(scope.entity.to_string()),
                or_label(join_ids(&scope.ids, ", "), "All"),
            ),
            None => (Cell::text("All"), Cell::text("All")),
        };

        sheet.push_row(vec![
            Cell::text(&coupon.code),
            Cell::text("Yes"),
            Cell::Integer(coupon.id),
            Cell::text(&coupon.name),
            Cell::text(&coupon.discount_type),
            Cell::Decimal(coupon.amount),
            Cell::Decimal(coupon.min_purchase),
            limit(coupon.max_uses),
            limit(coupon.max_uses_per_customer),
            Cell::Integer(i64::from(coupon.num_uses)),
            Cell::text(if coupon.num_uses > 0 { "Yes" } else { "No" }),
            or_label(coupon.expires.clone().unwrap_or_default(), "No Expiry"),
            status,
            entity,
            ids,
            or_label(join_json_list(&coupon.restricted_to, ", "), "None"),
            or_label(join_json_list(&coupon.shipping_methods, ", "), "All"),
            Cell::optional_text(coupon.date_created.as_deref()),
        ]);
    }

    sheet
}
