//! Record lists to sheets, one row per record in input order.

use bcc_client::Coupon;
use bcc_generator::CouponOutcome;

use crate::sheet::{Cell, Sheet};

pub const GENERATION_SHEET: &str = "Generated Coupons";
pub const GENERATION_COLUMNS: [&str; 6] = ["code", "name", "id", "status", "created_at", "error"];

pub const COUPON_EXPORT_SHEET: &str = "All Coupons";
pub const COUPON_EXPORT_COLUMNS: [&str; 16] = [
    "id",
    "code",
    "name",
    "type",
    "amount",
    "min_purchase",
    "max_uses",
    "max_uses_per_customer",
    "num_uses",
    "enabled",
    "expires",
    "date_created",
    "applies_to_entity",
    "applies_to_ids",
    "restricted_to",
    "shipping_methods",
];

const LIST_SEPARATOR: &str = "; ";

#[must_use]
pub fn generation_sheet(outcomes: &[CouponOutcome]) -> Sheet {
    let mut sheet = Sheet::new(GENERATION_SHEET, GENERATION_COLUMNS);
    for outcome in outcomes {
        sheet.push_row(vec![
            Cell::text(&outcome.code),
            Cell::text(&outcome.name),
            Cell::optional_int(outcome.id),
            Cell::text(outcome.status.as_str()),
            Cell::text(&outcome.created_at),
            Cell::optional_text(outcome.error.as_deref()),
        ]);
    }
    sheet
}

/// Full field dump of every coupon, suitable for CSV.
#[must_use]
pub fn coupon_export_sheet(coupons: &[Coupon]) -> Sheet {
    let mut sheet = Sheet::new(COUPON_EXPORT_SHEET, COUPON_EXPORT_COLUMNS);
    for coupon in coupons {
        let (entity, ids) = match &coupon.applies_to {
            Some(scope) => (
                Cell::text(scope.entity.to_string()),
                Cell::optional_text(Some(&join_ids(&scope.ids, LIST_SEPARATOR))),
            ),
            None => (Cell::Empty, Cell::Empty),
        };
        sheet.push_row(vec![
            Cell::Integer(coupon.id),
            Cell::text(&coupon.code),
            Cell::text(&coupon.name),
            Cell::text(&coupon.discount_type),
            Cell::Decimal(coupon.amount),
            Cell::Decimal(coupon.min_purchase),
            Cell::optional_int(coupon.max_uses),
            Cell::optional_int(coupon.max_uses_per_customer),
            Cell::Integer(i64::from(coupon.num_uses)),
            Cell::Bool(coupon.enabled),
            Cell::optional_text(coupon.expires.as_deref()),
            Cell::optional_text(coupon.date_created.as_deref()),
            entity,
            ids,
            Cell::optional_text(Some(&join_json_list(&coupon.restricted_to, LIST_SEPARATOR))),
            Cell::optional_text(Some(&join_json_list(
                &coupon.shipping_methods,
                LIST_SEPARATOR,
            ))),
        ]);
    }
    sheet
}

pub(crate) fn join_ids(ids: &[i64], separator: &str) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}

/// Joins a JSON array's elements (strings unquoted). `null` is empty; any
/// other shape is rendered as compact JSON.
pub(crate) fn join_json_list(value: &serde_json::Value, separator: &str) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::Array(items) => items
            .iter()
            .map(|item| match item {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(separator),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bcc_generator::CouponOutcome;
    use rust_decimal::Decimal;
    use serde_json::json;

    fn coupon(value: serde_json::Value) -> Coupon {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn generation_sheet_has_fixed_columns_and_blank_gaps() {
        let outcomes = vec![
            CouponOutcome::created("A1".into(), "Promo 1 of 2".into(), 10),
            CouponOutcome::failed("B2".into(), "Promo 2 of 2".into(), "bad"),
        ];
        let sheet = generation_sheet(&outcomes);

        assert_eq!(sheet.name, "Generated Coupons");
        assert_eq!(sheet.headers, GENERATION_COLUMNS);
        assert_eq!(sheet.cell(0, "id"), Some(&Cell::Integer(10)));
        assert_eq!(sheet.cell(0, "error"), Some(&Cell::Empty));
        assert_eq!(sheet.cell(1, "id"), Some(&Cell::Empty));
        assert_eq!(sheet.cell(1, "status"), Some(&Cell::text("Failed")));
    }

    #[test]
    fn coupon_export_flattens_scope_and_lists() {
        let sheet = coupon_export_sheet(&[coupon(json!({
            "id": 5,
            "code": "SAVE",
            "name": "Save",
            "type": "percentage_discount",
            "amount": "15.0000",
            "min_purchase": "0.0000",
            "max_uses": null,
            "num_uses": 3,
            "enabled": true,
            "expires": "",
            "applies_to": { "entity": "categories", "ids": [18, 23] },
            "restricted_to": ["US", "CA"],
            "shipping_methods": null
        }))]);

        assert_eq!(sheet.headers.len(), 16);
        assert_eq!(sheet.cell(0, "amount"), Some(&Cell::Decimal(Decimal::new(150_000, 4))));
        assert_eq!(sheet.cell(0, "max_uses"), Some(&Cell::Empty));
        assert_eq!(sheet.cell(0, "expires"), Some(&Cell::Empty));
        assert_eq!(sheet.cell(0, "applies_to_entity"), Some(&Cell::text("categories")));
        assert_eq!(sheet.cell(0, "applies_to_ids"), Some(&Cell::text("18; 23")));
        assert_eq!(sheet.cell(0, "restricted_to"), Some(&Cell::text("US; CA")));
        assert_eq!(sheet.cell(0, "shipping_methods"), Some(&Cell::Empty));
    }

    #[test]
    fn non_array_lists_render_as_json() {
        assert_eq!(
            join_json_list(&json!({ "countries": ["US"] }), "; "),
            r#"{"countries":["US"]}"#
        );
        assert_eq!(join_json_list(&json!([1, "x"]), ", "), "1, x");
    }
}
