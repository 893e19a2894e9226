//! File-level checks for the export pipeline: sheet building plus writers.

use bcc_client::Coupon;
use bcc_export::{
    coupon_export_sheet, generation_filename, generation_sheet, read_codes, write_csv, write_xlsx,
};
use bcc_generator::CouponOutcome;
use chrono::Utc;
use serde_json::json;

fn coupons() -> Vec<Coupon> {
    (1..=3)
        .map(|id| {
            serde_json::from_value(json!({
                "id": id,
                "code": format!("CODE{id}"),
                "name": format!("Coupon {id}"),
                "type": "per_total_discount",
                "amount": "5.0000",
                "enabled": id != 2
            }))
            .unwrap()
        })
        .collect()
}

#[test]
fn coupon_export_csv_can_be_read_back_as_code_list() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("all.csv");

    write_csv(&coupon_export_sheet(&coupons()), &path).unwrap();

    let header = std::fs::read_to_string(&path)
        .unwrap()
        .lines()
        .next()
        .unwrap()
        .to_string();
    assert!(header.starts_with("id,code,name,type,amount"));
    assert!(header.ends_with("restricted_to,shipping_methods"));

    let codes = read_codes(&path, "code").unwrap();
    assert_eq!(codes, ["CODE1", "CODE2", "CODE3"]);
}

#[test]
fn generation_workbook_lands_under_timestamped_name() {
    let dir = tempfile::tempdir().unwrap();
    let filename = generation_filename(Utc::now());
    let path = dir.path().join(&filename);

    let outcomes = vec![
        CouponOutcome::created("GL001AAAAAA".into(), "GL 1 of 2".into(), 1),
        CouponOutcome::failed("GL002BBBBBB".into(), "GL 2 of 2".into(), "rejected"),
    ];
    write_xlsx(&generation_sheet(&outcomes), &path).unwrap();

    assert!(filename.starts_with("generated-coupons-"));
    assert!(path.exists());
}

#[test]
fn writers_overwrite_existing_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("all.csv");
    std::fs::write(&path, "stale contents that are much longer than the export\n".repeat(50))
        .unwrap();

    write_csv(&coupon_export_sheet(&coupons()[..1]), &path).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written.lines().count(), 2);
    assert!(!written.contains("stale"));
}
