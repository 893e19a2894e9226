use std::path::PathBuf;

use bcc_client::CouponStore;
use bcc_export::{coupon_export_filename, coupon_export_sheet, write_csv};
use chrono::Utc;

/// Writes every coupon to CSV. Returns the path written, or `None` when the
/// store has no coupons.
pub(crate) async fn export_coupons<S: CouponStore>(
    store: &S,
    output: Option<PathBuf>,
) -> anyhow::Result<Option<PathBuf>> {
    let coupons = store
        .list_coupons()
        .await
        .map_err(|e| anyhow::anyhow!("failed to list coupons: {e}"))?;

    if coupons.is_empty() {
        tracing::info!("store has no coupons; nothing exported");
        return Ok(None);
    }

    let path = output.unwrap_or_else(|| PathBuf::from(coupon_export_filename(Utc::now())));
    write_csv(&coupon_export_sheet(&coupons), &path)?;
    tracing::info!(path = %path.display(), count = coupons.len(), "coupons exported");
    Ok(Some(path))
}

pub(crate) async fn run_export<S: CouponStore>(
    store: &S,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    match export_coupons(store, output).await? {
        Some(path) => println!("exported coupons to {}", path.display()),
        None => println!("no coupons found"),
    }
    Ok(())
}
