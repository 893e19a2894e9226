//! `report`: status of a list of coupon codes.

use std::path::{Path, PathBuf};

use anyhow::Context;
use bcc_client::{BigCommerceClient, RequestPacer};
use bcc_export::{coupon_report_filename, coupon_report_sheet, read_codes, write_xlsx, ReportEntry};
use chrono::Utc;

/// Pause between lookups.
const LOOKUP_DELAY_MS: u64 = 150;

/// Looks up each code in turn. A failed lookup is logged and reported as
/// not found.
pub(crate) async fn lookup_codes(
    client: &BigCommerceClient,
    codes: &[String],
    pacer: &RequestPacer,
) -> Vec<ReportEntry> {
    let mut entries = Vec::with_capacity(codes.len());

    for (index, code) in codes.iter().enumerate() {
        println!("[{}/{}] looking up {code}", index + 1, codes.len());
        let entry = match client.find_coupon_by_code(code).await {
            Ok(Some(coupon)) => ReportEntry::Found(Box::new(coupon)),
            Ok(None) => ReportEntry::NotFound(code.clone()),
            Err(e) => {
                tracing::warn!(code = %code, error = %e, "coupon lookup failed");
                ReportEntry::NotFound(code.clone())
            }
        };
        entries.push(entry);
        pacer.pause().await;
    }

    entries
}

pub(crate) async fn run_report(
    client: &BigCommerceClient,
    input: &Path,
    column: &str,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let codes = read_codes(input, column)
        .with_context(|| format!("failed to read codes from {}", input.display()))?;
    tracing::info!(count = codes.len(), column, "codes loaded");

    let entries = lookup_codes(client, &codes, &RequestPacer::from_millis(LOOKUP_DELAY_MS)).await;

    let now = Utc::now();
    let path = output.unwrap_or_else(|| PathBuf::from(coupon_report_filename(now)));
    write_xlsx(&coupon_report_sheet(&entries, now), &path)?;
    println!("report generated: {}", path.display());
    Ok(())
}
