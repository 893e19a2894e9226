//! `create`: one-off coupon creation from a JSON file or from flags.

use std::path::{Path, PathBuf};

use anyhow::Context;
use bcc_client::{
    AppliesTo, AppliesToEntity, BigCommerceClient, CouponPayload, DiscountType, RequestPacer,
};
use bcc_core::{to_wire_date, AppConfig};
use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::{Map, Value};

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// JSON file holding one coupon object or an array of them
    #[arg(long, conflicts_with_all = ["code", "name", "amount"])]
    pub file: Option<PathBuf>,
    #[arg(long, required_unless_present = "file")]
    pub code: Option<String>,
    /// Display name (defaults to the code)
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long, required_unless_present = "file")]
    pub amount: Option<Decimal>,
    /// Discount kind, e.g. percentage, fixed, free_shipping
    #[arg(long = "type", default_value = "percentage")]
    pub discount_type: DiscountType,
    #[arg(long)]
    pub min_purchase: Option<Decimal>,
    #[arg(long)]
    pub max_uses: Option<u32>,
    #[arg(long)]
    pub max_uses_per_customer: Option<u32>,
    /// Expiry date as YYYY-MM-DD (no expiry when omitted)
    #[arg(long)]
    pub expires: Option<String>,
    /// Create the coupon disabled
    #[arg(long)]
    pub disabled: bool,
    #[arg(long)]
    pub targeting: Option<AppliesToEntity>,
    /// Product or category ids to scope the coupon to (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub ids: Vec<i64>,
}

impl CreateArgs {
    /// Builds the payload described by the flags.
    pub(crate) fn payload(&self) -> anyhow::Result<CouponPayload> {
        let code = self
            .code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| anyhow::anyhow!("--code must not be blank"))?;
        let amount = self
            .amount
            .ok_or_else(|| anyhow::anyhow!("--amount is required"))?;
        let expires = match self.expires.as_deref() {
            Some(date) => Some(
                to_wire_date(date)
                    .ok_or_else(|| anyhow::anyhow!("invalid --expires date \"{date}\""))?,
            ),
            None => None,
        };
        let applies_to = (!self.ids.is_empty()).then(|| AppliesTo {
            entity: self.targeting.unwrap_or(AppliesToEntity::Products),
            ids: self.ids.clone(),
        });

        Ok(CouponPayload {
            code: code.to_owned(),
            name: self.name.clone().unwrap_or_else(|| code.to_owned()),
            discount_type: self.discount_type,
            amount,
            enabled: !self.disabled,
            max_uses: self.max_uses,
            max_uses_per_customer: self.max_uses_per_customer,
            min_purchase: self.min_purchase.unwrap_or_default(),
            expires,
            applies_to,
        })
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CreateSummary {
    pub created: u32,
    pub failed: u32,
}

pub(crate) async fn run_create(
    client: &BigCommerceClient,
    config: &AppConfig,
    args: CreateArgs,
) -> anyhow::Result<()> {
    if let Some(file) = &args.file {
        let pacer = RequestPacer::from_millis(config.create_delay_ms);
        let summary = create_from_file(client, file, &pacer).await?;
        println!(
            "results: {} created, {} failed",
            summary.created, summary.failed
        );
        return Ok(());
    }

    let payload = args.payload()?;
    match client.create_coupon(&payload).await {
        Ok(coupon) => {
            println!("created coupon {} (ID: {})", coupon.code, coupon.id);
            Ok(())
        }
        Err(failure) => Err(anyhow::anyhow!(
            "failed to create {}: {}",
            payload.code,
            failure.message
        )),
    }
}

/// Creates every coupon in `path` one after the other, pausing after each.
///
/// Entries are posted as written apart from two rewrites: a `YYYY-MM-DD`
/// `expires` becomes the wire date and a short `type` (`percentage`,
/// `fixed`) becomes its full name.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not JSON. Entries that are
/// not objects with a `code`, and create failures, are counted as failed.
pub(crate) async fn create_from_file(
    client: &BigCommerceClient,
    path: &Path,
    pacer: &RequestPacer,
) -> anyhow::Result<CreateSummary> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let parsed: Value = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse {} as JSON", path.display()))?;
    let entries = match parsed {
        Value::Array(items) => items,
        single => vec![single],
    };

    let total = entries.len();
    let mut summary = CreateSummary::default();
    println!("creating {total} coupon(s)");

    for (index, entry) in entries.into_iter().enumerate() {
        let position = index + 1;
        let object = match prepare_entry(entry) {
            Ok(object) => object,
            Err(reason) => {
                tracing::warn!(position, reason, "skipping malformed coupon entry");
                println!("[{position}/{total}] failed: invalid coupon entry: {reason}");
                summary.failed += 1;
                continue;
            }
        };
        let code = object.get("code").and_then(Value::as_str).unwrap_or_default();

        match client.create_coupon_object(&object).await {
            Ok(coupon) => {
                println!("[{position}/{total}] created {} (ID: {})", coupon.code, coupon.id);
                summary.created += 1;
            }
            Err(failure) => {
                println!("[{position}/{total}] failed {code}: {}", failure.message);
                summary.failed += 1;
            }
        }
        pacer.pause().await;
    }

    Ok(summary)
}

/// Checks a file entry is an object with a non-blank `code` and applies the
/// `expires` and `type` rewrites. Every other field is left alone.
pub(crate) fn prepare_entry(entry: Value) -> Result<Map<String, Value>, &'static str> {
    let Value::Object(mut object) = entry else {
        return Err("entry is not a JSON object");
    };
    let has_code = object
        .get("code")
        .and_then(Value::as_str)
        .is_some_and(|code| !code.trim().is_empty());
    if !has_code {
        return Err("missing \"code\"");
    }

    let wire_expiry = object
        .get("expires")
        .and_then(Value::as_str)
        .filter(|date| NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").is_ok())
        .and_then(to_wire_date);
    if let Some(expires) = wire_expiry {
        object.insert("expires".to_owned(), Value::String(expires));
    }

    let full_type = object
        .get("type")
        .and_then(Value::as_str)
        .and_then(|kind| kind.parse::<DiscountType>().ok())
        .and_then(|kind| serde_json::to_value(kind).ok());
    if let Some(kind) = full_type {
        object.insert("type".to_owned(), kind);
    }

    Ok(object)
}
