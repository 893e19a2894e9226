//! `generate`: the bulk generation workflow from the command line.

use std::path::{Path, PathBuf};

use bcc_client::{AppliesToEntity, CouponStore};
use bcc_core::AppConfig;
use bcc_export::{generation_filename, generation_sheet, write_xlsx};
use bcc_generator::{run_generation, GenerationPolicy, GenerationReport, GenerationRequest};
use chrono::Utc;
use clap::Args;
use rand::{rngs::StdRng, SeedableRng};
use rust_decimal::Decimal;

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Number of coupons to create
    #[arg(long)]
    pub quantity: u32,
    /// Prefix for every generated code
    #[arg(long)]
    pub code_prefix: String,
    /// Prefix for every coupon name ("<prefix> 3 of 10")
    #[arg(long)]
    pub name_prefix: String,
    /// Product or category ids the coupons apply to (comma separated)
    #[arg(long, value_delimiter = ',', required = true)]
    pub ids: Vec<i64>,
    /// Whether the ids are products or categories
    #[arg(long, default_value = "products")]
    pub targeting: AppliesToEntity,
    /// Percentage off
    #[arg(long, default_value = "100")]
    pub discount: Decimal,
    #[arg(long, default_value_t = 1)]
    pub max_uses_per_customer: u32,
    /// Total uses across all customers (unlimited when omitted)
    #[arg(long)]
    pub max_uses: Option<u32>,
    #[arg(long, default_value = "0")]
    pub min_purchase: Decimal,
    /// Expiry date as YYYY-MM-DD (defaults to 30 days from now)
    #[arg(long)]
    pub expires: Option<String>,
    /// Directory the outcome workbook is written to
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,
}

impl GenerateArgs {
    pub(crate) fn request(&self) -> GenerationRequest {
        let mut request = GenerationRequest::new(
            self.quantity,
            self.code_prefix.clone(),
            self.name_prefix.clone(),
            self.targeting,
            self.ids.clone(),
        );
        request.discount = self.discount;
        request.max_uses_per_customer = self.max_uses_per_customer;
        request.max_uses = self.max_uses;
        request.min_purchase = self.min_purchase;
        request.expiry_date.clone_from(&self.expires);
        request
    }
}

/// Runs one batch and writes its outcomes to a workbook in `args.output_dir`.
///
/// # Errors
///
/// Returns an error if the arguments fail validation or the workbook cannot be
/// written. Individual coupon failures are reported, not propagated.
pub(crate) async fn run_generate<S: CouponStore>(
    store: &S,
    config: &AppConfig,
    args: GenerateArgs,
) -> anyhow::Result<()> {
    let request = args.request();
    request
        .validate(config.max_batch)
        .map_err(|e| anyhow::anyhow!("invalid generation request: {e}"))?;

    let policy = GenerationPolicy::with_create_delay_ms(config.create_delay_ms);
    let mut rng = StdRng::from_os_rng();

    let report = run_generation(store, &request, &policy, &mut rng, |outcome| {
        match &outcome.error {
            None => println!("created {} ({})", outcome.code, outcome.name),
            Some(error) => println!("failed  {} ({}): {error}", outcome.code, outcome.name),
        }
    })
    .await;

    println!(
        "generation finished: {} created, {} failed of {}",
        report.created,
        report.failed,
        report.total()
    );

    if let Some(path) = write_report(&args.output_dir, &report)? {
        println!("outcomes written to {}", path.display());
    }
    Ok(())
}

/// Writes the outcome workbook; nothing is written for an empty report.
pub(crate) fn write_report(
    output_dir: &Path,
    report: &GenerationReport,
) -> anyhow::Result<Option<PathBuf>> {
    if report.outcomes.is_empty() {
        tracing::info!("no outcomes recorded; skipping workbook");
        return Ok(None);
    }

    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(generation_filename(Utc::now()));
    write_xlsx(&generation_sheet(&report.outcomes), &path)?;
    tracing::info!(path = %path.display(), rows = report.total(), "generation workbook written");
    Ok(Some(path))
}
