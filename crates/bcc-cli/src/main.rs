mod create;
mod export;
mod generate;
mod report;

use std::path::PathBuf;

use bcc_client::BigCommerceClient;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::create::CreateArgs;
use crate::generate::GenerateArgs;

#[derive(Debug, Parser)]
#[command(name = "bcc-cli")]
#[command(about = "BigCommerce coupon manager command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate a batch of unique coupons and write the outcomes to a workbook
    Generate(GenerateArgs),
    /// Create coupons from a JSON file or from flags
    Create(CreateArgs),
    /// Export every coupon in the store to CSV
    Export {
        /// Output file (defaults to a timestamped name in the current dir)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Look up coupon codes listed in a CSV and write a status workbook
    Report {
        /// CSV or XLSX file containing the codes to look up
        #[arg(long)]
        input: PathBuf,
        /// Column holding the codes
        #[arg(long, default_value = "Coupon Code")]
        column: String,
        /// Output file (defaults to a timestamped name in the current dir)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = bcc_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let client = BigCommerceClient::from_app_config(&config)
        .map_err(|e| anyhow::anyhow!("failed to build BigCommerce client: {e}"))?;

    match cli.command {
        Commands::Generate(args) => generate::run_generate(&client, &config, args).await,
        Commands::Create(args) => create::run_create(&client, &config, args).await,
        Commands::Export { output } => export::run_export(&client, output).await,
        Commands::Report {
            input,
            column,
            output,
        } => report::run_report(&client, &input, &column, output).await,
    }
}
