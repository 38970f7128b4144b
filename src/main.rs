use std::path::PathBuf;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ipca_normalizer::config::Config;
use ipca_normalizer::importers::IbgeDownloader;
use ipca_normalizer::services::IpcaImportService;

#[derive(Parser)]
#[command(name = "ipca-normalizer")]
#[command(
    about = "Download the IBGE IPCA historical series and normalize it to CSV",
    long_about = None
)]
struct Cli {
    /// Use a local ZIP archive instead of downloading
    #[arg(long)]
    archive: Option<PathBuf>,

    /// Archive URL (overrides IPCA_SOURCE_URL)
    #[arg(long)]
    url: Option<String>,

    /// Directory for the normalized CSV files (overrides OUTPUT_DIR)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Upload to this S3 bucket instead of a local directory (overrides S3_BUCKET_NAME)
    #[arg(long)]
    bucket: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if it exists (ignore errors if not found)
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,ipca_normalizer=debug")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(url) = cli.url {
        config.source_url = url;
    }
    if let Some(output_dir) = cli.output_dir {
        config.output_dir = output_dir;
    }
    if let Some(bucket) = cli.bucket {
        config.s3_bucket = Some(bucket);
    }
    info!("Starting IPCA normalizer with config: {:?}", config);

    let archive_bytes = match &cli.archive {
        Some(path) => {
            info!("Reading local archive {}", path.display());
            tokio::fs::read(path).await?
        }
        None => {
            let pb = ProgressBar::new_spinner();
            pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
            pb.set_message(format!("Downloading {}", config.source_url));
            pb.enable_steady_tick(std::time::Duration::from_millis(100));

            let downloader =
                IbgeDownloader::with_timeout(config.source_url.clone(), config.download_timeout());
            let result = downloader.download_archive().await;
            pb.finish_and_clear();
            result?
        }
    };

    info!("Output target: {:?}", config.output_target());
    let service = IpcaImportService::new(config.record_sink()?);
    let report =
        tokio::task::spawn_blocking(move || service.process_archive(archive_bytes)).await??;

    println!();
    println!("IPCA normalization complete");
    println!("  Imported: {}", report.imported.len());
    for entry in &report.imported {
        println!(
            "    {} -> {} ({} records)",
            entry.entry,
            entry.location,
            entry.record_count
        );
    }
    println!("  Failed:   {}", report.failures.len());
    for failure in &report.failures {
        error!("{}: {}", failure.entry, failure.reason);
        println!("    {}: {}", failure.entry, failure.reason);
    }

    Ok(())
}
