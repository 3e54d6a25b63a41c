//! Inventory Bot - one-shot cluster documentation job
//!
//! Scans the cluster's nodes and ingress-exposed applications once,
//! writes the Markdown document tree, and exits.

use anyhow::{Context, Result};
use chrono::Utc;
use inventory_lib::{connect, DocumentWriter, Inventory, ScanMetrics, ScanSummary};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;

use config::{BotConfig, LogFormat};

const BOT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    let config = BotConfig::load()?;
    init_tracing(config.log_format);

    info!(version = BOT_VERSION, "Starting inventory-bot");
    info!(
        output_dir = %config.output_dir.display(),
        kubeconfig = ?config.kubeconfig_path,
        "Bot configured"
    );

    let reader = connect(config.kubeconfig_path.as_deref())
        .await
        .context("Failed to connect to the cluster")?;

    let mut inventory = Inventory::new(Arc::new(reader), DocumentWriter::new(&config.output_dir));
    let summary = inventory.run(Utc::now()).await;

    if let Some(path) = &config.metrics_file {
        if let Err(e) = export_metrics(&summary, path) {
            warn!(error = %e, "Failed to export scan metrics");
        }
    }

    info!(
        output_dir = %config.output_dir.display(),
        written = summary.total_written(),
        failed = summary.total_failed(),
        "Inventory scan finished"
    );

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(fmt::layer()).init(),
    }
}

fn export_metrics(summary: &ScanSummary, path: &Path) -> Result<()> {
    let metrics = ScanMetrics::new().context("Failed to create metrics registry")?;
    metrics.record(summary);
    metrics.write_textfile(path)?;
    info!(path = %path.display(), "Scan metrics exported");
    Ok(())
}
