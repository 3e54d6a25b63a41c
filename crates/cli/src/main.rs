//! Cluster Auto-Inventory CLI
//!
//! A command-line tool for running inventory scans and inspecting the
//! node and application records they are built from.

mod commands;
mod config;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commands::{apps, nodes, scan};
use inventory_lib::connect;
use std::path::PathBuf;
use std::sync::Arc;

const DEFAULT_OUTPUT_DIR: &str = "./docs";

/// Cluster Auto-Inventory CLI
#[derive(Parser)]
#[command(name = "invctl")]
#[command(author, version, about = "CLI for the Cluster Auto-Inventory", long_about = None)]
pub struct Cli {
    /// Path to kubeconfig file (uses in-cluster or default config if not specified)
    #[arg(long, env = "KUBECONFIG")]
    pub kubeconfig: Option<String>,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan the cluster and write the document tree
    Scan {
        /// Root of the document tree (falls back to the config file, then ./docs)
        #[arg(long, short, env = "OUTPUT_DIR")]
        output_dir: Option<PathBuf>,
    },

    /// List node records without writing documents
    Nodes,

    /// List application records without writing documents
    Apps {
        /// Filter by namespace
        #[arg(long, short)]
        namespace: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let kubeconfig = config::kubeconfig_path(cli.kubeconfig.as_deref());
    let reader = match connect(kubeconfig.as_deref()).await {
        Ok(reader) => reader,
        Err(e) => {
            output::print_error(&format!("Cannot connect to the cluster: {}", e));
            return Err(e).context("Failed to connect to the cluster");
        }
    };

    match cli.command {
        Commands::Scan { output_dir } => {
            let output_dir = match output_dir {
                Some(dir) => dir,
                None => config::Config::load()?
                    .output_dir
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            };
            scan::run_scan(Arc::new(reader), &output_dir, cli.format).await?;
        }
        Commands::Nodes => {
            nodes::list_nodes(&reader, cli.format).await?;
        }
        Commands::Apps { namespace } => {
            apps::list_apps(&reader, namespace, cli.format).await?;
        }
    }

    Ok(())
}
