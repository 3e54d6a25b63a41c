//! Full inventory scan

use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use inventory_lib::{ClusterReader, DocumentWriter, Inventory, PhaseSummary, ScanSummary};
use std::path::Path;
use std::sync::Arc;

use crate::output::{print_error, print_info, print_success, print_warning, OutputFormat};

/// Run one scan into `output_dir` and print the summary
pub async fn run_scan(
    reader: Arc<dyn ClusterReader>,
    output_dir: &Path,
    format: OutputFormat,
) -> Result<()> {
    let mut inventory = Inventory::new(reader, DocumentWriter::new(output_dir));

    if let OutputFormat::Table = format {
        println!("{}", "Inventory Scan".bold());
        println!("{}", "=".repeat(60));
    }

    let summary = inventory.run(Utc::now()).await;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)?;
            println!("{}", json);
        }
        OutputFormat::Table => print_summary(&summary, output_dir),
    }

    Ok(())
}

fn print_summary(summary: &ScanSummary, output_dir: &Path) {
    print_phase("nodes", &summary.nodes);
    print_phase("applications", &summary.applications);
    println!("{}", "=".repeat(60));
    print_info(&format!("Output directory: {}", output_dir.display()));
    println!("Duration: {}ms", summary.duration_ms);
}

fn print_phase(label: &str, phase: &PhaseSummary) {
    if phase.list_failed {
        print_error(&format!("Failed to list {}, phase skipped", label));
        return;
    }
    print_success(&format!("Scanned {} {}", phase.written, label));
    if phase.failed > 0 {
        print_warning(&format!("{} {} could not be written", phase.failed, label));
    }
}
