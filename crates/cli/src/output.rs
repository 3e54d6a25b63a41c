//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use inventory_lib::{Readiness, NOT_AVAILABLE};
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print rows as a table, or the underlying records as JSON
pub fn print_records<R: Tabled, T: Serialize>(rows: Vec<R>, records: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if rows.is_empty() {
                println!("{}", "No items found".yellow());
                return;
            }
            let table = Table::new(rows).with(Style::rounded()).to_string();
            println!("{}", table);
        }
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(records) {
                println!("{}", json);
            }
        }
    }
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Color node readiness
pub fn color_readiness(readiness: Readiness) -> String {
    match readiness {
        Readiness::Ready => readiness.as_str().green().to_string(),
        Readiness::NotReady => readiness.as_str().red().to_string(),
        Readiness::Unknown => readiness.as_str().yellow().to_string(),
    }
}

/// Value or a dimmed `N/A`
pub fn or_dimmed(value: Option<&str>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => NOT_AVAILABLE.dimmed().to_string(),
    }
}
