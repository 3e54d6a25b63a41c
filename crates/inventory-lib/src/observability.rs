//! Observability for inventory scans
//!
//! Provides:
//! - Structured tracing events for each scan step
//! - Prometheus gauges describing the last scan, exportable as a textfile
//!   for the node-exporter textfile collector

use crate::document::write_atomic;
use crate::inventory::{PhaseSummary, ScanPhase, ScanSummary};
use anyhow::{Context, Result};
use prometheus::{Encoder, Gauge, IntGauge, IntGaugeVec, Opts, Registry, TextEncoder};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Metrics describing the most recent scan
///
/// Each instance owns its registry, so several scans in one process do not
/// collide.
#[derive(Clone)]
pub struct ScanMetrics {
    registry: Registry,
    objects_listed: IntGaugeVec,
    documents_written: IntGaugeVec,
    document_failures: IntGaugeVec,
    list_failures: IntGaugeVec,
    last_scan_timestamp_seconds: IntGauge,
    scan_duration_seconds: Gauge,
}

impl ScanMetrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let objects_listed = IntGaugeVec::new(
            Opts::new(
                "inventory_objects_listed",
                "Objects returned by the list call of each phase",
            ),
            &["phase"],
        )?;
        let documents_written = IntGaugeVec::new(
            Opts::new(
                "inventory_documents_written",
                "Documents written by the last scan",
            ),
            &["phase"],
        )?;
        let document_failures = IntGaugeVec::new(
            Opts::new(
                "inventory_document_failures",
                "Documents that could not be rendered or written",
            ),
            &["phase"],
        )?;
        let list_failures = IntGaugeVec::new(
            Opts::new(
                "inventory_list_failures",
                "1 if the list call of the phase failed",
            ),
            &["phase"],
        )?;
        let last_scan_timestamp_seconds = IntGauge::new(
            "inventory_last_scan_timestamp_seconds",
            "Unix time at which the last scan started",
        )?;
        let scan_duration_seconds = Gauge::new(
            "inventory_scan_duration_seconds",
            "Wall-clock duration of the last scan",
        )?;

        registry.register(Box::new(objects_listed.clone()))?;
        registry.register(Box::new(documents_written.clone()))?;
        registry.register(Box::new(document_failures.clone()))?;
        registry.register(Box::new(list_failures.clone()))?;
        registry.register(Box::new(last_scan_timestamp_seconds.clone()))?;
        registry.register(Box::new(scan_duration_seconds.clone()))?;

        Ok(Self {
            registry,
            objects_listed,
            documents_written,
            document_failures,
            list_failures,
            last_scan_timestamp_seconds,
            scan_duration_seconds,
        })
    }

    /// Record the outcome of a scan
    pub fn record(&self, summary: &ScanSummary) {
        self.record_phase(ScanPhase::ScanningNodes, &summary.nodes);
        self.record_phase(ScanPhase::ScanningApplications, &summary.applications);
        self.last_scan_timestamp_seconds
            .set(summary.started_at.timestamp());
        self.scan_duration_seconds
            .set(summary.duration_ms as f64 / 1000.0);
    }

    fn record_phase(&self, phase: ScanPhase, summary: &PhaseSummary) {
        let label = [phase.label()];
        self.objects_listed
            .with_label_values(&label)
            .set(summary.listed as i64);
        self.documents_written
            .with_label_values(&label)
            .set(summary.written as i64);
        self.document_failures
            .with_label_values(&label)
            .set(summary.failed as i64);
        self.list_failures
            .with_label_values(&label)
            .set(i64::from(summary.list_failed));
    }

    /// Prometheus text exposition of all metrics
    pub fn encode(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buffer)
            .context("Failed to encode metrics")?;
        String::from_utf8(buffer).context("Metrics exposition is not UTF-8")
    }

    /// Atomically write the exposition to `path`
    pub fn write_textfile(&self, path: &Path) -> Result<()> {
        let exposition = self.encode()?;
        write_atomic(path, exposition.as_bytes())
            .with_context(|| format!("Failed to write metrics to {}", path.display()))
    }
}

/// Structured logger for scan events
///
/// Every event carries an `event` field and the output root so log lines
/// from several inventories can be told apart.
#[derive(Clone)]
pub struct ScanLogger {
    output_root: PathBuf,
}

impl ScanLogger {
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
        }
    }

    pub fn log_scan_started(&self) {
        info!(
            event = "scan_started",
            output_root = %self.output_root.display(),
            "Starting infrastructure scan"
        );
    }

    pub fn log_phase_started(&self, phase: ScanPhase) {
        info!(
            event = "phase_started",
            output_root = %self.output_root.display(),
            phase = %phase,
            "Scan phase started"
        );
    }

    pub fn log_list_failed(&self, phase: ScanPhase, error: &dyn std::error::Error) {
        warn!(
            event = "list_failed",
            output_root = %self.output_root.display(),
            phase = %phase,
            error = %error,
            "List call failed, skipping phase"
        );
    }

    pub fn log_document_written(&self, phase: ScanPhase, relative_path: &Path) {
        info!(
            event = "document_written",
            output_root = %self.output_root.display(),
            phase = %phase,
            path = %relative_path.display(),
            "Document written"
        );
    }

    pub fn log_document_failed(&self, phase: ScanPhase, name: &str, error: &dyn std::error::Error) {
        warn!(
            event = "document_failed",
            output_root = %self.output_root.display(),
            phase = %phase,
            name = %name,
            error = %error,
            "Document skipped"
        );
    }

    pub fn log_phase_completed(&self, phase: ScanPhase, summary: &PhaseSummary) {
        info!(
            event = "phase_completed",
            output_root = %self.output_root.display(),
            phase = %phase,
            listed = summary.listed,
            written = summary.written,
            failed = summary.failed,
            list_failed = summary.list_failed,
            "Scan phase completed"
        );
    }

    pub fn log_scan_completed(&self, summary: &ScanSummary) {
        info!(
            event = "scan_completed",
            output_root = %self.output_root.display(),
            nodes_written = summary.nodes.written,
            applications_written = summary.applications.written,
            failed = summary.total_failed(),
            duration_ms = summary.duration_ms,
            "Inventory scan completed"
        );
    }
}
