//! Scan orchestration
//!
//! A scan runs two phases in order, nodes then applications. A failed list
//! call empties its phase and the scan moves on; a document that cannot be
//! rendered or written is counted and skipped.

mod naming;


pub use naming::ApplicationNames;

use crate::cluster::ClusterReader;
use crate::document::{
    application_document, format_timestamp, hardware_document, Document, DocumentError,
    DocumentWriter,
};
use crate::observability::ScanLogger;
use crate::profiler::{profile_node, ApplicationProfiler};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// Scan progress. Transitions are linear and never go back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ScanPhase {
    Idle,
    ScanningNodes,
    ScanningApplications,
    Done,
}

impl ScanPhase {
    /// Short label used in logs and metrics
    pub fn label(&self) -> &'static str {
        match self {
            ScanPhase::Idle => "idle",
            ScanPhase::ScanningNodes => "nodes",
            ScanPhase::ScanningApplications => "applications",
            ScanPhase::Done => "done",
        }
    }
}

impl fmt::Display for ScanPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of one phase
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PhaseSummary {
    /// Objects returned by the list call
    pub listed: usize,
    /// Documents written
    pub written: usize,
    /// Documents that failed to render or write
    pub failed: usize,
    /// The list call itself failed and the phase produced nothing
    pub list_failed: bool,
}

/// Outcome of a whole scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub nodes: PhaseSummary,
    pub applications: PhaseSummary,
}

impl ScanSummary {
    pub fn total_written(&self) -> usize {
        self.nodes.written + self.applications.written
    }

    pub fn total_failed(&self) -> usize {
        self.nodes.failed + self.applications.failed
    }
}

/// Runs a single point-in-time scan and writes the document tree
pub struct Inventory {
    reader: Arc<dyn ClusterReader>,
    writer: DocumentWriter,
    logger: ScanLogger,
    phase: ScanPhase,
}

impl Inventory {
    pub fn new(reader: Arc<dyn ClusterReader>, writer: DocumentWriter) -> Self {
        let logger = ScanLogger::new(writer.root());
        Self {
            reader,
            writer,
            logger,
            phase: ScanPhase::Idle,
        }
    }

    pub fn phase(&self) -> ScanPhase {
        self.phase
    }

    /// Run both phases. `started_at` is stamped into every document.
    pub async fn run(&mut self, started_at: DateTime<Utc>) -> ScanSummary {
        let clock = Instant::now();
        let updated = format_timestamp(started_at);
        self.logger.log_scan_started();

        self.enter(ScanPhase::ScanningNodes);
        let nodes = self.scan_nodes(&updated).await;

        self.enter(ScanPhase::ScanningApplications);
        let applications = self.scan_applications(&updated).await;

        self.enter(ScanPhase::Done);
        let summary = ScanSummary {
            started_at,
            duration_ms: clock.elapsed().as_millis() as u64,
            nodes,
            applications,
        };
        self.logger.log_scan_completed(&summary);
        summary
    }

    fn enter(&mut self, phase: ScanPhase) {
        debug_assert!(phase > self.phase, "scan phases only move forward");
        self.phase = phase;
        if phase != ScanPhase::Done {
            self.logger.log_phase_started(phase);
        }
    }

    async fn scan_nodes(&self, updated: &str) -> PhaseSummary {
        let phase = ScanPhase::ScanningNodes;
        let mut summary = PhaseSummary::default();

        let nodes = match self.reader.list_nodes().await {
            Ok(nodes) => nodes,
            Err(e) => {
                self.logger.log_list_failed(phase, &e);
                summary.list_failed = true;
                return summary;
            }
        };
        summary.listed = nodes.len();

        for node in &nodes {
            let record = profile_node(node);
            let result = hardware_document(&record, updated);
            self.record_write(phase, &record.hostname, result, &mut summary);
        }

        self.logger.log_phase_completed(phase, &summary);
        summary
    }

    async fn scan_applications(&self, updated: &str) -> PhaseSummary {
        let phase = ScanPhase::ScanningApplications;
        let mut summary = PhaseSummary::default();

        let ingresses = match self.reader.list_ingresses().await {
            Ok(ingresses) => ingresses,
            Err(e) => {
                self.logger.log_list_failed(phase, &e);
                summary.list_failed = true;
                return summary;
            }
        };
        summary.listed = ingresses.len();

        let names = ApplicationNames::from_ingresses(&ingresses);
        let profiler = ApplicationProfiler::new(self.reader.as_ref());

        for ingress in &ingresses {
            let record = profiler.profile(ingress).await;
            let document_name = names.document_name(&record.namespace, &record.name);
            let result = application_document(&record, &document_name, updated);
            self.record_write(phase, &document_name, result, &mut summary);
        }

        self.logger.log_phase_completed(phase, &summary);
        summary
    }

    fn record_write(
        &self,
        phase: ScanPhase,
        name: &str,
        rendered: Result<Document, DocumentError>,
        summary: &mut PhaseSummary,
    ) {
        match rendered.and_then(|doc| self.writer.write(&doc).map(|_| doc)) {
            Ok(doc) => {
                self.logger.log_document_written(phase, &doc.relative_path());
                summary.written += 1;
            }
            Err(e) => {
                self.logger.log_document_failed(phase, name, &e);
                summary.failed += 1;
            }
        }
    }
}
