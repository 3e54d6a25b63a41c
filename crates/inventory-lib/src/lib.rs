//! Cluster auto-inventory library
//!
//! This crate provides the core functionality for:
//! - Read-only listing of nodes, ingresses, services and pods
//! - Profiling nodes and ingress-backed applications into records
//! - Resolving which node hosts each application
//! - Rendering records as cross-linked Markdown documents
//! - Scan orchestration, logging and metrics

pub mod cluster;
pub mod document;
pub mod inventory;
pub mod models;
pub mod observability;
pub mod profiler;

pub use cluster::{connect, ClusterReader, ConnectError, KubeClusterReader, ReadError, Selector};
pub use document::{Document, DocumentError, DocumentKind, DocumentWriter};
pub use inventory::{Inventory, PhaseSummary, ScanPhase, ScanSummary};
pub use models::*;
pub use observability::{ScanLogger, ScanMetrics};
