//! Core data models for the inventory

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Rendered in place of any value the cluster did not report
pub const NOT_AVAILABLE: &str = "N/A";

/// Ingress class recorded when the ingress does not name one
pub const DEFAULT_INGRESS_CLASS: &str = "default";

/// Returns the value, or the `N/A` sentinel when absent
pub fn or_not_available(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(NOT_AVAILABLE)
}

/// Node readiness derived from the `Ready` condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Readiness {
    Ready,
    NotReady,
    Unknown,
}

impl Readiness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Readiness::Ready => "Ready",
            Readiness::NotReady => "NotReady",
            Readiness::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Readiness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized view of one cluster node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub hostname: String,
    pub internal_ip: Option<String>,
    pub readiness: Readiness,
    pub os_image: Option<String>,
    pub kernel_version: Option<String>,
    pub container_runtime: Option<String>,
    pub cpu_capacity: Option<String>,
    pub memory_capacity: Option<String>,
    pub labels: BTreeMap<String, String>,
}

/// Where an ingress sends traffic, taken from its first rule's first path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BackendRef {
    /// A Service in the ingress namespace
    Service { name: String, port: Option<String> },
    /// A typed reference to some other object (e.g. a storage bucket)
    Resource { kind: String, name: String },
    /// No rule, no HTTP paths, or a path without a backend
    Absent,
}

impl BackendRef {
    pub fn service_name(&self) -> Option<&str> {
        match self {
            BackendRef::Service { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// Normalized view of one externally exposed application (an ingress)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub name: String,
    pub namespace: String,
    /// Declared hosts in rule order; the first one is the primary URL
    pub hostnames: Vec<String>,
    pub backend: BackendRef,
    /// Weak reference to a node document by hostname
    pub hosted_on: Option<String>,
    pub ingress_class: String,
    pub annotations: BTreeMap<String, String>,
    pub labels: BTreeMap<String, String>,
}

impl ApplicationRecord {
    pub fn primary_host(&self) -> Option<&str> {
        self.hostnames.first().map(String::as_str)
    }

    pub fn additional_hosts(&self) -> &[String] {
        self.hostnames.get(1..).unwrap_or_default()
    }

    pub fn service_name(&self) -> Option<&str> {
        self.backend.service_name()
    }
}
