//! Read-only access to the cluster control plane
//!
//! The inventory only ever lists nodes, pods and ingresses and fetches
//! individual services. Everything goes through the [`ClusterReader`] trait
//! so the profilers and the orchestrator can run against an in-memory
//! snapshot in tests.

mod client;

#[cfg(test)]
pub(crate) mod fake;

pub use client::{connect, ConnectError, KubeClusterReader};

use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Node, Pod, Service};
use k8s_openapi::api::networking::v1::Ingress;
use std::collections::BTreeMap;
use thiserror::Error;

/// Failure of a single control-plane read
#[derive(Debug, Error)]
pub enum ReadError {
    /// The requested object does not exist
    #[error("{kind} {namespace}/{name} not found")]
    NotFound {
        kind: &'static str,
        namespace: String,
        name: String,
    },

    /// The call did not complete (transport, auth or server error)
    #[error("control plane unreachable: {0}")]
    Unreachable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ReadError {
    pub fn unreachable(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Unreachable(source.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ReadError::NotFound { .. })
    }
}

/// Equality-based label selector, as declared in a Service spec
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector(BTreeMap<String, String>);

impl Selector {
    pub fn new(labels: BTreeMap<String, String>) -> Self {
        Self(labels)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Renders `k=v,k=v` for a list call.
    ///
    /// Returns `None` for an empty selector: an empty label query matches
    /// every pod in the namespace, so callers must not issue the list.
    pub fn to_query(&self) -> Option<String> {
        if self.0.is_empty() {
            return None;
        }
        let terms: Vec<String> = self.0.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        Some(terms.join(","))
    }

    /// True if every selector term is present in `labels`
    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        self.0.iter().all(|(k, v)| labels.get(k) == Some(v))
    }
}

impl From<BTreeMap<String, String>> for Selector {
    fn from(labels: BTreeMap<String, String>) -> Self {
        Self::new(labels)
    }
}

/// Read-only capability over the four object kinds the inventory needs
#[async_trait]
pub trait ClusterReader: Send + Sync {
    /// List all nodes (cluster-scoped)
    async fn list_nodes(&self) -> Result<Vec<Node>, ReadError>;

    /// List ingresses across all namespaces
    async fn list_ingresses(&self) -> Result<Vec<Ingress>, ReadError>;

    /// List pods in `namespace` matching `selector`.
    ///
    /// An empty selector yields an empty list without a call.
    async fn list_pods_by_selector(
        &self,
        namespace: &str,
        selector: &Selector,
    ) -> Result<Vec<Pod>, ReadError>;

    /// Fetch a service by namespaced name
    async fn get_service(&self, namespace: &str, name: &str) -> Result<Service, ReadError>;
}
