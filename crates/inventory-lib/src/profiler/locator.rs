//! Pod placement lookup
//!
//! Answers "which node currently hosts a pod behind this selector". The
//! answer is best-effort: lookup failures resolve to an unknown placement
//! and never abort a scan.

use crate::cluster::{ClusterReader, Selector};
use k8s_openapi::api::core::v1::Pod;
use std::fmt;
use tracing::debug;

/// Why a hosting node could not be determined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownReason {
    /// The ingress has no service backend on its first path
    NoServiceBackend,
    /// The backend service does not exist
    ServiceNotFound,
    /// The service lookup failed in transit
    ServiceLookupFailed,
    /// The service declares no selector
    NoSelector,
    /// The service declares an empty selector
    EmptySelector,
    /// No pod matches the selector
    NoMatchingPods,
    /// Matching pods exist but none is bound to a node yet
    NoScheduledPod,
    /// The pod list failed in transit
    PodLookupFailed,
}

impl fmt::Display for UnknownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UnknownReason::NoServiceBackend => "no_service_backend",
            UnknownReason::ServiceNotFound => "service_not_found",
            UnknownReason::ServiceLookupFailed => "service_lookup_failed",
            UnknownReason::NoSelector => "no_selector",
            UnknownReason::EmptySelector => "empty_selector",
            UnknownReason::NoMatchingPods => "no_matching_pods",
            UnknownReason::NoScheduledPod => "no_scheduled_pod",
            UnknownReason::PodLookupFailed => "pod_lookup_failed",
        };
        f.write_str(s)
    }
}

/// Result of a placement lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    Node(String),
    Unknown(UnknownReason),
}

impl Placement {
    pub fn node_name(self) -> Option<String> {
        match self {
            Placement::Node(name) => Some(name),
            Placement::Unknown(_) => None,
        }
    }
}

/// Resolves a namespace + selector to the node of the first scheduled pod
pub struct WorkloadLocator<'a, R: ?Sized> {
    reader: &'a R,
}

impl<'a, R: ClusterReader + ?Sized> WorkloadLocator<'a, R> {
    pub fn new(reader: &'a R) -> Self {
        Self { reader }
    }

    /// Locate the hosting node for pods matching `selector` in `namespace`.
    ///
    /// Pods are considered in listing order; the first one with a non-empty
    /// node name wins.
    pub async fn locate(&self, namespace: &str, selector: Option<&Selector>) -> Placement {
        let selector = match selector {
            None => return Placement::Unknown(UnknownReason::NoSelector),
            Some(s) if s.is_empty() => return Placement::Unknown(UnknownReason::EmptySelector),
            Some(s) => s,
        };

        let pods = match self.reader.list_pods_by_selector(namespace, selector).await {
            Ok(pods) => pods,
            Err(e) => {
                debug!(namespace = %namespace, error = %e, "Pod lookup failed, placement unknown");
                return Placement::Unknown(UnknownReason::PodLookupFailed);
            }
        };

        if pods.is_empty() {
            return Placement::Unknown(UnknownReason::NoMatchingPods);
        }

        pods.iter()
            .find_map(scheduled_node)
            .map(|node| Placement::Node(node.to_string()))
            .unwrap_or(Placement::Unknown(UnknownReason::NoScheduledPod))
    }
}

fn scheduled_node(pod: &Pod) -> Option<&str> {
    pod.spec
        .as_ref()
        .and_then(|spec| spec.node_name.as_deref())
        .filter(|name| !name.is_empty())
}
