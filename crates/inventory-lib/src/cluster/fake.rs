//! In-memory cluster snapshot for tests

use super::{ClusterReader, ReadError, Selector};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Node, Pod, Service};
use k8s_openapi::api::networking::v1::Ingress;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Snapshot-backed reader that counts the calls it receives
#[derive(Default)]
pub struct FakeCluster {
    pub nodes: Vec<Node>,
    pub ingresses: Vec<Ingress>,
    pub services: Vec<Service>,
    pub pods: Vec<Pod>,
    pub fail_nodes: bool,
    pub fail_ingresses: bool,
    pub fail_services: bool,
    pub fail_pods: bool,
    pod_calls: AtomicUsize,
    service_calls: AtomicUsize,
}

impl FakeCluster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_node(mut self, node: Value) -> Self {
        self.nodes.push(serde_json::from_value(node).expect("valid node fixture"));
        self
    }

    pub fn with_ingress(mut self, ingress: Value) -> Self {
        self.ingresses
            .push(serde_json::from_value(ingress).expect("valid ingress fixture"));
        self
    }

    pub fn with_service(mut self, service: Value) -> Self {
        self.services
            .push(serde_json::from_value(service).expect("valid service fixture"));
        self
    }

    pub fn with_pod(mut self, pod: Value) -> Self {
        self.pods.push(serde_json::from_value(pod).expect("valid pod fixture"));
        self
    }

    pub fn pod_calls(&self) -> usize {
        self.pod_calls.load(Ordering::SeqCst)
    }

    pub fn service_calls(&self) -> usize {
        self.service_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClusterReader for FakeCluster {
    async fn list_nodes(&self) -> Result<Vec<Node>, ReadError> {
        if self.fail_nodes {
            return Err(ReadError::unreachable("nodes is forbidden"));
        }
        Ok(self.nodes.clone())
    }

    async fn list_ingresses(&self) -> Result<Vec<Ingress>, ReadError> {
        if self.fail_ingresses {
            return Err(ReadError::unreachable("ingresses is forbidden"));
        }
        Ok(self.ingresses.clone())
    }

    async fn list_pods_by_selector(
        &self,
        namespace: &str,
        selector: &Selector,
    ) -> Result<Vec<Pod>, ReadError> {
        self.pod_calls.fetch_add(1, Ordering::SeqCst);
        if selector.is_empty() {
            return Ok(Vec::new());
        }
        if self.fail_pods {
            return Err(ReadError::unreachable("connection reset"));
        }
        Ok(self
            .pods
            .iter()
            .filter(|pod| pod.metadata.namespace.as_deref() == Some(namespace))
            .filter(|pod| {
                pod.metadata
                    .labels
                    .as_ref()
                    .map(|labels| selector.matches(labels))
                    .unwrap_or(false)
            })
            .cloned()
            .collect())
    }

    async fn get_service(&self, namespace: &str, name: &str) -> Result<Service, ReadError> {
        self.service_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_services {
            return Err(ReadError::unreachable("connection reset"));
        }
        self.services
            .iter()
            .find(|svc| {
                svc.metadata.namespace.as_deref() == Some(namespace)
                    && svc.metadata.name.as_deref() == Some(name)
            })
            .cloned()
            .ok_or_else(|| ReadError::NotFound {
                kind: "service",
                namespace: namespace.to_string(),
                name: name.to_string(),
            })
    }
}
