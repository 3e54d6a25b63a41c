//! Application profiling from ingresses
//!
//! The hosting node is not recorded anywhere on the ingress. It is derived
//! by following ingress -> backend service -> service selector -> pods, and
//! any broken link along the way leaves the node unknown.

use super::locator::{Placement, UnknownReason, WorkloadLocator};
use crate::cluster::{ClusterReader, Selector};
use crate::models::{ApplicationRecord, BackendRef, DEFAULT_INGRESS_CLASS};
use k8s_openapi::api::networking::v1::{Ingress, IngressBackend};
use kube::ResourceExt;
use tracing::debug;

/// Builds application records, resolving placement through the cluster
pub struct ApplicationProfiler<'a, R: ?Sized> {
    reader: &'a R,
    locator: WorkloadLocator<'a, R>,
}

impl<'a, R: ClusterReader + ?Sized> ApplicationProfiler<'a, R> {
    pub fn new(reader: &'a R) -> Self {
        Self {
            reader,
            locator: WorkloadLocator::new(reader),
        }
    }

    /// Profile one ingress. Never fails; unresolved placement is `None`.
    pub async fn profile(&self, ingress: &Ingress) -> ApplicationRecord {
        let name = ingress.name_any();
        let namespace = ingress.namespace().unwrap_or_default();
        let spec = ingress.spec.as_ref();

        let backend = first_backend(ingress);
        let placement = self.resolve_placement(&namespace, &backend).await;
        if let Placement::Unknown(reason) = &placement {
            debug!(
                event = "placement_unknown",
                ingress = %name,
                namespace = %namespace,
                reason = %reason,
                "Hosting node unresolved"
            );
        }

        ApplicationRecord {
            hostnames: hostnames(ingress),
            backend,
            hosted_on: placement.node_name(),
            ingress_class: spec
                .and_then(|s| s.ingress_class_name.clone())
                .unwrap_or_else(|| DEFAULT_INGRESS_CLASS.to_string()),
            annotations: ingress.annotations().clone(),
            labels: ingress.labels().clone(),
            name,
            namespace,
        }
    }

    async fn resolve_placement(&self, namespace: &str, backend: &BackendRef) -> Placement {
        let Some(service_name) = backend.service_name() else {
            return Placement::Unknown(UnknownReason::NoServiceBackend);
        };

        let service = match self.reader.get_service(namespace, service_name).await {
            Ok(service) => service,
            Err(e) if e.is_not_found() => {
                return Placement::Unknown(UnknownReason::ServiceNotFound);
            }
            Err(e) => {
                debug!(namespace = %namespace, service = %service_name, error = %e, "Service lookup failed");
                return Placement::Unknown(UnknownReason::ServiceLookupFailed);
            }
        };

        let selector = service
            .spec
            .and_then(|spec| spec.selector)
            .map(Selector::new);
        self.locator.locate(namespace, selector.as_ref()).await
    }
}

/// Every declared rule host in rule order, skipping rules without one
pub fn hostnames(ingress: &Ingress) -> Vec<String> {
    ingress
        .spec
        .as_ref()
        .and_then(|s| s.rules.as_ref())
        .map(|rules| {
            rules
                .iter()
                .filter_map(|rule| rule.host.as_deref())
                .filter(|host| !host.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Backend of the first path of the first rule.
///
/// Later rules and paths are not consulted for placement.
pub fn first_backend(ingress: &Ingress) -> BackendRef {
    ingress
        .spec
        .as_ref()
        .and_then(|s| s.rules.as_ref())
        .and_then(|rules| rules.first())
        .and_then(|rule| rule.http.as_ref())
        .and_then(|http| http.paths.first())
        .map(|path| backend_ref(&path.backend))
        .unwrap_or(BackendRef::Absent)
}

fn backend_ref(backend: &IngressBackend) -> BackendRef {
    if let Some(service) = &backend.service {
        let port = service.port.as_ref().and_then(|p| {
            p.number
                .map(|n| n.to_string())
                .or_else(|| p.name.clone())
        });
        return BackendRef::Service {
            name: service.name.clone(),
            port,
        };
    }
    if let Some(resource) = &backend.resource {
        return BackendRef::Resource {
            kind: resource.kind.clone(),
            name: resource.name.clone(),
        };
    }
    BackendRef::Absent
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::fake::FakeCluster;
    use serde_json::{json, Value};

    fn ingress(value: Value) -> Ingress {
        serde_json::from_value(value).unwrap()
    }

    fn shop_ingress() -> Value {
        json!({
            "metadata": {
                "name": "shop",
                "namespace": "prod",
                "annotations": {
                    "cert-manager.io/cluster-issuer": "letsencrypt",
                    "nginx.ingress.kubernetes.io/ssl-redirect": "true"
                }
            },
            "spec": {
                "ingressClassName": "nginx",
                "rules": [{
                    "host": "shop.example.com",
                    "http": {"paths": [{
                        "path": "/",
                        "pathType": "Prefix",
                        "backend": {"service": {"name": "shop-svc", "port": {"number": 80}}}
                    }]}
                }]
            }
        })
    }

    fn shop_cluster() -> FakeCluster {
        FakeCluster::new()
            .with_service(json!({
                "metadata": {"name": "shop-svc", "namespace": "prod"},
                "spec": {"selector": {"app": "shop"}}
            }))
            .with_pod(json!({
                "metadata": {"name": "shop-7d9f", "namespace": "prod", "labels": {"app": "shop"}},
                "spec": {"containers": [], "nodeName": "web-01"}
            }))
    }

    #[tokio::test]
    async fn test_profile_resolves_hosting_node() {
        let cluster = shop_cluster();
        let profiler = ApplicationProfiler::new(&cluster);

        let app = profiler.profile(&ingress(shop_ingress())).await;

        assert_eq!(app.name, "shop");
        assert_eq!(app.namespace, "prod");
        assert_eq!(app.hostnames, vec!["shop.example.com"]);
        assert_eq!(app.service_name(), Some("shop-svc"));
        assert_eq!(
            app.backend,
            BackendRef::Service {
                name: "shop-svc".to_string(),
                port: Some("80".to_string())
            }
        );
        assert_eq!(app.hosted_on.as_deref(), Some("web-01"));
        assert_eq!(app.ingress_class, "nginx");
        assert_eq!(app.annotations.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_service_leaves_host_unknown() {
        let cluster = FakeCluster::new();
        let profiler = ApplicationProfiler::new(&cluster);

        let app = profiler.profile(&ingress(shop_ingress())).await;

        assert_eq!(app.hosted_on, None);
        assert_eq!(app.service_name(), Some("shop-svc"));
        assert_eq!(cluster.service_calls(), 1);
        assert_eq!(cluster.pod_calls(), 0);
    }

    #[tokio::test]
    async fn test_service_lookup_failure_leaves_host_unknown() {
        let mut cluster = shop_cluster();
        cluster.fail_services = true;
        let profiler = ApplicationProfiler::new(&cluster);

        let app = profiler.profile(&ingress(shop_ingress())).await;
        assert_eq!(app.hosted_on, None);
    }

    #[tokio::test]
    async fn test_selectorless_service_issues_no_pod_call() {
        let cluster = FakeCluster::new()
            .with_service(json!({
                "metadata": {"name": "shop-svc", "namespace": "prod"},
                "spec": {"type": "ExternalName", "externalName": "shop.internal"}
            }))
            .with_service(json!({
                "metadata": {"name": "empty-svc", "namespace": "prod"},
                "spec": {"selector": {}}
            }));
        let profiler = ApplicationProfiler::new(&cluster);

        let app = profiler.profile(&ingress(shop_ingress())).await;
        assert_eq!(app.hosted_on, None);

        let mut empty = shop_ingress();
        empty["spec"]["rules"][0]["http"]["paths"][0]["backend"]["service"]["name"] =
            json!("empty-svc");
        let app = profiler.profile(&ingress(empty)).await;
        assert_eq!(app.hosted_on, None);

        assert_eq!(cluster.pod_calls(), 0);
    }

    #[tokio::test]
    async fn test_multiple_hosts_keep_rule_order() {
        let cluster = FakeCluster::new();
        let profiler = ApplicationProfiler::new(&cluster);

        let app = profiler
            .profile(&ingress(json!({
                "metadata": {"name": "docs", "namespace": "web"},
                "spec": {"rules": [
                    {"host": "a.example.com"},
                    {"http": {"paths": []}},
                    {"host": ""},
                    {"host": "b.example.com"}
                ]}
            })))
            .await;

        assert_eq!(app.primary_host(), Some("a.example.com"));
        assert_eq!(app.additional_hosts(), ["b.example.com"]);
        assert_eq!(app.backend, BackendRef::Absent);
        assert_eq!(app.ingress_class, "default");
        assert!(app.annotations.is_empty());
        assert_eq!(cluster.service_calls(), 0);
    }

    #[tokio::test]
    async fn test_only_first_rule_and_path_are_consulted() {
        let cluster = shop_cluster();
        let profiler = ApplicationProfiler::new(&cluster);

        let app = profiler
            .profile(&ingress(json!({
                "metadata": {"name": "mixed", "namespace": "prod"},
                "spec": {"rules": [
                    {"host": "static.example.com", "http": {"paths": [
                        {"path": "/", "pathType": "Prefix", "backend": {
                            "resource": {"apiGroup": "k8s.example.com", "kind": "StorageBucket", "name": "assets"}
                        }},
                        {"path": "/api", "pathType": "Prefix", "backend": {
                            "service": {"name": "shop-svc", "port": {"number": 80}}
                        }}
                    ]}},
                    {"host": "shop.example.com", "http": {"paths": [
                        {"path": "/", "pathType": "Prefix", "backend": {
                            "service": {"name": "shop-svc", "port": {"name": "http"}}
                        }}
                    ]}}
                ]}
            })))
            .await;

        assert_eq!(
            app.backend,
            BackendRef::Resource {
                kind: "StorageBucket".to_string(),
                name: "assets".to_string()
            }
        );
        assert_eq!(app.hosted_on, None);
        assert_eq!(app.hostnames, vec!["static.example.com", "shop.example.com"]);
        assert_eq!(cluster.service_calls(), 0);
    }

    #[test]
    fn test_named_port_backend() {
        let ing = ingress(json!({
            "metadata": {"name": "api", "namespace": "prod"},
            "spec": {"rules": [{"http": {"paths": [{
                "pathType": "ImplementationSpecific",
                "backend": {"service": {"name": "api-svc", "port": {"name": "grpc"}}}
            }]}}]}
        }));

        assert_eq!(
            first_backend(&ing),
            BackendRef::Service {
                name: "api-svc".to_string(),
                port: Some("grpc".to_string())
            }
        );
        assert!(hostnames(&ing).is_empty());
    }
}
