//! Node profiling

use crate::models::{NodeRecord, Readiness};
use k8s_openapi::api::core::v1::{Node, NodeCondition};
use kube::ResourceExt;

const READY_CONDITION: &str = "Ready";
const INTERNAL_IP: &str = "InternalIP";

/// Normalize a raw node. Missing optional fields degrade to `None`.
pub fn profile_node(node: &Node) -> NodeRecord {
    let status = node.status.as_ref();
    let info = status.and_then(|s| s.node_info.as_ref());
    let capacity = status.and_then(|s| s.capacity.as_ref());

    let internal_ip = status
        .and_then(|s| s.addresses.as_ref())
        .and_then(|addrs| addrs.iter().find(|a| a.type_ == INTERNAL_IP))
        .map(|a| a.address.clone());

    let readiness = readiness(status.and_then(|s| s.conditions.as_deref()).unwrap_or_default());

    NodeRecord {
        hostname: node.name_any(),
        internal_ip,
        readiness,
        os_image: info.and_then(|i| non_empty(&i.os_image)),
        kernel_version: info.and_then(|i| non_empty(&i.kernel_version)),
        container_runtime: info.and_then(|i| non_empty(&i.container_runtime_version)),
        cpu_capacity: capacity.and_then(|c| c.get("cpu")).map(|q| q.0.clone()),
        memory_capacity: capacity.and_then(|c| c.get("memory")).map(|q| q.0.clone()),
        labels: node.labels().clone(),
    }
}

/// Readiness from the first `Ready` condition; only an exact `True` is ready
pub fn readiness(conditions: &[NodeCondition]) -> Readiness {
    match conditions.iter().find(|c| c.type_ == READY_CONDITION) {
        Some(c) if c.status == "True" => Readiness::Ready,
        Some(_) => Readiness::NotReady,
        None => Readiness::Unknown,
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(value: serde_json::Value) -> Node {
        serde_json::from_value(value).unwrap()
    }

    fn web_01() -> Node {
        node(json!({
            "metadata": {
                "name": "web-01",
                "labels": {
                    "kubernetes.io/hostname": "web-01",
                    "node-role.kubernetes.io/worker": ""
                }
            },
            "status": {
                "addresses": [
                    {"type": "Hostname", "address": "web-01"},
                    {"type": "InternalIP", "address": "10.0.0.5"},
                    {"type": "InternalIP", "address": "10.0.0.6"}
                ],
                "conditions": [
                    {"type": "MemoryPressure", "status": "False"},
                    {"type": "Ready", "status": "True"}
                ],
                "capacity": {"cpu": "4", "memory": "16318208Ki"},
                "nodeInfo": {
                    "architecture": "amd64",
                    "bootID": "",
                    "containerRuntimeVersion": "containerd://1.7.11",
                    "kernelVersion": "6.1.0-18-amd64",
                    "kubeProxyVersion": "v1.28.5",
                    "kubeletVersion": "v1.28.5",
                    "machineID": "",
                    "operatingSystem": "linux",
                    "osImage": "Debian GNU/Linux 12 (bookworm)",
                    "systemUUID": ""
                }
            }
        }))
    }

    fn condition(type_: &str, status: &str) -> NodeCondition {
        NodeCondition {
            type_: type_.to_string(),
            status: status.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_profile_ready_node() {
        let record = profile_node(&web_01());

        assert_eq!(record.hostname, "web-01");
        assert_eq!(record.internal_ip.as_deref(), Some("10.0.0.5"));
        assert_eq!(record.readiness, Readiness::Ready);
        assert_eq!(record.os_image.as_deref(), Some("Debian GNU/Linux 12 (bookworm)"));
        assert_eq!(record.kernel_version.as_deref(), Some("6.1.0-18-amd64"));
        assert_eq!(record.container_runtime.as_deref(), Some("containerd://1.7.11"));
        assert_eq!(record.cpu_capacity.as_deref(), Some("4"));
        assert_eq!(record.memory_capacity.as_deref(), Some("16318208Ki"));
        assert_eq!(record.labels.len(), 2);
    }

    #[test]
    fn test_readiness_variants() {
        assert_eq!(readiness(&[condition("Ready", "True")]), Readiness::Ready);
        assert_eq!(readiness(&[condition("Ready", "False")]), Readiness::NotReady);
        assert_eq!(readiness(&[condition("Ready", "Unknown")]), Readiness::NotReady);
        assert_eq!(readiness(&[condition("Ready", "true")]), Readiness::NotReady);
        assert_eq!(readiness(&[condition("DiskPressure", "True")]), Readiness::Unknown);
        assert_eq!(readiness(&[]), Readiness::Unknown);
    }

    #[test]
    fn test_first_ready_condition_wins() {
        let conditions = [condition("Ready", "False"), condition("Ready", "True")];
        assert_eq!(readiness(&conditions), Readiness::NotReady);
    }

    #[test]
    fn test_missing_internal_ip() {
        let record = profile_node(&node(json!({
            "metadata": {"name": "edge-02"},
            "status": {
                "addresses": [
                    {"type": "Hostname", "address": "edge-02"},
                    {"type": "ExternalIP", "address": "203.0.113.9"}
                ]
            }
        })));

        assert_eq!(record.internal_ip, None);
        assert_eq!(crate::models::or_not_available(&record.internal_ip), "N/A");
    }

    #[test]
    fn test_bare_node_degrades_to_sentinels() {
        let record = profile_node(&node(json!({"metadata": {"name": "bare"}})));

        assert_eq!(record.hostname, "bare");
        assert_eq!(record.internal_ip, None);
        assert_eq!(record.readiness, Readiness::Unknown);
        assert_eq!(record.os_image, None);
        assert_eq!(record.kernel_version, None);
        assert_eq!(record.container_runtime, None);
        assert_eq!(record.cpu_capacity, None);
        assert_eq!(record.memory_capacity, None);
        assert!(record.labels.is_empty());
    }
}
