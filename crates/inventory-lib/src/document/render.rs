//! Hardware and application page layouts

use super::{wiki_link, Document, DocumentError, DocumentKind};
use crate::models::{or_not_available, ApplicationRecord, BackendRef, NodeRecord, NOT_AVAILABLE};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Serialize)]
struct HardwareHeader<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    hostname: &'a str,
    ip: &'a str,
    status: &'static str,
    cpu_cores: &'a str,
    memory: &'a str,
    os: &'a str,
    kernel: &'a str,
    updated: &'a str,
}

#[derive(Serialize)]
struct ApplicationHeader<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    name: &'a str,
    namespace: &'a str,
    url: &'a str,
    hosted_on: &'a str,
    updated: &'a str,
}

/// Render `Hardware/<hostname>.md`
pub fn hardware_document(node: &NodeRecord, updated: &str) -> Result<Document, DocumentError> {
    let ip = or_not_available(&node.internal_ip);
    let os = or_not_available(&node.os_image);
    let kernel = or_not_available(&node.kernel_version);
    let runtime = or_not_available(&node.container_runtime);
    let cpu = or_not_available(&node.cpu_capacity);
    let memory = or_not_available(&node.memory_capacity);
    let status = node.readiness.as_str();

    let header = HardwareHeader {
        kind: DocumentKind::Hardware.as_str(),
        hostname: &node.hostname,
        ip,
        status,
        cpu_cores: cpu,
        memory,
        os,
        kernel,
        updated,
    };

    let mut body = format!("# {}\n\n", node.hostname);
    body.push_str(&format!("**Physical Server:** `{}`\n\n", node.hostname));
    body.push_str("## System Information\n\n");
    body.push_str(&format!("- **Internal IP:** {}\n", ip));
    body.push_str(&format!("- **Status:** {}\n", status));
    body.push_str(&format!("- **OS:** {}\n", os));
    body.push_str(&format!("- **Kernel:** {}\n", kernel));
    body.push_str(&format!("- **Container Runtime:** {}\n\n", runtime));
    body.push_str("## Resources\n\n");
    body.push_str(&format!("- **CPU Cores:** {}\n", cpu));
    body.push_str(&format!("- **Memory:** {}\n\n", memory));
    body.push_str("## Labels\n\n");
    push_map(&mut body, &node.labels);

    Document::new(DocumentKind::Hardware, node.hostname.as_str(), &header, body)
}

/// Render `Applications/<document_name>.md`
pub fn application_document(
    app: &ApplicationRecord,
    document_name: &str,
    updated: &str,
) -> Result<Document, DocumentError> {
    let header = ApplicationHeader {
        kind: DocumentKind::Application.as_str(),
        name: &app.name,
        namespace: &app.namespace,
        url: app.primary_host().unwrap_or(NOT_AVAILABLE),
        hosted_on: or_not_available(&app.hosted_on),
        updated,
    };

    let mut body = format!("# {}\n\n", app.name);
    body.push_str(&format!(
        "**Application deployed in namespace:** `{}`\n\n",
        app.namespace
    ));
    body.push_str("## Access\n\n");

    if let Some(primary) = app.primary_host() {
        body.push_str(&format!("**Primary URL:** {}\n\n", host_link(primary)));
        let additional = app.additional_hosts();
        if !additional.is_empty() {
            body.push_str("**Additional URLs:**\n");
            for host in additional {
                body.push_str(&format!("- {}\n", host_link(host)));
            }
            body.push('\n');
        }
    }

    body.push_str("## Infrastructure\n\n");
    body.push_str(&format!("- **Namespace:** `{}`\n", app.namespace));
    match &app.hosted_on {
        Some(node) => body.push_str(&format!("- **Hosted On:** {}\n", wiki_link(node))),
        None => body.push_str("- **Hosted On:** Unknown\n"),
    }
    match &app.backend {
        BackendRef::Service { name, .. } => {
            body.push_str(&format!("- **Service:** `{}`\n", name));
        }
        BackendRef::Resource { kind, name } => {
            body.push_str(&format!("- **Backend Resource:** `{}/{}`\n", kind, name));
        }
        BackendRef::Absent => {}
    }

    body.push_str("\n## Ingress Configuration\n\n");
    body.push_str(&format!("- **Ingress Name:** `{}`\n", app.name));
    body.push_str(&format!("- **Ingress Class:** {}\n", app.ingress_class));

    if !app.annotations.is_empty() {
        body.push_str("\n### Annotations\n\n");
        push_map(&mut body, &app.annotations);
    }
    if !app.labels.is_empty() {
        body.push_str("\n### Labels\n\n");
        push_map(&mut body, &app.labels);
    }

    Document::new(DocumentKind::Application, document_name, &header, body)
}

fn host_link(host: &str) -> String {
    format!("[{}](https://{})", host, host)
}

fn push_map(body: &mut String, entries: &BTreeMap<String, String>) {
    for (key, value) in entries {
        body.push_str(&format!("- `{}`: {}\n", key, value));
    }
}
