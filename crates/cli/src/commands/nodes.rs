//! Node listing

use anyhow::Result;
use inventory_lib::profiler::profile_node;
use inventory_lib::{ClusterReader, NodeRecord};
use tabled::Tabled;

use crate::output::{color_readiness, or_dimmed, print_records, OutputFormat};

/// Row for nodes table
#[derive(Tabled)]
struct NodeRow {
    #[tabled(rename = "Hostname")]
    hostname: String,
    #[tabled(rename = "Internal IP")]
    ip: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "CPU")]
    cpu: String,
    #[tabled(rename = "Memory")]
    memory: String,
    #[tabled(rename = "OS")]
    os: String,
    #[tabled(rename = "Kernel")]
    kernel: String,
}

impl From<&NodeRecord> for NodeRow {
    fn from(node: &NodeRecord) -> Self {
        Self {
            hostname: node.hostname.clone(),
            ip: or_dimmed(node.internal_ip.as_deref()),
            status: color_readiness(node.readiness),
            cpu: or_dimmed(node.cpu_capacity.as_deref()),
            memory: or_dimmed(node.memory_capacity.as_deref()),
            os: or_dimmed(node.os_image.as_deref()),
            kernel: or_dimmed(node.kernel_version.as_deref()),
        }
    }
}

/// Profile every node and print the records
pub async fn list_nodes(reader: &dyn ClusterReader, format: OutputFormat) -> Result<()> {
    let nodes = reader.list_nodes().await?;
    let records: Vec<NodeRecord> = nodes.iter().map(profile_node).collect();
    let rows = records.iter().map(NodeRow::from).collect();

    print_records(rows, &records, format);
    Ok(())
}
