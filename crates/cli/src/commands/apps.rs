//! Application listing

use anyhow::Result;
use inventory_lib::profiler::ApplicationProfiler;
use inventory_lib::{ApplicationRecord, ClusterReader};
use tabled::Tabled;

use crate::output::{or_dimmed, print_records, OutputFormat};

/// Row for applications table
#[derive(Tabled)]
struct ApplicationRow {
    #[tabled(rename = "Namespace")]
    namespace: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "URL")]
    url: String,
    #[tabled(rename = "Service")]
    service: String,
    #[tabled(rename = "Hosted On")]
    hosted_on: String,
    #[tabled(rename = "Class")]
    class: String,
}

impl From<&ApplicationRecord> for ApplicationRow {
    fn from(app: &ApplicationRecord) -> Self {
        Self {
            namespace: app.namespace.clone(),
            name: app.name.clone(),
            url: or_dimmed(app.primary_host()),
            service: or_dimmed(app.service_name()),
            hosted_on: or_dimmed(app.hosted_on.as_deref()),
            class: app.ingress_class.clone(),
        }
    }
}

/// Profile every ingress (optionally one namespace) and print the records
pub async fn list_apps(
    reader: &dyn ClusterReader,
    namespace: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let ingresses = reader.list_ingresses().await?;
    let profiler = ApplicationProfiler::new(reader);

    let mut records = Vec::new();
    for ingress in &ingresses {
        if let Some(ns) = &namespace {
            if ingress.metadata.namespace.as_ref() != Some(ns) {
                continue;
            }
        }
        records.push(profiler.profile(ingress).await);
    }
    let rows = records.iter().map(ApplicationRow::from).collect();

    print_records(rows, &records, format);
    Ok(())
}
