//! Application document names
//!
//! Ingress names are only unique per namespace. A name that occurs in more
//! than one namespace is qualified as `<namespace>__<name>` for every
//! ingress carrying it; `_` never appears in Kubernetes object names.

use k8s_openapi::api::networking::v1::Ingress;
use kube::ResourceExt;
use std::collections::{BTreeMap, BTreeSet};

const SEPARATOR: &str = "__";

#[derive(Debug, Default)]
pub struct ApplicationNames {
    shared: BTreeSet<String>,
}

impl ApplicationNames {
    pub fn from_ingresses(ingresses: &[Ingress]) -> Self {
        let mut namespaces: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for ingress in ingresses {
            namespaces
                .entry(ingress.name_any())
                .or_default()
                .insert(ingress.namespace().unwrap_or_default());
        }

        let shared = namespaces
            .into_iter()
            .filter(|(_, ns)| ns.len() > 1)
            .map(|(name, _)| name)
            .collect();
        Self { shared }
    }

    pub fn document_name(&self, namespace: &str, name: &str) -> String {
        if self.shared.contains(name) {
            format!("{}{}{}", namespace, SEPARATOR, name)
        } else {
            name.to_string()
        }
    }
}
