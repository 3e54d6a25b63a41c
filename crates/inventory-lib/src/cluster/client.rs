//! `kube`-backed cluster reader and connection setup

use super::{ClusterReader, ReadError, Selector};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Node, Pod, Service};
use k8s_openapi::api::networking::v1::Ingress;
use kube::api::ListParams;
use kube::config::{InClusterError, KubeConfigOptions, Kubeconfig, KubeconfigError};
use kube::{Api, Client, Config};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Failure to establish a usable control-plane connection
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("failed to load kubeconfig from {path}: {source}")]
    Kubeconfig {
        path: PathBuf,
        #[source]
        source: KubeconfigError,
    },

    #[error("no in-cluster configuration ({in_cluster}) and no local kubeconfig ({local})")]
    NoConfiguration {
        in_cluster: InClusterError,
        local: KubeconfigError,
    },

    #[error("failed to reach the API server: {0}")]
    Client(#[from] kube::Error),
}

/// Build a client and verify the API server answers.
///
/// With an explicit kubeconfig path only that file is used. Otherwise the
/// in-cluster service account is tried first, then the local kubeconfig.
pub async fn connect(kubeconfig: Option<&Path>) -> Result<KubeClusterReader, ConnectError> {
    let config = match kubeconfig {
        Some(path) => {
            let kubeconfig = Kubeconfig::read_from(path).map_err(|source| ConnectError::Kubeconfig {
                path: path.to_path_buf(),
                source,
            })?;
            let config = Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
                .await
                .map_err(|source| ConnectError::Kubeconfig {
                    path: path.to_path_buf(),
                    source,
                })?;
            info!(path = %path.display(), "Loaded kubeconfig");
            config
        }
        None => match Config::incluster() {
            Ok(config) => {
                info!("Loaded in-cluster configuration");
                config
            }
            Err(in_cluster) => {
                debug!(error = %in_cluster, "In-cluster configuration unavailable");
                let config = Config::from_kubeconfig(&KubeConfigOptions::default())
                    .await
                    .map_err(|local| ConnectError::NoConfiguration { in_cluster, local })?;
                info!("Loaded kubeconfig from local environment");
                config
            }
        },
    };

    let client = Client::try_from(config)?;
    let version = client.apiserver_version().await?;
    info!(server_version = %version.git_version, "Connected to API server");

    Ok(KubeClusterReader::new(client))
}

/// Production [`ClusterReader`] backed by a `kube::Client`
#[derive(Clone)]
pub struct KubeClusterReader {
    client: Client,
}

impl KubeClusterReader {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn unreachable(err: kube::Error) -> ReadError {
    ReadError::unreachable(err)
}

#[async_trait]
impl ClusterReader for KubeClusterReader {
    async fn list_nodes(&self) -> Result<Vec<Node>, ReadError> {
        let api: Api<Node> = Api::all(self.client.clone());
        let list = api.list(&ListParams::default()).await.map_err(unreachable)?;
        debug!(count = list.items.len(), "Listed nodes");
        Ok(list.items)
    }

    async fn list_ingresses(&self) -> Result<Vec<Ingress>, ReadError> {
        let api: Api<Ingress> = Api::all(self.client.clone());
        let list = api.list(&ListParams::default()).await.map_err(unreachable)?;
        debug!(count = list.items.len(), "Listed ingresses");
        Ok(list.items)
    }

    async fn list_pods_by_selector(
        &self,
        namespace: &str,
        selector: &Selector,
    ) -> Result<Vec<Pod>, ReadError> {
        let Some(query) = selector.to_query() else {
            return Ok(Vec::new());
        };

        let api: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let list = api
            .list(&ListParams::default().labels(&query))
            .await
            .map_err(unreachable)?;
        debug!(namespace = %namespace, selector = %query, count = list.items.len(), "Listed pods");
        Ok(list.items)
    }

    async fn get_service(&self, namespace: &str, name: &str) -> Result<Service, ReadError> {
        let api: Api<Service> = Api::namespaced(self.client.clone(), namespace);
        api.get(name).await.map_err(|err| match err {
            kube::Error::Api(ref response) if response.code == 404 => ReadError::NotFound {
                kind: "service",
                namespace: namespace.to_string(),
                name: name.to_string(),
            },
            other => unreachable(other),
        })
    }
}
