//! Configuration management for the CLI

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// CLI configuration stored in `~/.config/invctl/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Default document output directory for `scan`
    pub output_dir: Option<String>,
}

impl Config {
    /// Load configuration from file, or defaults when there is none
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).context("Failed to read config file")?;

        serde_json::from_str(&content).context("Failed to parse config file")
    }

    /// Get the configuration file path
    fn config_path() -> Option<PathBuf> {
        dirs_next::home_dir().map(|home| home.join(".config").join("invctl").join("config.json"))
    }
}

/// Resolve the kubeconfig to use.
///
/// An explicit path (flag or `KUBECONFIG`, first entry only) wins, then
/// `~/.kube/config` if present. `None` lets the connection fall back to the
/// in-cluster service account.
pub fn kubeconfig_path(override_path: Option<&str>) -> Option<PathBuf> {
    if let Some(path) = override_path.filter(|p| !p.is_empty()) {
        return std::env::split_paths(path).next();
    }

    let default = dirs_next::home_dir()?.join(".kube").join("config");
    default.exists().then_some(default)
}
