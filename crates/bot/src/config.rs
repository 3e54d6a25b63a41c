//! Bot configuration

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

const ENV_PREFIX: &str = "INVENTORY";

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

/// Bot configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Root of the generated document tree
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Explicit kubeconfig; in-cluster or local config is used when unset
    #[serde(default = "default_kubeconfig_path")]
    pub kubeconfig_path: Option<PathBuf>,

    /// Prometheus textfile written after the scan
    #[serde(default)]
    pub metrics_file: Option<PathBuf>,

    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_output_dir() -> PathBuf {
    std::env::var("OUTPUT_DIR")
        .unwrap_or_else(|_| "/workspace/docs".to_string())
        .into()
}

fn default_kubeconfig_path() -> Option<PathBuf> {
    std::env::var("KUBECONFIG_PATH")
        .ok()
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
}

impl BotConfig {
    /// Load configuration from `INVENTORY_*` environment variables
    pub fn load() -> Result<Self> {
        Self::from_env(None)
    }

    /// Load from an explicit variable map instead of the process environment
    pub fn from_env(vars: Option<config::Map<String, String>>) -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix(ENV_PREFIX).source(vars))
            .build()
            .context("Failed to read configuration")?;

        let config: BotConfig = config
            .try_deserialize()
            .context("Invalid configuration")?;
        config.validate()
    }

    fn validate(mut self) -> Result<Self> {
        if self.output_dir.as_os_str().is_empty() {
            bail!("output directory must not be empty");
        }
        if let Some(path) = &self.kubeconfig_path {
            if !path.exists() {
                bail!("kubeconfig {} does not exist", path.display());
            }
        }
        self.metrics_file = self
            .metrics_file
            .filter(|path| !path.as_os_str().is_empty());
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn vars(pairs: &[(&str, &str)]) -> config::Map<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_explicit_values() {
        let temp_dir = TempDir::new().unwrap();
        let kubeconfig = temp_dir.path().join("kubeconfig");
        std::fs::write(&kubeconfig, "apiVersion: v1\n").unwrap();

        let config = BotConfig::from_env(Some(vars(&[
            ("INVENTORY_OUTPUT_DIR", "/srv/vault"),
            ("INVENTORY_KUBECONFIG_PATH", kubeconfig.to_str().unwrap()),
            ("INVENTORY_METRICS_FILE", "/var/lib/node_exporter/inventory.prom"),
            ("INVENTORY_LOG_FORMAT", "pretty"),
        ])))
        .unwrap();

        assert_eq!(config.output_dir, PathBuf::from("/srv/vault"));
        assert_eq!(config.kubeconfig_path, Some(kubeconfig));
        assert_eq!(
            config.metrics_file,
            Some(PathBuf::from("/var/lib/node_exporter/inventory.prom"))
        );
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_defaults() {
        let config = BotConfig::from_env(Some(vars(&[]))).unwrap();

        assert!(!config.output_dir.as_os_str().is_empty());
        assert_eq!(config.metrics_file, None);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_missing_kubeconfig_is_rejected() {
        let result = BotConfig::from_env(Some(vars(&[(
            "INVENTORY_KUBECONFIG_PATH",
            "/nonexistent/kubeconfig",
        )])));
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_log_format_is_rejected() {
        let result = BotConfig::from_env(Some(vars(&[("INVENTORY_LOG_FORMAT", "xml")])));
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_metrics_file_is_unset() {
        let config =
            BotConfig::from_env(Some(vars(&[("INVENTORY_METRICS_FILE", "")]))).unwrap();
        assert_eq!(config.metrics_file, None);
    }
}
