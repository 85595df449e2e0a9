//! Server configuration

use modelgate_models::DiscoveryConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::cli::Cli;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Model plugin selection
    #[serde(default)]
    pub models: DiscoveryConfig,

    /// Largest accepted request body in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Timeout for plugins fetching remote inputs, in seconds
    #[serde(default = "default_download_timeout")]
    pub download_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(config_path: &str, cli: &Cli) -> anyhow::Result<Self> {
        // Try to load from file, or use defaults
        let mut config = if Path::new(config_path).exists() {
            let content = std::fs::read_to_string(config_path)?;
            serde_yaml::from_str(&content)?
        } else {
            Self::default()
        };

        // Apply CLI overrides
        if let Some(listen) = &cli.listen {
            config.listen = listen.clone();
        }

        if let Some(port) = cli.port {
            config.port = port;
        }

        if !cli.models.is_empty() {
            config.models = DiscoveryConfig::only(cli.models.iter().cloned());
        }

        Ok(config)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            port: default_port(),
            models: DiscoveryConfig::default(),
            max_body_bytes: default_max_body_bytes(),
            download_timeout_secs: default_download_timeout(),
        }
    }
}

fn default_listen() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_max_body_bytes() -> usize {
    16 * 1024 * 1024
}

fn default_download_timeout() -> u64 {
    30
}
