//! Shared application state

use metrics_exporter_prometheus::PrometheusHandle;
use modelgate_models::{ModelRegistry, RegistryBuilder};
use std::sync::Arc;
use tracing::info;

use crate::config::ServerConfig;

/// Application state shared across all requests
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<ServerConfig>,

    /// Registry of served models
    pub registry: Arc<ModelRegistry>,

    /// Prometheus metrics handle for rendering
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(config: ServerConfig, registry: ModelRegistry) -> Self {
        Self {
            config: Arc::new(config),
            registry: Arc::new(registry),
            metrics_handle: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }
}

/// Build the registry from the plugins compiled into this binary
pub fn build_registry(config: &ServerConfig) -> ModelRegistry {
    let builder = RegistryBuilder::new().with_config(config.models.clone());

    #[cfg(feature = "checksum-plugin")]
    let builder = builder.with_provider(Arc::new(
        modelgate_checksum_plugin::ChecksumProvider::new(std::time::Duration::from_secs(
            config.download_timeout_secs,
        )),
    ));

    info!("Model registry configured");
    builder.build()
}
