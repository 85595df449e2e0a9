//! Plugin discovery

use crate::config::DiscoveryConfig;
use crate::model::Model;
use crate::plugin::ModelProvider;
use async_trait::async_trait;
use modelgate_core::{Error, Result};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Source of the models available to the registry
#[async_trait]
pub trait ModelDiscovery: Send + Sync {
    /// Load every available model, keyed by name.
    ///
    /// Discovery is all-or-nothing: an error means no model is usable.
    async fn discover(&self) -> Result<Vec<(String, Arc<dyn Model>)>>;
}

/// Discovers models from the providers compiled into the binary
#[derive(Default)]
pub struct PluginDiscovery {
    providers: Vec<Arc<dyn ModelProvider>>,

    /// Enabled plugin names, `None` enables all of them
    selection: Option<Vec<String>>,
}

impl PluginDiscovery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a discovery honoring the configured plugin selection
    pub fn from_config(config: &DiscoveryConfig) -> Self {
        Self {
            providers: Vec::new(),
            selection: config.enabled.clone(),
        }
    }

    /// Register a provider
    pub fn with_provider(mut self, provider: Arc<dyn ModelProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Restrict discovery to the named plugins
    pub fn select<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selection = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Names of all registered providers
    pub fn provider_names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    /// Providers that pass the selection, first registration wins on
    /// duplicate names
    fn selected(&self) -> Vec<&Arc<dyn ModelProvider>> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();

        for provider in &self.providers {
            let name = provider.name();
            if !seen.insert(name.to_string()) {
                warn!("Duplicate model plugin '{}' ignored", name);
                continue;
            }
            if let Some(selection) = &self.selection {
                if !selection.iter().any(|s| s == name) {
                    debug!("Model plugin '{}' not selected", name);
                    continue;
                }
            }
            out.push(provider);
        }

        if let Some(selection) = &self.selection {
            for name in selection {
                if !seen.contains(name) {
                    warn!("Selected model plugin '{}' is not installed", name);
                }
            }
        }

        out
    }
}

#[async_trait]
impl ModelDiscovery for PluginDiscovery {
    async fn discover(&self) -> Result<Vec<(String, Arc<dyn Model>)>> {
        let selected = self.selected();
        info!("Loading {} model plugins", selected.len());

        let mut models = Vec::with_capacity(selected.len());
        for provider in selected {
            let name = provider.name().to_string();
            let model = provider.load().await.map_err(|e| {
                Error::discovery(format!("failed to load model plugin '{}': {}", name, e))
            })?;
            info!("Loaded model plugin: {}", name);
            models.push((name, model));
        }

        Ok(models)
    }
}
