//! Model registry initialization and management

use crate::discovery::{ModelDiscovery, PluginDiscovery};
use crate::placeholder::{PlaceholderModel, PLACEHOLDER_MODEL_NAME};
use crate::plugin::ModelProvider;
use crate::wrapper::ModelWrapper;
use crate::DiscoveryConfig;
use modelgate_core::{Error, Result};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{info, warn};

/// Loaded models keyed by name
pub type ModelMap = BTreeMap<String, Arc<ModelWrapper>>;

/// Registry of the models exposed by the service.
///
/// The registry is populated lazily, at most once, from its discovery
/// source. If discovery fails or finds nothing, the placeholder model is
/// registered instead so the registry is never empty once populated.
pub struct ModelRegistry {
    discovery: Arc<dyn ModelDiscovery>,
    models: OnceCell<ModelMap>,
}

impl ModelRegistry {
    /// Create an unpopulated registry backed by `discovery`
    pub fn new(discovery: Arc<dyn ModelDiscovery>) -> Self {
        Self {
            discovery,
            models: OnceCell::new(),
        }
    }

    /// Populate the registry, running discovery on the first call only
    pub async fn register_models(&self) -> &ModelMap {
        self.models
            .get_or_init(|| load_models(self.discovery.as_ref()))
            .await
    }

    /// Whether discovery already ran
    pub fn is_loaded(&self) -> bool {
        self.models.initialized()
    }

    /// Get a model by name
    pub async fn get(&self, name: &str) -> Result<Arc<ModelWrapper>> {
        self.register_models()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| Error::model_not_found(name))
    }

    /// Names of the loaded models, in order
    pub async fn names(&self) -> Vec<String> {
        self.register_models().await.keys().cloned().collect()
    }

    /// Loaded models, ordered by name
    pub async fn wrappers(&self) -> Vec<Arc<ModelWrapper>> {
        self.register_models().await.values().cloned().collect()
    }

    /// Number of loaded models
    pub async fn count(&self) -> usize {
        self.register_models().await.len()
    }
}

async fn load_models(discovery: &dyn ModelDiscovery) -> ModelMap {
    let mut models = ModelMap::new();

    match discovery.discover().await {
        Ok(found) => {
            for (name, model) in found {
                models.insert(name.clone(), Arc::new(ModelWrapper::new(name, model)));
            }
        }
        Err(e) => {
            warn!("Error loading models: {}", e);
        }
    }

    if models.is_empty() {
        info!("No models found, loading placeholder model");
        models.insert(
            PLACEHOLDER_MODEL_NAME.to_string(),
            Arc::new(ModelWrapper::new(
                PLACEHOLDER_MODEL_NAME,
                Arc::new(PlaceholderModel::new()),
            )),
        );
    }

    info!("Model registry initialized with {} models", models.len());
    models
}

/// Builder for a plugin-backed model registry
#[derive(Default)]
pub struct RegistryBuilder {
    config: DiscoveryConfig,
    providers: Vec<Arc<dyn ModelProvider>>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply discovery configuration
    pub fn with_config(mut self, config: DiscoveryConfig) -> Self {
        self.config = config;
        self
    }

    /// Register a compiled-in plugin
    pub fn with_provider(mut self, provider: Arc<dyn ModelProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Build the registry. Models are loaded on first use.
    pub fn build(self) -> ModelRegistry {
        let discovery = self
            .providers
            .into_iter()
            .fold(PluginDiscovery::from_config(&self.config), |d, p| {
                d.with_provider(p)
            });

        ModelRegistry::new(Arc::new(discovery))
    }
}
