//! Extension points for model plugins.

use crate::model::Model;
use async_trait::async_trait;
use modelgate_core::Result;
use std::sync::Arc;

/// A model plugin compiled into the service.
///
/// Implement this trait in external crates to ship a model without coupling
/// the core crates to its dependencies. The service hands its providers to a
/// [`PluginDiscovery`](crate::PluginDiscovery), which loads them when the
/// registry is first populated.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Name the model is registered under
    fn name(&self) -> &str;

    /// Build the model instance
    async fn load(&self) -> Result<Arc<dyn Model>>;
}

/// Provider that hands out an already constructed model
pub struct StaticProvider {
    name: String,
    model: Arc<dyn Model>,
}

impl StaticProvider {
    pub fn new(name: impl Into<String>, model: Arc<dyn Model>) -> Self {
        Self {
            name: name.into(),
            model,
        }
    }
}

#[async_trait]
impl ModelProvider for StaticProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn load(&self) -> Result<Arc<dyn Model>> {
        Ok(Arc::clone(&self.model))
    }
}
