//! ModelGate Models
//!
//! Plugin discovery and the uniform calling layer in front of every model.
//!
//! - [`Model`] is the capability contract a plugin implements
//! - [`ModelWrapper`] normalizes calls and not-implemented errors
//! - [`ModelRegistry`] discovers plugins once and maps names to wrappers
//! - [`PlaceholderModel`] is served when no plugin could be loaded

pub mod config;
pub mod discovery;
pub mod model;
pub mod placeholder;
pub mod plugin;
pub mod registry;
pub mod wrapper;

pub use config::DiscoveryConfig;
pub use discovery::{ModelDiscovery, PluginDiscovery};
pub use model::{Capabilities, Model};
pub use placeholder::{PlaceholderModel, PLACEHOLDER_MODEL_NAME};
pub use plugin::{ModelProvider, StaticProvider};
pub use registry::{ModelMap, ModelRegistry, RegistryBuilder};
pub use wrapper::ModelWrapper;

/// Prelude for plugin authors
pub mod prelude {
    pub use crate::model::{Capabilities, Model};
    pub use crate::plugin::ModelProvider;
    pub use modelgate_core::prelude::*;
}
