//! Model discovery configuration

use serde::{Deserialize, Serialize};

/// Which installed model plugins to expose
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Plugin names to enable. Absent means every installed plugin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<Vec<String>>,
}

impl DiscoveryConfig {
    /// Enable only the named plugins
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            enabled: Some(names.into_iter().map(Into::into).collect()),
        }
    }
}
