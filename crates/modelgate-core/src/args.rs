//! Argument schemas published by models
//!
//! A model describes the extra parameters its training and prediction calls
//! accept as a map of argument name to [`ArgSpec`]. The API layer uses the
//! schema to document the parameters and to resolve incoming requests
//! before they reach the model.

use crate::error::{Error, Result};
use crate::types::Params;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Description of a single argument
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgSpec {
    /// Default value as a string. JSON-encoded values are decoded on use.
    ///
    /// An empty string means the argument has no default and is left out of
    /// resolved parameters. A default that really is the empty string is
    /// written JSON-encoded, as `"\"\""`.
    #[serde(default)]
    pub default: String,

    /// Human readable help, may be empty
    #[serde(default)]
    pub help: String,

    /// Whether the caller must provide the argument
    #[serde(default)]
    pub required: bool,
}

impl ArgSpec {
    pub fn new(default: impl Into<String>, help: impl Into<String>) -> Self {
        Self {
            default: default.into(),
            help: help.into(),
            required: false,
        }
    }

    /// A required argument without a default
    pub fn required(help: impl Into<String>) -> Self {
        Self {
            default: String::new(),
            help: help.into(),
            required: true,
        }
    }

    /// Decoded default value, `None` when no default is set
    pub fn default_value(&self) -> Option<serde_json::Value> {
        if self.default.is_empty() {
            return None;
        }

        Some(
            serde_json::from_str(&self.default)
                .unwrap_or_else(|_| serde_json::Value::String(self.default.clone())),
        )
    }
}

/// Map of argument name to its description
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArgSchema(BTreeMap<String, ArgSpec>);

impl ArgSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion
    pub fn with_arg(mut self, name: impl Into<String>, spec: ArgSpec) -> Self {
        self.0.insert(name.into(), spec);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, spec: ArgSpec) {
        self.0.insert(name.into(), spec);
    }

    pub fn get(&self, name: &str) -> Option<&ArgSpec> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ArgSpec)> {
        self.0.iter()
    }

    /// Apply the schema to request parameters.
    ///
    /// Missing required arguments are rejected, missing optional arguments
    /// receive their default and unknown parameters are passed through.
    pub fn resolve(&self, mut params: Params) -> Result<Params> {
        let missing: Vec<&str> = self
            .0
            .iter()
            .filter(|(name, spec)| spec.required && !params.contains_key(name.as_str()))
            .map(|(name, _)| name.as_str())
            .collect();

        if !missing.is_empty() {
            return Err(Error::invalid_argument(format!(
                "missing required arguments: {}",
                missing.join(", ")
            )));
        }

        for (name, spec) in &self.0 {
            if params.contains_key(name) {
                continue;
            }
            if let Some(value) = spec.default_value() {
                params.insert(name.clone(), value);
            }
        }

        Ok(params)
    }
}

impl FromIterator<(String, ArgSpec)> for ArgSchema {
    fn from_iter<I: IntoIterator<Item = (String, ArgSpec)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
