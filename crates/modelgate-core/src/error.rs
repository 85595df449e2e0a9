//! Error types for ModelGate

/// Result type alias using ModelGate's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Message used when a model declares a capability but refuses the call.
pub const MODEL_NOT_IMPLEMENTED: &str = "Model does not implement this functionality";

/// Core error type for ModelGate operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The model lacks the requested capability
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// No model registered under the requested name
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// Plugin discovery or loading errors
    #[error("discovery error: {0}")]
    Discovery(String),

    /// Request arguments rejected before reaching the model
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The model failed while serving a call
    #[error("model error: {0}")]
    Model(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem/IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new not-implemented error
    pub fn not_implemented(msg: impl Into<String>) -> Self {
        Self::NotImplemented(msg.into())
    }

    /// The error a model returns from a capability it does not support
    pub fn unsupported() -> Self {
        Self::NotImplemented(MODEL_NOT_IMPLEMENTED.to_string())
    }

    /// Create a new model-not-found error
    pub fn model_not_found(name: impl Into<String>) -> Self {
        Self::ModelNotFound(name.into())
    }

    /// Create a new discovery error
    pub fn discovery(msg: impl Into<String>) -> Self {
        Self::Discovery(msg.into())
    }

    /// Create a new invalid-argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a new model error
    pub fn model(msg: impl Into<String>) -> Self {
        Self::Model(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn is_not_implemented(&self) -> bool {
        matches!(self, Self::NotImplemented(_))
    }
}
