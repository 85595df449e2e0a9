//! ModelGate Core
//!
//! Core types shared across ModelGate components.
//!
//! This crate provides:
//! - The error type and result alias used by models, wrappers and the API
//! - Model metadata and argument schemas
//! - Prediction and training inputs and outputs

pub mod args;
pub mod error;
pub mod types;

pub use args::{ArgSchema, ArgSpec};
pub use error::{Error, Result};
pub use types::{FilePayload, Metadata, ModelOutput, Operation, Params, PredictArgs, TrainArgs};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::args::{ArgSchema, ArgSpec};
    pub use crate::error::{Error, Result};
    pub use crate::types::{FilePayload, Metadata, ModelOutput, Operation, Params, PredictArgs, TrainArgs};
}
