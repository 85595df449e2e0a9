//! ModelGate API
//!
//! HTTP front end for the model registry. Every model plugin compiled into
//! the binary is exposed under `/v1/models/<name>` with the same set of
//! routes; operations a model lacks answer `501 Not Implemented`.

pub mod cli;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use cli::Cli;
pub use config::ServerConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use state::{build_registry, AppState};
