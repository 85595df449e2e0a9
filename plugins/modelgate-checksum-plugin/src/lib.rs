//! Content digest plugin for ModelGate.
//!
//! This crate provides a small but real [`Model`](modelgate_models::Model)
//! that reports SHA-256 digests of uploaded data, local files and remote
//! resources, along with a [`ModelProvider`](modelgate_models::ModelProvider)
//! that can be handed to `modelgate_models::RegistryBuilder`.

pub mod checksum;

pub use checksum::{ChecksumModel, ChecksumProvider, CHECKSUM_MODEL_NAME};
