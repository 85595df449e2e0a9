//! Placeholder model registered when no plugin could be loaded

use crate::model::Model;
use async_trait::async_trait;
use modelgate_core::{ArgSchema, Error, Metadata, ModelOutput, PredictArgs, Result, TrainArgs};
use std::path::Path;

/// Name the placeholder model is registered under
pub const PLACEHOLDER_MODEL_NAME: &str = "modelgate-test";

/// Dummy model implementing minimal functionality.
///
/// It declares the full capability set so the API shows every route, but
/// it only answers metadata and argument queries. Predictions and training
/// report not-implemented.
#[derive(Debug, Default, Clone)]
pub struct PlaceholderModel;

impl PlaceholderModel {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Model for PlaceholderModel {
    async fn predict_file(&self, _path: &Path, _args: PredictArgs) -> Result<ModelOutput> {
        Err(Error::unsupported())
    }

    async fn predict_data(&self, _args: PredictArgs) -> Result<ModelOutput> {
        Err(Error::unsupported())
    }

    async fn predict_url(&self, _args: PredictArgs) -> Result<ModelOutput> {
        Err(Error::unsupported())
    }

    async fn train(&self, _args: TrainArgs) -> Result<ModelOutput> {
        Err(Error::unsupported())
    }

    fn get_metadata(&self) -> Result<Metadata> {
        Ok(Metadata::new(
            "0",
            PLACEHOLDER_MODEL_NAME,
            "This is not a model at all, just a placeholder for testing the API \
             functionality. If you are seeing this, it is because ModelGate could \
             not load a valid model.",
        )
        .with_author("ModelGate Developers")
        .with_version("0.0.1"))
    }

    fn get_train_args(&self) -> Result<ArgSchema> {
        Ok(ArgSchema::new())
    }

    fn get_test_args(&self) -> Result<ArgSchema> {
        Ok(ArgSchema::new())
    }
}
