//! Wrapper normalizing calls to loaded models
//!
//! Every discovered model is exposed through a [`ModelWrapper`]. The wrapper
//! checks the model's declared capabilities before forwarding a call and
//! turns every flavor of "not supported" into the same
//! [`Error::NotImplemented`] kind, so callers never need to know how a
//! given plugin signals a missing feature.

use crate::model::Model;
use modelgate_core::error::MODEL_NOT_IMPLEMENTED;
use modelgate_core::{
    ArgSchema, Error, Metadata, ModelOutput, Operation, PredictArgs, Result, TrainArgs,
};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Wraps a loaded model before exposing it
#[derive(Clone)]
pub struct ModelWrapper {
    name: String,
    model: Arc<dyn Model>,
}

impl ModelWrapper {
    pub fn new(name: impl Into<String>, model: Arc<dyn Model>) -> Self {
        Self {
            name: name.into(),
            model,
        }
    }

    /// Name the model was loaded under
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The underlying model
    pub fn model(&self) -> &Arc<dyn Model> {
        &self.model
    }

    /// Whether the underlying model declares `op`
    pub fn supports(&self, op: Operation) -> bool {
        self.model.capabilities().contains(op)
    }

    /// Model metadata. Models that lack metadata get a stub naming the
    /// wrapper; any other failure of the model is returned.
    pub fn get_metadata(&self) -> Result<Metadata> {
        let result = self
            .ensure(Operation::GetMetadata)
            .and_then(|_| self.model.get_metadata());

        match result {
            Ok(meta) => Ok(meta),
            Err(Error::NotImplemented(reason)) => {
                debug!("Model '{}' has no metadata: {}", self.name, reason);
                Ok(Metadata::new(
                    "0",
                    self.name.clone(),
                    format!(
                        "Could not load description from underlying model (loaded '{}')",
                        self.name
                    ),
                ))
            }
            Err(e) => {
                warn!("Model '{}' failed to report metadata: {}", self.name, e);
                Err(e)
            }
        }
    }

    pub async fn predict_file(&self, path: &Path, args: PredictArgs) -> Result<ModelOutput> {
        self.ensure(Operation::PredictFile)?;
        let result = self.model.predict_file(path, args).await;
        self.translate(Operation::PredictFile, result)
    }

    pub async fn predict_data(&self, args: PredictArgs) -> Result<ModelOutput> {
        self.ensure(Operation::PredictData)?;
        let result = self.model.predict_data(args).await;
        self.translate(Operation::PredictData, result)
    }

    pub async fn predict_url(&self, args: PredictArgs) -> Result<ModelOutput> {
        self.ensure(Operation::PredictUrl)?;
        let result = self.model.predict_url(args).await;
        self.translate(Operation::PredictUrl, result)
    }

    pub async fn train(&self, args: TrainArgs) -> Result<ModelOutput> {
        self.ensure(Operation::Train)?;
        let result = self.model.train(args).await;
        self.translate(Operation::Train, result)
    }

    /// Training argument schema, empty when the model does not declare one
    pub fn get_train_args(&self) -> Result<ArgSchema> {
        self.schema(Operation::GetTrainArgs, || self.model.get_train_args())
    }

    /// Prediction argument schema, empty when the model does not declare one
    pub fn get_test_args(&self) -> Result<ArgSchema> {
        self.schema(Operation::GetTestArgs, || self.model.get_test_args())
    }

    fn schema<F>(&self, op: Operation, fetch: F) -> Result<ArgSchema>
    where
        F: FnOnce() -> Result<ArgSchema>,
    {
        if !self.supports(op) {
            return Ok(ArgSchema::new());
        }

        self.translate(op, fetch())
    }

    /// Reject operations the model does not declare
    fn ensure(&self, op: Operation) -> Result<()> {
        if self.supports(op) {
            return Ok(());
        }

        metrics::counter!("modelgate_not_implemented_total", "operation" => op.as_str())
            .increment(1);
        Err(Error::not_implemented(format!(
            "Not implemented by underlying model (loaded '{}')",
            self.name
        )))
    }

    /// Normalize a not-implemented answer coming from the model itself
    fn translate<T>(&self, op: Operation, result: Result<T>) -> Result<T> {
        match result {
            Err(Error::NotImplemented(reason)) => {
                debug!("Model '{}' refused {}: {}", self.name, op, reason);
                metrics::counter!("modelgate_not_implemented_total", "operation" => op.as_str())
                    .increment(1);
                Err(Error::not_implemented(MODEL_NOT_IMPLEMENTED))
            }
            other => other,
        }
    }
}

impl fmt::Debug for ModelWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelWrapper")
            .field("name", &self.name)
            .field("capabilities", &self.model.capabilities())
            .finish()
    }
}
