//! Model trait and capability declarations

use async_trait::async_trait;
use modelgate_core::{
    ArgSchema, Error, Metadata, ModelOutput, Operation, PredictArgs, Result, TrainArgs,
};
use std::collections::BTreeSet;
use std::path::Path;

/// Trait for all models served through ModelGate.
///
/// A model does not have to support every operation. It lists what it
/// supports in [`Model::capabilities`] and only overrides those methods;
/// the remaining defaults return [`Error::unsupported`]. Calls to
/// operations outside the declared set never reach the model, the
/// [`ModelWrapper`](crate::ModelWrapper) answers them with a
/// not-implemented error.
#[async_trait]
pub trait Model: Send + Sync {
    /// Operations this model exposes
    fn capabilities(&self) -> Capabilities {
        Capabilities::all()
    }

    /// Predict from a file in the local filesystem
    ///
    /// The path comes from the caller and is opened with the permissions of
    /// the serving process.
    async fn predict_file(&self, _path: &Path, _args: PredictArgs) -> Result<ModelOutput> {
        Err(Error::unsupported())
    }

    /// Predict from uploaded data carried in `args.files`
    async fn predict_data(&self, _args: PredictArgs) -> Result<ModelOutput> {
        Err(Error::unsupported())
    }

    /// Predict from the remote resources listed in `args.urls`
    async fn predict_url(&self, _args: PredictArgs) -> Result<ModelOutput> {
        Err(Error::unsupported())
    }

    async fn train(&self, _args: TrainArgs) -> Result<ModelOutput> {
        Err(Error::unsupported())
    }

    fn get_metadata(&self) -> Result<Metadata> {
        Err(Error::unsupported())
    }

    /// Arguments accepted by [`Model::train`]
    fn get_train_args(&self) -> Result<ArgSchema> {
        Err(Error::unsupported())
    }

    /// Arguments accepted by the predict operations
    fn get_test_args(&self) -> Result<ArgSchema> {
        Err(Error::unsupported())
    }
}

/// Set of operations a model exposes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capabilities {
    ops: BTreeSet<Operation>,
}

impl Capabilities {
    /// Every operation
    pub fn all() -> Self {
        Self {
            ops: Operation::ALL.into_iter().collect(),
        }
    }

    /// No operation at all
    pub fn none() -> Self {
        Self::default()
    }

    /// Add an operation
    pub fn with(mut self, op: Operation) -> Self {
        self.ops.insert(op);
        self
    }

    /// Remove an operation
    pub fn without(mut self, op: Operation) -> Self {
        self.ops.remove(&op);
        self
    }

    pub fn contains(&self, op: Operation) -> bool {
        self.ops.contains(&op)
    }

    pub fn iter(&self) -> impl Iterator<Item = Operation> + '_ {
        self.ops.iter().copied()
    }
}

impl FromIterator<Operation> for Capabilities {
    fn from_iter<I: IntoIterator<Item = Operation>>(iter: I) -> Self {
        Self {
            ops: iter.into_iter().collect(),
        }
    }
}
