//! Core types for ModelGate model calls

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Free-form call parameters, keyed by argument name
pub type Params = serde_json::Map<String, serde_json::Value>;

/// One entry of the model capability set
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    PredictFile,
    PredictData,
    PredictUrl,
    Train,
    GetMetadata,
    GetTrainArgs,
    GetTestArgs,
}

impl Operation {
    /// Every operation a model may expose
    pub const ALL: [Operation; 7] = [
        Operation::PredictFile,
        Operation::PredictData,
        Operation::PredictUrl,
        Operation::Train,
        Operation::GetMetadata,
        Operation::GetTrainArgs,
        Operation::GetTestArgs,
    ];

    /// Method name as exposed by the plugin contract
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PredictFile => "predict_file",
            Self::PredictData => "predict_data",
            Self::PredictUrl => "predict_url",
            Self::Train => "train",
            Self::GetMetadata => "get_metadata",
            Self::GetTrainArgs => "get_train_args",
            Self::GetTestArgs => "get_test_args",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Model metadata as reported to API clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub id: String,
    pub name: String,
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Any other keys the model wants to publish
    #[serde(flatten)]
    pub extra: Params,
}

impl Metadata {
    /// Create metadata with the mandatory fields
    pub fn new(id: impl Into<String>, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            author: None,
            version: None,
            extra: Params::new(),
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Attach an extra metadata key
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Raw file content, either uploaded for prediction or returned by a model
#[derive(Debug, Clone, Default)]
pub struct FilePayload {
    /// Original file name, when known
    pub filename: Option<String>,

    /// MIME type, when known
    pub content_type: Option<String>,

    pub data: Bytes,
}

impl FilePayload {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            filename: None,
            content_type: None,
            data: data.into(),
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Input of `predict_data` and `predict_url`
///
/// For data predictions `files` holds the upload and `urls` is empty. For
/// URL predictions `urls` holds the targets and `files` is `None`. Both
/// carry the parameters declared by the model's test arguments.
#[derive(Debug, Clone, Default)]
pub struct PredictArgs {
    pub files: Option<FilePayload>,
    pub urls: Vec<String>,
    pub params: Params,
}

impl PredictArgs {
    /// Arguments for a prediction over uploaded data
    pub fn from_data(file: FilePayload) -> Self {
        Self {
            files: Some(file),
            ..Default::default()
        }
    }

    /// Arguments for a prediction over remote URLs
    pub fn from_urls(urls: Vec<String>) -> Self {
        Self {
            urls,
            ..Default::default()
        }
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Look up a string parameter
    pub fn param_str(&self, key: &str) -> Option<&str> {
        self.params.get(key).and_then(|v| v.as_str())
    }
}

/// Input of `train`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainArgs {
    #[serde(default)]
    pub params: Params,
}

impl TrainArgs {
    pub fn new(params: Params) -> Self {
        Self { params }
    }
}

/// Result of a prediction or training call
#[derive(Debug, Clone)]
pub enum ModelOutput {
    /// Plain text response
    Text(String),

    /// Structured JSON response
    Json(serde_json::Value),

    /// Binary file response
    File(FilePayload),
}

impl ModelOutput {
    /// Convenience constructor for JSON output from any serializable value
    pub fn json<T: Serialize>(value: &T) -> crate::Result<Self> {
        Ok(Self::Json(serde_json::to_value(value)?))
    }
}

impl From<String> for ModelOutput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<serde_json::Value> for ModelOutput {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}
