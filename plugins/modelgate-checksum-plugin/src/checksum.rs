use async_trait::async_trait;
use modelgate_core::{
    ArgSchema, ArgSpec, Error, Metadata, ModelOutput, Operation, PredictArgs, Result,
};
use modelgate_models::{Capabilities, Model, ModelProvider};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Name the checksum model is registered under
pub const CHECKSUM_MODEL_NAME: &str = "checksum";

/// Hex length of a SHA-256 digest
const DIGEST_HEX_LEN: usize = 64;

/// Model reporting SHA-256 digests of its inputs.
///
/// Training is not supported.
pub struct ChecksumModel {
    http_client: reqwest::Client,
}

impl ChecksumModel {
    /// Create the model with the given timeout for remote downloads
    pub fn new(timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http_client })
    }

    async fn fetch(&self, url: &str) -> Result<(Vec<u8>, Option<String>)> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::model(format!("failed to fetch {}: {}", url, e)))?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::model(format!("failed to read {}: {}", url, e)))?;

        Ok((body.to_vec(), content_type))
    }
}

/// Digest prefix length requested through the `truncate` parameter
fn truncate_len(args: &PredictArgs) -> Result<usize> {
    let len = match args.params.get("truncate") {
        None => DIGEST_HEX_LEN as u64,
        Some(Value::Number(n)) => n
            .as_u64()
            .ok_or_else(|| Error::invalid_argument("truncate must be a positive integer"))?,
        Some(Value::String(s)) => s
            .parse::<u64>()
            .map_err(|_| Error::invalid_argument(format!("truncate is not a number: {}", s)))?,
        Some(other) => {
            return Err(Error::invalid_argument(format!(
                "truncate must be a positive integer, got {}",
                other
            )))
        }
    };

    if len == 0 {
        return Err(Error::invalid_argument("truncate must be at least 1"));
    }
    Ok((len as usize).min(DIGEST_HEX_LEN))
}

/// Read a server-local file, reporting unusable paths as caller errors
async fn read_input(path: &Path) -> Result<Vec<u8>> {
    let unreadable = |e: std::io::Error| match e.kind() {
        std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => {
            Error::invalid_argument(format!("cannot read {}: {}", path.display(), e))
        }
        _ => Error::Io(e),
    };

    let meta = tokio::fs::metadata(path).await.map_err(unreadable)?;
    if !meta.is_file() {
        return Err(Error::invalid_argument(format!(
            "{} is not a regular file",
            path.display()
        )));
    }
    tokio::fs::read(path).await.map_err(unreadable)
}

fn digest(data: &[u8], truncate: usize) -> String {
    let mut hex = format!("{:x}", Sha256::digest(data));
    hex.truncate(truncate);
    hex
}

fn report(source: &str, data: &[u8], content_type: Option<&str>, truncate: usize) -> Value {
    json!({
        "source": source,
        "algorithm": "sha256",
        "digest": digest(data, truncate),
        "size": data.len(),
        "content_type": content_type,
    })
}

#[async_trait]
impl Model for ChecksumModel {
    fn capabilities(&self) -> Capabilities {
        Capabilities::all().without(Operation::Train)
    }

    async fn predict_file(&self, path: &Path, args: PredictArgs) -> Result<ModelOutput> {
        let truncate = truncate_len(&args)?;
        let data = read_input(path).await?;
        tracing::debug!("Digesting {} ({} bytes)", path.display(), data.len());

        Ok(ModelOutput::Json(report(
            &path.display().to_string(),
            &data,
            None,
            truncate,
        )))
    }

    async fn predict_data(&self, args: PredictArgs) -> Result<ModelOutput> {
        let truncate = truncate_len(&args)?;
        let file = args
            .files
            .as_ref()
            .ok_or_else(|| Error::invalid_argument("no data uploaded"))?;

        Ok(ModelOutput::Json(report(
            file.filename.as_deref().unwrap_or("upload"),
            &file.data,
            file.content_type.as_deref(),
            truncate,
        )))
    }

    async fn predict_url(&self, args: PredictArgs) -> Result<ModelOutput> {
        let truncate = truncate_len(&args)?;
        if args.urls.is_empty() {
            return Err(Error::invalid_argument("no URLs given"));
        }

        let mut reports = Vec::with_capacity(args.urls.len());
        for url in &args.urls {
            let (data, content_type) = self.fetch(url).await?;
            tracing::debug!("Digesting {} ({} bytes)", url, data.len());
            reports.push(report(url, &data, content_type.as_deref(), truncate));
        }

        Ok(ModelOutput::Json(Value::Array(reports)))
    }

    fn get_metadata(&self) -> Result<Metadata> {
        Ok(Metadata::new(
            "checksum-sha256",
            CHECKSUM_MODEL_NAME,
            "Reports SHA-256 digests of uploaded data, local files and remote resources.",
        )
        .with_author("ModelGate Developers")
        .with_version(env!("CARGO_PKG_VERSION"))
        .with_extra("algorithm", "sha256"))
    }

    fn get_train_args(&self) -> Result<ArgSchema> {
        Ok(ArgSchema::new())
    }

    fn get_test_args(&self) -> Result<ArgSchema> {
        Ok(ArgSchema::new().with_arg(
            "truncate",
            ArgSpec::new(
                DIGEST_HEX_LEN.to_string(),
                "Number of hex digits of the digest to return",
            ),
        ))
    }
}

/// Provider registering [`ChecksumModel`]
pub struct ChecksumProvider {
    timeout: Duration,
}

impl ChecksumProvider {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for ChecksumProvider {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

#[async_trait]
impl ModelProvider for ChecksumProvider {
    fn name(&self) -> &str {
        CHECKSUM_MODEL_NAME
    }

    async fn load(&self) -> Result<Arc<dyn Model>> {
        tracing::info!("Loading checksum model");
        Ok(Arc::new(ChecksumModel::new(self.timeout)?))
    }
}
