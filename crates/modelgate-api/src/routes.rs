//! HTTP routes and handlers

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, DefaultBodyLimit, Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use modelgate_core::{
    ArgSchema, FilePayload, Metadata, ModelOutput, Operation, Params, PredictArgs, TrainArgs,
};
use modelgate_models::ModelWrapper;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.max_body_bytes;

    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/v1/models", get(list_models))
        .route("/v1/models/:name", get(get_model))
        .route("/v1/models/:name/predict/file", post(predict_file))
        .route("/v1/models/:name/predict/data", post(predict_data))
        .route("/v1/models/:name/predict/url", post(predict_url))
        .route("/v1/models/:name/train", post(train))
        .fallback(fallback)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

async fn metrics(State(state): State<AppState>) -> String {
    state
        .metrics_handle
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default()
}

#[derive(Debug, Serialize)]
struct Link {
    rel: &'static str,
    href: String,
}

/// Model entry in listings
#[derive(Debug, Serialize)]
struct ModelSummary {
    #[serde(flatten)]
    metadata: Metadata,
    operations: Vec<Operation>,
    links: Vec<Link>,
}

impl ModelSummary {
    fn from_wrapper(wrapper: &ModelWrapper) -> Result<Self, ApiError> {
        let base = format!("/v1/models/{}", wrapper.name());
        let operations: Vec<Operation> = Operation::ALL
            .into_iter()
            .filter(|op| wrapper.supports(*op))
            .collect();

        let mut links = vec![Link {
            rel: "self",
            href: base.clone(),
        }];
        for (op, rel, path) in [
            (Operation::PredictFile, "predict_file", "predict/file"),
            (Operation::PredictData, "predict_data", "predict/data"),
            (Operation::PredictUrl, "predict_url", "predict/url"),
            (Operation::Train, "train", "train"),
        ] {
            if operations.contains(&op) {
                links.push(Link {
                    rel,
                    href: format!("{}/{}", base, path),
                });
            }
        }

        Ok(Self {
            metadata: wrapper.get_metadata()?,
            operations,
            links,
        })
    }
}

#[derive(Debug, Serialize)]
struct ModelList {
    models: Vec<ModelSummary>,
}

/// Full model description
#[derive(Debug, Serialize)]
struct ModelDetail {
    #[serde(flatten)]
    summary: ModelSummary,
    train_args: ArgSchema,
    test_args: ArgSchema,
}

async fn list_models(State(state): State<AppState>) -> Result<Json<ModelList>, ApiError> {
    metrics::counter!("modelgate_requests_total", "operation" => "list_models").increment(1);

    let models = state
        .registry
        .wrappers()
        .await
        .iter()
        .map(|w| ModelSummary::from_wrapper(w))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(ModelList { models }))
}

async fn get_model(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ModelDetail>, ApiError> {
    let wrapper = lookup(&state, &name, "get_model").await?;

    Ok(Json(ModelDetail {
        summary: ModelSummary::from_wrapper(&wrapper)?,
        train_args: wrapper.get_train_args()?,
        test_args: wrapper.get_test_args()?,
    }))
}

/// Predict-from-file request body
///
/// `path` is resolved on the server's own filesystem, with the permissions of
/// the server process.
#[derive(Debug, Deserialize)]
struct FilePredictRequest {
    path: PathBuf,
    #[serde(default)]
    params: Params,
}

/// Predict-from-URL request body
#[derive(Debug, Deserialize)]
struct UrlPredictRequest {
    urls: Vec<String>,
    #[serde(default)]
    params: Params,
}

async fn predict_file(
    State(state): State<AppState>,
    Path(name): Path<String>,
    payload: Result<Json<FilePredictRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let wrapper = lookup(&state, &name, Operation::PredictFile.as_str()).await?;
    let Json(req) = payload?;
    let params = wrapper.get_test_args()?.resolve(req.params)?;

    info!("Predicting from file {} with model '{}'", req.path.display(), name);
    let output = wrapper
        .predict_file(&req.path, PredictArgs::default().with_params(params))
        .await?;

    Ok(output_response(output))
}

async fn predict_data(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(mut query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let wrapper = lookup(&state, &name, Operation::PredictData.as_str()).await?;

    if body.is_empty() {
        return Err(ApiError::InvalidRequest("No data uploaded".to_string()));
    }

    let mut upload = FilePayload::new(body);
    if let Some(filename) = query.remove("filename") {
        upload = upload.with_filename(filename);
    }
    if let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    {
        upload = upload.with_content_type(content_type);
    }

    let params: Params = query
        .into_iter()
        .map(|(k, v)| (k, serde_json::Value::String(v)))
        .collect();
    let params = wrapper.get_test_args()?.resolve(params)?;

    info!("Predicting from {} bytes of data with model '{}'", upload.len(), name);
    let output = wrapper
        .predict_data(PredictArgs::from_data(upload).with_params(params))
        .await?;

    Ok(output_response(output))
}

async fn predict_url(
    State(state): State<AppState>,
    Path(name): Path<String>,
    payload: Result<Json<UrlPredictRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let wrapper = lookup(&state, &name, Operation::PredictUrl.as_str()).await?;
    let Json(req) = payload?;

    if req.urls.is_empty() {
        return Err(ApiError::InvalidRequest("At least one URL is required".to_string()));
    }
    for raw in &req.urls {
        url::Url::parse(raw)
            .map_err(|e| ApiError::InvalidRequest(format!("Invalid URL '{}': {}", raw, e)))?;
    }
    let params = wrapper.get_test_args()?.resolve(req.params)?;

    info!("Predicting from {} URLs with model '{}'", req.urls.len(), name);
    let output = wrapper
        .predict_url(PredictArgs::from_urls(req.urls).with_params(params))
        .await?;

    Ok(output_response(output))
}

async fn train(
    State(state): State<AppState>,
    Path(name): Path<String>,
    payload: Result<Json<TrainArgs>, JsonRejection>,
) -> Result<Response, ApiError> {
    let wrapper = lookup(&state, &name, Operation::Train.as_str()).await?;
    let Json(req) = payload?;
    let params = wrapper.get_train_args()?.resolve(req.params)?;

    info!("Training model '{}'", name);
    let output = wrapper.train(TrainArgs::new(params)).await?;

    Ok(output_response(output))
}

async fn lookup(
    state: &AppState,
    name: &str,
    operation: &'static str,
) -> Result<std::sync::Arc<ModelWrapper>, ApiError> {
    debug!("{} request for model '{}'", operation, name);
    let wrapper = state.registry.get(name).await?;

    // only registered names become label values
    metrics::counter!(
        "modelgate_requests_total",
        "operation" => operation,
        "model" => wrapper.name().to_string()
    )
    .increment(1);

    Ok(wrapper)
}

/// Convert model output into an HTTP response
fn output_response(output: ModelOutput) -> Response {
    match output {
        ModelOutput::Text(text) => text.into_response(),
        ModelOutput::Json(value) => Json(value).into_response(),
        ModelOutput::File(file) => {
            let content_type = file
                .content_type
                .as_deref()
                .and_then(|ct| HeaderValue::from_str(ct).ok())
                .unwrap_or_else(|| HeaderValue::from_static("application/octet-stream"));

            let mut response = (StatusCode::OK, file.data).into_response();
            response
                .headers_mut()
                .insert(header::CONTENT_TYPE, content_type);

            if let Some(disposition) = file
                .filename
                .as_deref()
                .and_then(|name| {
                    HeaderValue::from_str(&format!("attachment; filename=\"{}\"", name)).ok()
                })
            {
                response
                    .headers_mut()
                    .insert(header::CONTENT_DISPOSITION, disposition);
            }

            response
        }
    }
}

async fn fallback() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}
