//! Integration tests for the ModelGate HTTP API

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use metrics_exporter_prometheus::PrometheusBuilder;
use modelgate_api::{create_router, AppState, ServerConfig};
use modelgate_core::{
    ArgSchema, ArgSpec, Error, FilePayload, Metadata, ModelOutput, Operation, PredictArgs, Result,
    TrainArgs,
};
use modelgate_models::{
    Capabilities, Model, ModelDiscovery, ModelRegistry, RegistryBuilder, StaticProvider,
    PLACEHOLDER_MODEL_NAME,
};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt;

/// Upper-cases text; cannot predict from URLs
struct Shout;

#[async_trait]
impl Model for Shout {
    fn capabilities(&self) -> Capabilities {
        Capabilities::all().without(Operation::PredictUrl)
    }

    async fn predict_file(&self, path: &Path, _args: PredictArgs) -> Result<ModelOutput> {
        let text = tokio::fs::read_to_string(path).await?;
        Ok(ModelOutput::Text(text.to_uppercase()))
    }

    async fn predict_data(&self, args: PredictArgs) -> Result<ModelOutput> {
        let file = args.files.ok_or_else(|| Error::invalid_argument("no data"))?;
        let text = String::from_utf8_lossy(&file.data).to_uppercase();
        let suffix = args.params.get("suffix").and_then(|v| v.as_str()).unwrap_or("");

        if args.params.get("as_file").and_then(|v| v.as_str()) == Some("yes") {
            return Ok(ModelOutput::File(
                FilePayload::new(format!("{}{}", text, suffix).into_bytes())
                    .with_filename("shout.txt")
                    .with_content_type("text/plain"),
            ));
        }

        Ok(ModelOutput::Json(json!({
            "text": format!("{}{}", text, suffix),
            "content_type": file.content_type,
            "filename": file.filename,
        })))
    }

    async fn train(&self, args: TrainArgs) -> Result<ModelOutput> {
        Ok(ModelOutput::Json(json!({ "trained_with": args.params })))
    }

    fn get_metadata(&self) -> Result<Metadata> {
        Ok(Metadata::new("7", "shout", "Upper-cases text").with_version("2.0.0"))
    }

    fn get_train_args(&self) -> Result<ArgSchema> {
        Ok(ArgSchema::new()
            .with_arg("epochs", ArgSpec::new("3", "Epochs"))
            .with_arg("dataset", ArgSpec::required("Dataset name")))
    }

    fn get_test_args(&self) -> Result<ArgSchema> {
        Ok(ArgSchema::new().with_arg("suffix", ArgSpec::new("!", "Appended to the output")))
    }
}

/// Declares URL predictions but refuses them
struct Lazy;

#[async_trait]
impl Model for Lazy {
    fn capabilities(&self) -> Capabilities {
        Capabilities::none().with(Operation::PredictUrl)
    }
}

/// Metadata lookup fails inside the model
struct Corrupt;

#[async_trait]
impl Model for Corrupt {
    fn get_metadata(&self) -> Result<Metadata> {
        Err(Error::model("metadata file is corrupt"))
    }
}

struct NoPlugins;

#[async_trait]
impl ModelDiscovery for NoPlugins {
    async fn discover(&self) -> Result<Vec<(String, Arc<dyn Model>)>> {
        Ok(Vec::new())
    }
}

fn app() -> Router {
    let registry = RegistryBuilder::new()
        .with_provider(Arc::new(StaticProvider::new("shout", Arc::new(Shout))))
        .with_provider(Arc::new(StaticProvider::new("lazy", Arc::new(Lazy))))
        .build();

    create_router(AppState::new(ServerConfig::default(), registry))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let (status, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

async fn post_json(app: Router, uri: &str, payload: Value) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();
    send(app, request).await
}

#[tokio::test]
async fn test_health_endpoint() {
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
}

#[tokio::test]
async fn test_list_models() {
    let (status, body) = get_json(app(), "/v1/models").await;

    assert_eq!(status, StatusCode::OK);
    let models = body["models"].as_array().unwrap();
    assert_eq!(models.len(), 2);

    // ordered by name
    assert_eq!(models[0]["name"], "lazy");
    assert_eq!(models[1]["name"], "shout");
    assert_eq!(models[1]["version"], "2.0.0");

    // lazy has no metadata of its own
    assert_eq!(models[0]["id"], "0");
    assert_eq!(
        models[0]["description"],
        "Could not load description from underlying model (loaded 'lazy')"
    );

    let links: Vec<&str> = models[1]["links"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["href"].as_str().unwrap())
        .collect();
    assert!(links.contains(&"/v1/models/shout/predict/data"));
    assert!(!links.contains(&"/v1/models/shout/predict/url"));
}

#[tokio::test]
async fn test_model_detail_includes_schemas() {
    let (status, body) = get_json(app(), "/v1/models/shout").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["train_args"]["dataset"]["required"], true);
    assert_eq!(body["test_args"]["suffix"]["default"], "!");

    let (_, body) = get_json(app(), "/v1/models/lazy").await;
    assert_eq!(body["train_args"], json!({}));
    assert_eq!(body["operations"], json!(["predict_url"]));
}

#[tokio::test]
async fn test_unknown_model_is_404() {
    let (status, body) = get_json(app(), "/v1/models/ghost").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["type"], "not_found");
}

#[tokio::test]
async fn test_predict_data_applies_defaults() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/v1/models/shout/predict/data?filename=note.txt")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("hello"))
        .unwrap();
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["text"], "HELLO!");
    assert_eq!(body["content_type"], "text/plain");
    assert_eq!(body["filename"], "note.txt");
}

#[tokio::test]
async fn test_predict_data_file_output() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/v1/models/shout/predict/data?as_file=yes&suffix=?")
        .body(Body::from("hey"))
        .unwrap();
    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"shout.txt\""
    );
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"HEY?");
}

#[tokio::test]
async fn test_predict_data_requires_body() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/v1/models/shout/predict/data")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(app(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_predict_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("input.txt");
    std::fs::write(&path, "quiet").unwrap();

    let (status, body) = post_json(
        app(),
        "/v1/models/shout/predict/file",
        json!({ "path": path }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"QUIET");
}

#[tokio::test]
async fn test_missing_capability_is_501() {
    let (status, body) = post_json(
        app(),
        "/v1/models/shout/predict/url",
        json!({ "urls": ["https://example.org/a.txt"] }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["error"]["type"], "not_implemented");
    assert_eq!(
        body["error"]["message"],
        "Not implemented by underlying model (loaded 'shout')"
    );
}

#[tokio::test]
async fn test_refused_capability_is_501() {
    let (status, body) = post_json(
        app(),
        "/v1/models/lazy/predict/url",
        json!({ "urls": ["https://example.org/a.txt"] }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        body["error"]["message"],
        "Model does not implement this functionality"
    );
}

#[tokio::test]
async fn test_invalid_url_is_rejected() {
    let (status, _) = post_json(
        app(),
        "/v1/models/lazy/predict/url",
        json!({ "urls": ["not a url"] }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_json(app(), "/v1/models/lazy/predict/url", json!({ "urls": [] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_train_resolves_arguments() {
    let (status, _) = post_json(app(), "/v1/models/shout/train", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = post_json(
        app(),
        "/v1/models/shout/train",
        json!({ "params": { "dataset": "poems" } }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["trained_with"], json!({ "dataset": "poems", "epochs": 3 }));
}

#[tokio::test]
async fn test_placeholder_is_served_without_plugins() {
    let registry = ModelRegistry::new(Arc::new(NoPlugins));
    let app = create_router(AppState::new(ServerConfig::default(), registry));

    let (status, body) = get_json(app.clone(), "/v1/models").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["models"][0]["name"], PLACEHOLDER_MODEL_NAME);
    assert_eq!(body["models"][0]["author"], "ModelGate Developers");

    let (status, _) = post_json(
        app,
        &format!("/v1/models/{}/train", PLACEHOLDER_MODEL_NAME),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
}

#[tokio::test]
async fn test_metrics_without_recorder_is_empty() {
    let request = Request::builder().uri("/metrics").body(Body::empty()).unwrap();
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_malformed_body_is_json_400() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/v1/models/shout/train")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["error"]["type"], "invalid_request_error");
    assert!(!body["error"]["message"].as_str().unwrap().is_empty());

    // well-formed JSON of the wrong shape
    let (status, body) = post_json(app(), "/v1/models/lazy/predict/url", json!({ "urls": 3 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["error"]["type"], "invalid_request_error");
}

#[tokio::test]
async fn test_unknown_model_wins_over_bad_body() {
    // no content type and no body: the model lookup still answers first
    for uri in [
        "/v1/models/ghost/train",
        "/v1/models/ghost/predict/file",
        "/v1/models/ghost/predict/url",
    ] {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(app(), request).await;

        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"]["type"], "not_found");
    }
}

#[tokio::test]
async fn test_model_metadata_error_is_500() {
    let registry = RegistryBuilder::new()
        .with_provider(Arc::new(StaticProvider::new("corrupt", Arc::new(Corrupt))))
        .build();
    let app = create_router(AppState::new(ServerConfig::default(), registry));

    let (status, body) = get_json(app.clone(), "/v1/models").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["type"], "internal_error");

    let (status, _) = get_json(app, "/v1/models/corrupt").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn test_request_counter_only_labels_registered_models() {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();

    metrics::with_local_recorder(&recorder, || {
        runtime.block_on(async {
            let registry = RegistryBuilder::new()
                .with_provider(Arc::new(StaticProvider::new("shout", Arc::new(Shout))))
                .build();
            let app = create_router(
                AppState::new(ServerConfig::default(), registry).with_metrics(handle.clone()),
            );

            for name in ["ghost-1", "ghost-2", "shout"] {
                let (_, _) = get_json(app.clone(), &format!("/v1/models/{}", name)).await;
            }
        })
    });

    let rendered = handle.render();
    assert!(rendered.contains("modelgate_requests_total"));
    assert!(rendered.contains("model=\"shout\""));
    assert!(!rendered.contains("ghost"));
}
