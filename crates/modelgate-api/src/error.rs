//! Error handling

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use modelgate_core::Error;
use serde_json::json;
use tracing::{error, warn};

#[derive(Debug)]
pub enum ApiError {
    NotImplemented(String),
    NotFound(String),
    InvalidRequest(String),
    InternalError(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::NotImplemented(msg) => ApiError::NotImplemented(msg),
            Error::ModelNotFound(name) => ApiError::NotFound(format!("Model '{}' not found", name)),
            Error::InvalidArgument(msg) => ApiError::InvalidRequest(msg),
            other => ApiError::InternalError(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (kind, message) = match self {
            ApiError::NotImplemented(msg) => ("not_implemented", msg),
            ApiError::NotFound(msg) => ("not_found", msg),
            ApiError::InvalidRequest(msg) => ("invalid_request_error", msg),
            ApiError::InternalError(msg) => ("internal_error", msg),
        };

        if status.is_server_error() && status != StatusCode::NOT_IMPLEMENTED {
            error!("Request failed: {}", message);
        } else {
            warn!("Request rejected ({}): {}", status, message);
        }
        metrics::counter!("modelgate_errors_total", "type" => kind).increment(1);

        let body = json!({
            "error": {
                "message": message,
                "type": kind,
            }
        });

        (status, Json(body)).into_response()
    }
}
