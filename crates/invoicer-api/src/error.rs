//! HTTP error responses. Every error body is `{"detail": "..."}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use invoicer_convert::ConversionError;
use invoicer_core::{InputError, InvoicerError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Unparsable body or failed field validation.
    #[error("{0}")]
    Validation(String),

    /// Bad query parameter.
    #[error("{0}")]
    BadRequest(String),

    /// Generation or conversion failed.
    #[error("Failed to generate invoice: {0}")]
    Generation(String),
}

impl From<InputError> for ApiError {
    fn from(err: InputError) -> Self {
        match err {
            InputError::NotFound(_) => ApiError::Generation(err.to_string()),
            _ => ApiError::Validation(err.to_string()),
        }
    }
}

impl From<InvoicerError> for ApiError {
    fn from(err: InvoicerError) -> Self {
        match err {
            InvoicerError::Input(input) => input.into(),
            other => ApiError::Generation(other.to_string()),
        }
    }
}

impl From<ConversionError> for ApiError {
    fn from(err: ConversionError) -> Self {
        ApiError::Generation(err.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Generation(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Generation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("Error generating invoice: {}", self);
        } else {
            tracing::warn!("Rejected request ({}): {}", status, self);
        }

        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
