//! Informational endpoints.

use axum::Json;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use serde_json::json;

use crate::startup::AppState;

const API_NAME: &str = "Invoice Generator API";
const EXAMPLE_CLIENT: &str = include_str!("../../static/example_client.html");

pub async fn root(State(state): State<AppState>) -> impl IntoResponse {
    tracing::debug!("Received request to root endpoint");
    Json(json!({
        "message": API_NAME,
        "usage": "POST /generate-invoice with required invoice details",
        "example_client": "/example-client",
        "version": env!("CARGO_PKG_VERSION"),
        "verbose_logging": state.config.verbose
    }))
}

pub async fn version(State(state): State<AppState>) -> impl IntoResponse {
    tracing::debug!("Request received for API version information");
    Json(json!({
        "api_name": API_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "cors_enabled": true,
        "cors_origins": state.config.cors_origins,
        "verbose_logging": state.config.verbose
    }))
}

/// Browser page that exercises the API.
pub async fn example_client() -> impl IntoResponse {
    tracing::debug!("Serving example client HTML page");
    (
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "inline; filename=\"invoice_api_example.html\"",
            ),
        ],
        EXAMPLE_CLIENT,
    )
}
