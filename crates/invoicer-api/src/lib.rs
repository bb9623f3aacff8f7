//! HTTP API for generating invoices in DOCX and PDF formats.
//!
//! Endpoints:
//! - `GET /`: basic information
//! - `GET /version`: version and CORS configuration
//! - `GET /example-client`: HTML test page
//! - `POST /generate-invoice?format=docx|pdf`: generate and download an invoice

pub mod config;
pub mod error;
pub mod handlers;
pub mod startup;

pub use config::ApiConfig;
pub use error::ApiError;
pub use startup::{AppState, build_router, run};
