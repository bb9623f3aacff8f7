//! Invoice generation endpoint.

use std::str::FromStr;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use tracing::{debug, info};

use invoicer_core::{InvoiceRequest, ParseMode, pdf_path_for};

use crate::error::ApiError;
use crate::startup::AppState;

const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Requested output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Docx,
    Pdf,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Docx => "docx",
            OutputFormat::Pdf => "pdf",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            OutputFormat::Docx => DOCX_CONTENT_TYPE,
            OutputFormat::Pdf => PDF_CONTENT_TYPE,
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "docx" => Ok(OutputFormat::Docx),
            "pdf" => Ok(OutputFormat::Pdf),
            _ => Err(ApiError::BadRequest(
                "Invalid format. Must be 'docx' or 'pdf'".to_string(),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateParams {
    pub format: Option<String>,
}

/// `POST /generate-invoice?format=docx|pdf`
pub async fn generate_invoice(
    State(state): State<AppState>,
    Query(params): Query<GenerateParams>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let format = match params.format.as_deref() {
        Some(raw) => raw.parse()?,
        None => OutputFormat::Docx,
    };

    let request = InvoiceRequest::from_json_slice(&body)?;
    info!(
        "Received request to generate invoice #{} in {} format",
        request.invoice_number,
        format.extension()
    );
    request.validate_strict()?;

    let invoice_number = request.invoice_number;

    // Each request works in its own directory, removed when `workdir` drops.
    let generator = state.generator.clone();
    let (workdir, generated) = tokio::task::spawn_blocking(move || {
        let workdir = tempfile::tempdir()?;
        let output = workdir.path().join(format!("invoice_{invoice_number}.docx"));
        let generated = generator.generate(&request, ParseMode::Strict, &output)?;
        Ok::<_, ApiError>((workdir, generated))
    })
    .await
    .map_err(|e| ApiError::Generation(e.to_string()))??;

    let result_path = match format {
        OutputFormat::Docx => generated.docx_path.clone(),
        OutputFormat::Pdf => {
            let pdf = pdf_path_for(&generated.docx_path);
            state.converter.convert(&generated.docx_path, &pdf).await?;
            pdf
        }
    };

    let bytes = tokio::fs::read(&result_path).await?;
    debug!(
        "Returning {} ({} bytes) from {}",
        result_path.display(),
        bytes.len(),
        workdir.path().display()
    );
    drop(workdir);

    let file_name = format!("invoice_{}.{}", invoice_number, format.extension());
    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}
