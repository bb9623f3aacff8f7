//! PDF conversion backends.

mod docx2pdf;
mod libreoffice;

pub use docx2pdf::Docx2PdfBackend;
pub use libreoffice::LibreOfficeBackend;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;

use crate::{ConversionError, Result};

/// Converts a DOCX file to PDF.
#[async_trait]
pub trait PdfBackend: Send + Sync {
    /// Short backend name for logs and errors.
    fn name(&self) -> &str;

    /// Convert `docx` into `pdf`. Succeeds only when the PDF exists afterwards.
    async fn convert(&self, docx: &Path, pdf: &Path) -> Result<()>;
}

/// Backend selection by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// unoconv (LibreOffice), falling back to docx2pdf.
    LibreOffice,
    /// docx2pdf only.
    Docx2Pdf,
}

impl BackendKind {
    /// Backends tried, in order, for this selection.
    pub fn attempt_order(self) -> &'static [BackendKind] {
        match self {
            BackendKind::LibreOffice => &[BackendKind::LibreOffice, BackendKind::Docx2Pdf],
            BackendKind::Docx2Pdf => &[BackendKind::Docx2Pdf],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BackendKind::LibreOffice => "libreoffice",
            BackendKind::Docx2Pdf => "docx2pdf",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "libreoffice" => Ok(BackendKind::LibreOffice),
            "docx2pdf" => Ok(BackendKind::Docx2Pdf),
            _ => Err(ConversionError::UnknownBackend(s.to_string())),
        }
    }
}

/// Check that a backend actually produced its output file.
pub(crate) async fn ensure_output(backend: &str, pdf: &Path) -> Result<()> {
    match tokio::fs::try_exists(pdf).await {
        Ok(true) => Ok(()),
        _ => Err(ConversionError::MissingOutput {
            backend: backend.to_string(),
            path: pdf.display().to_string(),
        }),
    }
}
