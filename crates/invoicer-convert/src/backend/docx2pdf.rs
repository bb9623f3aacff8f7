//! Conversion through the docx2pdf command (Microsoft Word automation).

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use super::{PdfBackend, ensure_output};
use crate::Result;
use crate::executor::CommandExecutor;

/// Runs `docx2pdf <docx> <pdf>`.
#[derive(Debug, Clone)]
pub struct Docx2PdfBackend {
    program: String,
    executor: CommandExecutor,
}

impl Docx2PdfBackend {
    pub fn new(timeout: Duration) -> Self {
        Self::with_program("docx2pdf", timeout)
    }

    pub fn with_program(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            executor: CommandExecutor::new(timeout),
        }
    }
}

#[async_trait]
impl PdfBackend for Docx2PdfBackend {
    fn name(&self) -> &str {
        "docx2pdf"
    }

    async fn convert(&self, docx: &Path, pdf: &Path) -> Result<()> {
        info!("Converting {} to PDF with {}", docx.display(), self.program);

        self.executor
            .execute(&self.program, &[docx.as_os_str(), pdf.as_os_str()])
            .await?;

        ensure_output(self.name(), pdf).await
    }
}
