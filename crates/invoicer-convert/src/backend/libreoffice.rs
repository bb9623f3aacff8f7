//! LibreOffice conversion through unoconv.

use std::ffi::OsStr;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use super::{PdfBackend, ensure_output};
use crate::Result;
use crate::executor::CommandExecutor;

/// Runs `unoconv -f pdf -o <pdf> <docx>`.
#[derive(Debug, Clone)]
pub struct LibreOfficeBackend {
    program: String,
    executor: CommandExecutor,
}

impl LibreOfficeBackend {
    pub fn new(timeout: Duration) -> Self {
        Self::with_program("unoconv", timeout)
    }

    /// Use a different converter executable.
    pub fn with_program(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            executor: CommandExecutor::new(timeout),
        }
    }
}

#[async_trait]
impl PdfBackend for LibreOfficeBackend {
    fn name(&self) -> &str {
        "libreoffice"
    }

    async fn convert(&self, docx: &Path, pdf: &Path) -> Result<()> {
        info!("Converting {} to PDF with {}", docx.display(), self.program);

        let args = [
            OsStr::new("-f"),
            OsStr::new("pdf"),
            OsStr::new("-o"),
            pdf.as_os_str(),
            docx.as_os_str(),
        ];
        self.executor.execute(&self.program, &args).await?;

        ensure_output(self.name(), pdf).await
    }
}
