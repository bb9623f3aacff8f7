//! Ordered backend fallback.

use std::path::Path;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::backend::{BackendKind, Docx2PdfBackend, LibreOfficeBackend, PdfBackend};
use crate::{ConversionError, Result};

/// Tries each backend in turn; the first success wins.
///
/// The source document is never modified or removed, whatever the outcome.
pub struct ConverterChain {
    backends: Vec<Box<dyn PdfBackend>>,
}

impl ConverterChain {
    pub fn new(backends: Vec<Box<dyn PdfBackend>>) -> Self {
        Self { backends }
    }

    /// Chain for a backend selection, using the standard converter programs.
    pub fn for_kind(kind: BackendKind, timeout: Duration) -> Self {
        let backends = kind
            .attempt_order()
            .iter()
            .map(|kind| -> Box<dyn PdfBackend> {
                match kind {
                    BackendKind::LibreOffice => Box::new(LibreOfficeBackend::new(timeout)),
                    BackendKind::Docx2Pdf => Box::new(Docx2PdfBackend::new(timeout)),
                }
            })
            .collect();
        Self::new(backends)
    }

    /// Names of the backends, in attempt order.
    pub fn backend_names(&self) -> Vec<&str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    /// Convert `docx` to `pdf`. Returns the name of the backend that succeeded.
    ///
    /// Any existing `pdf` is removed before each attempt, so only a file the
    /// backend wrote counts as output.
    pub async fn convert(&self, docx: &Path, pdf: &Path) -> Result<&str> {
        if !tokio::fs::try_exists(docx).await.unwrap_or(false) {
            return Err(ConversionError::InputNotFound(docx.display().to_string()));
        }

        let mut last_error = None;
        for backend in &self.backends {
            remove_stale_output(pdf).await?;
            match backend.convert(docx, pdf).await {
                Ok(()) => {
                    info!("PDF created with {}: {}", backend.name(), pdf.display());
                    return Ok(backend.name());
                }
                Err(e) => {
                    warn!("{} conversion failed: {}", backend.name(), e);
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) => Err(ConversionError::AllBackendsFailed(Box::new(e))),
            None => Err(ConversionError::NoBackends),
        }
    }
}

async fn remove_stale_output(pdf: &Path) -> Result<()> {
    match tokio::fs::remove_file(pdf).await {
        Ok(()) => {
            debug!("Removed existing {}", pdf.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(ConversionError::StaleOutput {
            path: pdf.display().to_string(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockBackend {
        name: &'static str,
        succeed: bool,
        calls: Arc<AtomicUsize>,
    }

    impl MockBackend {
        fn boxed(
            name: &'static str,
            succeed: bool,
            calls: &Arc<AtomicUsize>,
        ) -> Box<dyn PdfBackend> {
            Box::new(Self {
                name,
                succeed,
                calls: Arc::clone(calls),
            })
        }
    }

    #[async_trait]
    impl PdfBackend for MockBackend {
        fn name(&self) -> &str {
            self.name
        }

        async fn convert(&self, _docx: &Path, pdf: &Path) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.succeed {
                std::fs::write(pdf, b"%PDF-1.4").unwrap();
                Ok(())
            } else {
                Err(ConversionError::Failed {
                    program: self.name.to_string(),
                    status: "exit status: 1".to_string(),
                    stderr: format!("{} broke", self.name),
                })
            }
        }
    }

    fn docx(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("invoice.docx");
        std::fs::write(&path, b"PK").unwrap();
        path
    }

    #[tokio::test]
    async fn test_falls_back_to_second_backend() {
        let dir = tempfile::tempdir().unwrap();
        let docx = docx(dir.path());
        let pdf = dir.path().join("invoice.pdf");
        let calls = Arc::new(AtomicUsize::new(0));

        let chain = ConverterChain::new(vec![
            MockBackend::boxed("first", false, &calls),
            MockBackend::boxed("second", true, &calls),
            MockBackend::boxed("third", true, &calls),
        ]);

        assert_eq!(chain.convert(&docx, &pdf).await.unwrap(), "second");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(pdf.exists());
    }

    #[tokio::test]
    async fn test_all_fail_keeps_docx() {
        let dir = tempfile::tempdir().unwrap();
        let docx = docx(dir.path());
        let pdf = dir.path().join("invoice.pdf");
        let calls = Arc::new(AtomicUsize::new(0));

        let chain = ConverterChain::new(vec![
            MockBackend::boxed("first", false, &calls),
            MockBackend::boxed("second", false, &calls),
        ]);

        let err = chain.convert(&docx, &pdf).await.unwrap_err();
        let ConversionError::AllBackendsFailed(last) = err else {
            panic!("expected AllBackendsFailed");
        };
        assert!(last.to_string().contains("second broke"));
        assert!(docx.exists());
        assert!(!pdf.exists());
    }

    #[tokio::test]
    async fn test_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let chain = ConverterChain::new(vec![MockBackend::boxed("only", true, &calls)]);

        let err = chain
            .convert(&dir.path().join("nope.docx"), &dir.path().join("nope.pdf"))
            .await
            .unwrap_err();

        assert!(matches!(err, ConversionError::InputNotFound(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_chain() {
        let dir = tempfile::tempdir().unwrap();
        let docx = docx(dir.path());

        let err = ConverterChain::new(vec![])
            .convert(&docx, &dir.path().join("x.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, ConversionError::NoBackends));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_existing_pdf_is_not_taken_as_output() {
        let dir = tempfile::tempdir().unwrap();
        let docx = docx(dir.path());
        let pdf = dir.path().join("invoice.pdf");
        std::fs::write(&pdf, b"%PDF-1.4 from last week").unwrap();

        // `true` exits 0 without writing anything.
        let backend = LibreOfficeBackend::with_program("true", Duration::from_secs(5));
        let err = ConverterChain::new(vec![Box::new(backend)])
            .convert(&docx, &pdf)
            .await
            .unwrap_err();

        let ConversionError::AllBackendsFailed(last) = err else {
            panic!("expected AllBackendsFailed");
        };
        assert!(matches!(*last, ConversionError::MissingOutput { .. }));
        assert!(!pdf.exists());
    }

    #[test]
    fn test_for_kind() {
        let timeout = Duration::from_secs(1);

        assert_eq!(
            ConverterChain::for_kind(BackendKind::LibreOffice, timeout).backend_names(),
            vec!["libreoffice", "docx2pdf"]
        );
        assert_eq!(
            ConverterChain::for_kind(BackendKind::Docx2Pdf, timeout).backend_names(),
            vec!["docx2pdf"]
        );
    }
}
