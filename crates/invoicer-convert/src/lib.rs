//! DOCX to PDF conversion for invoicer.
//!
//! Conversion shells out to external programs:
//! - `unoconv` (LibreOffice)
//! - `docx2pdf` (Microsoft Word)
//!
//! Backends are tried in order and the first one that produces a PDF wins.

mod backend;
mod chain;
mod error;
mod executor;

use std::time::Duration;

pub use backend::{BackendKind, Docx2PdfBackend, LibreOfficeBackend, PdfBackend};
pub use chain::ConverterChain;
pub use error::ConversionError;
pub use executor::CommandExecutor;

/// Default time allowed for a single backend invocation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Result type for conversion operations.
pub type Result<T> = std::result::Result<T, ConversionError>;
