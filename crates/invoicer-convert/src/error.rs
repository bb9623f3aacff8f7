//! Error types for PDF conversion.

use thiserror::Error;

/// Errors that can occur while converting a document to PDF.
#[derive(Error, Debug)]
pub enum ConversionError {
    /// The document to convert does not exist.
    #[error("input document not found: {0}")]
    InputNotFound(String),

    /// The converter program could not be started.
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The converter did not finish in time.
    #[error("{program} timed out after {secs} seconds")]
    Timeout { program: String, secs: u64 },

    /// The converter exited with a non-zero status.
    #[error("{program} failed ({status}): {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    /// The converter exited cleanly but produced no PDF.
    #[error("{backend} ran but did not create {path}")]
    MissingOutput { backend: String, path: String },

    /// A PDF left by an earlier run could not be removed.
    #[error("failed to remove existing {path}: {source}")]
    StaleOutput {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Unrecognised backend name.
    #[error("unknown PDF backend '{0}' (expected 'libreoffice' or 'docx2pdf')")]
    UnknownBackend(String),

    /// The chain has no backends to try.
    #[error("no PDF backends configured")]
    NoBackends,

    /// Every backend in the chain failed.
    #[error("all PDF backends failed, last error: {0}")]
    AllBackendsFailed(Box<ConversionError>),
}
