//! Error types for the invoicer-core library.

use thiserror::Error;

/// Main error type for the invoicer library.
#[derive(Error, Debug)]
pub enum InvoicerError {
    /// Invalid or incomplete invoice input.
    #[error("input error: {0}")]
    Input(#[from] InputError),

    /// Document assembly or packaging error.
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to the invoice input data.
#[derive(Error, Debug)]
pub enum InputError {
    /// The input file does not exist.
    #[error("input file not found: {0}")]
    NotFound(String),

    /// The YAML document could not be parsed.
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The JSON document could not be parsed.
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Field validation failed.
    #[error("validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// A service line does not follow the "Description DD.MM.YY (N hours)" convention.
    #[error("invalid service '{service}': {reason}")]
    InvalidService { service: String, reason: String },

    /// Several fields failed validation at once.
    #[error("{}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<InputError>),
}

/// Errors related to building or writing the output document.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// Failed to package the document archive.
    #[error("failed to package document: {0}")]
    Package(#[from] zip::result::ZipError),

    /// An XML part could not be built.
    #[error("failed to build XML: {0}")]
    Xml(String),

    /// An embedded image could not be read.
    #[error("invalid image: {0}")]
    Image(#[from] image::ImageError),

    /// Failed to write the output file.
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for the invoicer library.
pub type Result<T> = std::result::Result<T, InvoicerError>;
