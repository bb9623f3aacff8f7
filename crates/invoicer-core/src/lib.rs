//! Core library for invoice generation.
//!
//! This crate provides:
//! - Invoice input models loaded from YAML or JSON
//! - Service-line parsing ("Description DD.MM.YY (N hours)") and totals
//! - Invoice date policy with an injectable clock
//! - A format-neutral document model and page layout
//! - DOCX output

pub mod clock;
pub mod document;
pub mod docx;
pub mod error;
pub mod generator;
pub mod invoice;
pub mod models;

pub use clock::{Clock, FixedClock, SystemClock};
pub use docx::{DocumentWriter, DocxWriter};
pub use error::{DocumentError, InputError, InvoicerError, Result};
pub use generator::{GeneratedInvoice, InvoiceGenerator, output_path_for, pdf_path_for};
pub use invoice::{ParseMode, ServiceLineParser, compute_totals, parse_service};
pub use models::config::InvoicerConfig;
pub use models::invoice::{InvoiceTotals, ServiceLine};
pub use models::request::InvoiceRequest;
