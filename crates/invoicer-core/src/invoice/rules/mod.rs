//! Rule-based extractors for service descriptors.

pub mod amounts;
pub mod dates;
pub mod patterns;
pub mod services;

pub use amounts::{format_amount, format_rate, round_for_display, vat_label};
pub use dates::{
    DateExtractor, DateSource, ResolvedDate, format_invoice_date, parse_service_date,
    resolve_invoice_date,
};
pub use patterns::*;
pub use services::{HoursExtractor, ServiceLineParser};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the first occurrence of the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A value found in text, with where it was found.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Byte range in the source text.
    pub position: (usize, usize),
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            value,
            position: (start, end),
            source: source.into(),
        }
    }
}
