//! Invoice data models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A billable line parsed from a free-text service descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceLine {
    /// Descriptor as supplied.
    pub raw_text: String,

    /// Calendar date found in the descriptor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    /// Date substring exactly as written (e.g. "21.04.25").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_text: Option<String>,

    /// Descriptor without the date and the hours parenthetical.
    pub description: String,

    /// Billed hours, zero when the descriptor carries none.
    pub hours: Decimal,
}

impl ServiceLine {
    /// Cost of this line at the given hourly rate, `None` on overflow.
    pub fn line_cost(&self, hourly_rate: Decimal) -> Option<Decimal> {
        self.hours.checked_mul(hourly_rate)
    }
}

/// Rates applied to the service lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rates {
    /// Price per hour.
    pub hourly_rate: Decimal,

    /// VAT percentage (20 means 20%).
    pub vat_rate: Decimal,
}

/// Invoice totals. All values are unrounded; rounding happens when formatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    /// Cost of each line, in input order.
    pub line_costs: Vec<Decimal>,

    /// Sum of the line costs.
    pub subtotal: Decimal,

    /// VAT percentage.
    pub vat_rate: Decimal,

    /// subtotal × vat_rate / 100.
    pub vat_amount: Decimal,

    /// subtotal + vat_amount.
    pub total_due: Decimal,
}

/// Header block data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceHeader {
    pub company_name: String,

    pub invoice_number: u32,

    /// Raw invoice date as supplied; resolved against the clock at assembly.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_date: Option<String>,

    pub client_name: String,

    /// Multi-line client address.
    pub client_address: String,
}

/// Payment, legal and contact details printed in the footer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyFooterInfo {
    pub payment_terms_days: u32,
    pub bank_address: String,
    pub account_number: String,
    pub sort_code: String,
    pub company_number: String,
    pub vat_number: String,
    pub registered_address: String,
    pub email: String,
    pub contact_number: String,

    /// Overlay the paid stamp.
    pub paid: bool,
}

/// Where the company icon comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconSource {
    /// Image file name or path.
    File(String),
    /// Base64-encoded image data supplied inline.
    Inline(String),
}

/// Document presentation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSettings {
    pub font_name: String,

    pub icon: IconSource,

    /// Header column widths in inches [left, right].
    pub column_widths: [f64; 2],

    /// Show a separate date column in the service table.
    pub show_dates: bool,
}
