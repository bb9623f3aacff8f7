//! Semantic invoice document, independent of any output format.

use super::assets::ImageAsset;

/// Fill colour of the service table header row.
pub const HEADER_FILL: &str = "A9D08E";

/// Title of the service section.
pub const SERVICES_HEADING: &str = "Invoice Details";

/// Complete invoice document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentModel {
    /// Base font for the whole document.
    pub font_name: String,

    /// Body sections in reading order.
    pub sections: Vec<Section>,

    /// Image shown in the page footer of paid invoices.
    pub paid_stamp: Option<ImageAsset>,
}

/// One body section.
#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    Header(HeaderBlock),
    /// Empty paragraph.
    Spacer,
    Heading(String),
    Services(ServiceTable),
    Footer(FooterBlock),
}

/// Two-cell header: company icon on the left, invoice details on the right.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderBlock {
    /// Column widths in inches.
    pub column_widths: [f64; 2],
    pub icon: IconCell,
    pub company_name: String,
    pub invoice_number: u32,
    /// Invoice date, already formatted.
    pub date: String,
    pub client_name: String,
    pub client_address: String,
}

/// Content of the icon cell.
#[derive(Debug, Clone, PartialEq)]
pub enum IconCell {
    Image(ImageAsset),
    /// Shown when no icon could be loaded.
    Placeholder(String),
}

/// Service table with totals rows.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceTable {
    /// Separate date column.
    pub show_dates: bool,
    pub rows: Vec<TableRow>,
}

impl ServiceTable {
    /// Column headings for the current column mode.
    pub fn headings(&self) -> &'static [&'static str] {
        if self.show_dates {
            &["Date", "Description of Service", "Total"]
        } else {
            &["Description of Service", "Total"]
        }
    }
}

/// A service or totals row.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub kind: RowKind,
    /// Date text; only used in date-column mode.
    pub date: String,
    pub label: String,
    /// Formatted amount.
    pub amount: String,
}

/// Row role. Only the grand total is bold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Service,
    Subtotal,
    Vat,
    TotalDue,
}

impl RowKind {
    pub fn is_bold(&self) -> bool {
        matches!(self, RowKind::TotalDue)
    }
}

/// Closing block with payment and company details.
#[derive(Debug, Clone, PartialEq)]
pub struct FooterBlock {
    /// Text lines, blank entries included.
    pub lines: Vec<String>,
}

impl FooterBlock {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}
