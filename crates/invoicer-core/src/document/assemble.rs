//! Builds the [`DocumentModel`] from parsed invoice data. No I/O happens here.

use tracing::{debug, warn};

use super::assets::ResolvedAssets;
use super::model::{
    DocumentModel, FooterBlock, HeaderBlock, IconCell, RowKind, SERVICES_HEADING, Section,
    ServiceTable, TableRow,
};
use crate::invoice::rules::{ResolvedDate, format_amount, vat_label};
use crate::models::invoice::{
    CompanyFooterInfo, DocumentSettings, InvoiceHeader, InvoiceTotals, ServiceLine,
};

/// Assemble the invoice document.
///
/// `lines` and `totals.line_costs` are expected to have the same order and
/// length, as produced by [`compute_totals`](crate::invoice::compute_totals).
pub fn assemble(
    header: &InvoiceHeader,
    date: &ResolvedDate,
    lines: &[ServiceLine],
    totals: &InvoiceTotals,
    footer: &CompanyFooterInfo,
    settings: &DocumentSettings,
    assets: ResolvedAssets,
) -> DocumentModel {
    let icon = match assets.icon {
        Some(image) => IconCell::Image(image),
        None => {
            warn!("Using text placeholder instead of company icon");
            IconCell::Placeholder(format!("{} (Icon not found)", header.company_name))
        }
    };

    let header_block = HeaderBlock {
        column_widths: settings.column_widths,
        icon,
        company_name: header.company_name.clone(),
        invoice_number: header.invoice_number,
        date: date.display(),
        client_name: header.client_name.clone(),
        client_address: header.client_address.clone(),
    };

    let services = service_table(lines, totals, settings.show_dates);
    debug!("Service table has {} rows", services.rows.len());

    let paid_stamp = if footer.paid { assets.paid_stamp } else { None };

    DocumentModel {
        font_name: settings.font_name.clone(),
        sections: vec![
            Section::Header(header_block),
            Section::Spacer,
            Section::Heading(SERVICES_HEADING.to_string()),
            Section::Services(services),
            Section::Spacer,
            Section::Footer(footer_block(&header.company_name, footer)),
        ],
        paid_stamp,
    }
}

fn service_table(lines: &[ServiceLine], totals: &InvoiceTotals, show_dates: bool) -> ServiceTable {
    let mut rows: Vec<TableRow> = lines
        .iter()
        .zip(&totals.line_costs)
        .map(|(line, cost)| TableRow {
            kind: RowKind::Service,
            date: line.date_text.clone().unwrap_or_default(),
            // Without a date column the descriptor is shown exactly as written.
            label: if show_dates {
                line.description.clone()
            } else {
                line.raw_text.clone()
            },
            amount: format_amount(*cost),
        })
        .collect();

    rows.push(totals_row(RowKind::Subtotal, "Subtotal".to_string(), totals.subtotal));
    rows.push(totals_row(RowKind::Vat, vat_label(totals.vat_rate), totals.vat_amount));
    rows.push(totals_row(
        RowKind::TotalDue,
        "Total Amount Due".to_string(),
        totals.total_due,
    ));

    ServiceTable { show_dates, rows }
}

fn totals_row(kind: RowKind, label: String, amount: rust_decimal::Decimal) -> TableRow {
    TableRow {
        kind,
        date: String::new(),
        label,
        amount: format_amount(amount),
    }
}

fn footer_block(company_name: &str, info: &CompanyFooterInfo) -> FooterBlock {
    FooterBlock {
        lines: vec![
            format!("Payment terms of within {} days.", info.payment_terms_days),
            "Please make payment by direct transfer to:".to_string(),
            format!("Bank Address: {}", info.bank_address),
            format!("Account name: {}", company_name),
            format!("Account Number: {}", info.account_number),
            format!("Sort Code: {}", info.sort_code),
            String::new(),
            "Thanks for your business!".to_string(),
            String::new(),
            format!(
                "{}, Registered in the UK. Company Number: {}",
                company_name, info.company_number
            ),
            format!("Registered office: {}", info.registered_address),
            format!(
                "Registered for VAT in the UK. Registration number: {}",
                info.vat_number
            ),
            format!("Email: {} | Contact: {}", info.email, info.contact_number),
        ],
    }
}
