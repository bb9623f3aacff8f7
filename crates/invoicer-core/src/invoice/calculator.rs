//! Invoice totals.

use rust_decimal::Decimal;
use tracing::info;

use super::rules::amounts::format_amount;
use crate::error::InputError;
use crate::models::invoice::{InvoiceTotals, ServiceLine};

/// Compute line costs, subtotal, VAT and total due.
///
/// Lines are costed in the order given. No intermediate value is rounded;
/// use [`format_amount`] for display. Rates are not validated here. Amounts
/// beyond the range of `Decimal` are rejected.
pub fn compute_totals(
    lines: &[ServiceLine],
    hourly_rate: Decimal,
    vat_rate: Decimal,
) -> Result<InvoiceTotals, InputError> {
    info!("Processing {} services and calculating costs", lines.len());

    let mut line_costs = Vec::with_capacity(lines.len());
    let mut subtotal = Decimal::ZERO;
    for line in lines {
        let cost = line
            .line_cost(hourly_rate)
            .ok_or_else(|| overflow(format!("cost of '{}' is too large", line.raw_text)))?;
        info!(
            "Service: {} - Hours: {} - Cost: {}",
            line.raw_text,
            line.hours,
            format_amount(cost)
        );

        subtotal = subtotal
            .checked_add(cost)
            .ok_or_else(|| overflow("subtotal is too large".to_string()))?;
        line_costs.push(cost);
    }

    let vat_amount = subtotal
        .checked_mul(vat_rate)
        .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
        .ok_or_else(|| overflow("VAT amount is too large".to_string()))?;
    let total_due = subtotal
        .checked_add(vat_amount)
        .ok_or_else(|| overflow("total due is too large".to_string()))?;

    info!("Subtotal calculated: {}", format_amount(subtotal));
    info!(
        "VAT amount calculated ({}%): {}",
        vat_rate.normalize(),
        format_amount(vat_amount)
    );
    info!("Total amount due: {}", format_amount(total_due));

    Ok(InvoiceTotals {
        line_costs,
        subtotal,
        vat_rate,
        vat_amount,
        total_due,
    })
}

fn overflow(reason: String) -> InputError {
    InputError::Validation {
        field: "services".to_string(),
        reason,
    }
}
