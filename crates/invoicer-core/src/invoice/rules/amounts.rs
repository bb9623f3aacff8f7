//! Money formatting. Amounts are only rounded here, at display time.

use rust_decimal::{Decimal, RoundingStrategy};

/// Currency symbol printed before every amount.
pub const CURRENCY_SYMBOL: &str = "£";

/// Round to 2 decimal places, half away from zero.
pub fn round_for_display(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format an amount as "£1234.56".
pub fn format_amount(amount: Decimal) -> String {
    format!("{}{:.2}", CURRENCY_SYMBOL, round_for_display(amount))
}

/// Format a percentage without trailing zeros ("20", "17.5").
pub fn format_rate(rate: Decimal) -> String {
    rate.normalize().to_string()
}

/// Label of the VAT row, e.g. "VAT (20%)".
pub fn vat_label(rate: Decimal) -> String {
    format!("VAT ({}%)", format_rate(rate))
}
