//! Service-line parsing and invoice totals.

mod calculator;
pub mod rules;

pub use calculator::compute_totals;
pub use rules::services::{ServiceLineParser, parse_service};

use serde::{Deserialize, Serialize};

/// How strictly service descriptors are checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Missing hours bill zero; missing dates are ignored.
    #[default]
    Permissive,
    /// Missing hours or dates are rejected.
    Strict,
}
