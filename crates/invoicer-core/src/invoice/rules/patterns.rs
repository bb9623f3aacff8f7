//! Common regex patterns for service descriptors.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Service date: DD.MM.YY or DD.MM.YYYY, first occurrence wins
    pub static ref SERVICE_DATE: Regex = Regex::new(
        r"[0-9]{1,2}\.[0-9]{1,2}\.[0-9]{2,4}"
    ).unwrap();

    // Billed hours: "(2 hours)", "(1 hour)", "( 1.5 hours)"; nothing may sit before ")"
    pub static ref SERVICE_HOURS: Regex = Regex::new(
        r"\(\s*([0-9]+(?:\.[0-9]+)?)\s*hours?\)"
    ).unwrap();

    pub static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}
