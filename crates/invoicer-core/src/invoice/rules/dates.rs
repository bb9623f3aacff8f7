//! Date handling: service-line dates and the invoice date policy.

use chrono::NaiveDate;
use tracing::{info, warn};

use super::patterns::SERVICE_DATE;
use super::{ExtractionMatch, FieldExtractor};
use crate::clock::Clock;

/// Format of the invoice date, both accepted and rendered.
pub const INVOICE_DATE_FORMAT: &str = "%d.%m.%y";

/// Service date extractor. The value is `None` when the matched text is not a
/// real calendar date (e.g. "31.02.25").
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<Option<NaiveDate>>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        SERVICE_DATE.find(text).map(|m| {
            ExtractionMatch::new(parse_service_date(m.as_str()), m.as_str(), m.start(), m.end())
        })
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        SERVICE_DATE
            .find_iter(text)
            .map(|m| {
                ExtractionMatch::new(parse_service_date(m.as_str()), m.as_str(), m.start(), m.end())
            })
            .collect()
    }
}

/// Parse "DD.MM.YY" or "DD.MM.YYYY".
pub fn parse_service_date(s: &str) -> Option<NaiveDate> {
    let mut parts = s.split('.');
    let day: u32 = parts.next()?.parse().ok()?;
    let month: u32 = parts.next()?.parse().ok()?;
    let year = parse_year(parts.next()?)?;

    if parts.next().is_some() {
        return None;
    }

    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_year(s: &str) -> Option<i32> {
    let year: i32 = s.parse().ok()?;
    match s.len() {
        // Two-digit year: assume 2000s for 00-50, 1900s for 51-99
        2 if year <= 50 => Some(2000 + year),
        2 => Some(1900 + year),
        4 => Some(year),
        _ => None,
    }
}

/// Where the invoice date came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSource {
    /// Parsed from the input.
    Supplied,
    /// No date supplied; today was used.
    Today,
    /// A date was supplied but could not be parsed; today was used.
    Fallback,
}

/// The invoice date after applying the fallback policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedDate {
    pub date: NaiveDate,
    pub source: DateSource,
}

impl ResolvedDate {
    /// Date as printed in the header (DD.MM.YY).
    pub fn display(&self) -> String {
        format_invoice_date(self.date)
    }
}

/// Resolve the invoice date: a parsable DD.MM.YY value is used as is,
/// anything else falls back to the clock's date with a warning.
pub fn resolve_invoice_date(raw: Option<&str>, clock: &dyn Clock) -> ResolvedDate {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty());

    match raw {
        Some(text) => match NaiveDate::parse_from_str(text, INVOICE_DATE_FORMAT) {
            Ok(date) => {
                info!("Using supplied invoice date: {}", format_invoice_date(date));
                ResolvedDate {
                    date,
                    source: DateSource::Supplied,
                }
            }
            Err(e) => {
                let date = clock.today();
                warn!(
                    "Failed to parse invoice date '{}' ({}), using today's date: {}",
                    text,
                    e,
                    format_invoice_date(date)
                );
                ResolvedDate {
                    date,
                    source: DateSource::Fallback,
                }
            }
        },
        None => {
            let date = clock.today();
            info!("Using today's date: {}", format_invoice_date(date));
            ResolvedDate {
                date,
                source: DateSource::Today,
            }
        }
    }
}

/// Format a date as DD.MM.YY.
pub fn format_invoice_date(date: NaiveDate) -> String {
    date.format(INVOICE_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use pretty_assertions::assert_eq;

    fn clock() -> FixedClock {
        FixedClock(NaiveDate::from_ymd_opt(2026, 3, 9).unwrap())
    }

    #[test]
    fn test_extract_service_date() {
        let extractor = DateExtractor::new();

        let result = extractor.extract("Consulting 21.04.25 (2 hours)").unwrap();
        assert_eq!(result.value, NaiveDate::from_ymd_opt(2025, 4, 21));
        assert_eq!(result.source, "21.04.25");
        assert_eq!(result.position, (11, 19));
    }

    #[test]
    fn test_four_digit_year() {
        assert_eq!(
            parse_service_date("1.5.2024"),
            NaiveDate::from_ymd_opt(2024, 5, 1)
        );
    }

    #[test]
    fn test_two_digit_year_century() {
        assert_eq!(
            parse_service_date("15.01.99"),
            NaiveDate::from_ymd_opt(1999, 1, 15)
        );
        assert_eq!(
            parse_service_date("15.01.50"),
            NaiveDate::from_ymd_opt(2050, 1, 15)
        );
    }

    #[test]
    fn test_invalid_calendar_date_still_matches() {
        let extractor = DateExtractor::new();

        let result = extractor.extract("Review 31.02.25 (1 hour)").unwrap();
        assert_eq!(result.value, None);
        assert_eq!(result.source, "31.02.25");

        assert_eq!(parse_service_date("01.01.202"), None);
    }

    #[test]
    fn test_first_date_wins() {
        let extractor = DateExtractor::new();
        let all = extractor.extract_all("Sprint 01.04.25 to 14.04.25 (10 hours)");

        assert_eq!(all.len(), 2);
        assert_eq!(extractor.extract("Sprint 01.04.25 to 14.04.25").unwrap().source, "01.04.25");
    }

    #[test]
    fn test_resolve_supplied_date() {
        let resolved = resolve_invoice_date(Some("21.04.25"), &clock());

        assert_eq!(resolved.source, DateSource::Supplied);
        assert_eq!(resolved.date, NaiveDate::from_ymd_opt(2025, 4, 21).unwrap());
        assert_eq!(resolved.display(), "21.04.25");
    }

    #[test]
    fn test_resolve_missing_date_uses_clock() {
        let resolved = resolve_invoice_date(None, &clock());

        assert_eq!(resolved.source, DateSource::Today);
        assert_eq!(resolved.display(), "09.03.26");

        assert_eq!(resolve_invoice_date(Some("  "), &clock()).source, DateSource::Today);
    }

    #[test]
    fn test_resolve_unparsable_date_falls_back() {
        for raw in ["2025-04-21", "21.04.2025", "32.01.25", "tomorrow"] {
            let resolved = resolve_invoice_date(Some(raw), &clock());
            assert_eq!(resolved.source, DateSource::Fallback, "input {raw}");
            assert_eq!(resolved.date, clock().today());
        }
    }
}
