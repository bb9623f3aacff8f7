//! Service descriptor parsing: "Description DD.MM.YY (N hours)".

use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::dates::DateExtractor;
use super::patterns::{SERVICE_HOURS, WHITESPACE};
use super::{ExtractionMatch, FieldExtractor};
use crate::error::InputError;
use crate::invoice::ParseMode;
use crate::models::invoice::ServiceLine;

/// Hours extractor for "(N hour)" / "(N hours)" parentheticals.
///
/// A parenthetical whose number does not fit a `Decimal` is still a match,
/// with no value.
pub struct HoursExtractor;

impl HoursExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HoursExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for HoursExtractor {
    type Output = ExtractionMatch<Option<Decimal>>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        for caps in SERVICE_HOURS.captures_iter(text) {
            let Some(full_match) = caps.get(0) else {
                continue;
            };
            results.push(ExtractionMatch::new(
                Decimal::from_str(&caps[1]).ok(),
                full_match.as_str(),
                full_match.start(),
                full_match.end(),
            ));
        }

        results
    }
}

/// Parser for service descriptors.
///
/// In [`ParseMode::Permissive`] parsing never fails: a descriptor without an
/// hours parenthetical bills zero hours and only a warning is logged. In
/// [`ParseMode::Strict`] such a descriptor, or one without a valid date, is
/// rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServiceLineParser {
    mode: ParseMode,
}

impl ServiceLineParser {
    /// Create a parser with the given mode.
    pub fn new(mode: ParseMode) -> Self {
        Self { mode }
    }

    /// Parser that never rejects a descriptor.
    pub fn permissive() -> Self {
        Self::new(ParseMode::Permissive)
    }

    /// Parser that requires both a date and an hours parenthetical.
    pub fn strict() -> Self {
        Self::new(ParseMode::Strict)
    }

    pub fn mode(&self) -> ParseMode {
        self.mode
    }

    /// Parse one descriptor.
    pub fn parse(&self, raw: &str) -> Result<ServiceLine, InputError> {
        let line = parse_service(raw);
        let hours = HoursExtractor::new().extract(raw);

        if self.mode == ParseMode::Strict {
            match &hours {
                None => {
                    return Err(invalid_service(
                        raw,
                        "must include hours in parentheses, e.g. '(2 hours)'",
                    ));
                }
                Some(m) if m.value.is_none() => {
                    return Err(invalid_service(
                        raw,
                        &format!("hours '{}' are out of range", m.source),
                    ));
                }
                _ => {}
            }
            match (&line.date_text, line.date) {
                (None, _) => {
                    return Err(invalid_service(
                        raw,
                        "must include a date in DD.MM.YY format",
                    ));
                }
                (Some(text), None) => {
                    return Err(invalid_service(raw, &format!("contains an invalid date '{text}'")));
                }
                _ => {}
            }
        } else if hours.is_none() {
            warn!("No hours found in service '{}', billing 0 hours", raw);
        }

        Ok(line)
    }

    /// Parse every descriptor, preserving order.
    pub fn parse_all<S: AsRef<str>>(&self, services: &[S]) -> Result<Vec<ServiceLine>, InputError> {
        services.iter().map(|s| self.parse(s.as_ref())).collect()
    }
}

/// Parse a descriptor without any validation. Never fails.
pub fn parse_service(raw: &str) -> ServiceLine {
    let date = DateExtractor::new().extract(raw);
    let hours = HoursExtractor::new().extract(raw);

    let mut removed: Vec<(usize, usize)> = Vec::new();
    if let Some(m) = &date {
        removed.push(m.position);
    }
    if let Some(m) = &hours {
        removed.push(m.position);
    }

    if let Some(m) = &date {
        if m.value.is_none() {
            warn!("Service '{}' has an invalid date '{}'", raw, m.source);
        }
    }
    if let Some(m) = &hours {
        if m.value.is_none() {
            warn!("Service '{}' has out-of-range hours '{}', billing 0 hours", raw, m.source);
        }
    }

    let line = ServiceLine {
        raw_text: raw.to_string(),
        date: date.as_ref().and_then(|m| m.value),
        date_text: date.map(|m| m.source),
        description: strip_ranges(raw, removed),
        hours: hours.and_then(|m| m.value).unwrap_or(Decimal::ZERO),
    };

    debug!(
        "Parsed service '{}': date={:?} hours={} description='{}'",
        raw, line.date_text, line.hours, line.description
    );

    line
}

fn strip_ranges(text: &str, mut ranges: Vec<(usize, usize)>) -> String {
    ranges.sort_unstable();

    let mut kept = String::with_capacity(text.len());
    let mut cursor = 0;
    for (start, end) in ranges {
        if start < cursor {
            // overlapping match, already removed
            cursor = cursor.max(end);
            continue;
        }
        kept.push_str(&text[cursor..start]);
        kept.push(' ');
        cursor = end;
    }
    kept.push_str(&text[cursor..]);

    WHITESPACE.replace_all(kept.trim(), " ").into_owned()
}

fn invalid_service(service: &str, reason: &str) -> InputError {
    InputError::InvalidService {
        service: service.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_full_descriptor() {
        let line = ServiceLineParser::permissive()
            .parse("Consulting 21.04.25 (2 hours)")
            .unwrap();

        assert_eq!(line.hours, dec("2"));
        assert_eq!(line.date_text.as_deref(), Some("21.04.25"));
        assert_eq!(line.date, NaiveDate::from_ymd_opt(2025, 4, 21));
        assert_eq!(line.description, "Consulting");
        assert_eq!(line.line_cost(dec("100")), Some(dec("200.00")));
    }

    #[test]
    fn test_singular_and_decimal_hours() {
        let parser = ServiceLineParser::permissive();

        assert_eq!(parser.parse("AI Consultancy (1 hour)").unwrap().hours, dec("1"));
        assert_eq!(parser.parse("Workshop ( 1.5 hours)").unwrap().hours, dec("1.5"));
    }

    #[test]
    fn test_space_before_closing_paren_is_not_hours() {
        let line = ServiceLineParser::permissive()
            .parse("Workshop ( 1.5 hours )")
            .unwrap();

        assert_eq!(line.hours, Decimal::ZERO);
        assert_eq!(line.description, "Workshop ( 1.5 hours )");

        let err = ServiceLineParser::strict()
            .parse("Workshop 01.05.25 ( 1.5 hours )")
            .unwrap_err();
        assert!(err.to_string().contains("hours in parentheses"));
    }

    #[test]
    fn test_out_of_range_hours() {
        let raw = "Work 01.05.25 (123456789012345678901234567890123 hours)";

        let err = ServiceLineParser::strict().parse(raw).unwrap_err();
        assert!(matches!(err, InputError::InvalidService { .. }));
        assert!(err.to_string().contains("out of range"));

        // Permissive parsing bills nothing but still strips the parenthetical.
        let line = ServiceLineParser::permissive().parse(raw).unwrap();
        assert_eq!(line.hours, Decimal::ZERO);
        assert_eq!(line.description, "Work");
        assert_eq!(parse_service(&line.description).description, "Work");
    }

    #[test]
    fn test_missing_hours_is_zero_when_permissive() {
        let line = ServiceLineParser::permissive()
            .parse("Consulting 21.04.25")
            .unwrap();

        assert_eq!(line.hours, Decimal::ZERO);
        assert_eq!(line.line_cost(dec("100")), Some(Decimal::ZERO));
        assert_eq!(line.description, "Consulting");
    }

    #[test]
    fn test_other_phrasings_bill_nothing() {
        let parser = ServiceLineParser::permissive();

        for raw in ["Support (2 hrs)", "Support (2h)", "Support 2 hours", "Support (2 Hours)"] {
            let line = parser.parse(raw).unwrap();
            assert_eq!(line.hours, Decimal::ZERO, "input {raw}");
        }
    }

    #[test]
    fn test_missing_hours_rejected_when_strict() {
        let err = ServiceLineParser::strict()
            .parse("Consulting 21.04.25")
            .unwrap_err();

        assert!(matches!(err, InputError::InvalidService { .. }));
        assert!(err.to_string().contains("hours in parentheses"));
    }

    #[test]
    fn test_missing_date_rejected_when_strict() {
        let err = ServiceLineParser::strict()
            .parse("AI Consultancy (2 hours)")
            .unwrap_err();
        assert!(err.to_string().contains("DD.MM.YY"));

        let err = ServiceLineParser::strict()
            .parse("AI Consultancy 30.02.25 (2 hours)")
            .unwrap_err();
        assert!(err.to_string().contains("invalid date"));
    }

    #[test]
    fn test_description_has_no_date_or_hours() {
        let parser = ServiceLineParser::permissive();
        let inputs = [
            "Notes write up 29.03.25 (1 hour)",
            "29.03.2025 Kick-off meeting (3 hours)",
            "Review   of 1.4.25 draft (0.5 hours) follow-up",
        ];

        for raw in inputs {
            let line = parser.parse(raw).unwrap();
            assert!(SERVICE_HOURS.find(&line.description).is_none(), "{raw}");
            assert!(DateExtractor::new().extract(&line.description).is_none(), "{raw}");
            assert!(!line.description.contains("  "), "{raw}");
        }

        assert_eq!(
            parser.parse(inputs[2]).unwrap().description,
            "Review of draft follow-up"
        );
    }

    #[test]
    fn test_parse_all_keeps_order() {
        let services = vec![
            "B task 02.01.25 (1 hour)".to_string(),
            "A task 01.01.25 (2 hours)".to_string(),
        ];

        let lines = ServiceLineParser::strict().parse_all(&services).unwrap();
        assert_eq!(lines[0].description, "B task");
        assert_eq!(lines[1].description, "A task");
    }
}
