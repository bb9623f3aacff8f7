//! Typed invoice input shared by the YAML file and the JSON API body.

use std::path::Path;

use rust_decimal::Decimal;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info};

use crate::error::{InputError, InvoicerError};
use crate::invoice::ServiceLineParser;
use crate::models::config::LayoutConfig;
use crate::models::invoice::{CompanyFooterInfo, DocumentSettings, IconSource, InvoiceHeader, Rates};

/// VAT percentage used when the input does not name one.
pub const DEFAULT_VAT_RATE: i64 = 20;

/// Flat invoice input: header, services, rates, footer and document settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRequest {
    /// Issuing company name.
    pub company_name: String,

    /// Invoice number.
    pub invoice_number: u32,

    /// Invoice date in DD.MM.YY format. Anything unparsable falls back to today.
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub invoice_date: Option<String>,

    /// Client name or company.
    pub client_name: String,

    /// Client address, lines separated by newlines.
    pub client_address: String,

    /// Service descriptors, e.g. "AI Consultancy 29.03.25 (1 hour)".
    pub services: Vec<String>,

    /// Hourly rate in GBP.
    pub hourly_rate: Decimal,

    /// VAT percentage (default 20).
    #[serde(default)]
    pub vat_rate: Option<Decimal>,

    /// Payment terms in days.
    pub payment_terms_days: u32,

    pub bank_address: String,

    #[serde(deserialize_with = "scalar_string")]
    pub account_number: String,

    #[serde(deserialize_with = "scalar_string")]
    pub sort_code: String,

    #[serde(deserialize_with = "scalar_string")]
    pub company_number: String,

    #[serde(deserialize_with = "scalar_string")]
    pub vat_number: String,

    pub registered_address: String,

    pub email: String,

    #[serde(deserialize_with = "scalar_string")]
    pub contact_number: String,

    /// Overlay the paid stamp.
    #[serde(default)]
    pub paid: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_name: Option<String>,

    /// Icon file name, looked up as given and then in the assets directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_name: Option<String>,

    /// Base64 icon image; takes precedence over `icon_name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_data: Option<String>,

    /// Header column widths in inches [left, right].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_widths: Option<Vec<f64>>,

    /// Show a separate date column in the service table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_dates: Option<bool>,
}

/// An [`InvoiceRequest`] split into the parts the generator works with.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceParts {
    pub header: InvoiceHeader,
    pub services: Vec<String>,
    pub rates: Rates,
    pub footer: CompanyFooterInfo,
    pub settings: DocumentSettings,
}

impl InvoiceRequest {
    /// Load an invoice request from a YAML file.
    pub fn from_yaml_file(path: &Path) -> Result<Self, InvoicerError> {
        info!("Loading invoice details from {}", path.display());

        if !path.exists() {
            return Err(InputError::NotFound(path.display().to_string()).into());
        }

        let content = std::fs::read_to_string(path)?;
        let request = Self::from_yaml_str(&content)?;
        request.log_details();
        Ok(request)
    }

    /// Parse an invoice request from YAML text.
    pub fn from_yaml_str(content: &str) -> Result<Self, InputError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Parse an invoice request from a JSON body.
    pub fn from_json_slice(body: &[u8]) -> Result<Self, InputError> {
        Ok(serde_json::from_slice(body)?)
    }

    /// VAT rate with the default applied.
    pub fn effective_vat_rate(&self) -> Decimal {
        self.vat_rate.unwrap_or(Decimal::from(DEFAULT_VAT_RATE))
    }

    /// Boundary validation used by the API: numeric constraints plus strict
    /// service-line checks. Reports every failing field.
    pub fn validate_strict(&self) -> Result<(), InputError> {
        let mut errors = Vec::new();

        if self.invoice_number == 0 {
            errors.push(invalid("invoice_number", "must be greater than 0"));
        }
        if self.payment_terms_days == 0 {
            errors.push(invalid("payment_terms_days", "must be greater than 0"));
        }
        if self.hourly_rate <= Decimal::ZERO {
            errors.push(invalid("hourly_rate", "must be greater than 0"));
        }
        if self.effective_vat_rate() < Decimal::ZERO {
            errors.push(invalid("vat_rate", "must not be negative"));
        }
        if let Some(widths) = &self.column_widths {
            if let Err(e) = column_widths(widths) {
                errors.push(e);
            }
        }

        let parser = ServiceLineParser::strict();
        for service in &self.services {
            if let Err(e) = parser.parse(service) {
                errors.push(e);
            }
        }

        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(InputError::Multiple(errors)),
        }
    }

    /// Split into generator parts, applying layout defaults for omitted settings.
    pub fn split(&self, defaults: &LayoutConfig) -> Result<InvoiceParts, InputError> {
        let widths = match &self.column_widths {
            Some(widths) => column_widths(widths)?,
            None => defaults.column_widths,
        };

        let icon = match (&self.icon_data, &self.icon_name) {
            (Some(data), _) => IconSource::Inline(data.clone()),
            (None, Some(name)) => IconSource::File(name.clone()),
            (None, None) => IconSource::File(defaults.icon_name.clone()),
        };

        Ok(InvoiceParts {
            header: InvoiceHeader {
                company_name: self.company_name.clone(),
                invoice_number: self.invoice_number,
                invoice_date: self.invoice_date.clone(),
                client_name: self.client_name.clone(),
                client_address: self.client_address.clone(),
            },
            services: self.services.clone(),
            rates: Rates {
                hourly_rate: self.hourly_rate,
                vat_rate: self.effective_vat_rate(),
            },
            footer: CompanyFooterInfo {
                payment_terms_days: self.payment_terms_days,
                bank_address: self.bank_address.clone(),
                account_number: self.account_number.clone(),
                sort_code: self.sort_code.clone(),
                company_number: self.company_number.clone(),
                vat_number: self.vat_number.clone(),
                registered_address: self.registered_address.clone(),
                email: self.email.clone(),
                contact_number: self.contact_number.clone(),
                paid: self.paid,
            },
            settings: DocumentSettings {
                font_name: self
                    .font_name
                    .clone()
                    .unwrap_or_else(|| defaults.font_name.clone()),
                icon,
                column_widths: widths,
                show_dates: self.show_dates.unwrap_or(defaults.show_dates),
            },
        })
    }

    fn log_details(&self) {
        info!(
            "Loaded invoice #{} for {} ({} services)",
            self.invoice_number,
            self.client_name,
            self.services.len()
        );
        debug!("Company Name: {}", self.company_name);
        debug!("Invoice Date: {:?}", self.invoice_date);
        debug!("Client Address: {:?}", self.client_address);
        debug!("Services: {:?}", self.services);
        debug!("Hourly Rate: £{}", self.hourly_rate);
        debug!("VAT Rate: {}%", self.effective_vat_rate());
        debug!("Payment Terms: {} days", self.payment_terms_days);
        debug!(
            "Bank: {} / {} / {}",
            self.bank_address, self.account_number, self.sort_code
        );
        debug!(
            "Company Number: {}, VAT Number: {}",
            self.company_number, self.vat_number
        );
        debug!("Contact: {} | {}", self.email, self.contact_number);
    }
}

fn invalid(field: &str, reason: &str) -> InputError {
    InputError::Validation {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

fn column_widths(widths: &[f64]) -> Result<[f64; 2], InputError> {
    match widths {
        [left, right] if *left > 0.0 && *right > 0.0 => Ok([*left, *right]),
        [_, _] => Err(invalid("column_widths", "widths must be positive")),
        _ => Err(invalid("column_widths", "expected exactly two widths")),
    }
}

/// Accepts any scalar (YAML often leaves account numbers unquoted) as text.
fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Bool(b) => Ok(b.to_string()),
        other => Err(D::Error::custom(format!(
            "expected a string or number, found {other}"
        ))),
    }
}

/// Like [`scalar_string`], but never fails: non-scalar values are kept as
/// their JSON text so date resolution can fall back on them.
fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        match Option::<serde_json::Value>::deserialize(deserializer)? {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(s)) => Some(s),
            Some(other) => Some(other.to_string()),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    const YAML: &str = r#"
company_name: Diorama Consulting Ltd
invoice_number: 1008
invoice_date: "21.04.25"
client_name: Mike Smith
client_address: "17 Poland St.\nLondon\nW2 4ZZ\nU.K."
services:
  - AI Consultancy 29.03.25 (1 hour)
  - Notes write up 29.03.25 (1.5 hours)
hourly_rate: 300
payment_terms_days: 30
bank_address: 123 Bank St, London, UK
account_number: 12345678
sort_code: 12-34-56
company_number: 12345678
vat_number: GB123456789
registered_address: 123 Business St, London, UK
email: contact@example.com
contact_number: 07700 900123
"#;

    #[test]
    fn test_yaml_with_bare_numbers() {
        let request = InvoiceRequest::from_yaml_str(YAML).unwrap();

        assert_eq!(request.account_number, "12345678");
        assert_eq!(request.company_number, "12345678");
        assert_eq!(request.sort_code, "12-34-56");
        assert_eq!(request.hourly_rate, Decimal::from(300));
        assert_eq!(request.invoice_date.as_deref(), Some("21.04.25"));
        assert!(!request.paid);
    }

    #[test]
    fn test_defaults_applied_on_split() {
        let request = InvoiceRequest::from_yaml_str(YAML).unwrap();
        let parts = request.split(&LayoutConfig::default()).unwrap();

        assert_eq!(parts.rates.vat_rate, Decimal::from(20));
        assert_eq!(parts.settings.font_name, "Calibri");
        assert_eq!(parts.settings.column_widths, [2.5, 3.5]);
        assert_eq!(
            parts.settings.icon,
            IconSource::File("DioramaConsultingIcon.png".to_string())
        );
        assert!(!parts.settings.show_dates);
        assert_eq!(parts.footer.payment_terms_days, 30);
        assert_eq!(parts.services.len(), 2);
    }

    #[test]
    fn test_inline_icon_wins() {
        let mut request = InvoiceRequest::from_yaml_str(YAML).unwrap();
        request.icon_name = Some("logo.png".to_string());
        request.icon_data = Some("aGVsbG8=".to_string());

        let parts = request.split(&LayoutConfig::default()).unwrap();
        assert_eq!(parts.settings.icon, IconSource::Inline("aGVsbG8=".to_string()));
    }

    #[test]
    fn test_non_string_date_is_kept_for_fallback() {
        let yaml = YAML.replace("invoice_date: \"21.04.25\"", "invoice_date: 20250421");
        let request = InvoiceRequest::from_yaml_str(&yaml).unwrap();
        assert_eq!(request.invoice_date.as_deref(), Some("20250421"));
    }

    #[test]
    fn test_missing_required_field() {
        let yaml = YAML.replace("client_name: Mike Smith\n", "");
        let err = InvoiceRequest::from_yaml_str(&yaml).unwrap_err();
        assert!(err.to_string().contains("client_name"));
    }

    #[test]
    fn test_json_body() {
        let body = serde_json::json!({
            "company_name": "My Consulting Ltd",
            "invoice_number": 1010,
            "client_name": "Web Client Test",
            "client_address": "123 Browser St.",
            "services": ["API Testing 01.05.25 (2 hours)"],
            "hourly_rate": 200.5,
            "vat_rate": 17.5,
            "payment_terms_days": 30,
            "bank_address": "123 Bank St",
            "account_number": "12345678",
            "sort_code": "12-34-56",
            "company_number": "12345678",
            "vat_number": "GB123456789",
            "registered_address": "123 Business St",
            "email": "contact@example.com",
            "contact_number": "07700 900123",
            "column_widths": [2.0, 4.0],
            "paid": true
        });

        let request = InvoiceRequest::from_json_slice(body.to_string().as_bytes()).unwrap();
        assert_eq!(request.hourly_rate, Decimal::from_str("200.5").unwrap());
        assert_eq!(request.effective_vat_rate(), Decimal::from_str("17.5").unwrap());
        assert!(request.paid);
        assert!(request.validate_strict().is_ok());

        let parts = request.split(&LayoutConfig::default()).unwrap();
        assert_eq!(parts.settings.column_widths, [2.0, 4.0]);
    }

    #[test]
    fn test_strict_validation_reports_every_field() {
        let mut request = InvoiceRequest::from_yaml_str(YAML).unwrap();
        request.invoice_number = 0;
        request.hourly_rate = Decimal::ZERO;
        request.services.push("Consulting 21.04.25".to_string());

        let err = request.validate_strict().unwrap_err();
        match err {
            InputError::Multiple(errors) => assert_eq!(errors.len(), 3),
            other => panic!("expected multiple errors, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_column_widths() {
        let mut request = InvoiceRequest::from_yaml_str(YAML).unwrap();
        request.column_widths = Some(vec![2.5]);

        assert!(request.split(&LayoutConfig::default()).is_err());
        assert!(request.validate_strict().is_err());
    }
}
