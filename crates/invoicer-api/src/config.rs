//! Environment-based server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use invoicer_core::InvoicerConfig;

/// Server settings read from the environment.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// `VERBOSE`: debug logging.
    pub verbose: bool,

    /// `CORS_ORIGINS`: comma-separated allowed origins, `*` for any.
    pub cors_origins: Vec<String>,

    /// `CORS_ALLOW_CREDENTIALS`.
    pub cors_allow_credentials: bool,

    /// `HOST`.
    pub host: String,

    /// `PORT`.
    pub port: u16,

    /// `INVOICER_CONFIG`: optional JSON file with generator settings.
    pub invoicer_config: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            cors_origins: vec!["*".to_string()],
            cors_allow_credentials: true,
            host: "0.0.0.0".to_string(),
            port: 8000,
            invoicer_config: None,
        }
    }
}

impl ApiConfig {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let cors_origins = match lookup("CORS_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            None => defaults.cors_origins,
        };

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("invalid PORT '{raw}'"))?,
            None => defaults.port,
        };

        Ok(Self {
            verbose: lookup("VERBOSE").is_some_and(|v| parse_flag(&v)),
            cors_origins,
            cors_allow_credentials: lookup("CORS_ALLOW_CREDENTIALS")
                .map_or(defaults.cors_allow_credentials, |v| parse_flag(&v)),
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            invoicer_config: lookup("INVOICER_CONFIG").map(PathBuf::from),
        })
    }

    /// Socket address to listen on.
    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }

    /// Generator settings, from `INVOICER_CONFIG` when set.
    pub fn load_invoicer_config(&self) -> anyhow::Result<InvoicerConfig> {
        match &self.invoicer_config {
            Some(path) => InvoicerConfig::from_file(path)
                .with_context(|| format!("failed to load {}", path.display())),
            None => Ok(InvoicerConfig::default()),
        }
    }

    /// Whether any origin is allowed.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "t")
}
