//! Configuration structures for invoice generation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::invoice::ParseMode;

/// Main configuration for the invoicer pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoicerConfig {
    /// Where inputs are read from and documents written to.
    pub output: OutputConfig,

    /// Image resources.
    pub assets: AssetsConfig,

    /// Defaults for optional document settings.
    pub layout: LayoutConfig,

    /// Service-line parsing.
    pub parsing: ParsingConfig,

    /// PDF conversion.
    pub conversion: ConversionConfig,
}

/// Input/output directory configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory holding invoice input files and generated documents.
    pub invoices_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            invoices_dir: PathBuf::from("invoices"),
        }
    }
}

/// Image asset locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Directory searched for icons that are not found as given.
    pub assets_dir: PathBuf,

    /// Image overlaid in the page footer of paid invoices.
    pub paid_stamp: PathBuf,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from("assets"),
            paid_stamp: PathBuf::from("assets/paid_stamp.png"),
        }
    }
}

/// Defaults applied when the invoice input omits a document setting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Document font.
    pub font_name: String,

    /// Company icon file name.
    pub icon_name: String,

    /// Header column widths in inches [left, right].
    pub column_widths: [f64; 2],

    /// Show a separate date column in the service table.
    pub show_dates: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            font_name: "Calibri".to_string(),
            icon_name: "DioramaConsultingIcon.png".to_string(),
            column_widths: [2.5, 3.5],
            show_dates: false,
        }
    }
}

/// Service-line parsing configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingConfig {
    /// Parser mode used by the CLI. The API always parses strictly.
    pub mode: ParseMode,
}

/// PDF conversion configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Default backend name ("libreoffice" or "docx2pdf").
    pub backend: String,

    /// Timeout for a single backend invocation, in seconds.
    pub timeout_secs: u64,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            backend: "libreoffice".to_string(),
            timeout_secs: 120,
        }
    }
}

impl InvoicerConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }

    /// Resolve an input file name inside the invoices directory.
    pub fn input_path(&self, file_name: &str) -> PathBuf {
        self.output.invoices_dir.join(file_name)
    }
}
