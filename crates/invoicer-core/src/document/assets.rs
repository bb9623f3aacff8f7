//! Image resources: company icon and paid stamp.
//!
//! Both are decorative. A missing or unreadable image is logged and skipped,
//! never an error.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{ImageFormat, ImageReader};
use tracing::{debug, warn};

use crate::error::{DocumentError, InputError, InvoicerError};
use crate::models::config::AssetsConfig;
use crate::models::invoice::IconSource;

/// An image ready to embed.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAsset {
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
    pub width_px: u32,
    pub height_px: u32,
}

impl ImageAsset {
    /// Probe format and dimensions without decoding the pixels.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, DocumentError> {
        let format = image::guess_format(&bytes)?;
        let (width_px, height_px) =
            ImageReader::with_format(Cursor::new(&bytes), format).into_dimensions()?;

        Ok(Self {
            bytes,
            format,
            width_px,
            height_px,
        })
    }

    /// Read an image file.
    pub fn from_file(path: &Path) -> Result<Self, InvoicerError> {
        let bytes = std::fs::read(path)?;
        Ok(Self::from_bytes(bytes)?)
    }

    /// File extension used inside the document package.
    pub fn extension(&self) -> &'static str {
        self.format.extensions_str().first().copied().unwrap_or("png")
    }

    /// MIME type of the image.
    pub fn content_type(&self) -> &'static str {
        self.format.to_mime_type()
    }

    /// Display height for a given display width, keeping the aspect ratio.
    pub fn height_for_width(&self, width: f64) -> f64 {
        if self.width_px == 0 {
            return width;
        }
        width * f64::from(self.height_px) / f64::from(self.width_px)
    }
}

/// Images for one invoice, after soft fallbacks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedAssets {
    pub icon: Option<ImageAsset>,
    pub paid_stamp: Option<ImageAsset>,
}

impl ResolvedAssets {
    /// Load the icon and, for paid invoices, the stamp.
    pub fn resolve(icon: &IconSource, paid: bool, assets: &AssetsConfig) -> Self {
        Self {
            icon: resolve_icon(icon, assets),
            paid_stamp: resolve_paid_stamp(paid, assets),
        }
    }
}

/// Resolve the company icon: inline data, then the name as given, then the
/// name inside the assets directory.
pub fn resolve_icon(source: &IconSource, assets: &AssetsConfig) -> Option<ImageAsset> {
    match source {
        IconSource::Inline(data) => match decode_inline(data) {
            Ok(asset) => Some(asset),
            Err(e) => {
                warn!("Could not read inline company icon: {}", e);
                None
            }
        },
        IconSource::File(name) => {
            let candidates = [PathBuf::from(name), assets.assets_dir.join(name)];
            for path in candidates.iter().filter(|p| p.is_file()) {
                match ImageAsset::from_file(path) {
                    Ok(asset) => {
                        debug!("Loaded company icon from {}", path.display());
                        return Some(asset);
                    }
                    Err(e) => warn!("Could not read company icon {}: {}", path.display(), e),
                }
            }
            warn!("Company icon '{}' not found", name);
            None
        }
    }
}

/// Load the paid stamp when the invoice is marked paid.
pub fn resolve_paid_stamp(paid: bool, assets: &AssetsConfig) -> Option<ImageAsset> {
    if !paid {
        return None;
    }

    let path = &assets.paid_stamp;
    if !path.is_file() {
        warn!("PAID stamp image not found at {}", path.display());
        return None;
    }

    match ImageAsset::from_file(path) {
        Ok(asset) => Some(asset),
        Err(e) => {
            warn!("Failed to load PAID stamp {}: {}", path.display(), e);
            None
        }
    }
}

fn decode_inline(data: &str) -> Result<ImageAsset, InvoicerError> {
    // Accept data URLs ("data:image/png;base64,....") as well as bare base64.
    let payload = match data.split_once(',') {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => data,
    };

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| InputError::Validation {
            field: "icon_data".to_string(),
            reason: format!("invalid base64: {e}"),
        })?;

    Ok(ImageAsset::from_bytes(bytes)?)
}
