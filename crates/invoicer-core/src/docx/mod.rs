//! Word document output.
//!
//! A [`Layout`] is a small set of rendering primitives (paragraphs, runs,
//! tables, inline images). Writers turn it into a file format.

mod writer;
mod xml;

pub use writer::DocxWriter;

use std::path::Path;

use tracing::info;

use crate::document::assets::ImageAsset;
use crate::error::DocumentError;

/// Result type for document output.
pub type Result<T> = std::result::Result<T, DocumentError>;

/// Page content ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    /// Default font family.
    pub font_name: String,

    /// Default font size in points.
    pub font_size_pt: f64,

    /// Body blocks in order.
    pub body: Vec<Block>,

    /// Page footer paragraphs, repeated on every page.
    pub page_footer: Vec<Paragraph>,
}

/// Top-level body element.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
}

/// Horizontal paragraph alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Alignment {
    #[default]
    Left,
    Right,
}

/// Named paragraph style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParagraphStyle {
    #[default]
    Normal,
    Heading2,
}

/// A paragraph of runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    pub style: ParagraphStyle,
    pub alignment: Alignment,
    pub runs: Vec<Run>,
}

impl Paragraph {
    /// Empty paragraph, used as vertical space.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Paragraph with a single plain run.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            runs: vec![Run::text(text)],
            ..Self::default()
        }
    }

    pub fn with_run(mut self, run: Run) -> Self {
        self.runs.push(run);
        self
    }

    pub fn aligned(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn styled(mut self, style: ParagraphStyle) -> Self {
        self.style = style;
        self
    }
}

/// A run of uniformly formatted content.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub content: RunContent,
    pub bold: bool,
    /// Font size in points; `None` uses the document default.
    pub size_pt: Option<f64>,
}

impl Run {
    /// Plain text run. Newlines become line breaks.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: RunContent::Text(text.into()),
            bold: false,
            size_pt: None,
        }
    }

    /// Run holding an inline image.
    pub fn image(image: ImageAsset, width_in: f64) -> Self {
        Self {
            content: RunContent::Image(InlineImage { image, width_in }),
            bold: false,
            size_pt: None,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn sized(mut self, size_pt: f64) -> Self {
        self.size_pt = Some(size_pt);
        self
    }
}

/// Run content.
#[derive(Debug, Clone, PartialEq)]
pub enum RunContent {
    Text(String),
    Image(InlineImage),
}

/// Image scaled to a display width; height follows the aspect ratio.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineImage {
    pub image: ImageAsset,
    pub width_in: f64,
}

/// A table.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Column widths in inches.
    pub column_widths: Vec<f64>,

    /// Draw cell borders.
    pub grid: bool,

    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableCell {
    pub paragraphs: Vec<Paragraph>,

    /// Background colour as hex RGB, e.g. "A9D08E".
    pub fill: Option<String>,
}

impl TableCell {
    pub fn new(paragraphs: Vec<Paragraph>) -> Self {
        Self {
            paragraphs,
            fill: None,
        }
    }

    pub fn filled(mut self, fill: &str) -> Self {
        self.fill = Some(fill.to_string());
        self
    }
}

/// Renders a [`Layout`] into a document file.
pub trait DocumentWriter: Send + Sync {
    /// Render the layout to bytes.
    fn write(&self, layout: &Layout) -> Result<Vec<u8>>;

    /// Render the layout and save it to `path`.
    fn save(&self, layout: &Layout, path: &Path) -> Result<()> {
        let bytes = self.write(layout)?;
        std::fs::write(path, &bytes).map_err(|source| DocumentError::Write {
            path: path.display().to_string(),
            source,
        })?;
        info!("Saved document to {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }
}
