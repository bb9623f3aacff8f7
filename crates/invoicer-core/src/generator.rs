//! End-to-end invoice generation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::document::{DocumentModel, ResolvedAssets, assemble, lay_out};
use crate::docx::{DocumentWriter, DocxWriter};
use crate::error::Result;
use crate::invoice::rules::{ResolvedDate, format_amount, resolve_invoice_date};
use crate::invoice::{ParseMode, ServiceLineParser, compute_totals};
use crate::models::config::InvoicerConfig;
use crate::models::invoice::{InvoiceTotals, ServiceLine};
use crate::models::request::InvoiceRequest;

/// Outcome of a successful generation.
#[derive(Debug, Clone)]
pub struct GeneratedInvoice {
    /// Where the document was written.
    pub docx_path: PathBuf,
    pub lines: Vec<ServiceLine>,
    pub totals: InvoiceTotals,
    pub date: ResolvedDate,
}

/// A fully assembled invoice that has not been written yet.
#[derive(Debug, Clone)]
pub struct PreparedInvoice {
    pub model: DocumentModel,
    pub lines: Vec<ServiceLine>,
    pub totals: InvoiceTotals,
    pub date: ResolvedDate,
}

/// Turns invoice requests into documents.
pub struct InvoiceGenerator<W: DocumentWriter = DocxWriter> {
    config: InvoicerConfig,
    clock: Arc<dyn Clock>,
    writer: W,
}

impl InvoiceGenerator<DocxWriter> {
    /// Generator writing DOCX files, dated by the system clock.
    pub fn new(config: InvoicerConfig) -> Self {
        Self::with_writer(config, DocxWriter::new())
    }
}

impl<W: DocumentWriter> InvoiceGenerator<W> {
    pub fn with_writer(config: InvoicerConfig, writer: W) -> Self {
        Self {
            config,
            clock: Arc::new(SystemClock),
            writer,
        }
    }

    /// Replace the clock used for the fallback invoice date.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn config(&self) -> &InvoicerConfig {
        &self.config
    }

    /// Parse, compute and assemble without writing anything.
    pub fn prepare(&self, request: &InvoiceRequest, mode: ParseMode) -> Result<PreparedInvoice> {
        let parts = request.split(&self.config.layout)?;
        debug!("Document settings: {:?}", parts.settings);

        let lines = ServiceLineParser::new(mode).parse_all(&parts.services)?;
        info!("Parsed {} service lines ({:?} mode)", lines.len(), mode);

        let totals = compute_totals(&lines, parts.rates.hourly_rate, parts.rates.vat_rate)?;
        let date = resolve_invoice_date(parts.header.invoice_date.as_deref(), self.clock.as_ref());

        let assets =
            ResolvedAssets::resolve(&parts.settings.icon, parts.footer.paid, &self.config.assets);

        let model = assemble(
            &parts.header,
            &date,
            &lines,
            &totals,
            &parts.footer,
            &parts.settings,
            assets,
        );

        Ok(PreparedInvoice {
            model,
            lines,
            totals,
            date,
        })
    }

    /// Generate the invoice document at `output_path`.
    pub fn generate(
        &self,
        request: &InvoiceRequest,
        mode: ParseMode,
        output_path: &Path,
    ) -> Result<GeneratedInvoice> {
        info!(
            "Generating invoice #{} for {}",
            request.invoice_number, request.client_name
        );

        let prepared = self.prepare(request, mode)?;
        let layout = lay_out(&prepared.model);

        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        self.writer.save(&layout, output_path)?;

        info!(
            "Invoice #{} written to {} (total due {})",
            request.invoice_number,
            output_path.display(),
            format_amount(prepared.totals.total_due)
        );

        Ok(GeneratedInvoice {
            docx_path: output_path.to_path_buf(),
            lines: prepared.lines,
            totals: prepared.totals,
            date: prepared.date,
        })
    }
}

/// Output document path for an input file: `<stem>_invoice.docx` beside it.
pub fn output_path_for(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "invoice".to_string());
    input.with_file_name(format!("{stem}_invoice.docx"))
}

/// PDF path for a document: same location and stem.
pub fn pdf_path_for(docx: &Path) -> PathBuf {
    docx.with_extension("pdf")
}
