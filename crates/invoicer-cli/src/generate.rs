//! Generate an invoice from a YAML file in the invoices directory.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use invoicer_convert::{BackendKind, ConverterChain};
use invoicer_core::invoice::rules::{DateSource, format_amount, vat_label};
use invoicer_core::{
    GeneratedInvoice, InvoiceGenerator, InvoiceRequest, InvoicerConfig, output_path_for,
    pdf_path_for,
};

/// Arguments for invoice generation.
#[derive(Args)]
pub struct GenerateArgs {
    /// Input YAML file name, looked up in the invoices directory
    #[arg(required = true)]
    input: String,

    /// Also convert the document to PDF
    #[arg(long)]
    pdf: bool,

    /// PDF backend: 'libreoffice' (falls back to docx2pdf) or 'docx2pdf'
    #[arg(long, value_name = "BACKEND")]
    pdf_backend: Option<String>,

    /// Open the generated file when done
    #[arg(long)]
    open: bool,
}

pub async fn run(args: GenerateArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    // Load configuration
    let config = if let Some(path) = config_path {
        InvoicerConfig::from_file(Path::new(path))
            .with_context(|| format!("failed to load config {path}"))?
    } else {
        InvoicerConfig::default()
    };

    // Validate the backend name before doing any work, but only when it is used
    let backend: Option<BackendKind> = if args.pdf {
        let name = args
            .pdf_backend
            .as_deref()
            .unwrap_or(config.conversion.backend.as_str());
        Some(name.parse()?)
    } else {
        if args.pdf_backend.is_some() {
            warn!("--pdf-backend has no effect without --pdf");
        }
        None
    };

    let invoices_dir = &config.output.invoices_dir;
    std::fs::create_dir_all(invoices_dir)
        .with_context(|| format!("failed to create {}", invoices_dir.display()))?;

    let input = config.input_path(&args.input);
    let request = InvoiceRequest::from_yaml_file(&input)?;
    let output = output_path_for(&input);

    info!("Starting invoice generation...");
    let mode = config.parsing.mode;
    let timeout = Duration::from_secs(config.conversion.timeout_secs);
    let generator = InvoiceGenerator::new(config);
    let generated = generator.generate(&request, mode, &output)?;

    print_summary(request.invoice_number, &generated);

    let mut open_path = generated.docx_path.clone();
    if let Some(backend) = backend {
        let pdf = pdf_path_for(&generated.docx_path);
        let chain = ConverterChain::for_kind(backend, timeout);
        debug!("PDF backends: {:?}", chain.backend_names());

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")?,
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(format!("Converting to PDF with {backend}..."));

        match chain.convert(&generated.docx_path, &pdf).await {
            Ok(used) => {
                pb.finish_and_clear();
                println!(
                    "{} PDF written to {} ({})",
                    style("✓").green(),
                    pdf.display(),
                    used
                );
                open_path = pdf;
            }
            Err(e) => {
                pb.finish_and_clear();
                eprintln!(
                    "{} PDF conversion failed, DOCX kept at {}",
                    style("✗").red(),
                    generated.docx_path.display()
                );
                return Err(e.into());
            }
        }
    }

    if args.open {
        open_document(&open_path).await;
    }

    info!("Invoice generation completed successfully");
    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn print_summary(invoice_number: u32, generated: &GeneratedInvoice) {
    let totals = &generated.totals;

    println!(
        "{} Invoice #{} written to {}",
        style("✓").green(),
        invoice_number,
        generated.docx_path.display()
    );
    if generated.date.source == DateSource::Fallback {
        println!(
            "{} Invoice date could not be parsed, used {}",
            style("!").yellow(),
            generated.date.display()
        );
    }
    println!(
        "{} {} services, subtotal {}, {} {}, total due {}",
        style("ℹ").blue(),
        generated.lines.len(),
        format_amount(totals.subtotal),
        vat_label(totals.vat_rate),
        format_amount(totals.vat_amount),
        style(format_amount(totals.total_due)).bold()
    );
}

/// Open a file with the platform's default application. Failure only warns.
async fn open_document(path: &Path) {
    let mut cmd = if cfg!(target_os = "macos") {
        tokio::process::Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut cmd = tokio::process::Command::new("cmd");
        cmd.args(["/C", "start", ""]);
        cmd
    } else {
        tokio::process::Command::new("xdg-open")
    };
    cmd.arg(path);

    info!("Attempting to open the document: {}", path.display());
    match cmd.status().await {
        Ok(status) if status.success() => info!("Document opened successfully"),
        Ok(status) => warn!("Could not open {}: opener exited with {}", path.display(), status),
        Err(e) => warn!("Could not open {}: {}", path.display(), e),
    }
}
