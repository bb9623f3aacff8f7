//! CLI application for generating invoices from YAML files.

mod generate;

use clap::Parser;
use tracing::{Level, error};
use tracing_subscriber::FmtSubscriber;

/// Invoice generator - build DOCX (and optionally PDF) invoices from YAML
#[derive(Parser)]
#[command(name = "invoicer")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long)]
    config: Option<String>,

    #[command(flatten)]
    generate: generate::GenerateArgs,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to set up logging: {e}");
    }

    if let Err(e) = generate::run(cli.generate, cli.config.as_deref()).await {
        error!("Error generating invoice: {:#}", e);
        std::process::exit(1);
    }
}
