use invoicer_api::ApiConfig;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ApiConfig::from_env()?;

    let level = if config.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    tracing::info!(
        "Starting Invoice Generator API v{} (verbose logging {})",
        env!("CARGO_PKG_VERSION"),
        if config.verbose { "enabled" } else { "disabled" }
    );

    invoicer_api::run(config).await
}
