//! Router construction and server startup.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use invoicer_convert::{BackendKind, ConverterChain};
use invoicer_core::{InvoiceGenerator, InvoicerConfig};

use crate::config::ApiConfig;
use crate::handlers;

/// Shared request state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ApiConfig>,
    pub generator: Arc<InvoiceGenerator>,
    pub converter: Arc<ConverterChain>,
}

impl AppState {
    /// State with the converter chain named by the generator config.
    pub fn new(config: ApiConfig, invoicer: InvoicerConfig) -> anyhow::Result<Self> {
        let backend: BackendKind = invoicer.conversion.backend.parse()?;
        let timeout = Duration::from_secs(invoicer.conversion.timeout_secs);
        let converter = ConverterChain::for_kind(backend, timeout);

        Ok(Self::with_converter(config, invoicer, converter))
    }

    pub fn with_converter(
        config: ApiConfig,
        invoicer: InvoicerConfig,
        converter: ConverterChain,
    ) -> Self {
        Self {
            config: Arc::new(config),
            generator: Arc::new(InvoiceGenerator::new(invoicer)),
            converter: Arc::new(converter),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/", get(handlers::info::root))
        .route("/version", get(handlers::info::version))
        .route("/example-client", get(handlers::info::example_client))
        .route("/generate-invoice", post(handlers::invoice::generate_invoice))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS policy from the configured origins.
///
/// Browsers reject a literal `*` together with credentials, so a wildcard
/// with credentials enabled mirrors the request origin instead.
pub fn cors_layer(config: &ApiConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods([Method::GET, Method::POST, Method::OPTIONS]);

    if config.allows_any_origin() {
        return if config.cors_allow_credentials {
            layer
                .allow_origin(AllowOrigin::mirror_request())
                .allow_headers(AllowHeaders::mirror_request())
                .allow_credentials(true)
        } else {
            layer.allow_origin(Any).allow_headers(Any)
        };
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    layer
        .allow_origin(AllowOrigin::list(origins))
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(config.cors_allow_credentials)
}

/// Bind and serve until the process is stopped.
pub async fn run(config: ApiConfig) -> anyhow::Result<()> {
    let invoicer = config.load_invoicer_config()?;
    let addr = config.bind_addr()?;

    info!("CORS configured with origins: {:?}", config.cors_origins);
    let state = AppState::new(config, invoicer)?;
    let app = build_router(state);

    let listener = TcpListener::bind(addr).await.map_err(|e| {
        tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
        e
    })?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
