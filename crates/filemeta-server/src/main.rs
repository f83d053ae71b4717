//! File Metadata Microservice
//!
//! Accepts a single uploaded file via multipart/form-data and returns its
//! basic metadata (name, MIME type, size, extension) as JSON. Nothing is
//! persisted - uploads live in memory for the duration of the request only.

mod handlers;

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() {
    // Set up panic hook to log crashes
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()));
        let payload = if let Some(s) = info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        eprintln!("[PANIC] at {:?}: {}", location, payload);
        tracing::error!("PANIC at {:?}: {}", location, payload);
    }));

    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("[FATAL] Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!(
        "Starting File Metadata Microservice v{}",
        env!("CARGO_PKG_VERSION")
    );

    if let Err(e) = run_server().await {
        error!("Server failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run_server() -> Result<()> {
    let config = load_config().context("Failed to load configuration")?;
    info!("Config loaded: bind={}", config.bind_address);

    let app = router();

    let addr: SocketAddr = config
        .bind_address
        .parse()
        .context("Failed to parse bind address")?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!("Server ready to accept connections");
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Build the HTTP router: the upload form, a health check, and the
/// file analysis endpoint.
fn router() -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/api/fileanalyse", post(handlers::analyse::analyse))
        // Bound the request body stream so oversized uploads are cut short
        // instead of buffered in full
        .layer(DefaultBodyLimit::max(handlers::analyse::BODY_LIMIT_BYTES))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

#[derive(Debug, Clone)]
struct Config {
    bind_address: String,
}

fn load_config() -> Result<Config> {
    // BIND_ADDRESS wins; PORT is a shorthand that only overrides the port
    let bind_address = match std::env::var("BIND_ADDRESS") {
        Ok(addr) => addr,
        Err(_) => {
            let port = std::env::var("PORT").unwrap_or_else(|_| "5000".to_string());
            port.parse::<u16>()
                .with_context(|| format!("PORT must be a number, got: {}", port))?;
            format!("0.0.0.0:{}", port)
        }
    };

    Ok(Config { bind_address })
}
