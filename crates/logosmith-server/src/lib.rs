//! Logosmith Server — HTTP backend for the logo design consultation
//! workflow.
//!
//! A thin axum adapter over `logosmith-core`: it exposes the session and
//! chat endpoints that drive the workflow engine, serves the static
//! frontend when configured, and wires up CORS and request tracing.

pub mod api;

use std::net::SocketAddr;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use logosmith_core::state::AppState;

/// Configuration for the Logosmith backend server.
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Optional path to static frontend files. When set, the server serves
    /// these files for all non-API routes (`index.html` fallback).
    pub static_dir: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            static_dir: None,
        }
    }
}

/// Initialize tracing for the server process. Safe to call once.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "logosmith_server=info,logosmith_core=info,tower_http=info".into()
            }),
        )
        .init();
}

/// Build the application router (exposed separately for tests).
pub fn app(state: AppState, static_dir: Option<&str>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = Router::new()
        .merge(api::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Serve static frontend files if configured
    if let Some(static_dir) = static_dir {
        let static_path = std::path::Path::new(static_dir);
        if static_path.exists() && static_path.is_dir() {
            tracing::info!("Serving static frontend from: {}", static_dir);
            let serve_dir = tower_http::services::ServeDir::new(static_dir).not_found_service(
                tower_http::services::ServeFile::new(static_path.join("index.html")),
            );
            app = app.fallback_service(serve_dir);
        } else {
            tracing::warn!(
                "Static directory not found: {}. Frontend won't be served.",
                static_dir
            );
            app = app.fallback(api::index_placeholder);
        }
    } else {
        app = app.fallback(api::index_placeholder);
    }

    app
}

/// Start the HTTP server with a pre-built `AppState`.
///
/// Returns the actual address the server is listening on; the serve loop
/// runs in a background task.
pub async fn start_server(config: ServerConfig, state: AppState) -> Result<SocketAddr, String> {
    tracing::info!(
        "Starting Logosmith backend server on {}:{}",
        config.host,
        config.port
    );

    let app = app(state, config.static_dir.as_deref());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| format!("Invalid address: {}", e))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;

    let local_addr = listener
        .local_addr()
        .map_err(|e| format!("Failed to get local address: {}", e))?;

    tracing::info!("Logosmith backend server listening on {}", local_addr);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("Server error: {}", e);
        }
    });

    Ok(local_addr)
}
