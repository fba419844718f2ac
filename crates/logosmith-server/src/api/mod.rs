//! HTTP API routes.

pub mod consultation;

use axum::response::Html;
use axum::Router;

use logosmith_core::state::AppState;

/// Build the complete API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(consultation::router())
        .route("/api/health", axum::routing::get(health_check))
}

async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "server": "logosmith-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Fallback page when no static frontend directory is configured.
pub async fn index_placeholder() -> Html<&'static str> {
    Html(
        "<!doctype html><html><head><title>Logosmith</title></head>\
         <body><h1>Logosmith</h1>\
         <p>Logo design consultation backend. Start a session via \
         <code>GET /tech_logo</code>, then talk to it via \
         <code>POST /chat</code>.</p></body></html>",
    )
}
