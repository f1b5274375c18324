//! Router configuration for the web server.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    // Leave room for the multipart framing and the text field
    let body_limit = state.max_upload_bytes.saturating_add(64 * 1024);

    Router::new()
        // Page and form posts
        .route("/", get(handlers::index))
        .route("/analyze", post(handlers::analyze_form))
        .route("/upload", post(handlers::upload_form))
        // JSON API
        .route("/api/analyze", post(handlers::api_analyze))
        .route("/api/flows/:name", post(handlers::api_flow))
        .route("/api/status", get(handlers::api_status))
        // Static assets (CSS/JS)
        .route("/static/style.css", get(handlers::serve_css))
        .route("/static/app.js", get(handlers::serve_js))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
