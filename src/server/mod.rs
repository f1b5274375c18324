//! Web UI for analyzing text.
//!
//! One page with an input pane (text area, file upload, analyze button) and
//! a results pane with Summary, Bias Detection and Insights tabs. Each
//! request builds its own session; the submitted form carries the text.
//! A small JSON API exposes the same operations.

mod assets;
mod handlers;
mod routes;
mod template_structs;

pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::analysis::Analyzer;
use crate::config::Settings;
use crate::llm::{LlmClient, ModelProvider};

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Analyzer,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let client = LlmClient::new(settings.llm.clone())?;
        Ok(Self::with_provider(Arc::new(client), settings.max_upload_bytes))
    }

    pub fn with_provider(provider: Arc<dyn ModelProvider>, max_upload_bytes: usize) -> Self {
        Self {
            analyzer: Analyzer::new(provider),
            max_upload_bytes,
        }
    }
}

/// Start the web server.
pub async fn serve(settings: &Settings, bind: &str) -> anyhow::Result<()> {
    let state = AppState::new(settings)?;
    let provider = state.analyzer.provider().describe();
    let app = create_router(state);

    let addr: SocketAddr = bind.parse()?;
    tracing::info!("Starting server at http://{} using {}", addr, provider);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
