//! LLM integration for structured text analysis.
//!
//! Flows render a prompt, pick an output schema, and hand both to a
//! [`ModelProvider`]. [`LlmClient`] is the HTTP implementation used in
//! production; tests substitute their own provider.

mod client;
mod config;
mod provider;
pub mod schema;

use thiserror::Error;

pub use client::LlmClient;
pub use config::{LlmConfig, LlmProvider};
pub use provider::{GenerateRequest, ModelProvider};

/// Errors that can occur during LLM operations.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Failed to build the HTTP client
    #[error("HTTP client error: {0}")]
    Client(String),
    /// Failed to connect to LLM service
    #[error("Connection error: {0}")]
    Connection(String),
    /// API returned a non-success status
    #[error("API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },
    /// Failed to read the provider's envelope
    #[error("Parse error: {0}")]
    Parse(String),
    /// Provider refused the prompt
    #[error("Prompt blocked by provider: {0}")]
    Blocked(String),
    /// Provider needs a key and none was configured
    #[error("No API key configured for {0}")]
    MissingApiKey(LlmProvider),
    /// LLM is disabled
    #[error("LLM is disabled")]
    Disabled,
}
