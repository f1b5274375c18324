//! Model provider abstraction.
//!
//! Every flow talks to the inference service through [`ModelProvider`]. The
//! trait is object-safe so the server and CLI can share one
//! `Arc<dyn ModelProvider>` across concurrent tasks.

use async_trait::async_trait;
use serde_json::Value;

use super::LlmError;

/// A single structured generation request.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// Name of the flow issuing the request (for logs).
    pub name: &'static str,
    /// Fully rendered prompt text.
    pub prompt: String,
    /// JSON schema the response must conform to.
    pub schema: Value,
}

impl GenerateRequest {
    pub fn new(name: &'static str, prompt: impl Into<String>, schema: Value) -> Self {
        Self {
            name,
            prompt: prompt.into(),
            schema,
        }
    }
}

/// Trait for model inference backends.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Send one request and return the model's raw text answer.
    ///
    /// The answer is expected to be JSON matching `request.schema`, but
    /// validating that is the caller's job.
    async fn generate(&self, request: &GenerateRequest) -> Result<String, LlmError>;

    /// Human-readable description of the backend (provider and model).
    fn describe(&self) -> String;

    /// Check whether the backend is reachable and configured.
    async fn is_available(&self) -> bool {
        true
    }
}
