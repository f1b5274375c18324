//! Prompt flows: typed schema-in/schema-out calls to a generative model.
//!
//! A flow renders a fixed prompt template from its input record, asks the
//! provider for JSON matching the output type's schema, and validates the
//! answer against that type. There is no retry; one call per invocation.

mod bias;
pub mod explanation;
mod insights;
mod summarize;

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::llm::schema::response_schema;
use crate::llm::{GenerateRequest, LlmError, ModelProvider};

pub use bias::{BiasOutput, DetectBiasFlow, DetectBiasInput};
pub use explanation::{BiasExplanation, BiasSection};
pub use insights::{AnalyzeFlow, AnalyzeInput, InsightsOutput};
pub use summarize::{SummarizeFlow, SummarizeInput, SummaryOutput};

/// Errors that can occur while running a flow.
#[derive(Debug, Error)]
pub enum FlowError {
    /// Input record did not match the flow's input schema.
    #[error("Invalid input for {flow}: {reason}")]
    InvalidInput { flow: &'static str, reason: String },

    /// Model answer did not match the flow's output schema.
    #[error("Model output for {flow} violates schema: {reason}")]
    SchemaViolation { flow: &'static str, reason: String },

    /// The provider call itself failed.
    #[error(transparent)]
    Provider(#[from] LlmError),

    /// A validated output could not be encoded back to JSON.
    #[error("Failed to encode {flow} output: {source}")]
    Encode {
        flow: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// A single prompt-and-schema call.
pub trait Flow {
    /// Flow name, used in logs and as the structured-output schema name.
    const NAME: &'static str;

    type Input: DeserializeOwned + Serialize + Send + Sync;
    type Output: DeserializeOwned + Serialize + JsonSchema + Send;

    /// Render the instruction sent to the model.
    fn prompt(input: &Self::Input) -> String;
}

/// Run a flow with a typed input.
pub async fn run<F: Flow>(
    provider: &dyn ModelProvider,
    input: &F::Input,
) -> Result<F::Output, FlowError> {
    let request = GenerateRequest::new(F::NAME, F::prompt(input), response_schema::<F::Output>());
    let raw = provider.generate(&request).await?;
    debug!(flow = F::NAME, "Validating model output");
    parse_output::<F::Output>(F::NAME, &raw)
}

/// Run a flow with an untyped JSON input, validating it first.
pub async fn run_json<F: Flow>(
    provider: &dyn ModelProvider,
    input: Value,
) -> Result<F::Output, FlowError> {
    let input: F::Input = parse_input::<F>(input)?;
    run::<F>(provider, &input).await
}

/// Validate an untyped input record against the flow's input type.
pub fn parse_input<F: Flow>(input: Value) -> Result<F::Input, FlowError> {
    serde_json::from_value(input).map_err(|e| FlowError::InvalidInput {
        flow: F::NAME,
        reason: e.to_string(),
    })
}

/// Validate raw model text against an output type.
pub fn parse_output<T: DeserializeOwned>(flow: &'static str, raw: &str) -> Result<T, FlowError> {
    serde_json::from_str(extract_json(raw)).map_err(|e| {
        warn!(flow, error = %e, "Model output failed schema validation");
        FlowError::SchemaViolation {
            flow,
            reason: e.to_string(),
        }
    })
}

/// Strip whitespace and a single surrounding Markdown code fence.
fn extract_json(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening fence line
    match body.split_once('\n') {
        Some((info, inner)) if !info.trim_start().starts_with('{') => inner.trim(),
        _ => body.trim(),
    }
}

/// The three flows, addressable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowKind {
    Summarize,
    DetectBias,
    Analyze,
}

impl FlowKind {
    pub const ALL: [FlowKind; 3] = [FlowKind::Summarize, FlowKind::DetectBias, FlowKind::Analyze];

    /// Parse a flow from its URL/CLI name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "summarize" | "summary" => Some(Self::Summarize),
            "detect-bias" | "bias" => Some(Self::DetectBias),
            "analyze" | "insights" => Some(Self::Analyze),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Summarize => "summarize",
            Self::DetectBias => "detect-bias",
            Self::Analyze => "analyze",
        }
    }

    /// Build this flow's input record from plain text.
    pub fn input_for_text(&self, text: &str) -> Value {
        match self {
            Self::Summarize => serde_json::json!({ "text": text }),
            Self::DetectBias => serde_json::json!({ "promptText": text }),
            Self::Analyze => serde_json::json!({ "text": text }),
        }
    }

    /// Run the flow on an untyped input and return its output as JSON.
    pub async fn run_json(
        &self,
        provider: &dyn ModelProvider,
        input: Value,
    ) -> Result<Value, FlowError> {
        let flow = self.name();
        let encoded = match self {
            Self::Summarize => serde_json::to_value(run_json::<SummarizeFlow>(provider, input).await?),
            Self::DetectBias => {
                serde_json::to_value(run_json::<DetectBiasFlow>(provider, input).await?)
            }
            Self::Analyze => serde_json::to_value(run_json::<AnalyzeFlow>(provider, input).await?),
        };
        encoded.map_err(|source| FlowError::Encode { flow, source })
    }
}

impl std::fmt::Display for FlowKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
