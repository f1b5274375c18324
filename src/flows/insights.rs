//! General text analysis ("insights") flow.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::Flow;

const PROMPT: &str = r#"You are a text analysis expert. Analyze the following text and give nuanced insights: its purpose and intended audience, tone and rhetorical techniques, the strength of its arguments and evidence, and anything a careful reader should notice.

Text: {text}"#;

/// Input record for [`AnalyzeFlow`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeInput {
    /// The text to analyze.
    pub text: String,
}

/// Free-form analysis of the input text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct InsightsOutput {
    /// The analysis of the text.
    pub analysis: String,
}

pub struct AnalyzeFlow;

impl Flow for AnalyzeFlow {
    const NAME: &'static str = "analyze";

    type Input = AnalyzeInput;
    type Output = InsightsOutput;

    fn prompt(input: &AnalyzeInput) -> String {
        PROMPT.replace("{text}", &input.text)
    }
}
