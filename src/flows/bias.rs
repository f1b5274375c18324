//! Bias detection flow.
//!
//! The prompt asks the model for one bold-titled paragraph per bias category
//! followed by a single concluding paragraph. That shape is an instruction
//! to the model only; [`super::BiasExplanation`] parses whatever comes back.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::Flow;

const PROMPT: &str = r#"You are an expert in detecting bias in writing. Analyze the text below for potential biases (for example gender, racial, political, cultural, age, confirmation or framing bias).

Text: {text}

If you detect bias:
1. For each bias you recognize, write its title in bold on its own line (for example **Gender Bias**), then one paragraph explaining where and how it appears.
2. After all biases, write one final paragraph with any further psychological or rhetorical observations about the text.
3. Do not write any kind of summary.
If you detect no bias, explain in plain paragraphs why the text reads as neutral, without bold titles.

Set biasDetected to true if and only if you wrote at least one bold bias title.
Put the full explanation in biasExplanation."#;

/// Input record for [`DetectBiasFlow`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectBiasInput {
    /// The text to be analyzed for potential biases.
    pub prompt_text: String,
}

/// Bias verdict and explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BiasOutput {
    /// Whether or not bias was detected in the text.
    pub bias_detected: bool,
    /// An explanation of the biases detected in the text.
    pub bias_explanation: String,
}

pub struct DetectBiasFlow;

impl Flow for DetectBiasFlow {
    const NAME: &'static str = "detect-bias";

    type Input = DetectBiasInput;
    type Output = BiasOutput;

    fn prompt(input: &DetectBiasInput) -> String {
        PROMPT.replace("{text}", &input.prompt_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::schema::response_schema;

    #[test]
    fn test_wire_names() {
        let input: DetectBiasInput =
            serde_json::from_str(r#"{"promptText":"hello"}"#).unwrap();
        assert_eq!(input.prompt_text, "hello");

        let schema = response_schema::<BiasOutput>();
        assert_eq!(schema["properties"]["biasDetected"]["type"], "boolean");
        assert_eq!(schema["properties"]["biasExplanation"]["type"], "string");
    }

    #[test]
    fn test_prompt_contains_text() {
        let prompt = DetectBiasFlow::prompt(&DetectBiasInput {
            prompt_text: "Nurses are women.".to_string(),
        });
        assert!(prompt.contains("Text: Nurses are women."));
        assert!(prompt.contains("**Gender Bias**"));
    }
}
