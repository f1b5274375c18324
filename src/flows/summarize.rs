//! Summarization flow.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::Flow;

const PROMPT: &str = r#"You are an expert editor. Write a concise, faithful summary of the text below.

Keep the author's main claims and conclusions, mention key names, figures and dates when they matter, and leave out minor detail. Do not add opinions or information that is not in the text.

Text: {text}"#;

/// Input record for [`SummarizeFlow`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizeInput {
    /// The text to summarize.
    pub text: String,
}

/// Summary of the input text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SummaryOutput {
    /// A concise summary of the text.
    pub summary: String,
}

pub struct SummarizeFlow;

impl Flow for SummarizeFlow {
    const NAME: &'static str = "summarize";

    type Input = SummarizeInput;
    type Output = SummaryOutput;

    fn prompt(input: &SummarizeInput) -> String {
        PROMPT.replace("{text}", &input.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_text_verbatim() {
        let prompt = SummarizeFlow::prompt(&SummarizeInput {
            text: "The {text} placeholder & <tags> stay as-is.".to_string(),
        });
        assert!(prompt.ends_with("Text: The {text} placeholder & <tags> stay as-is."));
    }
}
