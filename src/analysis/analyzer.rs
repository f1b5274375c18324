//! Concurrent fan-out of the three flows.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::AnalysisError;
use crate::flows::{
    self, AnalyzeFlow, AnalyzeInput, BiasExplanation, BiasOutput, DetectBiasFlow,
    DetectBiasInput, InsightsOutput, SummarizeFlow, SummarizeInput, SummaryOutput,
};
use crate::llm::ModelProvider;

/// Combined output of all three flows for one request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResult {
    pub summary: SummaryOutput,
    pub bias: BiasOutput,
    pub insights: InsightsOutput,
    /// Bias explanation split into titled sections.
    pub explanation: BiasExplanation,
    pub generated_at: DateTime<Utc>,
}

impl AggregateResult {
    pub fn new(summary: SummaryOutput, bias: BiasOutput, insights: InsightsOutput) -> Self {
        let explanation = BiasExplanation::parse(&bias.bias_explanation);
        if explanation.has_sections() != bias.bias_detected {
            warn!(
                model_flag = bias.bias_detected,
                sections = explanation.sections.len(),
                "Model bias flag disagrees with explanation structure; using structure"
            );
        }
        Self {
            summary,
            bias,
            insights,
            explanation,
            generated_at: Utc::now(),
        }
    }

    /// Whether bias was detected, derived from the explanation's sections.
    ///
    /// `bias.bias_detected` keeps the model's own answer.
    pub fn bias_detected(&self) -> bool {
        self.explanation.has_sections()
    }
}

/// Runs the summarize, detect-bias and analyze flows as one batch.
#[derive(Clone)]
pub struct Analyzer {
    provider: Arc<dyn ModelProvider>,
}

impl Analyzer {
    pub fn new(provider: Arc<dyn ModelProvider>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &Arc<dyn ModelProvider> {
        &self.provider
    }

    /// Analyze `text` with all three flows concurrently.
    ///
    /// Fails fast with `InputRequired` on blank text without calling any
    /// flow. If any flow fails the whole batch fails and nothing is returned.
    pub async fn analyze(&self, text: &str) -> Result<AggregateResult, AnalysisError> {
        if text.trim().is_empty() {
            return Err(AnalysisError::InputRequired);
        }

        let request_id = Uuid::new_v4();
        let span = info_span!("analysis", %request_id, chars = text.len());

        async {
            let provider = self.provider.as_ref();
            let summarize = SummarizeInput {
                text: text.to_string(),
            };
            let detect_bias = DetectBiasInput {
                prompt_text: text.to_string(),
            };
            let analyze = AnalyzeInput {
                text: text.to_string(),
            };

            info!(provider = %provider.describe(), "Starting analysis");
            let (summary, bias, insights) = tokio::try_join!(
                flows::run::<SummarizeFlow>(provider, &summarize),
                flows::run::<DetectBiasFlow>(provider, &detect_bias),
                flows::run::<AnalyzeFlow>(provider, &analyze),
            )
            .map_err(|e| {
                error!(error = %e, "Analysis failed");
                AnalysisError::AnalysisFailed(e)
            })?;

            info!("Analysis complete");
            Ok(AggregateResult::new(summary, bias, insights))
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::testing::ScriptedProvider;
    use crate::flows::FlowError;
    use std::time::Duration;

    fn analyzer(provider: &Arc<ScriptedProvider>) -> Analyzer {
        Analyzer::new(provider.clone())
    }

    #[tokio::test]
    async fn test_three_calls_outputs_unmodified() {
        let provider = Arc::new(ScriptedProvider::all_ok());
        let result = analyzer(&provider).analyze("Engineers and their wives.").await.unwrap();

        assert_eq!(provider.calls(), 3);
        assert_eq!(result.summary.summary, "A short summary.");
        assert!(result.bias.bias_detected);
        assert_eq!(
            result.bias.bias_explanation,
            "**Gender Bias**\nAssumes engineers are men."
        );
        assert_eq!(result.insights.analysis, "Persuasive tone.");
        assert!(result.bias_detected());
    }

    #[tokio::test]
    async fn test_each_flow_gets_the_text() {
        let provider = Arc::new(ScriptedProvider::all_ok());
        analyzer(&provider).analyze("  padded input  ").await.unwrap();

        let mut flows: Vec<String> = provider
            .prompts()
            .into_iter()
            .map(|(flow, prompt)| {
                assert!(prompt.contains("  padded input  "));
                flow
            })
            .collect();
        flows.sort();
        assert_eq!(flows, vec!["analyze", "detect-bias", "summarize"]);
    }

    #[tokio::test]
    async fn test_blank_input_makes_no_calls() {
        let provider = Arc::new(ScriptedProvider::all_ok());
        for text in ["", "   ", "\n\t "] {
            let err = analyzer(&provider).analyze(text).await.unwrap_err();
            assert!(matches!(err, AnalysisError::InputRequired));
        }
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_any_failure_fails_batch() {
        for failing in ["summarize", "detect-bias", "analyze"] {
            let provider = Arc::new(ScriptedProvider::all_ok().fail(failing, 500));
            let err = analyzer(&provider).analyze("text").await.unwrap_err();
            assert!(
                matches!(err, AnalysisError::AnalysisFailed(FlowError::Provider(_))),
                "{failing} failure should fail the batch"
            );
        }
    }

    #[tokio::test]
    async fn test_schema_violation_fails_batch() {
        let provider = Arc::new(ScriptedProvider::all_ok().respond("analyze", "not json"));
        let err = analyzer(&provider).analyze("text").await.unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::AnalysisFailed(FlowError::SchemaViolation { .. })
        ));
    }

    #[tokio::test]
    async fn test_flows_run_concurrently() {
        let delay = Duration::from_millis(200);
        let provider = Arc::new(
            ScriptedProvider::all_ok()
                .delay("summarize", delay)
                .delay("detect-bias", delay)
                .delay("analyze", delay),
        );

        let started = std::time::Instant::now();
        analyzer(&provider).analyze("text").await.unwrap();
        assert!(started.elapsed() < delay * 2, "flows should overlap");
    }

    #[test]
    fn test_structure_overrides_model_flag() {
        let result = AggregateResult::new(
            SummaryOutput {
                summary: "s".to_string(),
            },
            BiasOutput {
                bias_detected: true,
                bias_explanation: "The text is neutral and sourced.".to_string(),
            },
            InsightsOutput {
                analysis: "a".to_string(),
            },
        );
        assert!(result.bias.bias_detected);
        assert!(!result.bias_detected());
    }
}
