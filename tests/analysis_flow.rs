//! End-to-end analysis through the public API with a canned provider.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use genuinai::analysis::{AnalysisError, AnalysisSession, Analyzer, Notifier, UiState, UploadedFile};
use genuinai::flows::FlowKind;
use genuinai::llm::{GenerateRequest, LlmError, ModelProvider};

/// Answers like a well-behaved model, optionally wrapping JSON in a code fence.
struct CannedModel {
    calls: AtomicUsize,
    fenced: bool,
    broken_flow: Option<&'static str>,
}

impl CannedModel {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fenced: false,
            broken_flow: None,
        }
    }
}

#[async_trait]
impl ModelProvider for CannedModel {
    async fn generate(&self, request: &GenerateRequest) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.broken_flow == Some(request.name) {
            return Err(LlmError::Connection("connection refused".to_string()));
        }

        // The schema sent with each request names the fields to fill
        let props = request.schema["properties"]
            .as_object()
            .ok_or_else(|| LlmError::Parse("schema without properties".to_string()))?;

        let body = match request.name {
            "summarize" => {
                assert!(props.contains_key("summary"));
                r#"{"summary": "Canned summary."}"#
            }
            "detect-bias" => {
                assert!(props.contains_key("biasDetected"));
                assert!(props.contains_key("biasExplanation"));
                r#"{"biasDetected": true, "biasExplanation": "**Framing Bias**\nLoaded adjectives.\n\nOverall one-sided."}"#
            }
            "analyze" => {
                assert!(props.contains_key("analysis"));
                r#"{"analysis": "Canned insights."}"#
            }
            other => return Err(LlmError::Parse(format!("unexpected flow {}", other))),
        };

        if self.fenced {
            Ok(format!("```json\n{}\n```", body))
        } else {
            Ok(body.to_string())
        }
    }

    fn describe(&self) -> String {
        "canned".to_string()
    }
}

#[tokio::test]
async fn analyzes_text_with_all_three_flows() {
    let model = Arc::new(CannedModel::new());
    let analyzer = Analyzer::new(model.clone());

    let result = analyzer.analyze("A newspaper column.").await.unwrap();

    assert_eq!(model.calls.load(Ordering::SeqCst), 3);
    assert_eq!(result.summary.summary, "Canned summary.");
    assert_eq!(result.insights.analysis, "Canned insights.");
    assert!(result.bias_detected());
    assert_eq!(result.explanation.sections[0].title, "Framing Bias");
    assert_eq!(result.explanation.sections[0].paragraphs, vec!["Loaded adjectives."]);
    assert_eq!(result.explanation.conclusion, vec!["Overall one-sided."]);
}

#[tokio::test]
async fn accepts_code_fenced_answers() {
    let model = Arc::new(CannedModel {
        fenced: true,
        ..CannedModel::new()
    });
    let result = Analyzer::new(model).analyze("text").await.unwrap();
    assert_eq!(result.summary.summary, "Canned summary.");
}

#[tokio::test]
async fn one_failing_flow_fails_the_session() {
    let model = Arc::new(CannedModel {
        broken_flow: Some("analyze"),
        ..CannedModel::new()
    });
    let analyzer = Analyzer::new(model);

    let (notifier, mut rx) = Notifier::channel();
    let mut session = AnalysisSession::new(notifier).with_text("text");
    let err = session.analyze(&analyzer).await.unwrap_err();

    assert!(matches!(err, AnalysisError::AnalysisFailed(_)));
    assert_eq!(session.ui_state(), UiState::Error);
    assert!(session.result().is_none());
    assert_eq!(rx.drain()[0].title, "Analysis Failed");
}

#[tokio::test]
async fn upload_then_analyze() {
    let analyzer = Analyzer::new(Arc::new(CannedModel::new()));
    let (notifier, _rx) = Notifier::channel();
    let mut session = AnalysisSession::new(notifier);

    let file = UploadedFile::new(Some("column.txt"), Some("text/plain"), b"hello world".to_vec());
    session.load_file(&file).unwrap();
    assert_eq!(session.text(), "hello world");

    session.analyze(&analyzer).await.unwrap();
    assert_eq!(session.ui_state(), UiState::Success);
}

#[tokio::test]
async fn single_flow_by_name() {
    let model = CannedModel::new();
    let kind = FlowKind::from_name("bias").unwrap();

    let output = kind
        .run_json(&model, kind.input_for_text("Some text"))
        .await
        .unwrap();

    assert_eq!(output["biasDetected"], true);
    assert_eq!(model.calls.load(Ordering::SeqCst), 1);
}
