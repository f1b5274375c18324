//! Analysis session state.
//!
//! Holds the text being worked on, the last aggregate result and the UI
//! state derived from them. User-facing messages go out on an explicit
//! [`Notifier`] channel; the presenter decides how to show them.

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::debug;

use super::source::{read_text, UploadedFile};
use super::{AggregateResult, AnalysisError, Analyzer};

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Error,
}

/// A dismissible message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn info(title: &str, description: &str) -> Self {
        Self {
            level: NotificationLevel::Info,
            title: title.to_string(),
            description: description.to_string(),
        }
    }

    pub fn error(title: &str, description: &str) -> Self {
        Self {
            level: NotificationLevel::Error,
            title: title.to_string(),
            description: description.to_string(),
        }
    }

    /// The generic user-facing message for an analysis error.
    ///
    /// Underlying causes are logged, never shown.
    pub fn for_error(err: &AnalysisError) -> Self {
        match err {
            AnalysisError::InputRequired => {
                Self::error("Input Required", "Please enter some text to analyze.")
            }
            AnalysisError::UnsupportedFileType(_) => {
                Self::error("Unsupported File Type", "Please upload a text file.")
            }
            AnalysisError::AnalysisInProgress => Self::error(
                "Analysis In Progress",
                "Please wait for the current analysis to finish.",
            ),
            AnalysisError::AnalysisFailed(_) => Self::error(
                "Analysis Failed",
                "An error occurred during analysis. Please try again.",
            ),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

/// Sending half of the notification channel.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<Notification>,
}

/// Receiving half of the notification channel.
pub struct NotificationReceiver {
    rx: mpsc::UnboundedReceiver<Notification>,
}

impl Notifier {
    pub fn channel() -> (Notifier, NotificationReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Notifier { tx }, NotificationReceiver { rx })
    }

    pub fn notify(&self, notification: Notification) {
        debug!(title = %notification.title, "Notification");
        // A dropped receiver means nobody is listening any more
        let _ = self.tx.send(notification);
    }
}

impl NotificationReceiver {
    /// Take every notification sent so far.
    pub fn drain(&mut self) -> Vec<Notification> {
        let mut out = Vec::new();
        while let Ok(n) = self.rx.try_recv() {
            out.push(n);
        }
        out
    }

    /// Wait for the next notification.
    pub async fn recv(&mut self) -> Option<Notification> {
        self.rx.recv().await
    }
}

/// What the results pane should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UiState {
    Idle,
    Loading,
    Success,
    Error,
}

impl UiState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// Tabs of the results pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultTab {
    Summary,
    #[default]
    Bias,
    Insights,
}

impl ResultTab {
    pub const ALL: [ResultTab; 3] = [ResultTab::Summary, ResultTab::Bias, ResultTab::Insights];

    pub fn id(&self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Bias => "bias",
            Self::Insights => "insights",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Summary => "Summary",
            Self::Bias => "Bias Detection",
            Self::Insights => "Insights",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tab| tab.id() == id)
    }
}

/// Text, result and UI state for one user.
pub struct AnalysisSession {
    text: String,
    result: Option<AggregateResult>,
    loading: bool,
    failed: bool,
    active_tab: ResultTab,
    notifier: Notifier,
}

impl AnalysisSession {
    pub fn new(notifier: Notifier) -> Self {
        Self {
            text: String::new(),
            result: None,
            loading: false,
            failed: false,
            active_tab: ResultTab::default(),
            notifier,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn result(&self) -> Option<&AggregateResult> {
        self.result.as_ref()
    }

    pub fn active_tab(&self) -> ResultTab {
        self.active_tab
    }

    pub fn set_active_tab(&mut self, tab: ResultTab) {
        self.active_tab = tab;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn ui_state(&self) -> UiState {
        if self.loading {
            UiState::Loading
        } else if self.result.is_some() {
            UiState::Success
        } else if self.failed {
            UiState::Error
        } else {
            UiState::Idle
        }
    }

    /// Replace the text with the content of an uploaded file.
    ///
    /// On failure the current text is left untouched.
    pub fn load_file(&mut self, file: &UploadedFile) -> Result<(), AnalysisError> {
        match read_text(file) {
            Ok(text) => {
                self.text = text;
                self.notifier.notify(Notification::info(
                    "File loaded",
                    "The content of the text file has been loaded.",
                ));
                Ok(())
            }
            Err(e) => {
                self.notifier.notify(Notification::for_error(&e));
                Err(e)
            }
        }
    }

    /// Start an analysis: validate, enter the loading state, clear the old
    /// result. Returns the text to analyze.
    pub fn begin(&mut self) -> Result<String, AnalysisError> {
        if self.loading {
            let err = AnalysisError::AnalysisInProgress;
            self.notifier.notify(Notification::for_error(&err));
            return Err(err);
        }
        if self.text.trim().is_empty() {
            let err = AnalysisError::InputRequired;
            self.notifier.notify(Notification::for_error(&err));
            return Err(err);
        }

        self.loading = true;
        self.failed = false;
        self.result = None;
        self.active_tab = ResultTab::Bias;
        Ok(self.text.clone())
    }

    /// Leave the loading state with the outcome of an analysis.
    pub fn finish(
        &mut self,
        outcome: Result<AggregateResult, AnalysisError>,
    ) -> Result<AggregateResult, AnalysisError> {
        self.loading = false;
        match outcome {
            Ok(result) => {
                self.result = Some(result.clone());
                Ok(result)
            }
            Err(e) => {
                self.failed = true;
                self.result = None;
                self.notifier.notify(Notification::for_error(&e));
                Err(e)
            }
        }
    }

    /// Run a full analysis of the current text.
    pub async fn analyze(&mut self, analyzer: &Analyzer) -> Result<AggregateResult, AnalysisError> {
        let text = self.begin()?;
        let outcome = analyzer.analyze(&text).await;
        self.finish(outcome)
    }
}
