//! Analysis orchestration.
//!
//! - `analyzer`: concurrent fan-out of the three flows, all-or-nothing join
//! - `session`: text/result/UI state and user notifications
//! - `source`: text acquisition from uploaded files

mod analyzer;
mod session;
mod source;

use thiserror::Error;

use crate::flows::FlowError;

pub use analyzer::{AggregateResult, Analyzer};
pub use session::{
    AnalysisSession, Notification, NotificationLevel, NotificationReceiver, Notifier, ResultTab,
    UiState,
};
pub use source::{read_text, UploadedFile};

/// Errors surfaced by the analysis controller.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Submitted text was empty or whitespace only.
    #[error("Input required: enter some text to analyze")]
    InputRequired,

    /// Uploaded file was not plain text.
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// An analysis is already running for this session.
    #[error("An analysis is already in progress")]
    AnalysisInProgress,

    /// One of the flows failed; the whole batch is discarded.
    #[error("Analysis failed: {0}")]
    AnalysisFailed(#[source] FlowError),
}

impl AnalysisError {
    /// Stable identifier for API responses.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InputRequired => "input_required",
            Self::UnsupportedFileType(_) => "unsupported_file_type",
            Self::AnalysisInProgress => "analysis_in_progress",
            Self::AnalysisFailed(_) => "analysis_failed",
        }
    }
}
