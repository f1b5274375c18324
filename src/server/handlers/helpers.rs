//! Error responses shared by the API handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::analysis::{AnalysisError, Notification};
use crate::flows::FlowError;

/// JSON error body: `{"error": ..., "kind": ...}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: &'static str,
}

/// An API failure with its HTTP status.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, kind: &'static str, error: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                error: error.into(),
                kind,
            },
        }
    }

    pub fn not_found(what: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", format!("{} not found", what))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        let status = match err {
            AnalysisError::InputRequired => StatusCode::BAD_REQUEST,
            AnalysisError::UnsupportedFileType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AnalysisError::AnalysisInProgress => StatusCode::CONFLICT,
            AnalysisError::AnalysisFailed(_) => StatusCode::BAD_GATEWAY,
        };
        // Same wording as the page toasts; causes are logged, not returned
        let note = Notification::for_error(&err);
        Self::new(status, err.kind(), note.description)
    }
}

impl From<FlowError> for ApiError {
    fn from(err: FlowError) -> Self {
        match err {
            FlowError::InvalidInput { .. } => {
                Self::new(StatusCode::BAD_REQUEST, "invalid_input", err.to_string())
            }
            FlowError::SchemaViolation { .. } => Self::new(
                StatusCode::BAD_GATEWAY,
                "schema_violation",
                "The model returned an unexpected response.",
            ),
            FlowError::Provider(_) => Self::new(
                StatusCode::BAD_GATEWAY,
                "provider_error",
                "The model provider request failed.",
            ),
            FlowError::Encode { .. } => {
                tracing::error!("{}", err);
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Failed to encode the flow output.",
                )
            }
        }
    }
}
