//! API endpoint handlers.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::super::AppState;
use super::helpers::ApiError;
use crate::analysis::AggregateResult;
use crate::flows::FlowKind;

/// Body of `POST /api/analyze`.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
}

/// Aggregate result plus the derived bias flag.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    #[serde(flatten)]
    pub result: AggregateResult,
    pub bias_detected: bool,
}

/// Run all three flows on the given text.
pub async fn api_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let result = state.analyzer.analyze(&request.text).await?;
    let bias_detected = result.bias_detected();
    Ok(Json(AnalyzeResponse {
        result,
        bias_detected,
    }))
}

/// Run a single flow on a raw JSON input record.
pub async fn api_flow(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(input): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let kind = FlowKind::from_name(&name).ok_or_else(|| ApiError::not_found("Flow"))?;
    let provider = state.analyzer.provider().as_ref();

    let output = kind.run_json(provider, input).await.map_err(|e| {
        tracing::warn!(flow = %kind, error = %e, "Flow request failed");
        ApiError::from(e)
    })?;
    Ok(Json(output))
}

/// Provider description and reachability.
pub async fn api_status(State(state): State<AppState>) -> Response {
    let provider = state.analyzer.provider();
    let available = provider.is_available().await;

    Json(serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "provider": provider.describe(),
        "available": available,
        "flows": FlowKind::ALL.iter().map(|f| f.name()).collect::<Vec<_>>(),
        "max_upload_bytes": state.max_upload_bytes,
    }))
    .into_response()
}
