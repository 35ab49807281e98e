//! Explanation endpoints over an existing analysis result
//!
//! POST /analyze/metrics, POST /analyze/summary

use axum::{extract::State, routing::post, Json, Router};

use crate::{
    models::{MetricExplanationsResponse, MetricRequest, SummaryResponse},
    AppState,
};

/// POST /analyze/metrics
///
/// Explains every metric of a previously returned analysis concurrently.
pub async fn analyze_metrics(
    State(state): State<AppState>,
    Json(request): Json<MetricRequest>,
) -> Json<MetricExplanationsResponse> {
    let analysis = request.analysis_result;
    tracing::info!(
        media_kind = %analysis.kind(),
        metrics = analysis.metrics.len(),
        "Metric explanation request"
    );

    let results = state.orchestrator.explain_all_metrics(&analysis).await;

    Json(MetricExplanationsResponse {
        metric_explanations: results.into_iter().map(Into::into).collect(),
    })
}

/// POST /analyze/summary
pub async fn analyze_summary(
    State(state): State<AppState>,
    Json(request): Json<MetricRequest>,
) -> Json<SummaryResponse> {
    let summary = state
        .orchestrator
        .explain_metrics_summary(&request.analysis_result)
        .await;

    Json(SummaryResponse { summary })
}

/// Build analysis routes
pub fn analyze_routes() -> Router<AppState> {
    Router::new()
        .route("/analyze/metrics", post(analyze_metrics))
        .route("/analyze/summary", post(analyze_summary))
}
