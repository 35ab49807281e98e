//! File upload endpoint
//!
//! POST /upload: store, analyze, obtain a verdict, explain.

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
    Json, Router,
};

use crate::{
    error::{ApiError, ApiResult},
    models::UploadResponse,
    AppState,
};

/// Multipart field carrying the media file
const FILE_FIELD: &str = "file";

/// POST /upload
///
/// Unsupported extensions are rejected with 400 before anything is stored.
/// Analyzer or scanner failures surface as 500; narrative generation
/// failures do not fail the request.
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let mut stored = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let raw_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| ApiError::BadRequest("file field has no file name".to_string()))?;

        stored = Some(state.media_store.save_stream(&raw_name, field).await?);
        break;
    }

    let stored = stored.ok_or_else(|| {
        ApiError::BadRequest(format!("missing multipart field '{}'", FILE_FIELD))
    })?;

    let analysis = state.analyzer.analyze(&stored.path, stored.kind).await?;
    let verdict = state.verdict_source.determine(&stored.path, &analysis).await?;

    tracing::info!(
        file = %stored.file_name,
        media_kind = %analysis.kind(),
        verdict = %verdict.label,
        confidence = verdict.confidence,
        "Upload analyzed"
    );

    let brief_overview = state.orchestrator.explain_overall(&analysis, &verdict).await;

    Ok(Json(UploadResponse {
        status: "success",
        filename: stored.file_name,
        path: stored.public_path,
        size: stored.size,
        content_type: stored.content_type,
        ai_scan_result: verdict.into(),
        analysis_result: analysis,
        brief_overview,
    }))
}

/// Build upload routes with the given body size limit
pub fn upload_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload_file))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}
