//! mxp-ex library interface
//!
//! Exposes the explanation pipeline and router for the binary and for
//! integration tests.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::http::HeaderValue;
use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::services::{ExplanationOrchestrator, MediaAnalyzer, MediaStore, VerdictSource};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Explanation pipeline, holding the shared generator client
    pub orchestrator: Arc<ExplanationOrchestrator>,
    /// External feature extraction
    pub analyzer: Arc<dyn MediaAnalyzer>,
    /// External authenticity verdict
    pub verdict_source: Arc<dyn VerdictSource>,
    /// Upload storage
    pub media_store: MediaStore,
    /// Browser origins allowed through CORS
    pub cors_origins: Vec<String>,
    /// Upload body size limit
    pub max_upload_bytes: usize,
    /// Model identifier sent to the text-generation backend
    pub backend_model: String,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        orchestrator: ExplanationOrchestrator,
        analyzer: Arc<dyn MediaAnalyzer>,
        verdict_source: Arc<dyn VerdictSource>,
        media_store: MediaStore,
    ) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            analyzer,
            verdict_source,
            media_store,
            cors_origins: Vec::new(),
            max_upload_bytes: 512 * 1024 * 1024,
            backend_model: String::new(),
            startup_time: Utc::now(),
        }
    }

    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = origins;
        self
    }

    pub fn with_backend_model(mut self, model: impl Into<String>) -> Self {
        self.backend_model = model.into();
        self
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let media = ServeDir::new(state.media_store.dir());
    let cors = cors_layer(&state.cors_origins);

    Router::new()
        .merge(api::upload_routes(state.max_upload_bytes))
        .merge(api::analyze_routes())
        .merge(api::health_routes())
        .nest_service("/media", media)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
