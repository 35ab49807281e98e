//! Media analyzer client
//!
//! Feature extraction runs in a separate analyzer service. This module only
//! forwards a stored file's path and decodes the returned [`AnalysisResult`].

use async_trait::async_trait;
use mxp_common::{AnalysisResult, MediaKind};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors from the external analyzer or scanner
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Analyzer error {status}: {body}")]
    Backend { status: u16, body: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Produces metrics for a stored media file
#[async_trait]
pub trait MediaAnalyzer: Send + Sync {
    async fn analyze(&self, path: &Path, kind: MediaKind) -> Result<AnalysisResult, AnalyzerError>;
}

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    path: &'a str,
    #[serde(rename = "type")]
    kind: MediaKind,
}

/// Analyzer reached over HTTP (`POST {"path", "type"}` → `AnalysisResult`)
pub struct HttpMediaAnalyzer {
    http_client: reqwest::Client,
    url: String,
}

impl HttpMediaAnalyzer {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, AnalyzerError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AnalyzerError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl MediaAnalyzer for HttpMediaAnalyzer {
    async fn analyze(&self, path: &Path, kind: MediaKind) -> Result<AnalysisResult, AnalyzerError> {
        let path_str = path.to_string_lossy();
        tracing::debug!(path = %path_str, media_kind = %kind, "Requesting media analysis");

        let response = self
            .http_client
            .post(&self.url)
            .json(&AnalyzeRequest {
                path: &path_str,
                kind,
            })
            .send()
            .await
            .map_err(|e| AnalyzerError::Network(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNSUPPORTED_MEDIA_TYPE {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalyzerError::UnsupportedMediaType(body));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalyzerError::Backend {
                status: status.as_u16(),
                body,
            });
        }

        let result: AnalysisResult = response
            .json()
            .await
            .map_err(|e| AnalyzerError::Parse(e.to_string()))?;

        if result.kind() != kind {
            tracing::warn!(
                requested = %kind,
                reported = %result.kind(),
                "Analyzer reported a different media kind than requested"
            );
        }

        tracing::info!(
            path = %path_str,
            media_kind = %result.kind(),
            metrics = result.metrics.len(),
            "Media analysis received"
        );

        Ok(result)
    }
}
