//! Authenticity verdict sources
//!
//! The verdict comes from an external scanner. When none is configured the
//! service falls back to [`CatalogVoteVerdict`], a deterministic vote over
//! the catalog status bands.

use async_trait::async_trait;
use mxp_common::catalog;
use mxp_common::{classify, AnalysisResult, VerdictLabel, VerdictSummary};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use super::analyzer_client::AnalyzerError;

/// Produces `{label, confidence}` for an analyzed file
#[async_trait]
pub trait VerdictSource: Send + Sync {
    /// Short identifier reported by the health endpoint
    fn kind(&self) -> &'static str {
        "external"
    }

    async fn determine(
        &self,
        path: &Path,
        analysis: &AnalysisResult,
    ) -> Result<VerdictSummary, AnalyzerError>;
}

#[derive(Debug, Serialize)]
struct ScanRequest<'a> {
    path: &'a str,
}

#[derive(Debug, Deserialize)]
struct ScanResponse {
    ai_detected: bool,
    ai_confidence: f64,
}

/// Scanner reached over HTTP (`POST {"path"}` → `{ai_detected, ai_confidence}`)
pub struct HttpVerdictSource {
    http_client: reqwest::Client,
    url: String,
}

impl HttpVerdictSource {
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
}

#[async_trait]
impl VerdictSource for HttpVerdictSource {
    fn kind(&self) -> &'static str {
        "scanner"
    }

    async fn determine(
        &self,
        path: &Path,
        _analysis: &AnalysisResult,
    ) -> Result<VerdictSummary, AnalyzerError> {
        let path_str = path.to_string_lossy();

        let response = self
            .http_client
            .post(&self.url)
            .json(&ScanRequest { path: &path_str })
            .send()
            .await
            .map_err(|e| AnalyzerError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalyzerError::Backend {
                status: status.as_u16(),
                body,
            });
        }

        let scan: ScanResponse = response
            .json()
            .await
            .map_err(|e| AnalyzerError::Parse(e.to_string()))?;

        tracing::info!(
            path = %path_str,
            ai_detected = scan.ai_detected,
            confidence = scan.ai_confidence,
            "Scanner verdict received"
        );

        Ok(VerdictSummary::from_detection(
            scan.ai_detected,
            scan.ai_confidence,
        ))
    }
}

/// Majority vote of catalog status bands
///
/// Each catalog metric present in the analysis votes "suspicious" or
/// "normal". More than half suspicious → AI-generated. Confidence is the
/// winning share; with no catalog metrics present the verdict is Authentic
/// at confidence 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogVoteVerdict;

impl CatalogVoteVerdict {
    pub fn vote(analysis: &AnalysisResult) -> VerdictSummary {
        let (suspicious, total) = catalog::definitions(analysis.kind())
            .iter()
            .filter_map(|def| analysis.metrics.get(def.name).map(|v| classify(*v, def)))
            .fold((0usize, 0usize), |(s, n), status| {
                (s + usize::from(!status.is_normal()), n + 1)
            });

        if total == 0 {
            return VerdictSummary::new(VerdictLabel::Authentic, 0.0);
        }

        let share = suspicious as f64 / total as f64;
        if share > 0.5 {
            VerdictSummary::new(VerdictLabel::AiGenerated, share)
        } else {
            VerdictSummary::new(VerdictLabel::Authentic, 1.0 - share)
        }
    }
}

#[async_trait]
impl VerdictSource for CatalogVoteVerdict {
    fn kind(&self) -> &'static str {
        "catalog_vote"
    }

    async fn determine(
        &self,
        _path: &Path,
        analysis: &AnalysisResult,
    ) -> Result<VerdictSummary, AnalyzerError> {
        Ok(Self::vote(analysis))
    }
}
