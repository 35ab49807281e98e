//! Request and response bodies for the HTTP API

use mxp_common::{AnalysisResult, CatalogError, MetricAssessment, VerdictLabel, VerdictSummary};
use serde::{Deserialize, Serialize};

/// POST /upload response
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Always "success"
    pub status: &'static str,
    pub filename: String,
    /// Public URL path of the stored file
    pub path: String,
    pub size: u64,
    /// Detected MIME type
    #[serde(rename = "type")]
    pub content_type: String,
    pub ai_scan_result: ScanResult,
    /// Sent back by the front end to /analyze/metrics
    pub analysis_result: AnalysisResult,
    pub brief_overview: String,
}

/// Verdict as the front end reads it
///
/// The `deepfake_*` pair mirrors the `ai_*` pair; the front end takes the
/// larger of the two confidences.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScanResult {
    pub ai_detected: bool,
    /// Confidence in `[0, 1]`
    pub ai_confidence: f64,
    pub deepfake_detected: bool,
    pub deepfake_confidence: f64,
}

impl From<VerdictSummary> for ScanResult {
    fn from(verdict: VerdictSummary) -> Self {
        let detected = verdict.label == VerdictLabel::AiGenerated;
        Self {
            ai_detected: detected,
            ai_confidence: verdict.confidence,
            deepfake_detected: detected,
            deepfake_confidence: verdict.confidence,
        }
    }
}

/// POST /analyze/metrics and /analyze/summary request
#[derive(Debug, Deserialize)]
pub struct MetricRequest {
    pub analysis_result: AnalysisResult,
}

/// One entry of the metric explanations list
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum MetricExplanation {
    Assessment(MetricAssessment),
    Unknown(CatalogError),
}

impl From<Result<MetricAssessment, CatalogError>> for MetricExplanation {
    fn from(result: Result<MetricAssessment, CatalogError>) -> Self {
        match result {
            Ok(assessment) => MetricExplanation::Assessment(assessment),
            Err(err) => MetricExplanation::Unknown(err),
        }
    }
}

/// POST /analyze/metrics response
#[derive(Debug, Serialize)]
pub struct MetricExplanationsResponse {
    #[serde(rename = "metricExplanations")]
    pub metric_explanations: Vec<MetricExplanation>,
}

/// POST /analyze/summary response
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
}
