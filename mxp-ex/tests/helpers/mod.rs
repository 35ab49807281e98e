//! Test helper utilities
//!
//! Fakes for the external capabilities plus app/router builders.

#![allow(dead_code)]

use async_trait::async_trait;
use mxp_common::{
    AnalysisResult, MediaKind, MediaMetadata, MetricValues, PromptBuilder, VerdictLabel,
    VerdictSummary,
};
use mxp_ex::services::{
    AnalyzerError, ExplanationOrchestrator, GenerationFailure, MediaAnalyzer, MediaStore,
    NarrativeGenerator, VerdictSource,
};
use mxp_ex::AppState;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Scripted generator
///
/// Fails any prompt containing one of `fail_markers`, otherwise answers
/// `"narrative #<n>"`. Tracks call count and peak concurrency.
#[derive(Default)]
pub struct FakeGenerator {
    pub fail_markers: Vec<String>,
    pub delay: Option<Duration>,
    pub calls: AtomicUsize,
    in_flight: AtomicUsize,
    pub peak_in_flight: AtomicUsize,
    pub prompts: Mutex<Vec<String>>,
}

impl FakeGenerator {
    pub fn ok() -> Self {
        Self::default()
    }

    pub fn failing_on(markers: &[&str]) -> Self {
        Self {
            fail_markers: markers.iter().map(|m| m.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn peak(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NarrativeGenerator for FakeGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationFailure> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail_markers.iter().any(|m| prompt.contains(m.as_str())) {
            return Err(GenerationFailure::Timeout(Duration::from_secs(60)));
        }
        Ok(format!("narrative #{}", n))
    }
}

/// Analyzer returning a canned result for every file
pub struct FakeAnalyzer {
    pub image: AnalysisResult,
    pub video: AnalysisResult,
}

impl Default for FakeAnalyzer {
    fn default() -> Self {
        Self {
            image: image_analysis(),
            video: video_analysis(),
        }
    }
}

#[async_trait]
impl MediaAnalyzer for FakeAnalyzer {
    async fn analyze(&self, _path: &Path, kind: MediaKind) -> Result<AnalysisResult, AnalyzerError> {
        Ok(match kind {
            MediaKind::Image => self.image.clone(),
            MediaKind::Video => self.video.clone(),
        })
    }
}

/// Analyzer that is always down
pub struct DownAnalyzer;

#[async_trait]
impl MediaAnalyzer for DownAnalyzer {
    async fn analyze(&self, _path: &Path, _kind: MediaKind) -> Result<AnalysisResult, AnalyzerError> {
        Err(AnalyzerError::Network("connection refused".to_string()))
    }
}

/// Verdict source returning a fixed verdict
pub struct FixedVerdict(pub VerdictSummary);

#[async_trait]
impl VerdictSource for FixedVerdict {
    fn kind(&self) -> &'static str {
        "fixed"
    }

    async fn determine(
        &self,
        _path: &Path,
        _analysis: &AnalysisResult,
    ) -> Result<VerdictSummary, AnalyzerError> {
        Ok(self.0)
    }
}

pub fn metrics(values: &[(&str, f64)]) -> MetricValues {
    values.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

pub fn video_analysis() -> AnalysisResult {
    AnalysisResult::new(
        MediaMetadata::Video {
            width: 1920,
            height: 1080,
            duration_seconds: 10.0,
            frame_count: 300,
            fps: 30.0,
        },
        metrics(&[
            ("avg_motion", 5.0),
            ("motion_std", 12.0),
            ("avg_edge_consistency", 31.0),
            ("edge_std", 4.0),
            ("avg_texture_variance", 500.0),
            ("texture_std", 60.0),
        ]),
    )
}

pub fn image_analysis() -> AnalysisResult {
    AnalysisResult::new(
        MediaMetadata::Image {
            width: 800,
            height: 600,
        },
        metrics(&[
            ("avg_texture_variance", 300.0),
            ("texture_std", 150.0),
            ("edge_density", 0.02),
            ("color_variance", 5000.0),
            ("edge_continuity", 45.0),
        ]),
    )
}

pub fn orchestrator(generator: Arc<FakeGenerator>) -> ExplanationOrchestrator {
    ExplanationOrchestrator::new(generator, PromptBuilder::default())
}

pub fn authentic() -> VerdictSummary {
    VerdictSummary::new(VerdictLabel::Authentic, 0.12)
}

/// App state wired to fakes, storing uploads in `media_dir`
pub fn test_state(
    generator: Arc<FakeGenerator>,
    analyzer: Arc<dyn MediaAnalyzer>,
    media_dir: &Path,
) -> AppState {
    AppState::new(
        orchestrator(generator),
        analyzer,
        Arc::new(FixedVerdict(authentic())),
        MediaStore::new(media_dir),
    )
    .with_cors_origins(vec!["http://localhost:8080".to_string()])
    .with_backend_model("fake-model")
}
