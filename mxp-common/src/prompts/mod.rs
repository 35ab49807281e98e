//! Prompt construction for the text-generation backend
//!
//! Prompts are rendered from a template table keyed by
//! `(MediaKind, PromptKind)`. The builder is pure: identical inputs always
//! produce byte-identical text, and nothing here touches the network.

pub mod templates;

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::catalog::MetricDefinition;
use crate::media::{AnalysisResult, MediaKind, MediaMetadata, MetricValues};
use crate::status::Status;
use crate::verdict::{VerdictLabel, VerdictSummary};
use crate::{Error, Result};

use templates::render;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PromptKind {
    /// Whole-analysis narrative justifying the verdict
    Overall,
    /// Narrative for one metric
    SingleMetric,
    /// Short reading of every aggregate metric at once
    MetricsSummary,
}

impl PromptKind {
    pub const ALL: [PromptKind; 3] = [
        PromptKind::Overall,
        PromptKind::SingleMetric,
        PromptKind::MetricsSummary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PromptKind::Overall => "overall",
            PromptKind::SingleMetric => "single_metric",
            PromptKind::MetricsSummary => "metrics_summary",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }
}

impl fmt::Display for PromptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Template table keyed by `(MediaKind, PromptKind)`
#[derive(Debug, Clone, PartialEq)]
pub struct PromptTemplates {
    entries: HashMap<(MediaKind, PromptKind), String>,
}

impl PromptTemplates {
    /// Compiled-in templates
    pub fn builtin() -> Self {
        let mut entries = HashMap::new();
        entries.insert(
            (MediaKind::Video, PromptKind::Overall),
            templates::VIDEO_OVERALL.to_string(),
        );
        entries.insert(
            (MediaKind::Image, PromptKind::Overall),
            templates::IMAGE_OVERALL.to_string(),
        );
        entries.insert(
            (MediaKind::Video, PromptKind::SingleMetric),
            templates::VIDEO_SINGLE_METRIC.to_string(),
        );
        entries.insert(
            (MediaKind::Image, PromptKind::SingleMetric),
            templates::IMAGE_SINGLE_METRIC.to_string(),
        );
        entries.insert(
            (MediaKind::Video, PromptKind::MetricsSummary),
            templates::VIDEO_METRICS_SUMMARY.to_string(),
        );
        entries.insert(
            (MediaKind::Image, PromptKind::MetricsSummary),
            templates::IMAGE_METRICS_SUMMARY.to_string(),
        );
        Self { entries }
    }

    /// Built-in table with entries replaced from `"<media>.<prompt>"` keys
    ///
    /// Example key: `"video.single_metric"`.
    pub fn with_overrides(overrides: &BTreeMap<String, String>) -> Result<Self> {
        let mut table = Self::builtin();
        for (key, template) in overrides {
            let (media, prompt) = parse_key(key)?;
            tracing::debug!(key = %key, "Overriding prompt template");
            table.set(media, prompt, template.clone());
        }
        Ok(table)
    }

    pub fn get(&self, media: MediaKind, prompt: PromptKind) -> &str {
        self.entries
            .get(&(media, prompt))
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn set(&mut self, media: MediaKind, prompt: PromptKind, template: impl Into<String>) {
        self.entries.insert((media, prompt), template.into());
    }
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self::builtin()
    }
}

fn parse_key(key: &str) -> Result<(MediaKind, PromptKind)> {
    let invalid = || {
        Error::Config(format!(
            "Invalid prompt template key '{}': expected '<image|video>.<overall|single_metric|metrics_summary>'",
            key
        ))
    };
    let (media, prompt) = key.split_once('.').ok_or_else(invalid)?;
    let media = MediaKind::parse(media).ok_or_else(invalid)?;
    let prompt = PromptKind::parse(prompt).ok_or_else(invalid)?;
    Ok((media, prompt))
}

/// Decimal places used when printing a metric value of this media kind
pub fn value_precision(kind: MediaKind) -> usize {
    match kind {
        MediaKind::Video => 2,
        MediaKind::Image => 4,
    }
}

fn fixed(value: f64, precision: usize) -> String {
    format!("{:.*}", precision, value)
}

fn metric(metrics: &MetricValues, name: &str, precision: usize) -> String {
    fixed(metrics.get(name).copied().unwrap_or(0.0), precision)
}

/// Deterministic prompt renderer
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    templates: PromptTemplates,
}

impl PromptBuilder {
    pub fn new(templates: PromptTemplates) -> Self {
        Self { templates }
    }

    pub fn templates(&self) -> &PromptTemplates {
        &self.templates
    }

    /// Overall prompt for a video analysis
    pub fn overall_video_prompt(
        &self,
        metadata: &MediaMetadata,
        metrics: &MetricValues,
        verdict: VerdictLabel,
        confidence: f64,
    ) -> String {
        let (width, height) = metadata.resolution();
        let (duration, frame_count, fps) = match *metadata {
            MediaMetadata::Video {
                duration_seconds,
                frame_count,
                fps,
                ..
            } => (duration_seconds, frame_count, fps),
            MediaMetadata::Image { .. } => (0.0, 0, 0.0),
        };

        let mut bindings = vec![
            ("duration", fixed(duration, 2)),
            ("frame_count", frame_count.to_string()),
            ("width", width.to_string()),
            ("height", height.to_string()),
            ("fps", fixed(fps, 2)),
        ];
        bindings.extend(video_metric_bindings(metrics));
        bindings.push(("verdict", verdict.prompt_label().to_string()));
        bindings.push(("confidence", fixed(confidence, 2)));

        render(
            self.templates.get(MediaKind::Video, PromptKind::Overall),
            &bindings,
        )
    }

    /// Overall prompt for an image analysis
    pub fn overall_image_prompt(
        &self,
        metadata: &MediaMetadata,
        metrics: &MetricValues,
        verdict: VerdictLabel,
        confidence: f64,
    ) -> String {
        let (width, height) = metadata.resolution();

        let mut bindings = vec![("width", width.to_string()), ("height", height.to_string())];
        bindings.extend(image_metric_bindings(metrics));
        bindings.push(("verdict", verdict.prompt_label().to_string()));
        bindings.push(("confidence", fixed(confidence, 2)));

        render(
            self.templates.get(MediaKind::Image, PromptKind::Overall),
            &bindings,
        )
    }

    /// Overall prompt picked by the analysis' media kind
    pub fn overall_prompt(&self, analysis: &AnalysisResult, verdict: &VerdictSummary) -> String {
        match analysis.kind() {
            MediaKind::Video => self.overall_video_prompt(
                &analysis.metadata,
                &analysis.metrics,
                verdict.label,
                verdict.confidence,
            ),
            MediaKind::Image => self.overall_image_prompt(
                &analysis.metadata,
                &analysis.metrics,
                verdict.label,
                verdict.confidence,
            ),
        }
    }

    /// Prompt for a single classified metric
    pub fn single_metric_prompt(
        &self,
        media_kind: MediaKind,
        definition: &MetricDefinition,
        actual_value: f64,
        status: Status,
    ) -> String {
        let bindings = [
            ("media_kind", media_kind.as_str().to_string()),
            ("display_name", definition.display_name.to_string()),
            ("description", definition.description.to_string()),
            ("value", fixed(actual_value, value_precision(media_kind))),
            ("expected_range", definition.expected_range_label.to_string()),
            ("status", status.phrase().to_string()),
        ];

        render(
            self.templates.get(media_kind, PromptKind::SingleMetric),
            &bindings,
        )
    }

    /// Metric-focused summary prompt covering all aggregate metrics
    pub fn metrics_summary_prompt(&self, analysis: &AnalysisResult) -> String {
        let kind = analysis.kind();
        let bindings = match kind {
            MediaKind::Video => video_metric_bindings(&analysis.metrics),
            MediaKind::Image => image_metric_bindings(&analysis.metrics),
        };

        render(
            self.templates.get(kind, PromptKind::MetricsSummary),
            &bindings,
        )
    }
}

fn video_metric_bindings(metrics: &MetricValues) -> Vec<(&'static str, String)> {
    [
        "avg_motion",
        "motion_std",
        "avg_edge_consistency",
        "edge_std",
        "avg_texture_variance",
        "texture_std",
    ]
    .into_iter()
    .map(|name| (name, metric(metrics, name, 2)))
    .collect()
}

fn image_metric_bindings(metrics: &MetricValues) -> Vec<(&'static str, String)> {
    vec![
        ("avg_texture_variance", metric(metrics, "avg_texture_variance", 2)),
        ("texture_std", metric(metrics, "texture_std", 2)),
        ("edge_density", metric(metrics, "edge_density", 4)),
        ("color_variance", metric(metrics, "color_variance", 2)),
        ("edge_continuity", metric(metrics, "edge_continuity", 2)),
    ]
}
