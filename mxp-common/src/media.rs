//! Media analysis data model
//!
//! Shapes produced by the external media analyzer and consumed by the
//! explanation pipeline. The pipeline only ever reads these values.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Metric name → measured value
pub type MetricValues = BTreeMap<String, f64>;

/// Discriminator selecting which metric catalog and prompt templates apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }

    /// Parse the wire form (`"image"` / `"video"`)
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "image" => Some(MediaKind::Image),
            "video" => Some(MediaKind::Video),
            _ => None,
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Media metadata, tagged on the wire by a `"type"` field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MediaMetadata {
    Image {
        width: u32,
        height: u32,
    },
    Video {
        width: u32,
        height: u32,
        /// Duration in seconds
        #[serde(rename = "duration")]
        duration_seconds: f64,
        frame_count: u64,
        fps: f64,
    },
}

impl MediaMetadata {
    pub fn kind(&self) -> MediaKind {
        match self {
            MediaMetadata::Image { .. } => MediaKind::Image,
            MediaMetadata::Video { .. } => MediaKind::Video,
        }
    }

    /// Frame resolution as `(width, height)`
    pub fn resolution(&self) -> (u32, u32) {
        match *self {
            MediaMetadata::Image { width, height } => (width, height),
            MediaMetadata::Video { width, height, .. } => (width, height),
        }
    }
}

/// Output of the media analyzer for a single file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub metadata: MediaMetadata,
    pub metrics: MetricValues,
    /// Analyzer-specific payload, carried through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_data: Option<serde_json::Value>,
}

impl AnalysisResult {
    pub fn new(metadata: MediaMetadata, metrics: MetricValues) -> Self {
        Self {
            metadata,
            metrics,
            raw_data: None,
        }
    }

    pub fn kind(&self) -> MediaKind {
        self.metadata.kind()
    }

    /// Metric value, `0.0` when the analyzer did not report it
    pub fn metric_or_zero(&self, name: &str) -> f64 {
        self.metrics.get(name).copied().unwrap_or(0.0)
    }
}
