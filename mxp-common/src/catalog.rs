//! Metric catalog
//!
//! Compiled-in definitions for every metric the analyzer reports, one table
//! per media kind. Tables are independent: a name present only in the video
//! table is unknown when looked up as an image metric.

use serde::ser::{Serialize, SerializeStruct, Serializer};
use thiserror::Error;

use crate::media::MediaKind;

/// Static description of a single analyzer metric
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct MetricDefinition {
    pub name: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub expected_range_label: &'static str,
    /// Values strictly below this are suspiciously low
    pub low_threshold: f64,
    /// Values strictly above this are suspiciously high
    pub high_threshold: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogErrorReason {
    UnknownMetric,
}

/// Returned instead of an assessment when a metric has no definition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown metric: {metric_name}")]
pub struct CatalogError {
    pub metric_name: String,
    pub reason: CatalogErrorReason,
}

impl CatalogError {
    pub fn unknown_metric(metric_name: impl Into<String>) -> Self {
        Self {
            metric_name: metric_name.into(),
            reason: CatalogErrorReason::UnknownMetric,
        }
    }
}

impl Serialize for CatalogError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("CatalogError", 2)?;
        state.serialize_field("metric_name", &self.metric_name)?;
        state.serialize_field("error", &self.to_string())?;
        state.end()
    }
}

const VIDEO_METRICS: &[MetricDefinition] = &[
    MetricDefinition {
        name: "avg_motion",
        display_name: "Average Motion",
        description: "Measures overall pixel intensity change between consecutive frames",
        expected_range_label: "10-50",
        low_threshold: 10.0,
        high_threshold: 50.0,
    },
    MetricDefinition {
        name: "motion_std",
        display_name: "Motion Standard Deviation",
        description: "Captures how varied the motion is across the video sequence",
        expected_range_label: "5-20",
        low_threshold: 5.0,
        high_threshold: 20.0,
    },
    MetricDefinition {
        name: "avg_edge_consistency",
        display_name: "Average Edge Consistency",
        description: "Measures how stable detected edges remain between frames",
        expected_range_label: "5-30",
        low_threshold: 5.0,
        high_threshold: 30.0,
    },
    MetricDefinition {
        name: "edge_std",
        display_name: "Edge Standard Deviation",
        description: "Measures variation in edge consistency across frames",
        expected_range_label: "2-15",
        low_threshold: 2.0,
        high_threshold: 15.0,
    },
    MetricDefinition {
        name: "avg_texture_variance",
        display_name: "Average Texture Variance",
        description: "Measures frame-to-frame variation in fine detail",
        expected_range_label: "100-10000",
        low_threshold: 100.0,
        high_threshold: 10000.0,
    },
    MetricDefinition {
        name: "texture_std",
        display_name: "Texture Standard Deviation",
        description: "Measures variation in texture across frames",
        expected_range_label: "50-5000",
        low_threshold: 50.0,
        high_threshold: 5000.0,
    },
];

const IMAGE_METRICS: &[MetricDefinition] = &[
    MetricDefinition {
        name: "avg_texture_variance",
        display_name: "Texture Variance",
        description: "Measures local variance of fine details (fur, grass, skin)",
        expected_range_label: "250-600",
        low_threshold: 250.0,
        high_threshold: 600.0,
    },
    MetricDefinition {
        name: "texture_std",
        display_name: "Texture Standard Deviation",
        description: "Measures variation in texture across the image",
        expected_range_label: "100-10000",
        low_threshold: 100.0,
        high_threshold: 10000.0,
    },
    MetricDefinition {
        name: "edge_density",
        display_name: "Edge Density",
        description: "Ratio of detected edges to total pixels",
        expected_range_label: "0.03-0.10",
        low_threshold: 0.03,
        high_threshold: 0.10,
    },
    MetricDefinition {
        name: "color_variance",
        display_name: "Color Variance",
        description: "Measures diversity in color saturation and hue distribution",
        expected_range_label: "3000-8000",
        low_threshold: 3000.0,
        high_threshold: 8000.0,
    },
    MetricDefinition {
        name: "edge_continuity",
        display_name: "Edge Continuity",
        description: "Average contour length across all detected edges",
        expected_range_label: "20-80",
        low_threshold: 20.0,
        high_threshold: 80.0,
    },
];

/// All definitions for a media kind
pub fn definitions(kind: MediaKind) -> &'static [MetricDefinition] {
    match kind {
        MediaKind::Video => VIDEO_METRICS,
        MediaKind::Image => IMAGE_METRICS,
    }
}

/// Resolve a metric definition for the given media kind
pub fn lookup(
    kind: MediaKind,
    metric_name: &str,
) -> Result<&'static MetricDefinition, CatalogError> {
    definitions(kind)
        .iter()
        .find(|def| def.name == metric_name)
        .ok_or_else(|| CatalogError::unknown_metric(metric_name))
}
