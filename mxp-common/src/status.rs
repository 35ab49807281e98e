//! Status band classification

use serde::{Deserialize, Serialize};

use crate::catalog::MetricDefinition;

/// Position of a metric value relative to its catalog thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Normal,
    SuspiciousLow,
    SuspiciousHigh,
}

impl Status {
    pub fn is_normal(&self) -> bool {
        matches!(self, Status::Normal)
    }

    /// Human-readable phrase used in prompts
    pub fn phrase(&self) -> &'static str {
        if self.is_normal() {
            "within normal range"
        } else {
            "outside normal range"
        }
    }
}

/// Classify a value against a definition's thresholds
///
/// Boundary values are `Normal`. NaN compares false against both thresholds
/// and also lands on `Normal`.
pub fn classify(value: f64, definition: &MetricDefinition) -> Status {
    if value < definition.low_threshold {
        Status::SuspiciousLow
    } else if value > definition.high_threshold {
        Status::SuspiciousHigh
    } else {
        Status::Normal
    }
}
