//! Authenticity verdict produced by an external scanner

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictLabel {
    Authentic,
    AiGenerated,
}

impl VerdictLabel {
    /// Form used inside generated prompts
    pub fn prompt_label(&self) -> &'static str {
        match self {
            VerdictLabel::Authentic => "Authentic",
            VerdictLabel::AiGenerated => "AI-generated",
        }
    }
}

impl fmt::Display for VerdictLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prompt_label())
    }
}

/// Verdict plus confidence in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VerdictSummary {
    pub label: VerdictLabel,
    pub confidence: f64,
}

impl VerdictSummary {
    /// Create a verdict with confidence clamped to `[0, 1]`
    pub fn new(label: VerdictLabel, confidence: f64) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self { label, confidence }
    }

    /// Build from a scanner's `ai_detected` flag
    pub fn from_detection(ai_detected: bool, confidence: f64) -> Self {
        let label = if ai_detected {
            VerdictLabel::AiGenerated
        } else {
            VerdictLabel::Authentic
        };
        Self::new(label, confidence)
    }
}
