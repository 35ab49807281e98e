//! # MXP Common Library
//!
//! Shared code for the media explainability services:
//! - Media analysis data model (metadata, metric values, verdicts)
//! - Metric catalog and status classification
//! - Prompt templates and the deterministic prompt builder
//! - Configuration loading

pub mod assessment;
pub mod catalog;
pub mod config;
pub mod error;
pub mod media;
pub mod prompts;
pub mod status;
pub mod verdict;

pub use assessment::MetricAssessment;
pub use catalog::{CatalogError, CatalogErrorReason, MetricDefinition};
pub use error::{Error, Result};
pub use media::{AnalysisResult, MediaKind, MediaMetadata, MetricValues};
pub use prompts::{PromptBuilder, PromptKind, PromptTemplates};
pub use status::{classify, Status};
pub use verdict::{VerdictLabel, VerdictSummary};
