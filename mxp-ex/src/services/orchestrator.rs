//! Explanation orchestrator
//!
//! Ties catalog lookup, classification, prompt rendering and narrative
//! generation together. Generation failures never escape: they are turned
//! into fallback text at the scope of the single call that failed.

use futures::stream::{self, StreamExt};
use mxp_common::catalog;
use mxp_common::{
    classify, AnalysisResult, CatalogError, MetricAssessment, PromptBuilder, VerdictSummary,
};
use std::sync::Arc;
use std::time::Instant;

use super::narrative_generator::NarrativeGenerator;

/// Default number of generation calls in flight per fan-out
pub const DEFAULT_MAX_CONCURRENT: usize = 8;

pub struct ExplanationOrchestrator {
    generator: Arc<dyn NarrativeGenerator>,
    prompts: PromptBuilder,
    max_concurrent: usize,
}

impl ExplanationOrchestrator {
    pub fn new(generator: Arc<dyn NarrativeGenerator>, prompts: PromptBuilder) -> Self {
        Self {
            generator,
            prompts,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }

    /// Limit on concurrent generation calls in [`Self::explain_all_metrics`]
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    pub fn prompts(&self) -> &PromptBuilder {
        &self.prompts
    }

    /// Narrative justifying the verdict for the whole analysis
    ///
    /// Always returns text; a failed generation call yields a fallback
    /// message describing the failure.
    pub async fn explain_overall(
        &self,
        analysis: &AnalysisResult,
        verdict: &VerdictSummary,
    ) -> String {
        let kind = analysis.kind();
        let prompt = self.prompts.overall_prompt(analysis, verdict);
        let started = Instant::now();

        match self.generator.generate(&prompt).await {
            Ok(text) => {
                tracing::info!(
                    media_kind = %kind,
                    verdict = %verdict.label,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Overall explanation generated"
                );
                text
            }
            Err(e) => {
                tracing::warn!(
                    media_kind = %kind,
                    error = %e,
                    "Overall explanation generation failed"
                );
                format!("Error generating explanation: {}", e)
            }
        }
    }

    /// Assessment for one metric
    ///
    /// Unknown metric names fail fast with [`CatalogError`] before any
    /// generation call. A value absent from the analysis is read as `0.0`.
    pub async fn explain_metric(
        &self,
        analysis: &AnalysisResult,
        metric_name: &str,
    ) -> Result<MetricAssessment, CatalogError> {
        let kind = analysis.kind();
        let definition = catalog::lookup(kind, metric_name).map_err(|e| {
            tracing::debug!(media_kind = %kind, metric = metric_name, "Unknown metric requested");
            e
        })?;

        let actual_value = analysis.metric_or_zero(metric_name);
        let status = classify(actual_value, definition);
        let prompt = self
            .prompts
            .single_metric_prompt(kind, definition, actual_value, status);

        let narrative = match self.generator.generate(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(
                    media_kind = %kind,
                    metric = metric_name,
                    error = %e,
                    "Metric narrative generation failed"
                );
                format!("Error generating analysis: {}", e)
            }
        };

        Ok(MetricAssessment {
            metric_name: metric_name.to_string(),
            display_name: definition.display_name.to_string(),
            actual_value,
            expected_range_label: definition.expected_range_label.to_string(),
            description: definition.description.to_string(),
            status,
            narrative,
        })
    }

    /// Assess every metric present in the analysis concurrently
    ///
    /// Exactly one result per metric key, in completion order. Each unit
    /// captures its own outcome; the batch always drains fully.
    pub async fn explain_all_metrics(
        &self,
        analysis: &AnalysisResult,
    ) -> Vec<Result<MetricAssessment, CatalogError>> {
        let total = analysis.metrics.len();
        let started = Instant::now();

        let units: Vec<_> = analysis
            .metrics
            .keys()
            .map(|name| self.explain_metric(analysis, name))
            .collect();
        let results: Vec<Result<MetricAssessment, CatalogError>> = stream::iter(units)
            .buffer_unordered(self.max_concurrent)
            .collect()
            .await;

        let unknown = results.iter().filter(|r| r.is_err()).count();
        tracing::info!(
            media_kind = %analysis.kind(),
            total,
            unknown,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Metric explanations completed"
        );

        results
    }

    /// Short metric-focused reading of all aggregate metrics in one call
    pub async fn explain_metrics_summary(&self, analysis: &AnalysisResult) -> String {
        let prompt = self.prompts.metrics_summary_prompt(analysis);

        match self.generator.generate(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(
                    media_kind = %analysis.kind(),
                    error = %e,
                    "Metrics summary generation failed"
                );
                format!("Error generating summary: {}", e)
            }
        }
    }
}
