//! Region-wide assessment sweeps.
//!
//! [`BulkOrchestrator::run_bulk`] resolves every property inside a radius
//! and runs [`AssessmentOrchestrator::run_assessment`] for each, at most
//! `max_concurrency` at a time. Every candidate yields exactly one
//! [`AssessmentOutcome`]; a failure is recorded and never stops the rest.

use futures::stream::{self, StreamExt};
use serde::Serialize;
use terrainsight_core::risk::RiskLevel;
use terrainsight_core::types::{DbId, GeoPoint};
use tokio_util::sync::CancellationToken;

use crate::orchestrator::{AssessmentOrchestrator, OrchestrationError};

/// Default number of candidates assessed at once.
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// Error recorded for candidates skipped because the run was cancelled.
pub const CANCELLED: &str = "cancelled";

/// Result of assessing one candidate in a bulk run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentOutcome {
    pub property_id: DbId,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<RiskLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AssessmentOutcome {
    pub fn succeeded(property_id: DbId, risk_score: f64) -> Self {
        Self {
            property_id,
            success: true,
            risk_score: Some(risk_score),
            risk_level: Some(RiskLevel::from_score(risk_score)),
            error: None,
        }
    }

    pub fn failed(property_id: DbId, error: impl Into<String>) -> Self {
        Self {
            property_id,
            success: false,
            risk_score: None,
            risk_level: None,
            error: Some(error.into()),
        }
    }
}

/// Outcomes of a bulk run with success/failure tallies.
#[derive(Debug, Clone, Serialize)]
pub struct BulkReport {
    pub outcomes: Vec<AssessmentOutcome>,
    pub succeeded: usize,
    pub failed: usize,
}

impl From<Vec<AssessmentOutcome>> for BulkReport {
    fn from(outcomes: Vec<AssessmentOutcome>) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.success).count();
        let failed = outcomes.len() - succeeded;
        Self {
            outcomes,
            succeeded,
            failed,
        }
    }
}

#[derive(Clone)]
pub struct BulkOrchestrator {
    orchestrator: AssessmentOrchestrator,
    max_concurrency: usize,
}

impl BulkOrchestrator {
    /// `max_concurrency` is clamped to at least 1.
    pub fn new(orchestrator: AssessmentOrchestrator, max_concurrency: usize) -> Self {
        Self {
            orchestrator,
            max_concurrency: max_concurrency.max(1),
        }
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Assess every property within `radius_km` of `center`.
    ///
    /// Only the candidate lookup can fail the whole run. Outcome order is
    /// unspecified. Once `cancel` fires, candidates that have not started
    /// are reported as failed with [`CANCELLED`]; running ones finish,
    /// even if the returned future is dropped.
    pub async fn run_bulk(
        &self,
        center: GeoPoint,
        radius_km: f64,
        cancel: &CancellationToken,
    ) -> Result<Vec<AssessmentOutcome>, OrchestrationError> {
        let candidates = self
            .orchestrator
            .properties()
            .find_within_radius(center, radius_km)
            .await?;

        if candidates.is_empty() {
            tracing::debug!(?center, radius_km, "Bulk run found no candidates");
            return Ok(Vec::new());
        }

        let total = candidates.len();
        tracing::info!(
            ?center,
            radius_km,
            candidates = total,
            max_concurrency = self.max_concurrency,
            "Bulk assessment started",
        );

        // Each candidate runs on its own task, so dropping this future
        // leaves started assessments running to completion.
        let outcomes: Vec<AssessmentOutcome> = stream::iter(candidates)
            .map(|property| {
                let property_id = property.id;
                let task = tokio::spawn(assess_candidate(
                    self.orchestrator.clone(),
                    property_id,
                    cancel.clone(),
                ));
                async move {
                    task.await.unwrap_or_else(|e| {
                        tracing::error!(property_id, error = %e, "Bulk candidate task failed");
                        AssessmentOutcome::failed(property_id, e.to_string())
                    })
                }
            })
            .buffer_unordered(self.max_concurrency)
            .collect()
            .await;

        let succeeded = outcomes.iter().filter(|o| o.success).count();
        tracing::info!(
            candidates = total,
            succeeded,
            failed = total - succeeded,
            cancelled = cancel.is_cancelled(),
            "Bulk assessment finished",
        );

        Ok(outcomes)
    }
}

async fn assess_candidate(
    orchestrator: AssessmentOrchestrator,
    property_id: DbId,
    cancel: CancellationToken,
) -> AssessmentOutcome {
    if cancel.is_cancelled() {
        return AssessmentOutcome::failed(property_id, CANCELLED);
    }
    match orchestrator.run_assessment(property_id).await {
        Ok(assessment) => AssessmentOutcome::succeeded(property_id, assessment.overall_risk_score),
        Err(e) => {
            tracing::warn!(property_id, error = %e, "Bulk candidate failed");
            AssessmentOutcome::failed(property_id, e.to_string())
        }
    }
}
