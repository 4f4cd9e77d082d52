//! Single-property assessment orchestration.
//!
//! [`AssessmentOrchestrator::run_assessment`] loads a property, asks the
//! scorer for a score, appends the assessment, refreshes the property's
//! cached current score, and publishes a [`ScoreChange`]. The steps for one
//! property always run in that order.
//!
//! The cached score is a materialized view of the assessment log. If the
//! cache write fails after the append, the assessment stays valid and the
//! cache is stale until the next successful run or an explicit
//! [`refresh_current_score`](AssessmentOrchestrator::refresh_current_score).

use std::sync::Arc;

use chrono::Utc;
use terrainsight_core::error::CoreError;
use terrainsight_core::geo::region_topic;
use terrainsight_core::types::{DbId, Timestamp};
use terrainsight_db::models::assessment::{Assessment, NewAssessment};
use terrainsight_db::models::property::{Property, ScoreUpdate};
use terrainsight_events::ScoreChange;
use terrainsight_scoring::{PropertyData, ScoreResult, ScoringRequest};

use crate::notify::ScoreNotifier;
use crate::scorer::RiskScorer;
use crate::store::{AssessmentLog, PropertyStore};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum OrchestrationError {
    #[error("property {0} not found")]
    PropertyNotFound(DbId),

    #[error("scoring unavailable: {cause}")]
    ScoringUnavailable { cause: String },

    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl From<CoreError> for OrchestrationError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound { id, .. } => Self::PropertyNotFound(id),
            CoreError::ScoringUnavailable(cause) => Self::ScoringUnavailable { cause },
            CoreError::StorageUnavailable(msg) => Self::StorageUnavailable(msg),
            other => Self::StorageUnavailable(other.to_string()),
        }
    }
}

impl From<OrchestrationError> for CoreError {
    fn from(err: OrchestrationError) -> Self {
        match err {
            OrchestrationError::PropertyNotFound(id) => CoreError::NotFound {
                entity: "Property",
                id,
            },
            OrchestrationError::ScoringUnavailable { cause } => {
                CoreError::ScoringUnavailable(cause)
            }
            OrchestrationError::StorageUnavailable(msg) => CoreError::StorageUnavailable(msg),
        }
    }
}

// ---------------------------------------------------------------------------
// AssessmentOrchestrator
// ---------------------------------------------------------------------------

/// Stateless coordinator; cheap to clone and safe to run concurrently.
#[derive(Clone)]
pub struct AssessmentOrchestrator {
    properties: Arc<dyn PropertyStore>,
    assessments: Arc<dyn AssessmentLog>,
    scorer: Arc<dyn RiskScorer>,
    notifier: Arc<dyn ScoreNotifier>,
}

impl AssessmentOrchestrator {
    pub fn new(
        properties: Arc<dyn PropertyStore>,
        assessments: Arc<dyn AssessmentLog>,
        scorer: Arc<dyn RiskScorer>,
        notifier: Arc<dyn ScoreNotifier>,
    ) -> Self {
        Self {
            properties,
            assessments,
            scorer,
            notifier,
        }
    }

    pub fn properties(&self) -> &Arc<dyn PropertyStore> {
        &self.properties
    }

    /// Score a property and record the result.
    ///
    /// * Unknown property: [`OrchestrationError::PropertyNotFound`], nothing
    ///   written.
    /// * Scorer failure: [`OrchestrationError::ScoringUnavailable`], nothing
    ///   written.
    /// * Append failure: [`OrchestrationError::StorageUnavailable`], nothing
    ///   written.
    /// * Cache write failure: [`OrchestrationError::StorageUnavailable`];
    ///   the appended assessment is kept and no notification is sent.
    pub async fn run_assessment(
        &self,
        property_id: DbId,
    ) -> Result<Assessment, OrchestrationError> {
        let property = self
            .properties
            .get(property_id)
            .await?
            .ok_or(OrchestrationError::PropertyNotFound(property_id))?;

        let request = scoring_request(&property);
        let result = self.scorer.score(&request).await.map_err(|failure| {
            tracing::warn!(
                property_id,
                kind = %failure.kind,
                error = %failure,
                "Scoring failed",
            );
            OrchestrationError::ScoringUnavailable {
                cause: failure.to_string(),
            }
        })?;

        let assessment = self
            .assessments
            .append(new_assessment(property_id, result, Utc::now()))
            .await?;

        let update = self
            .properties
            .update_current_score(
                property_id,
                assessment.overall_risk_score,
                assessment.assessed_at,
            )
            .await
            .map_err(|e| {
                tracing::error!(
                    property_id,
                    assessment_id = assessment.id,
                    error = %e,
                    "Assessment stored but current score not updated",
                );
                OrchestrationError::from(e)
            })?;

        match update {
            Some(ScoreUpdate::Applied) => {
                tracing::info!(
                    property_id,
                    assessment_id = assessment.id,
                    score = assessment.overall_risk_score,
                    risk_level = assessment.risk_level().label(),
                    "Assessment completed",
                );
                self.notify(&property, assessment.overall_risk_score);
            }
            Some(ScoreUpdate::Stale) => {
                tracing::debug!(
                    property_id,
                    assessment_id = assessment.id,
                    "Newer assessment already applied, current score left unchanged",
                );
            }
            None => {
                return Err(OrchestrationError::StorageUnavailable(format!(
                    "property {property_id} disappeared before its score was updated"
                )));
            }
        }

        Ok(assessment)
    }

    /// Re-derive the cached current score from the latest assessment, or
    /// reset it to 0 when the property has none. Returns the refreshed
    /// property.
    ///
    /// An assessment that lands while the refresh runs wins: the write is
    /// skipped and the property is returned as that run left it.
    pub async fn refresh_current_score(
        &self,
        property_id: DbId,
    ) -> Result<Property, OrchestrationError> {
        let mut property = self
            .properties
            .get(property_id)
            .await?
            .ok_or(OrchestrationError::PropertyNotFound(property_id))?;

        let latest = self.assessments.latest_for(property_id).await?;
        let (score, assessed_at) = latest
            .map(|a| (a.overall_risk_score, Some(a.assessed_at)))
            .unwrap_or((0.0, None));

        match self
            .properties
            .restore_current_score(property_id, score, assessed_at)
            .await?
        {
            Some(ScoreUpdate::Applied) => {}
            Some(ScoreUpdate::Stale) => {
                tracing::debug!(
                    property_id,
                    "Newer assessment landed during refresh, current score left unchanged",
                );
                return self
                    .properties
                    .get(property_id)
                    .await?
                    .ok_or(OrchestrationError::PropertyNotFound(property_id));
            }
            None => return Err(OrchestrationError::PropertyNotFound(property_id)),
        }

        let changed = property.current_risk_score != score;
        property.current_risk_score = score;
        property.last_assessment_date = assessed_at;

        tracing::info!(property_id, score, changed, "Current score re-derived");
        if changed {
            self.notify(&property, score);
        }
        Ok(property)
    }

    /// Publish once, to the property's region topic. Failures are logged
    /// and dropped.
    fn notify(&self, property: &Property, score: f64) {
        let change = ScoreChange::new(property.id, score);
        let topic = region_topic(property.location());
        if let Err(e) = self.notifier.publish_score(&topic, &change) {
            tracing::warn!(
                property_id = property.id,
                %topic,
                error = %e,
                "Score change notification dropped",
            );
        }
    }
}

fn scoring_request(property: &Property) -> ScoringRequest {
    ScoringRequest::new(
        property.id,
        property.latitude,
        property.longitude,
        PropertyData {
            vegetation_density: property.vegetation_density,
            slope_percentage: property.slope_percentage,
            distance_to_fire_station: property.distance_to_fire_station_km,
            has_firebreak: property.has_firebreak,
            property_size_acres: property.property_size_acres,
        },
    )
}

fn new_assessment(property_id: DbId, result: ScoreResult, assessed_at: Timestamp) -> NewAssessment {
    let weather = result.weather.unwrap_or_default();
    NewAssessment {
        property_id,
        overall_risk_score: result.overall_risk_score,
        vegetation_risk: result.component_scores.vegetation_risk,
        weather_risk: result.component_scores.weather_risk,
        terrain_risk: result.component_scores.terrain_risk,
        proximity_risk: result.component_scores.proximity_risk,
        historical_risk: result.component_scores.historical_risk,
        temperature_c: weather.temperature,
        humidity_pct: weather.humidity,
        wind_speed_kmh: weather.wind_speed,
        rainfall_mm: weather.rainfall,
        confidence_score: result.confidence_score,
        model_version: result.model_version,
        recommendations: result.recommendations,
        fire_spread_simulation: result.fire_spread_simulation,
        assessed_at,
    }
}
