//! Repository for the append-only `assessments` table.

use sqlx::types::Json;
use sqlx::PgPool;
use terrainsight_core::types::{DbId, Timestamp};

use crate::models::assessment::{Assessment, NewAssessment};

/// Column list shared across queries.
const COLUMNS: &str = "id, property_id, overall_risk_score, vegetation_risk, weather_risk, \
     terrain_risk, proximity_risk, historical_risk, temperature_c, humidity_pct, \
     wind_speed_kmh, rainfall_mm, confidence_score, model_version, recommendations, \
     fire_spread_simulation, assessed_at";

/// Provides append and read operations for assessments. There is no update
/// or delete: rows are immutable once written.
pub struct AssessmentRepo;

impl AssessmentRepo {
    /// Append an assessment, returning the stored row with its assigned id.
    pub async fn insert(pool: &PgPool, input: &NewAssessment) -> Result<Assessment, sqlx::Error> {
        let query = format!(
            "INSERT INTO assessments
                (property_id, overall_risk_score, vegetation_risk, weather_risk, terrain_risk,
                 proximity_risk, historical_risk, temperature_c, humidity_pct, wind_speed_kmh,
                 rainfall_mm, confidence_score, model_version, recommendations,
                 fire_spread_simulation, assessed_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Assessment>(&query)
            .bind(input.property_id)
            .bind(input.overall_risk_score)
            .bind(input.vegetation_risk)
            .bind(input.weather_risk)
            .bind(input.terrain_risk)
            .bind(input.proximity_risk)
            .bind(input.historical_risk)
            .bind(input.temperature_c)
            .bind(input.humidity_pct)
            .bind(input.wind_speed_kmh)
            .bind(input.rainfall_mm)
            .bind(input.confidence_score)
            .bind(&input.model_version)
            .bind(Json(&input.recommendations))
            .bind(&input.fire_spread_simulation)
            .bind(input.assessed_at)
            .fetch_one(pool)
            .await
    }

    /// The most recent assessment for a property (ties broken by insertion order).
    pub async fn latest_for_property(
        pool: &PgPool,
        property_id: DbId,
    ) -> Result<Option<Assessment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM assessments
             WHERE property_id = $1
             ORDER BY assessed_at DESC, id DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, Assessment>(&query)
            .bind(property_id)
            .fetch_optional(pool)
            .await
    }

    /// Assessments at or after `since`, oldest first.
    pub async fn history_for_property(
        pool: &PgPool,
        property_id: DbId,
        since: Timestamp,
    ) -> Result<Vec<Assessment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM assessments
             WHERE property_id = $1 AND assessed_at >= $2
             ORDER BY assessed_at ASC, id ASC"
        );
        sqlx::query_as::<_, Assessment>(&query)
            .bind(property_id)
            .bind(since)
            .fetch_all(pool)
            .await
    }
}
