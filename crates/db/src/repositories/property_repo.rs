//! Repository for the `properties` table.

use sqlx::PgPool;
use terrainsight_core::types::{DbId, GeoPoint, Timestamp};

use crate::models::property::{
    CreateProperty, Property, ScoreUpdate, DEFAULT_DISTANCE_TO_FIRE_STATION_KM,
    DEFAULT_PROPERTY_SIZE_ACRES, DEFAULT_SLOPE_PERCENTAGE, DEFAULT_VEGETATION_DENSITY,
};

/// Column list shared across queries.
///
/// `location` and `boundary` are geography columns; they are projected into
/// plain coordinates and GeoJSON so [`Property`] stays free of PostGIS types.
const COLUMNS: &str = "id, name, address, \
     ST_X(location::geometry) AS longitude, ST_Y(location::geometry) AS latitude, \
     ST_AsGeoJSON(boundary)::jsonb AS boundary, \
     vegetation_density, slope_percentage, distance_to_fire_station_km, has_firebreak, \
     property_size_acres, current_risk_score, last_assessment_date, created_at, updated_at";

/// Provides reads, spatial queries, and the derived-score write for properties.
pub struct PropertyRepo;

impl PropertyRepo {
    /// Insert a new property with a zero current score, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateProperty) -> Result<Property, sqlx::Error> {
        let query = format!(
            "INSERT INTO properties
                (name, address, location, boundary, vegetation_density, slope_percentage,
                 distance_to_fire_station_km, has_firebreak, property_size_acres)
             VALUES ($1, $2,
                 ST_SetSRID(ST_MakePoint($3, $4), 4326)::geography,
                 CASE WHEN $5::jsonb IS NULL THEN NULL
                      ELSE ST_SetSRID(ST_GeomFromGeoJSON($5::text), 4326)::geography END,
                 $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Property>(&query)
            .bind(&input.name)
            .bind(&input.address)
            .bind(input.longitude)
            .bind(input.latitude)
            .bind(&input.boundary)
            .bind(input.vegetation_density.unwrap_or(DEFAULT_VEGETATION_DENSITY))
            .bind(input.slope_percentage.unwrap_or(DEFAULT_SLOPE_PERCENTAGE))
            .bind(
                input
                    .distance_to_fire_station_km
                    .unwrap_or(DEFAULT_DISTANCE_TO_FIRE_STATION_KM),
            )
            .bind(input.has_firebreak.unwrap_or(false))
            .bind(input.property_size_acres.unwrap_or(DEFAULT_PROPERTY_SIZE_ACRES))
            .fetch_one(pool)
            .await
    }

    /// Find a property by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Property>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM properties WHERE id = $1");
        sqlx::query_as::<_, Property>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Properties whose center point lies within `radius_km` of `center`.
    ///
    /// Distance is geodesic (`geography` arithmetic on the WGS84 spheroid).
    /// Ordered by current score descending, then id ascending.
    pub async fn find_within_radius(
        pool: &PgPool,
        center: GeoPoint,
        radius_km: f64,
    ) -> Result<Vec<Property>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM properties
             WHERE ST_DWithin(location, ST_SetSRID(ST_MakePoint($1, $2), 4326)::geography, $3)
             ORDER BY current_risk_score DESC, id ASC"
        );
        sqlx::query_as::<_, Property>(&query)
            .bind(center.longitude)
            .bind(center.latitude)
            .bind(radius_km * 1000.0)
            .fetch_all(pool)
            .await
    }

    /// Properties whose current score is at or above `threshold`, highest first.
    pub async fn list_high_risk(
        pool: &PgPool,
        threshold: f64,
    ) -> Result<Vec<Property>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM properties
             WHERE current_risk_score >= $1
             ORDER BY current_risk_score DESC, id ASC"
        );
        sqlx::query_as::<_, Property>(&query)
            .bind(threshold)
            .fetch_all(pool)
            .await
    }

    /// Write the two derived fields, last-writer-wins by `assessed_at`.
    ///
    /// Only `current_risk_score` and `last_assessment_date` are touched.
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_current_score(
        pool: &PgPool,
        id: DbId,
        score: f64,
        assessed_at: Timestamp,
    ) -> Result<Option<ScoreUpdate>, sqlx::Error> {
        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE properties
             SET current_risk_score = $2, last_assessment_date = $3
             WHERE id = $1
               AND (last_assessment_date IS NULL OR last_assessment_date <= $3)
             RETURNING id",
        )
        .bind(id)
        .bind(score)
        .bind(assessed_at)
        .fetch_optional(pool)
        .await?;

        if updated.is_some() {
            return Ok(Some(ScoreUpdate::Applied));
        }

        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM properties WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(exists.then_some(ScoreUpdate::Stale))
    }

    /// Write the derived fields re-derived from the assessment log.
    ///
    /// A dated write loses to a newer stored date. An undated write (the
    /// property has no assessments) only applies while that still holds.
    /// Returns `None` if no row with the given `id` exists.
    pub async fn restore_current_score(
        pool: &PgPool,
        id: DbId,
        score: f64,
        assessed_at: Option<Timestamp>,
    ) -> Result<Option<ScoreUpdate>, sqlx::Error> {
        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE properties
             SET current_risk_score = $2, last_assessment_date = $3
             WHERE id = $1
               AND CASE
                   WHEN $3::timestamptz IS NULL
                       THEN NOT EXISTS (SELECT 1 FROM assessments WHERE property_id = $1)
                   ELSE last_assessment_date IS NULL OR last_assessment_date <= $3
               END
             RETURNING id",
        )
        .bind(id)
        .bind(score)
        .bind(assessed_at)
        .fetch_optional(pool)
        .await?;

        if updated.is_some() {
            return Ok(Some(ScoreUpdate::Applied));
        }

        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM properties WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(exists.then_some(ScoreUpdate::Stale))
    }
}
