//! Assessment entity model and DTOs.
//!
//! Assessments are append-only: there is no update DTO.

use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;
use terrainsight_core::mitigation::Recommendation;
use terrainsight_core::risk::RiskLevel;
use terrainsight_core::types::{DbId, Timestamp};

/// An assessment row from the `assessments` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Assessment {
    pub id: DbId,
    pub property_id: DbId,
    pub overall_risk_score: f64,
    pub vegetation_risk: f64,
    pub weather_risk: f64,
    pub terrain_risk: f64,
    pub proximity_risk: f64,
    pub historical_risk: Option<f64>,
    pub temperature_c: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub wind_speed_kmh: Option<f64>,
    pub rainfall_mm: Option<f64>,
    pub confidence_score: f64,
    pub model_version: String,
    pub recommendations: Json<Vec<Recommendation>>,
    /// Opaque oracle payload, stored verbatim.
    pub fire_spread_simulation: serde_json::Value,
    pub assessed_at: Timestamp,
}

impl Assessment {
    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_score(self.overall_risk_score)
    }
}

/// DTO for appending a new assessment.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAssessment {
    pub property_id: DbId,
    pub overall_risk_score: f64,
    pub vegetation_risk: f64,
    pub weather_risk: f64,
    pub terrain_risk: f64,
    pub proximity_risk: f64,
    pub historical_risk: Option<f64>,
    pub temperature_c: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub wind_speed_kmh: Option<f64>,
    pub rainfall_mm: Option<f64>,
    pub confidence_score: f64,
    pub model_version: String,
    pub recommendations: Vec<Recommendation>,
    pub fire_spread_simulation: serde_json::Value,
    pub assessed_at: Timestamp,
}

impl NewAssessment {
    /// Materialize the row the store would return for this insert.
    pub fn into_assessment(self, id: DbId) -> Assessment {
        Assessment {
            id,
            property_id: self.property_id,
            overall_risk_score: self.overall_risk_score,
            vegetation_risk: self.vegetation_risk,
            weather_risk: self.weather_risk,
            terrain_risk: self.terrain_risk,
            proximity_risk: self.proximity_risk,
            historical_risk: self.historical_risk,
            temperature_c: self.temperature_c,
            humidity_pct: self.humidity_pct,
            wind_speed_kmh: self.wind_speed_kmh,
            rainfall_mm: self.rainfall_mm,
            confidence_score: self.confidence_score,
            model_version: self.model_version,
            recommendations: Json(self.recommendations),
            fire_spread_simulation: self.fire_spread_simulation,
            assessed_at: self.assessed_at,
        }
    }
}
