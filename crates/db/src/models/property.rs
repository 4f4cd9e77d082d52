//! Property entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use terrainsight_core::risk::RiskLevel;
use terrainsight_core::types::{DbId, GeoPoint, Timestamp};
use validator::Validate;

/// Default static inputs applied when a registration omits them.
pub const DEFAULT_VEGETATION_DENSITY: f64 = 0.5;
pub const DEFAULT_SLOPE_PERCENTAGE: f64 = 10.0;
pub const DEFAULT_DISTANCE_TO_FIRE_STATION_KM: f64 = 5.0;
pub const DEFAULT_PROPERTY_SIZE_ACRES: f64 = 1.0;

/// A property row from the `properties` table.
///
/// `longitude`/`latitude` are projected out of the `location` geography
/// column and `boundary` is rendered as GeoJSON.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Property {
    pub id: DbId,
    pub name: String,
    pub address: Option<String>,
    pub longitude: f64,
    pub latitude: f64,
    /// GeoJSON polygon, if a boundary was registered.
    pub boundary: Option<serde_json::Value>,
    pub vegetation_density: f64,
    pub slope_percentage: f64,
    pub distance_to_fire_station_km: f64,
    pub has_firebreak: bool,
    pub property_size_acres: f64,
    /// Cached copy of the latest assessment's overall score. Written only
    /// by the assessment orchestrator.
    pub current_risk_score: f64,
    pub last_assessment_date: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Property {
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.longitude, self.latitude)
    }

    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_score(self.current_risk_score)
    }
}

/// DTO for registering a new property. Static inputs fall back to the
/// `DEFAULT_*` constants when omitted.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProperty {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 500))]
    pub address: Option<String>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    pub boundary: Option<serde_json::Value>,
    #[validate(range(min = 0.0, max = 1.0))]
    pub vegetation_density: Option<f64>,
    /// Rise over run; steeper than 45 degrees exceeds 100.
    #[validate(range(min = 0.0))]
    pub slope_percentage: Option<f64>,
    #[validate(range(min = 0.0))]
    pub distance_to_fire_station_km: Option<f64>,
    pub has_firebreak: Option<bool>,
    #[validate(range(min = 0.0))]
    pub property_size_acres: Option<f64>,
}

impl CreateProperty {
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.longitude, self.latitude)
    }
}

/// Result of a derived-score write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreUpdate {
    /// The derived fields now reflect the given score and timestamp.
    Applied,
    /// A newer assessment had already been applied; nothing was written.
    Stale,
}
