//! Wire types for the scoring oracle's `/calculate-risk` endpoint.
//!
//! The oracle's response is decoded into [`ScoreResult`] by
//! [`parse_score_response`], which also enforces score bounds. Its own
//! `risk_level` and `assessment_timestamp` fields are ignored: the service
//! derives both itself.

use serde::{Deserialize, Serialize};
use terrainsight_core::mitigation::Recommendation;
use terrainsight_core::risk::{validate_confidence, validate_score, DEFAULT_MODEL_VERSION};
use terrainsight_core::types::DbId;

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Static property inputs sent to the oracle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyData {
    pub vegetation_density: f64,
    pub slope_percentage: f64,
    /// Kilometres to the nearest fire station.
    pub distance_to_fire_station: f64,
    pub has_firebreak: bool,
    pub property_size_acres: f64,
}

/// Body of `POST /calculate-risk`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringRequest {
    /// Sent as a string; the oracle treats ids as opaque.
    pub property_id: String,
    pub lat: f64,
    pub lon: f64,
    pub property_data: PropertyData,
}

impl ScoringRequest {
    pub fn new(property_id: DbId, lat: f64, lon: f64, property_data: PropertyData) -> Self {
        Self {
            property_id: property_id.to_string(),
            lat,
            lon,
            property_data,
        }
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// Per-factor breakdown of the overall score, each `0..=100`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentScores {
    pub vegetation_risk: f64,
    pub weather_risk: f64,
    pub terrain_risk: f64,
    pub proximity_risk: f64,
    #[serde(default)]
    pub historical_risk: Option<f64>,
}

/// Weather snapshot the oracle scored against, when it reports one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherConditions {
    /// Degrees Celsius.
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Relative humidity, percent.
    #[serde(default)]
    pub humidity: Option<f64>,
    /// km/h.
    #[serde(default)]
    pub wind_speed: Option<f64>,
    /// mm over the oracle's lookback window.
    #[serde(default)]
    pub rainfall: Option<f64>,
}

/// A validated oracle answer.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    pub overall_risk_score: f64,
    pub component_scores: ComponentScores,
    pub recommendations: Vec<Recommendation>,
    /// Opaque structured data, passed through unmodified.
    pub fire_spread_simulation: serde_json::Value,
    pub confidence_score: f64,
    pub model_version: String,
    pub weather: Option<WeatherConditions>,
}

#[derive(Debug, Deserialize)]
struct RawScoreResponse {
    overall_risk_score: f64,
    component_scores: ComponentScores,
    recommendations: Vec<Recommendation>,
    fire_spread_simulation: serde_json::Value,
    confidence_score: f64,
    #[serde(default)]
    model_version: Option<String>,
    #[serde(default)]
    weather_conditions: Option<WeatherConditions>,
}

/// The oracle answered 2xx with a body that is not a usable score.
#[derive(Debug, thiserror::Error)]
pub enum MalformedResponse {
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    OutOfRange(String),
}

/// Decode and validate a `/calculate-risk` response body.
pub fn parse_score_response(body: &[u8]) -> Result<ScoreResult, MalformedResponse> {
    let raw: RawScoreResponse = serde_json::from_slice(body)?;

    let components = &raw.component_scores;
    let checks = [
        ("overall_risk_score", Some(raw.overall_risk_score)),
        ("vegetation_risk", Some(components.vegetation_risk)),
        ("weather_risk", Some(components.weather_risk)),
        ("terrain_risk", Some(components.terrain_risk)),
        ("proximity_risk", Some(components.proximity_risk)),
        ("historical_risk", components.historical_risk),
    ];
    for (field, value) in checks {
        if let Some(value) = value {
            validate_score(field, value)
                .map_err(|e| MalformedResponse::OutOfRange(e.to_string()))?;
        }
    }
    validate_confidence(raw.confidence_score)
        .map_err(|e| MalformedResponse::OutOfRange(e.to_string()))?;

    let model_version = raw
        .model_version
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_MODEL_VERSION.to_string());

    Ok(ScoreResult {
        overall_risk_score: raw.overall_risk_score,
        component_scores: raw.component_scores,
        recommendations: raw.recommendations,
        fire_spread_simulation: raw.fire_spread_simulation,
        confidence_score: raw.confidence_score,
        model_version,
        weather: raw.weather_conditions,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn oracle_body() -> serde_json::Value {
        json!({
            "overall_risk_score": 72.4,
            "risk_level": "HIGH",
            "component_scores": {
                "vegetation_risk": 80,
                "weather_risk": 55,
                "terrain_risk": 35,
                "proximity_risk": 50
            },
            "recommendations": [{
                "priority": "HIGH",
                "action": "Vegetation Management",
                "description": "Create defensible space by clearing vegetation within 30 feet of structures",
                "estimated_cost": 2500,
                "risk_reduction": 15
            }],
            "fire_spread_simulation": {
                "spread_rate_kmh": 1.26,
                "primary_direction": 225,
                "safe_zones": ["North", "Northeast"]
            },
            "confidence_score": 0.85,
            "model_version": "2.1.0",
            "assessment_timestamp": "2025-06-01T12:00:00"
        })
    }

    fn parse(value: &serde_json::Value) -> Result<ScoreResult, MalformedResponse> {
        parse_score_response(value.to_string().as_bytes())
    }

    #[test]
    fn request_serializes_property_id_as_string() {
        let request = ScoringRequest::new(
            17,
            37.77,
            -122.42,
            PropertyData {
                vegetation_density: 0.7,
                slope_percentage: 15.0,
                distance_to_fire_station: 5.0,
                has_firebreak: false,
                property_size_acres: 2.5,
            },
        );
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["property_id"], "17");
        assert_eq!(json["lat"], 37.77);
        assert_eq!(json["property_data"]["distance_to_fire_station"], 5.0);
    }

    #[test]
    fn parses_full_response() {
        let result = parse(&oracle_body()).expect("valid response");
        assert_eq!(result.overall_risk_score, 72.4);
        assert_eq!(result.component_scores.vegetation_risk, 80.0);
        assert_eq!(result.component_scores.historical_risk, None);
        assert_eq!(result.recommendations.len(), 1);
        assert_eq!(result.recommendations[0].estimated_cost, Some(2500.0));
        assert_eq!(result.fire_spread_simulation["primary_direction"], 225);
        assert_eq!(result.model_version, "2.1.0");
        assert!(result.weather.is_none());
    }

    #[test]
    fn model_version_defaults_when_omitted() {
        let mut body = oracle_body();
        body.as_object_mut().unwrap().remove("model_version");
        let result = parse(&body).expect("valid response");
        assert_eq!(result.model_version, DEFAULT_MODEL_VERSION);
    }

    #[test]
    fn weather_conditions_are_optional_per_field() {
        let mut body = oracle_body();
        body["weather_conditions"] = json!({"temperature": 28.5, "humidity": 35.0});
        let weather = parse(&body).unwrap().weather.expect("weather present");
        assert_eq!(weather.temperature, Some(28.5));
        assert_eq!(weather.rainfall, None);
    }

    #[test]
    fn missing_required_field_is_malformed() {
        let mut body = oracle_body();
        body.as_object_mut().unwrap().remove("component_scores");
        assert!(matches!(parse(&body), Err(MalformedResponse::Decode(_))));
    }

    #[test]
    fn out_of_range_score_is_malformed() {
        let mut body = oracle_body();
        body["component_scores"]["terrain_risk"] = json!(140);
        let err = parse(&body).unwrap_err();
        assert!(matches!(err, MalformedResponse::OutOfRange(_)));
        assert!(err.to_string().contains("terrain_risk"));
    }

    #[test]
    fn out_of_range_confidence_is_malformed() {
        let mut body = oracle_body();
        body["confidence_score"] = json!(1.5);
        assert!(matches!(parse(&body), Err(MalformedResponse::OutOfRange(_))));
    }
}
