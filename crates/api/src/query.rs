//! Query parameter types shared by the property and assessment handlers.

use serde::Deserialize;

/// `?threshold=` for the high-risk listing.
#[derive(Debug, Deserialize)]
pub struct HighRiskParams {
    pub threshold: Option<f64>,
}

/// `?lon=&lat=&radius_km=` for radius queries.
#[derive(Debug, Deserialize)]
pub struct NearbyParams {
    pub lon: f64,
    pub lat: f64,
    pub radius_km: f64,
}

/// `?days=` for assessment history.
#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub days: Option<i64>,
}
