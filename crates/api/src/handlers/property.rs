//! Handlers for the `/properties` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use terrainsight_core::error::CoreError;
use terrainsight_core::geo::{validate_point, validate_radius_km};
use terrainsight_core::risk::{validate_score, DEFAULT_HIGH_RISK_THRESHOLD};
use terrainsight_core::types::{DbId, GeoPoint};
use terrainsight_db::models::property::CreateProperty;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::query::{HighRiskParams, NearbyParams};
use crate::response::{DataResponse, PropertyView};
use crate::state::AppState;

/// POST /api/v1/properties
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateProperty>,
) -> AppResult<(StatusCode, Json<DataResponse<PropertyView>>)> {
    input.validate()?;
    validate_boundary(input.boundary.as_ref())?;

    let property = state.properties.create(&input).await?;
    tracing::info!(property_id = property.id, name = %property.name, "Property registered");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: property.into(),
        }),
    ))
}

/// GET /api/v1/properties/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<PropertyView>>> {
    let property = state
        .properties
        .get(id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Property",
            id,
        }))?;
    Ok(Json(DataResponse {
        data: property.into(),
    }))
}

/// GET /api/v1/properties/high-risk?threshold=
pub async fn list_high_risk(
    State(state): State<AppState>,
    Query(params): Query<HighRiskParams>,
) -> AppResult<Json<DataResponse<Vec<PropertyView>>>> {
    let threshold = params.threshold.unwrap_or(DEFAULT_HIGH_RISK_THRESHOLD);
    validate_score("threshold", threshold)?;

    let properties = state.properties.list_high_risk(threshold).await?;
    Ok(Json(DataResponse {
        data: properties.into_iter().map(PropertyView::from).collect(),
    }))
}

/// GET /api/v1/properties/nearby?lon=&lat=&radius_km=
pub async fn nearby(
    State(state): State<AppState>,
    Query(params): Query<NearbyParams>,
) -> AppResult<Json<DataResponse<Vec<PropertyView>>>> {
    let center = GeoPoint::new(params.lon, params.lat);
    validate_point(center)?;
    validate_radius_km(params.radius_km)?;

    let properties = state
        .properties
        .find_within_radius(center, params.radius_km)
        .await?;
    Ok(Json(DataResponse {
        data: properties.into_iter().map(PropertyView::from).collect(),
    }))
}

/// A registered boundary must be a GeoJSON `Polygon` object.
fn validate_boundary(boundary: Option<&serde_json::Value>) -> Result<(), AppError> {
    let Some(boundary) = boundary else {
        return Ok(());
    };
    let is_polygon = boundary.get("type").and_then(|t| t.as_str()) == Some("Polygon")
        && boundary.get("coordinates").is_some_and(|c| c.is_array());
    if is_polygon {
        Ok(())
    } else {
        Err(AppError::BadRequest(
            "boundary must be a GeoJSON Polygon".to_string(),
        ))
    }
}
