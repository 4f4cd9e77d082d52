//! Handlers that run or read risk assessments.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use terrainsight_assessment::BulkReport;
use terrainsight_core::error::CoreError;
use terrainsight_core::geo::{validate_point, validate_radius_km};
use terrainsight_core::risk::{validate_history_days, DEFAULT_HISTORY_DAYS};
use terrainsight_core::types::{DbId, GeoPoint};

use crate::error::{AppError, AppResult};
use crate::query::HistoryParams;
use crate::response::{AssessmentView, DataResponse, PropertyView};
use crate::state::AppState;

/// Body of `POST /assessments/bulk`.
#[derive(Debug, Deserialize)]
pub struct BulkAssessmentRequest {
    pub lon: f64,
    pub lat: f64,
    pub radius_km: f64,
}

/// POST /api/v1/properties/{id}/assess
///
/// The assessment runs on its own task and completes even if the client
/// goes away or the request times out.
pub async fn assess(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<(StatusCode, Json<DataResponse<AssessmentView>>)> {
    let orchestrator = state.orchestrator.clone();
    let assessment = tokio::spawn(async move { orchestrator.run_assessment(id).await })
        .await
        .map_err(|e| AppError::InternalError(format!("assessment task failed: {e}")))??;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: assessment.into(),
        }),
    ))
}

/// POST /api/v1/properties/{id}/refresh-score
pub async fn refresh_score(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<PropertyView>>> {
    let property = state.orchestrator.refresh_current_score(id).await?;
    Ok(Json(DataResponse {
        data: property.into(),
    }))
}

/// GET /api/v1/properties/{id}/assessments/latest
///
/// `data` is `null` when the property has never been assessed.
pub async fn latest(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Option<AssessmentView>>>> {
    ensure_property_exists(&state, id).await?;
    let latest = state.assessments.latest_for(id).await?;
    Ok(Json(DataResponse {
        data: latest.map(AssessmentView::from),
    }))
}

/// GET /api/v1/properties/{id}/assessments/history?days=
pub async fn history(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<HistoryParams>,
) -> AppResult<Json<DataResponse<Vec<AssessmentView>>>> {
    let days = params.days.unwrap_or(DEFAULT_HISTORY_DAYS);
    validate_history_days(days)?;
    ensure_property_exists(&state, id).await?;

    let history = state.assessments.history_for(id, days).await?;
    Ok(Json(DataResponse {
        data: history.into_iter().map(AssessmentView::from).collect(),
    }))
}

/// POST /api/v1/assessments/bulk
///
/// Dropping the request cancels candidates that have not started yet.
pub async fn bulk(
    State(state): State<AppState>,
    Json(input): Json<BulkAssessmentRequest>,
) -> AppResult<Json<DataResponse<BulkReport>>> {
    let center = GeoPoint::new(input.lon, input.lat);
    validate_point(center)?;
    validate_radius_km(input.radius_km)?;

    let cancel = state.shutdown.child_token();
    let _cancel_on_drop = cancel.clone().drop_guard();
    let outcomes = state
        .bulk
        .run_bulk(center, input.radius_km, &cancel)
        .await?;
    Ok(Json(DataResponse {
        data: BulkReport::from(outcomes),
    }))
}

async fn ensure_property_exists(state: &AppState, id: DbId) -> Result<(), AppError> {
    match state.properties.get(id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::Core(CoreError::NotFound {
            entity: "Property",
            id,
        })),
    }
}
