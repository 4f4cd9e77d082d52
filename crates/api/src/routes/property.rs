//! Route definitions for the `/properties` resource and its assessments.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{assessment, property};
use crate::state::AppState;

/// Routes mounted at `/properties`.
///
/// ```text
/// POST   /                              -> create
/// GET    /high-risk                     -> list_high_risk
/// GET    /nearby                        -> nearby
/// GET    /{id}                          -> get_by_id
/// POST   /{id}/assess                   -> assess
/// POST   /{id}/refresh-score            -> refresh_score
/// GET    /{id}/assessments/latest       -> latest
/// GET    /{id}/assessments/history      -> history
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(property::create))
        .route("/high-risk", get(property::list_high_risk))
        .route("/nearby", get(property::nearby))
        .route("/{id}", get(property::get_by_id))
        .route("/{id}/assess", post(assessment::assess))
        .route("/{id}/refresh-score", post(assessment::refresh_score))
        .route("/{id}/assessments/latest", get(assessment::latest))
        .route("/{id}/assessments/history", get(assessment::history))
}
