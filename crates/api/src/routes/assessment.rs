use axum::routing::post;
use axum::Router;

use crate::handlers::assessment;
use crate::state::AppState;

/// Routes mounted at `/assessments`.
///
/// ```text
/// POST   /bulk                          -> bulk
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/bulk", post(assessment::bulk))
}
