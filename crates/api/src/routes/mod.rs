pub mod assessment;
pub mod health;
pub mod property;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                                          WebSocket
///
/// /properties                                  register
/// /properties/high-risk                        list by threshold
/// /properties/nearby                           radius query
/// /properties/{id}                             get
/// /properties/{id}/assess                      run assessment
/// /properties/{id}/refresh-score               re-derive current score
/// /properties/{id}/assessments/latest          latest assessment
/// /properties/{id}/assessments/history         assessment history
///
/// /assessments/bulk                            region sweep
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // WebSocket endpoint.
        .route("/ws", get(ws::ws_handler))
        .nest("/properties", property::router())
        .nest("/assessments", assessment::router())
}
