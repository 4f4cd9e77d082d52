//! Shared helpers for API integration tests.
//!
//! The app is built on [`InMemoryStore`] and a scripted scorer, so no
//! database or scoring oracle is needed.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use terrainsight_api::config::ServerConfig;
use terrainsight_api::router::build_app_router;
use terrainsight_api::state::AppState;
use terrainsight_assessment::{InMemoryStore, RiskScorer};
use terrainsight_core::types::DbId;
use terrainsight_scoring::{
    ComponentScores, ScoreResult, ScoringFailure, ScoringFailureKind, ScoringRequest,
};
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        database_url: "postgres://unused".to_string(),
        scoring_service_url: "http://127.0.0.1:9".to_string(),
        scoring_timeout_secs: 1,
        bulk_max_concurrency: 4,
    }
}

/// Scorer returning a fixed score, failing for selected property ids.
pub struct FakeScorer {
    score: Mutex<f64>,
    failing: Mutex<HashSet<DbId>>,
}

impl FakeScorer {
    pub fn new(score: f64) -> Self {
        Self {
            score: Mutex::new(score),
            failing: Mutex::new(HashSet::new()),
        }
    }

    pub fn set_score(&self, score: f64) {
        *self.score.lock().unwrap() = score;
    }

    pub fn fail_for(&self, property_id: DbId) {
        self.failing.lock().unwrap().insert(property_id);
    }
}

#[async_trait]
impl RiskScorer for FakeScorer {
    async fn score(&self, request: &ScoringRequest) -> Result<ScoreResult, ScoringFailure> {
        let id: DbId = request.property_id.parse().unwrap();
        if self.failing.lock().unwrap().contains(&id) {
            return Err(ScoringFailure::new(
                ScoringFailureKind::Timeout,
                "operation timed out",
            ));
        }
        Ok(ScoreResult {
            overall_risk_score: *self.score.lock().unwrap(),
            component_scores: ComponentScores {
                vegetation_risk: 70.0,
                weather_risk: 55.0,
                terrain_risk: 35.0,
                proximity_risk: 50.0,
                historical_risk: Some(20.0),
            },
            recommendations: Vec::new(),
            fire_spread_simulation: serde_json::json!({"spread_rate_kmh": 0.9}),
            confidence_score: 0.85,
            model_version: "1.0.0".to_string(),
            weather: None,
        })
    }
}

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub store: Arc<InMemoryStore>,
    pub scorer: Arc<FakeScorer>,
}

/// Build the full application router, with the production middleware
/// stack, over an in-memory store.
pub fn build_test_app(score: f64) -> TestApp {
    let store = Arc::new(InMemoryStore::new());
    let scorer = Arc::new(FakeScorer::new(score));
    let state = AppState::new(test_config(), store.clone(), store.clone(), scorer.clone());
    let app = build_app_router(state.clone());
    TestApp {
        app,
        state,
        store,
        scorer,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_empty(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Register a property through the API and return its id.
pub async fn create_property(app: &Router, name: &str, lon: f64, lat: f64) -> DbId {
    let response = post_json(
        app.clone(),
        "/api/v1/properties",
        serde_json::json!({"name": name, "longitude": lon, "latitude": lat}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}
