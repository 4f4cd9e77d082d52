//! Shared fakes for orchestrator and bulk tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use terrainsight_assessment::{
    AssessmentOrchestrator, InMemoryStore, PropertyStore, PublishError, RiskScorer,
    ScoreNotifier,
};
use terrainsight_core::types::DbId;
use terrainsight_db::models::property::{CreateProperty, Property};
use terrainsight_events::ScoreChange;
use terrainsight_scoring::{
    ComponentScores, ScoreResult, ScoringFailure, ScoringFailureKind, ScoringRequest,
    WeatherConditions,
};

// ---------------------------------------------------------------------------
// Scorer
// ---------------------------------------------------------------------------

/// Scorer returning a fixed score per property, with injectable faults.
#[derive(Default)]
pub struct ScriptedScorer {
    default_score: Mutex<f64>,
    scores: Mutex<HashMap<DbId, f64>>,
    failing: Mutex<HashSet<DbId>>,
    weather: Mutex<Option<WeatherConditions>>,
    delay: Mutex<Duration>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedScorer {
    pub fn new(default_score: f64) -> Self {
        let scorer = Self::default();
        *scorer.default_score.lock().unwrap() = default_score;
        scorer
    }

    pub fn set_score(&self, property_id: DbId, score: f64) {
        self.scores.lock().unwrap().insert(property_id, score);
    }

    pub fn fail_for(&self, property_id: DbId) {
        self.failing.lock().unwrap().insert(property_id);
    }

    pub fn set_weather(&self, weather: WeatherConditions) {
        *self.weather.lock().unwrap() = Some(weather);
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

pub fn score_result(score: f64) -> ScoreResult {
    ScoreResult {
        overall_risk_score: score,
        component_scores: ComponentScores {
            vegetation_risk: 60.0,
            weather_risk: 40.0,
            terrain_risk: 35.0,
            proximity_risk: 50.0,
            historical_risk: None,
        },
        recommendations: Vec::new(),
        fire_spread_simulation: serde_json::json!({"spread_rate_kmh": 1.2}),
        confidence_score: 0.85,
        model_version: "1.0.0".to_string(),
        weather: None,
    }
}

#[async_trait]
impl RiskScorer for ScriptedScorer {
    async fn score(&self, request: &ScoringRequest) -> Result<ScoreResult, ScoringFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let id: DbId = request.property_id.parse().unwrap();
        if self.failing.lock().unwrap().contains(&id) {
            return Err(ScoringFailure::new(
                ScoringFailureKind::Status,
                "HTTP 500: model exploded",
            ));
        }
        let score = self
            .scores
            .lock()
            .unwrap()
            .get(&id)
            .copied()
            .unwrap_or(*self.default_score.lock().unwrap());
        let mut result = score_result(score);
        result.weather = self.weather.lock().unwrap().clone();
        Ok(result)
    }
}

// ---------------------------------------------------------------------------
// Notifier
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RecordingNotifier {
    published: Mutex<Vec<(String, ScoreChange)>>,
    broken: Mutex<bool>,
}

impl RecordingNotifier {
    pub fn broken() -> Self {
        let notifier = Self::default();
        *notifier.broken.lock().unwrap() = true;
        notifier
    }

    pub fn published(&self) -> Vec<(String, ScoreChange)> {
        self.published.lock().unwrap().clone()
    }
}

impl ScoreNotifier for RecordingNotifier {
    fn publish_score(&self, topic: &str, change: &ScoreChange) -> Result<(), PublishError> {
        if *self.broken.lock().unwrap() {
            return Err(PublishError("transport closed".to_string()));
        }
        self.published
            .lock()
            .unwrap()
            .push((topic.to_string(), change.clone()));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

pub struct Harness {
    pub store: Arc<InMemoryStore>,
    pub scorer: Arc<ScriptedScorer>,
    pub notifier: Arc<RecordingNotifier>,
    pub orchestrator: AssessmentOrchestrator,
}

impl Harness {
    pub fn new(default_score: f64) -> Self {
        Self::with_notifier(default_score, RecordingNotifier::default())
    }

    pub fn with_notifier(default_score: f64, notifier: RecordingNotifier) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let scorer = Arc::new(ScriptedScorer::new(default_score));
        let notifier = Arc::new(notifier);
        let orchestrator = AssessmentOrchestrator::new(
            store.clone(),
            store.clone(),
            scorer.clone(),
            notifier.clone(),
        );
        Self {
            store,
            scorer,
            notifier,
            orchestrator,
        }
    }

    pub async fn add_property(&self, name: &str, lon: f64, lat: f64) -> Property {
        self.store
            .create(&create_input(name, lon, lat))
            .await
            .unwrap()
    }
}

pub fn create_input(name: &str, lon: f64, lat: f64) -> CreateProperty {
    CreateProperty {
        name: name.to_string(),
        address: Some("1 Canyon Rd".to_string()),
        longitude: lon,
        latitude: lat,
        boundary: None,
        vegetation_density: Some(0.7),
        slope_percentage: Some(15.0),
        distance_to_fire_station_km: None,
        has_firebreak: Some(false),
        property_size_acres: Some(2.5),
    }
}
