use std::sync::Arc;

use terrainsight_assessment::{
    AssessmentLog, AssessmentOrchestrator, BulkOrchestrator, PropertyStore, RiskScorer,
};
use terrainsight_events::EventBus;
use terrainsight_scoring::ScoringClient;
use tokio_util::sync::CancellationToken;

use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Database pool, when running against PostgreSQL. Only used by the
    /// health check.
    pub pool: Option<terrainsight_db::DbPool>,
    /// Scoring oracle client, probed by the health check.
    pub scoring: Option<ScoringClient>,
    pub properties: Arc<dyn PropertyStore>,
    pub assessments: Arc<dyn AssessmentLog>,
    pub orchestrator: AssessmentOrchestrator,
    pub bulk: BulkOrchestrator,
    /// WebSocket connection manager (browser clients).
    pub ws_manager: Arc<WsManager>,
    /// Centralized event bus for score-change events.
    pub event_bus: Arc<EventBus>,
    /// Cancelled on shutdown; stops bulk runs from starting new candidates.
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Wire the orchestrators, event bus, and WebSocket manager around the
    /// given stores and scorer. `pool` and `scoring` start out empty.
    pub fn new(
        config: ServerConfig,
        properties: Arc<dyn PropertyStore>,
        assessments: Arc<dyn AssessmentLog>,
        scorer: Arc<dyn RiskScorer>,
    ) -> Self {
        let event_bus = Arc::new(EventBus::default());
        let orchestrator = AssessmentOrchestrator::new(
            Arc::clone(&properties),
            Arc::clone(&assessments),
            scorer,
            event_bus.clone(),
        );
        let bulk = BulkOrchestrator::new(orchestrator.clone(), config.bulk_max_concurrency);

        Self {
            config: Arc::new(config),
            pool: None,
            scoring: None,
            properties,
            assessments,
            orchestrator,
            bulk,
            ws_manager: Arc::new(WsManager::new()),
            event_bus,
            shutdown: CancellationToken::new(),
        }
    }
}
