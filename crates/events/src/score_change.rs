//! Score-change notification payload.

use serde::{Deserialize, Serialize};
use terrainsight_core::risk::RiskLevel;
use terrainsight_core::types::DbId;

use crate::bus::PlatformEvent;

/// Event type for a property's current score changing.
pub const SCORE_CHANGED_EVENT: &str = "risk.score_changed";

/// Wire payload pushed to subscribers: `{property_id, risk_score, risk_level}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreChange {
    pub property_id: DbId,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
}

impl ScoreChange {
    pub fn new(property_id: DbId, risk_score: f64) -> Self {
        Self {
            property_id,
            risk_score,
            risk_level: RiskLevel::from_score(risk_score),
        }
    }

    /// Wrap the payload in a [`PlatformEvent`] addressed to `topic`.
    pub fn into_event(self, topic: &str) -> Result<PlatformEvent, serde_json::Error> {
        let payload = serde_json::to_value(self)?;
        Ok(PlatformEvent::new(SCORE_CHANGED_EVENT, topic, payload))
    }
}
