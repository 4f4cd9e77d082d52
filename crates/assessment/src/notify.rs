//! Score-change publication seam.
//!
//! The orchestrator only knows `publish_score(topic, change)`; transport
//! (the in-process [`EventBus`] feeding WebSocket connections) sits behind
//! it.

use terrainsight_events::{EventBus, ScoreChange};

#[derive(Debug, thiserror::Error)]
#[error("failed to publish score change: {0}")]
pub struct PublishError(pub String);

pub trait ScoreNotifier: Send + Sync {
    fn publish_score(&self, topic: &str, change: &ScoreChange) -> Result<(), PublishError>;
}

impl ScoreNotifier for EventBus {
    fn publish_score(&self, topic: &str, change: &ScoreChange) -> Result<(), PublishError> {
        let event = change
            .clone()
            .into_event(topic)
            .map_err(|e| PublishError(e.to_string()))?;
        let receivers = self.publish(event);
        tracing::trace!(topic, receivers, "Score change published");
        Ok(())
    }
}
