//! Topic-addressed event bus over `tokio::sync::broadcast`.
//!
//! Share one [`EventBus`] behind an `Arc`. Every subscriber sees every
//! event and filters on [`PlatformEvent::topic`] itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Events buffered per subscriber before the slowest one starts lagging.
const DEFAULT_CAPACITY: usize = 1024;

/// An event addressed to one topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformEvent {
    /// Dot-separated event name, e.g. `"risk.score_changed"`.
    pub event_type: String,
    /// `"global"` or a region key such as `"region:37:-123"`.
    pub topic: String,
    pub payload: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

impl PlatformEvent {
    /// Stamp a new event with the current time.
    pub fn new(
        event_type: impl Into<String>,
        topic: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            event_type: event_type.into(),
            topic: topic.into(),
            payload,
            timestamp: Utc::now(),
        }
    }
}

pub struct EventBus {
    sender: broadcast::Sender<PlatformEvent>,
}

impl EventBus {
    /// A bus buffering up to `capacity` events per subscriber. Receivers
    /// that fall further behind get `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Fan `event` out to current subscribers and return how many there
    /// were. Zero subscribers is not an error.
    pub fn publish(&self, event: PlatformEvent) -> usize {
        self.sender.send(event).unwrap_or_else(|unsent| {
            tracing::trace!(
                event_type = %unsent.0.event_type,
                topic = %unsent.0.topic,
                "Event published with no subscribers"
            );
            0
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlatformEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
