//! Event-to-WebSocket routing.
//!
//! [`NotificationRouter`] subscribes to the event bus and forwards each
//! event to the WebSocket connections subscribed to its topic.

use std::sync::Arc;

use terrainsight_events::PlatformEvent;
use tokio::sync::broadcast;

use crate::ws::protocol::event_message;
use crate::ws::WsManager;

pub struct NotificationRouter {
    ws_manager: Arc<WsManager>,
}

impl NotificationRouter {
    pub fn new(ws_manager: Arc<WsManager>) -> Self {
        Self { ws_manager }
    }

    /// Run the main routing loop.
    ///
    /// The loop exits when the channel is closed (i.e. the
    /// [`EventBus`](terrainsight_events::EventBus) is dropped).
    pub async fn run(self, mut receiver: broadcast::Receiver<PlatformEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    self.route_event(&event).await;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notification router lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notification router shutting down");
                    break;
                }
            }
        }
    }

    /// Deliver one event to its topic's subscribers. Returns how many
    /// connections received it.
    pub async fn route_event(&self, event: &PlatformEvent) -> usize {
        let message = match event_message(event) {
            Ok(message) => message,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    event_type = %event.event_type,
                    "Failed to render event"
                );
                return 0;
            }
        };
        let delivered = self.ws_manager.publish(&event.topic, message).await;
        tracing::debug!(
            event_type = %event.event_type,
            topic = %event.topic,
            delivered,
            "Event routed"
        );
        delivered
    }
}
