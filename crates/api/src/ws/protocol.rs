//! JSON messages exchanged over `/ws`.
//!
//! Clients send `{"action": "subscribe" | "unsubscribe", "topic": "..."}`.
//! The server acknowledges each command and pushes events as
//! `{"type": "<event_type>", "topic", "data", "timestamp"}`.

use axum::extract::ws::Message;
use serde::{Deserialize, Serialize};
use terrainsight_core::geo::is_valid_topic;
use terrainsight_events::PlatformEvent;

use crate::ws::WsManager;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Subscribe,
    Unsubscribe,
}

#[derive(Debug, Deserialize)]
pub struct ClientCommand {
    pub action: Action,
    pub topic: String,
}

/// Acknowledgement or error sent in reply to a client command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommandReply {
    Subscribed { topic: String },
    Unsubscribed { topic: String },
    Error { message: String },
}

impl CommandReply {
    pub fn to_message(&self) -> Message {
        let text = serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"type":"error","message":"unserializable reply"}"#.to_string()
        });
        Message::Text(text.into())
    }
}

/// Apply one inbound text frame to the connection's subscriptions.
pub async fn handle_command(manager: &WsManager, conn_id: &str, text: &str) -> CommandReply {
    let command: ClientCommand = match serde_json::from_str(text) {
        Ok(command) => command,
        Err(e) => {
            return CommandReply::Error {
                message: format!("invalid command: {e}"),
            }
        }
    };

    if !is_valid_topic(&command.topic) {
        return CommandReply::Error {
            message: format!("unknown topic: {}", command.topic),
        };
    }

    match command.action {
        Action::Subscribe => {
            manager.subscribe(conn_id, &command.topic).await;
            tracing::debug!(conn_id, topic = %command.topic, "WebSocket subscribed");
            CommandReply::Subscribed {
                topic: command.topic,
            }
        }
        Action::Unsubscribe => {
            manager.unsubscribe(conn_id, &command.topic).await;
            tracing::debug!(conn_id, topic = %command.topic, "WebSocket unsubscribed");
            CommandReply::Unsubscribed {
                topic: command.topic,
            }
        }
    }
}

#[derive(Serialize)]
struct EventFrame<'a> {
    #[serde(rename = "type")]
    event_type: &'a str,
    topic: &'a str,
    data: &'a serde_json::Value,
    timestamp: chrono::DateTime<chrono::Utc>,
}

/// Render a bus event as the text frame pushed to subscribers.
pub fn event_message(event: &PlatformEvent) -> Result<Message, serde_json::Error> {
    let frame = EventFrame {
        event_type: &event.event_type,
        topic: &event.topic,
        data: &event.payload,
        timestamp: event.timestamp,
    };
    Ok(Message::Text(serde_json::to_string(&frame)?.into()))
}
