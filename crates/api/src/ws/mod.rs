//! WebSocket infrastructure for real-time score-change delivery.
//!
//! Provides connection and topic-subscription management, heartbeat
//! monitoring, the client command protocol, and the HTTP upgrade handler
//! used by Axum routes.

mod handler;
mod heartbeat;
pub mod manager;
pub mod protocol;

pub use handler::ws_handler;
pub use heartbeat::{start_heartbeat, HEARTBEAT_INTERVAL};
pub use manager::WsManager;
