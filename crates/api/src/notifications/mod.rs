//! Delivery of bus events to WebSocket subscribers.

pub mod router;

pub use router::NotificationRouter;
