//! TerraInsight event bus and score-change notifications.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`PlatformEvent`]: the topic-keyed event envelope.
//! - [`ScoreChange`]: payload published whenever a property's current
//!   risk score changes.

pub mod bus;
pub mod score_change;

pub use bus::{EventBus, PlatformEvent};
pub use score_change::{ScoreChange, SCORE_CHANGED_EVENT};
