//! Risk assessment orchestration.
//!
//! - [`store`]: storage seams ([`PropertyStore`], [`AssessmentLog`]) and the
//!   PostgreSQL implementation [`PgStore`].
//! - [`memory`]: [`InMemoryStore`], the same seams without a database.
//! - [`scorer`] / [`notify`]: seams over the scoring oracle and the event bus.
//! - [`orchestrator`]: single-property assessment and score re-derivation.
//! - [`bulk`]: bounded-concurrency sweeps over a spatial region.

pub mod bulk;
pub mod memory;
pub mod notify;
pub mod orchestrator;
pub mod scorer;
pub mod store;

pub use bulk::{AssessmentOutcome, BulkOrchestrator, BulkReport};
pub use memory::InMemoryStore;
pub use notify::{PublishError, ScoreNotifier};
pub use orchestrator::{AssessmentOrchestrator, OrchestrationError};
pub use scorer::RiskScorer;
pub use store::{AssessmentLog, PgStore, PropertyStore};
