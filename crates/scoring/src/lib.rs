//! Client for the external wildfire scoring oracle.
//!
//! - [`client`]: [`ScoringClient`], a single-call HTTP wrapper with a fixed
//!   timeout and no retry.
//! - [`messages`]: request/response wire types and response validation.

pub mod client;
pub mod messages;

pub use client::{ScoringClient, ScoringFailure, ScoringFailureKind};
pub use messages::{ComponentScores, PropertyData, ScoreResult, ScoringRequest, WeatherConditions};
