//! Shared domain building blocks for the TerraInsight risk service.
//!
//! Pure types, constants, and functions with no internal crate
//! dependencies: identifiers, the error taxonomy, risk-level bucketing,
//! geodesic distance, and notification topic keys.

pub mod error;
pub mod geo;
pub mod mitigation;
pub mod risk;
pub mod types;
