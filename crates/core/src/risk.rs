//! Risk score constants, bucketing, and validation.
//!
//! [`RiskLevel::from_score`] is the only place a numeric score is turned
//! into a display bucket. Assessments, bulk outcomes, notifications, and
//! history annotations all go through it.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Lowest valid risk score.
pub const MIN_SCORE: f64 = 0.0;

/// Highest valid risk score.
pub const MAX_SCORE: f64 = 100.0;

/// Lower bound (inclusive) of the Extreme bucket.
pub const EXTREME_THRESHOLD: f64 = 80.0;

/// Lower bound (inclusive) of the High bucket.
pub const HIGH_THRESHOLD: f64 = 60.0;

/// Lower bound (inclusive) of the Moderate bucket.
pub const MODERATE_THRESHOLD: f64 = 40.0;

/// Lower bound (inclusive) of the Low bucket.
pub const LOW_THRESHOLD: f64 = 20.0;

/// Model version recorded when the oracle does not report one.
pub const DEFAULT_MODEL_VERSION: &str = "1.0.0";

/// History window used when the caller does not pass one.
pub const DEFAULT_HISTORY_DAYS: i64 = 30;

/// Largest accepted history window (ten years).
pub const MAX_HISTORY_DAYS: i64 = 3650;

/// Threshold used by the high-risk listing when none is given.
pub const DEFAULT_HIGH_RISK_THRESHOLD: f64 = 70.0;

// ---------------------------------------------------------------------------
// RiskLevel
// ---------------------------------------------------------------------------

/// Display bucket derived from an overall risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Minimal,
    Low,
    Moderate,
    High,
    Extreme,
}

impl RiskLevel {
    /// Bucket a score. Lower bounds are closed: 80.0 is Extreme, 79.99 is High.
    pub fn from_score(score: f64) -> Self {
        if score >= EXTREME_THRESHOLD {
            Self::Extreme
        } else if score >= HIGH_THRESHOLD {
            Self::High
        } else if score >= MODERATE_THRESHOLD {
            Self::Moderate
        } else if score >= LOW_THRESHOLD {
            Self::Low
        } else {
            Self::Minimal
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Minimal => "Minimal",
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::Extreme => "Extreme",
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate that a named score lies within `0.0..=100.0` and is finite.
pub fn validate_score(field: &str, score: f64) -> Result<(), CoreError> {
    if score.is_finite() && (MIN_SCORE..=MAX_SCORE).contains(&score) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "{field} must be between {MIN_SCORE} and {MAX_SCORE}, got {score}"
        )))
    }
}

/// Validate a confidence value (`0.0..=1.0`).
pub fn validate_confidence(confidence: f64) -> Result<(), CoreError> {
    if confidence.is_finite() && (0.0..=1.0).contains(&confidence) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "confidence_score must be between 0 and 1, got {confidence}"
        )))
    }
}

/// Validate a history window in days.
pub fn validate_history_days(days: i64) -> Result<(), CoreError> {
    if (1..=MAX_HISTORY_DAYS).contains(&days) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "days must be between 1 and {MAX_HISTORY_DAYS}, got {days}"
        )))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
