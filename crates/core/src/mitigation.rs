use serde::{Deserialize, Serialize};

/// A mitigation action suggested by the scoring oracle.
///
/// Unknown keys in the oracle's output are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub priority: String,
    pub action: String,
    pub description: String,
    pub estimated_cost: Option<f64>,
    pub risk_reduction: Option<f64>,
}
