//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope. Use [`DataResponse`]
//! instead of ad-hoc `serde_json::json!({ "data": ... })` to get
//! compile-time type safety and consistent serialization.

use serde::Serialize;
use terrainsight_core::risk::RiskLevel;
use terrainsight_db::models::assessment::Assessment;
use terrainsight_db::models::property::Property;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// A property annotated with the risk level of its current score.
#[derive(Debug, Serialize)]
pub struct PropertyView {
    #[serde(flatten)]
    pub property: Property,
    pub risk_level: RiskLevel,
}

impl From<Property> for PropertyView {
    fn from(property: Property) -> Self {
        let risk_level = property.risk_level();
        Self {
            property,
            risk_level,
        }
    }
}

/// An assessment annotated with the risk level of its overall score.
#[derive(Debug, Serialize)]
pub struct AssessmentView {
    #[serde(flatten)]
    pub assessment: Assessment,
    pub risk_level: RiskLevel,
}

impl From<Assessment> for AssessmentView {
    fn from(assessment: Assessment) -> Self {
        let risk_level = assessment.risk_level();
        Self {
            assessment,
            risk_level,
        }
    }
}
