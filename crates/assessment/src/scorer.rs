//! Scoring seam.

use async_trait::async_trait;
use terrainsight_scoring::{ScoreResult, ScoringClient, ScoringFailure, ScoringRequest};

/// Something that turns property attributes into a risk score.
#[async_trait]
pub trait RiskScorer: Send + Sync {
    async fn score(&self, request: &ScoringRequest) -> Result<ScoreResult, ScoringFailure>;
}

#[async_trait]
impl RiskScorer for ScoringClient {
    async fn score(&self, request: &ScoringRequest) -> Result<ScoreResult, ScoringFailure> {
        ScoringClient::score(self, request).await
    }
}
