//! Storage seams used by the orchestrators.
//!
//! [`PropertyStore`] and [`AssessmentLog`] are implemented by [`PgStore`]
//! (PostgreSQL/PostGIS via `terrainsight-db`) and by
//! [`InMemoryStore`](crate::memory::InMemoryStore). All failures surface as
//! [`CoreError::StorageUnavailable`]; a missing row is `Ok(None)`.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use terrainsight_core::error::CoreError;
use terrainsight_core::types::{DbId, GeoPoint, Timestamp};
use terrainsight_db::models::assessment::{Assessment, NewAssessment};
use terrainsight_db::models::property::{CreateProperty, Property, ScoreUpdate};
use terrainsight_db::repositories::{AssessmentRepo, PropertyRepo};
use terrainsight_db::DbPool;

pub type StoreResult<T> = Result<T, CoreError>;

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

#[async_trait]
pub trait PropertyStore: Send + Sync {
    async fn get(&self, id: DbId) -> StoreResult<Option<Property>>;

    async fn create(&self, input: &CreateProperty) -> StoreResult<Property>;

    /// Properties within `radius_km` of `center`, highest current score
    /// first, ties by id ascending.
    async fn find_within_radius(
        &self,
        center: GeoPoint,
        radius_km: f64,
    ) -> StoreResult<Vec<Property>>;

    async fn list_high_risk(&self, threshold: f64) -> StoreResult<Vec<Property>>;

    /// Last-writer-wins write of the derived score fields. `None` when the
    /// property does not exist.
    async fn update_current_score(
        &self,
        id: DbId,
        score: f64,
        assessed_at: Timestamp,
    ) -> StoreResult<Option<ScoreUpdate>>;

    /// Write the derived score fields re-derived from the assessment log.
    ///
    /// With `Some(assessed_at)` the write is [`ScoreUpdate::Stale`] when the
    /// stored date is newer. With `None` it only applies while the property
    /// has no assessments. `None` when the property does not exist.
    async fn restore_current_score(
        &self,
        id: DbId,
        score: f64,
        assessed_at: Option<Timestamp>,
    ) -> StoreResult<Option<ScoreUpdate>>;
}

#[async_trait]
pub trait AssessmentLog: Send + Sync {
    async fn append(&self, input: NewAssessment) -> StoreResult<Assessment>;

    async fn latest_for(&self, property_id: DbId) -> StoreResult<Option<Assessment>>;

    /// Assessments from the last `since_days` days, oldest first.
    async fn history_for(
        &self,
        property_id: DbId,
        since_days: i64,
    ) -> StoreResult<Vec<Assessment>>;
}

/// Start of a `since_days` history window ending now.
pub fn history_window_start(since_days: i64) -> Timestamp {
    Utc::now() - Duration::days(since_days)
}

// ---------------------------------------------------------------------------
// PgStore
// ---------------------------------------------------------------------------

/// [`PropertyStore`] and [`AssessmentLog`] over a PostgreSQL pool.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn unavailable(operation: &'static str) -> impl FnOnce(sqlx::Error) -> CoreError {
    move |e| {
        tracing::error!(operation, error = %e, "Storage operation failed");
        CoreError::StorageUnavailable(format!("{operation}: {e}"))
    }
}

#[async_trait]
impl PropertyStore for PgStore {
    async fn get(&self, id: DbId) -> StoreResult<Option<Property>> {
        PropertyRepo::find_by_id(&self.pool, id)
            .await
            .map_err(unavailable("load property"))
    }

    async fn create(&self, input: &CreateProperty) -> StoreResult<Property> {
        PropertyRepo::create(&self.pool, input)
            .await
            .map_err(unavailable("create property"))
    }

    async fn find_within_radius(
        &self,
        center: GeoPoint,
        radius_km: f64,
    ) -> StoreResult<Vec<Property>> {
        PropertyRepo::find_within_radius(&self.pool, center, radius_km)
            .await
            .map_err(unavailable("radius query"))
    }

    async fn list_high_risk(&self, threshold: f64) -> StoreResult<Vec<Property>> {
        PropertyRepo::list_high_risk(&self.pool, threshold)
            .await
            .map_err(unavailable("list high-risk properties"))
    }

    async fn update_current_score(
        &self,
        id: DbId,
        score: f64,
        assessed_at: Timestamp,
    ) -> StoreResult<Option<ScoreUpdate>> {
        PropertyRepo::update_current_score(&self.pool, id, score, assessed_at)
            .await
            .map_err(unavailable("update current score"))
    }

    async fn restore_current_score(
        &self,
        id: DbId,
        score: f64,
        assessed_at: Option<Timestamp>,
    ) -> StoreResult<Option<ScoreUpdate>> {
        PropertyRepo::restore_current_score(&self.pool, id, score, assessed_at)
            .await
            .map_err(unavailable("restore current score"))
    }
}

#[async_trait]
impl AssessmentLog for PgStore {
    async fn append(&self, input: NewAssessment) -> StoreResult<Assessment> {
        AssessmentRepo::insert(&self.pool, &input)
            .await
            .map_err(unavailable("append assessment"))
    }

    async fn latest_for(&self, property_id: DbId) -> StoreResult<Option<Assessment>> {
        AssessmentRepo::latest_for_property(&self.pool, property_id)
            .await
            .map_err(unavailable("load latest assessment"))
    }

    async fn history_for(
        &self,
        property_id: DbId,
        since_days: i64,
    ) -> StoreResult<Vec<Assessment>> {
        let since = history_window_start(since_days);
        AssessmentRepo::history_for_property(&self.pool, property_id, since)
            .await
            .map_err(unavailable("load assessment history"))
    }
}
