//! In-process implementation of the storage seams.
//!
//! Backs the API in tests and local runs without PostgreSQL. Distances use
//! the haversine formula instead of PostGIS geography arithmetic; orderings
//! and last-writer-wins semantics match [`PgStore`](crate::store::PgStore).

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use terrainsight_core::error::CoreError;
use terrainsight_core::geo::haversine_km;
use terrainsight_core::types::{DbId, GeoPoint, Timestamp};
use terrainsight_db::models::assessment::{Assessment, NewAssessment};
use terrainsight_db::models::property::{
    CreateProperty, Property, ScoreUpdate, DEFAULT_DISTANCE_TO_FIRE_STATION_KM,
    DEFAULT_PROPERTY_SIZE_ACRES, DEFAULT_SLOPE_PERCENTAGE, DEFAULT_VEGETATION_DENSITY,
};
use tokio::sync::RwLock;

use crate::store::{history_window_start, AssessmentLog, PropertyStore, StoreResult};

#[derive(Default)]
struct Tables {
    properties: BTreeMap<DbId, Property>,
    /// Append-only, in insertion order.
    assessments: Vec<Assessment>,
    next_property_id: DbId,
    next_assessment_id: DbId,
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored assessments across all properties.
    pub async fn assessment_count(&self) -> usize {
        self.tables.read().await.assessments.len()
    }
}

/// Highest score first, then lowest id.
fn sort_by_score(properties: &mut [Property]) {
    properties.sort_by(|a, b| {
        b.current_risk_score
            .total_cmp(&a.current_risk_score)
            .then(a.id.cmp(&b.id))
    });
}

#[async_trait]
impl PropertyStore for InMemoryStore {
    async fn get(&self, id: DbId) -> StoreResult<Option<Property>> {
        Ok(self.tables.read().await.properties.get(&id).cloned())
    }

    async fn create(&self, input: &CreateProperty) -> StoreResult<Property> {
        let mut tables = self.tables.write().await;
        tables.next_property_id += 1;
        let now = Utc::now();
        let property = Property {
            id: tables.next_property_id,
            name: input.name.clone(),
            address: input.address.clone(),
            longitude: input.longitude,
            latitude: input.latitude,
            boundary: input.boundary.clone(),
            vegetation_density: input.vegetation_density.unwrap_or(DEFAULT_VEGETATION_DENSITY),
            slope_percentage: input.slope_percentage.unwrap_or(DEFAULT_SLOPE_PERCENTAGE),
            distance_to_fire_station_km: input
                .distance_to_fire_station_km
                .unwrap_or(DEFAULT_DISTANCE_TO_FIRE_STATION_KM),
            has_firebreak: input.has_firebreak.unwrap_or(false),
            property_size_acres: input
                .property_size_acres
                .unwrap_or(DEFAULT_PROPERTY_SIZE_ACRES),
            current_risk_score: 0.0,
            last_assessment_date: None,
            created_at: now,
            updated_at: now,
        };
        tables.properties.insert(property.id, property.clone());
        Ok(property)
    }

    async fn find_within_radius(
        &self,
        center: GeoPoint,
        radius_km: f64,
    ) -> StoreResult<Vec<Property>> {
        let tables = self.tables.read().await;
        let mut found: Vec<Property> = tables
            .properties
            .values()
            .filter(|p| haversine_km(center, p.location()) <= radius_km)
            .cloned()
            .collect();
        sort_by_score(&mut found);
        Ok(found)
    }

    async fn list_high_risk(&self, threshold: f64) -> StoreResult<Vec<Property>> {
        let tables = self.tables.read().await;
        let mut found: Vec<Property> = tables
            .properties
            .values()
            .filter(|p| p.current_risk_score >= threshold)
            .cloned()
            .collect();
        sort_by_score(&mut found);
        Ok(found)
    }

    async fn update_current_score(
        &self,
        id: DbId,
        score: f64,
        assessed_at: Timestamp,
    ) -> StoreResult<Option<ScoreUpdate>> {
        let mut tables = self.tables.write().await;
        let Some(property) = tables.properties.get_mut(&id) else {
            return Ok(None);
        };
        if property
            .last_assessment_date
            .is_some_and(|current| current > assessed_at)
        {
            return Ok(Some(ScoreUpdate::Stale));
        }
        property.current_risk_score = score;
        property.last_assessment_date = Some(assessed_at);
        Ok(Some(ScoreUpdate::Applied))
    }

    async fn restore_current_score(
        &self,
        id: DbId,
        score: f64,
        assessed_at: Option<Timestamp>,
    ) -> StoreResult<Option<ScoreUpdate>> {
        let mut tables = self.tables.write().await;
        let assessed = tables.assessments.iter().any(|a| a.property_id == id);
        let Some(property) = tables.properties.get_mut(&id) else {
            return Ok(None);
        };
        let stale = match (assessed_at, property.last_assessment_date) {
            (None, _) => assessed,
            (Some(new), Some(current)) => current > new,
            (Some(_), None) => false,
        };
        if stale {
            return Ok(Some(ScoreUpdate::Stale));
        }
        property.current_risk_score = score;
        property.last_assessment_date = assessed_at;
        Ok(Some(ScoreUpdate::Applied))
    }
}

#[async_trait]
impl AssessmentLog for InMemoryStore {
    async fn append(&self, input: NewAssessment) -> StoreResult<Assessment> {
        let mut tables = self.tables.write().await;
        if !tables.properties.contains_key(&input.property_id) {
            return Err(CoreError::StorageUnavailable(format!(
                "append assessment: property {} does not exist",
                input.property_id
            )));
        }
        tables.next_assessment_id += 1;
        let assessment = input.into_assessment(tables.next_assessment_id);
        tables.assessments.push(assessment.clone());
        Ok(assessment)
    }

    async fn latest_for(&self, property_id: DbId) -> StoreResult<Option<Assessment>> {
        let tables = self.tables.read().await;
        Ok(tables
            .assessments
            .iter()
            .filter(|a| a.property_id == property_id)
            .max_by(|a, b| a.assessed_at.cmp(&b.assessed_at).then(a.id.cmp(&b.id)))
            .cloned())
    }

    async fn history_for(
        &self,
        property_id: DbId,
        since_days: i64,
    ) -> StoreResult<Vec<Assessment>> {
        let since = history_window_start(since_days);
        let tables = self.tables.read().await;
        let mut history: Vec<Assessment> = tables
            .assessments
            .iter()
            .filter(|a| a.property_id == property_id && a.assessed_at >= since)
            .cloned()
            .collect();
        history.sort_by(|a, b| a.assessed_at.cmp(&b.assessed_at).then(a.id.cmp(&b.id)));
        Ok(history)
    }
}
