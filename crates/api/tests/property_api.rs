//! Integration tests for the `/properties` resource.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_property, get, post_json};
use serde_json::json;

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_property_applies_defaults() {
    let test = common::build_test_app(50.0);

    let response = post_json(
        test.app,
        "/api/v1/properties",
        json!({
            "name": "Ridge Cabin",
            "address": "1 Ridge Rd",
            "longitude": -122.42,
            "latitude": 37.77,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let data = &json["data"];
    assert!(data["id"].is_i64());
    assert_eq!(data["name"], "Ridge Cabin");
    assert_eq!(data["vegetation_density"], 0.5);
    assert_eq!(data["slope_percentage"], 10.0);
    assert_eq!(data["distance_to_fire_station_km"], 5.0);
    assert_eq!(data["has_firebreak"], false);
    assert_eq!(data["current_risk_score"], 0.0);
    assert_eq!(data["risk_level"], "MINIMAL");
    assert!(data["last_assessment_date"].is_null());
}

#[tokio::test]
async fn create_property_accepts_polygon_boundary() {
    let test = common::build_test_app(50.0);

    let boundary = json!({
        "type": "Polygon",
        "coordinates": [[[-122.0, 37.0], [-122.0, 37.1], [-121.9, 37.1], [-122.0, 37.0]]],
    });
    let response = post_json(
        test.app,
        "/api/v1/properties",
        json!({"name": "Lot 4", "longitude": -121.95, "latitude": 37.05, "boundary": boundary}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["data"]["boundary"], boundary);
}

#[tokio::test]
async fn create_property_rejects_non_polygon_boundary() {
    let test = common::build_test_app(50.0);

    let response = post_json(
        test.app,
        "/api/v1/properties",
        json!({
            "name": "Lot 5",
            "longitude": -121.95,
            "latitude": 37.05,
            "boundary": {"type": "Point", "coordinates": [-121.95, 37.05]},
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn create_property_rejects_out_of_range_inputs() {
    let test = common::build_test_app(50.0);

    for body in [
        json!({"name": "Too north", "longitude": 0.0, "latitude": 95.0}),
        json!({"name": "", "longitude": 0.0, "latitude": 0.0}),
        json!({"name": "Dense", "longitude": 0.0, "latitude": 0.0, "vegetation_density": 1.5}),
        json!({"name": "Pit", "longitude": 0.0, "latitude": 0.0, "slope_percentage": -1.0}),
    ] {
        let response = post_json(test.app.clone(), "/api/v1/properties", body.clone()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn create_property_accepts_slope_steeper_than_45_degrees() {
    let test = common::build_test_app(50.0);

    let response = post_json(
        test.app,
        "/api/v1/properties",
        json!({"name": "Cliffside", "longitude": -122.42, "latitude": 37.77, "slope_percentage": 150.0}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["data"]["slope_percentage"], 150.0);
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_property_by_id() {
    let test = common::build_test_app(50.0);
    let id = create_property(&test.app, "Ridge Cabin", -122.42, 37.77).await;

    let response = get(test.app, &format!("/api/v1/properties/{id}")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["id"], id);
}

#[tokio::test]
async fn get_unknown_property_returns_404() {
    let test = common::build_test_app(50.0);

    let response = get(test.app, "/api/v1/properties/999").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Property with id 999 not found");
}

// ---------------------------------------------------------------------------
// Spatial and threshold queries
// ---------------------------------------------------------------------------

#[tokio::test]
async fn nearby_returns_properties_inside_radius() {
    let test = common::build_test_app(50.0);
    let near = create_property(&test.app, "Near", -122.42, 37.77).await;
    let _far = create_property(&test.app, "Far", -118.24, 34.05).await;

    let response = get(
        test.app,
        "/api/v1/properties/nearby?lon=-122.40&lat=37.78&radius_km=10",
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let ids: Vec<i64> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![near]);
}

#[tokio::test]
async fn nearby_validates_query() {
    let test = common::build_test_app(50.0);

    for uri in [
        "/api/v1/properties/nearby?lon=-122.4&lat=37.7&radius_km=0",
        "/api/v1/properties/nearby?lon=-122.4&lat=37.7&radius_km=501",
        "/api/v1/properties/nearby?lon=-190&lat=37.7&radius_km=5",
        "/api/v1/properties/nearby?lon=-122.4&lat=37.7",
    ] {
        let response = get(test.app.clone(), uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "uri: {uri}");
    }
}

#[tokio::test]
async fn high_risk_uses_default_threshold_of_70() {
    let test = common::build_test_app(70.0);
    let at_threshold = create_property(&test.app, "Edge", -122.42, 37.77).await;
    let below = create_property(&test.app, "Calm", -122.43, 37.78).await;

    let response = common::post_empty(
        test.app.clone(),
        &format!("/api/v1/properties/{at_threshold}/assess"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    test.scorer.set_score(69.9);
    let response =
        common::post_empty(test.app.clone(), &format!("/api/v1/properties/{below}/assess")).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(get(test.app.clone(), "/api/v1/properties/high-risk").await).await;
    let ids: Vec<i64> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![at_threshold]);

    let json = body_json(get(test.app, "/api/v1/properties/high-risk?threshold=50").await).await;
    let ids: Vec<i64> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![at_threshold, below]);
}

#[tokio::test]
async fn high_risk_rejects_threshold_out_of_range() {
    let test = common::build_test_app(50.0);

    let response = get(test.app, "/api/v1/properties/high-risk?threshold=150").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}
