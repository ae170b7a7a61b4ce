//! End-to-end integration tests for the geonear HTTP API.
//!
//! Tests exercise the full stack: HTTP request -> axum router -> handler ->
//! ProgramService -> covering/storage -> HTTP response.
//!
//! Each test creates a fresh AppState backed by an in-memory SQLite database
//! and a fixed-coordinate geocoder pinned to lower Manhattan, so no network
//! access or API key is needed. Tests use `tower::ServiceExt::oneshot` to
//! send requests directly to the router without starting a network server.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::json;
use tower::ServiceExt;

use geonear_core::{CellId, LatLng, STORAGE_LEVEL};
use geonear_server::geocoder::Geocoder;
use geonear_server::router::build_router;
use geonear_server::state::AppState;

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

/// Creates a fresh router with every address geocoding to (40.7128, -74.0060).
fn test_app() -> Router {
    let state = AppState::in_memory(Geocoder::fixed(40.7128, -74.0060))
        .expect("failed to create in-memory AppState");
    build_router(state)
}

/// Sends a POST request with a JSON body and returns (status, json).
async fn post_json(
    app: &Router,
    path: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(path)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value =
        serde_json::from_slice(&body_bytes).unwrap_or(json!(null));
    (status, json)
}

/// Sends a GET request and returns (status, json).
async fn get_json(
    app: &Router,
    path: &str,
) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(path)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value =
        serde_json::from_slice(&body_bytes).unwrap_or(json!(null));
    (status, json)
}

/// Registers a program type and returns its ID.
async fn create_type(app: &Router, name: &str) -> i64 {
    let (status, body) =
        post_json(app, "/api/programs/types", json!({ "type_name": name })).await;
    assert_eq!(status, StatusCode::OK, "create type failed: {:?}", body);
    body["type_id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_with_no_programs_returns_empty_array() {
    let app = test_app();
    let (status, body) = get_json(
        &app,
        "/api/programs/search?address=123%20Test%20St&radius_miles=5",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn add_then_search_round_trip() {
    let app = test_app();
    let food = create_type(&app, "Food").await;

    let (status, added) = post_json(
        &app,
        "/api/programs/add",
        json!({
            "name": "Food Bank",
            "address": "123 Test St",
            "type_ids": [food]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "add failed: {:?}", added);
    assert!(added["id"].as_i64().unwrap() > 0);
    assert_eq!(added["latitude"].as_f64().unwrap(), 40.7128);

    // The persisted cell ID must equal the storage-level cell of the
    // geocoded coordinate.
    let expected_cell = CellId::from_lat_lng(LatLng::new(40.7128, -74.0060).unwrap())
        .parent(STORAGE_LEVEL);
    assert_eq!(added["cell_id"].as_u64().unwrap(), expected_cell.0);

    let (status, hits) = get_json(
        &app,
        "/api/programs/search?address=123%20Test%20St&radius_miles=5",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let hits = hits.as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["name"], "Food Bank");
    assert_eq!(hits[0]["types"], json!(["Food"]));
}

#[tokio::test]
async fn add_with_unknown_type_saves_program_without_associations() {
    let app = test_app();

    let (status, added) = post_json(
        &app,
        "/api/programs/add",
        json!({
            "name": "Food Bank",
            "address": "123 Test St",
            "type_ids": [999]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "add failed: {:?}", added);

    let (status, hits) = get_json(
        &app,
        "/api/programs/search?address=123%20Test%20St&radius_miles=5",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let hits = hits.as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["types"], json!([]));
}

#[tokio::test]
async fn duplicate_program_conflicts() {
    let app = test_app();
    let request = json!({
        "name": "Food Bank",
        "address": "123 Test St",
        "type_ids": []
    });

    let (status, _) = post_json(&app, "/api/programs/add", request.clone()).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post_json(&app, "/api/programs/add", request).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn type_filter_restricts_results() {
    let app = test_app();
    let food = create_type(&app, "Food").await;
    let housing = create_type(&app, "Housing").await;

    post_json(
        &app,
        "/api/programs/add",
        json!({ "name": "Food Bank", "address": "123 Test St", "type_ids": [food] }),
    )
    .await;
    post_json(
        &app,
        "/api/programs/add",
        json!({ "name": "Shelter", "address": "456 Other Ave", "type_ids": [housing] }),
    )
    .await;

    let (status, hits) = get_json(
        &app,
        &format!("/api/programs/search?address=x&radius_miles=5&type_id={food}"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let hits = hits.as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["name"], "Food Bank");

    // No filter: both programs come back.
    let (_, all) = get_json(&app, "/api/programs/search?address=x&radius_miles=5").await;
    assert_eq!(all.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn negative_radius_is_rejected() {
    let app = test_app();
    let (status, body) = get_json(
        &app,
        "/api/programs/search?address=x&radius_miles=-1",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn list_types_ordered_by_id() {
    let app = test_app();
    create_type(&app, "Housing").await;
    create_type(&app, "Food").await;
    create_type(&app, "Childcare").await;

    let (status, body) = get_json(&app, "/api/programs/types").await;
    assert_eq!(status, StatusCode::OK);
    let types = body.as_array().unwrap();
    assert_eq!(types.len(), 3);
    let ids: Vec<i64> = types.iter().map(|t| t["type_id"].as_i64().unwrap()).collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);
    assert_eq!(types[0]["type_name"], "Housing");
}

#[tokio::test]
async fn duplicate_type_name_conflicts() {
    let app = test_app();
    create_type(&app, "Food").await;
    let (status, body) =
        post_json(&app, "/api/programs/types", json!({ "type_name": "Food" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn geocoder_failure_surfaces_as_server_error() {
    // A fixed geocoder with an out-of-range coordinate fails every lookup;
    // the failure must propagate to the response, not be swallowed.
    let state = AppState::in_memory(Geocoder::fixed(95.0, 0.0)).unwrap();
    let app = build_router(state);
    let (status, body) = get_json(&app, "/api/programs/search?address=x&radius_miles=5").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], json!(false));
}
