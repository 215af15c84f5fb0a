//! Integration tests for the event search endpoint
//!
//! Drives `POST /api/events/search` through the router against a seeded
//! temporary database and a deterministic geocoder.

mod helpers;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::json;
use std::sync::Arc;
use tower::util::ServiceExt;

use helpers::{
    create_test_db, event_ids, extract_json, json_request, seed_catalog, seeded_app, setup_app,
    FailingGeocoder,
};

const SEARCH: &str = "/api/events/search";

// =============================================================================
// Envelope and defaults
// =============================================================================

#[tokio::test]
async fn test_empty_body_returns_all_earliest_first() {
    let (_dir, _pool, app) = seeded_app().await;

    let response = app.oneshot(json_request(SEARCH, json!({}))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Events fetched successfully");
    assert_eq!(event_ids(&body), vec![5, 2, 1, 4, 6, 3]);
}

#[tokio::test]
async fn test_events_carry_all_columns_and_location() {
    let (_dir, _pool, app) = seeded_app().await;

    let response = app
        .oneshot(json_request(SEARCH, json!({"organizers": ["Org A"]})))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;

    let event = &body["events"][0];
    assert_eq!(event["title"], "Jazz night");
    assert_eq!(event["description"], "Jazz night description");
    assert_eq!(event["category"], "Music");
    assert_eq!(event["start_date"], "15. 3. 2024 20:00");
    assert_eq!(event["price"], 10.5);
    assert!(event["image"].is_null());
    assert_eq!(event["location"]["address"], "Ilica 1, Zagreb");
    assert_eq!(event["location"]["latitude"], 45.8131);
    assert_eq!(event["location"]["longitude"], 15.9720);
}

// =============================================================================
// Query filters
// =============================================================================

#[tokio::test]
async fn test_filters_and_across_dimensions() {
    let (_dir, _pool, app) = seeded_app().await;

    let response = app
        .oneshot(json_request(
            SEARCH,
            json!({"categories": ["Music"], "eventTypes": ["Concert", "Festival"]}),
        ))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;

    assert_eq!(event_ids(&body), vec![1, 4, 3]);
}

#[tokio::test]
async fn test_quote_in_organizer_name_is_bound_safely() {
    let (_dir, _pool, app) = seeded_app().await;

    let response = app
        .oneshot(json_request(SEARCH, json!({"organizers": ["Lisinski's Hall"]})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(event_ids(&body), vec![4]);
}

#[tokio::test]
async fn test_injection_attempt_matches_nothing() {
    let (_dir, pool, app) = seeded_app().await;

    let response = app
        .oneshot(json_request(
            SEARCH,
            json!({"categories": ["Music') OR 1=1; DROP TABLE events; --"]}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert!(event_ids(&body).is_empty());

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 6);
}

#[tokio::test]
async fn test_age_groups_are_accepted_but_do_not_filter() {
    let (_dir, _pool, app) = seeded_app().await;

    let response = app
        .oneshot(json_request(SEARCH, json!({"ageGroups": ["Seniors"]})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(event_ids(&body).len(), 6);
}

// =============================================================================
// Date range
// =============================================================================

#[tokio::test]
async fn test_date_range_is_inclusive_and_date_only() {
    let (_dir, _pool, app) = seeded_app().await;

    let response = app
        .oneshot(json_request(
            SEARCH,
            json!({"startDate": "2024-03-10", "endDate": "2024-03-20T00:00:00.000Z"}),
        ))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;

    // 20. 3. 2024 19:30 is on the end date and stays in
    assert_eq!(event_ids(&body), vec![2, 1, 4]);
}

#[tokio::test]
async fn test_open_ended_range() {
    let (_dir, _pool, app) = seeded_app().await;

    let response = app
        .oneshot(json_request(SEARCH, json!({"startDate": "2024-03-21", "endDate": null})))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;

    assert_eq!(event_ids(&body), vec![6, 3]);
}

#[tokio::test]
async fn test_malformed_start_date_only_survives_unbounded_search() {
    let (_dir, pool, app) = seeded_app().await;
    sqlx::query(
        "INSERT INTO events (id, title, category, event_type, organizer, start_date) VALUES (7, 'TBA', 'Music', 'Concert', 'Org A', 'sometime soon')",
    )
    .execute(&pool)
    .await
    .unwrap();

    let response = app
        .clone()
        .oneshot(json_request(SEARCH, json!({})))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(event_ids(&body), vec![5, 2, 1, 4, 6, 3, 7]);

    let response = app
        .oneshot(json_request(SEARCH, json!({"startDate": "2024-01-01"})))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert!(!event_ids(&body).contains(&7));
}

// =============================================================================
// Accessibility
// =============================================================================

#[tokio::test]
async fn test_accessibility_requires_every_tag() {
    let (_dir, _pool, app) = seeded_app().await;

    let response = app
        .clone()
        .oneshot(json_request(SEARCH, json!({"accessibility": ["disabled"]})))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(event_ids(&body), vec![2, 4]);

    let response = app
        .oneshot(json_request(SEARCH, json!({"accessibility": ["disabled", "pets"]})))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(event_ids(&body), vec![2]);
}

#[tokio::test]
async fn test_kids_maps_to_parking() {
    let (_dir, _pool, app) = seeded_app().await;

    let response = app
        .oneshot(json_request(SEARCH, json!({"accessibility": ["kids"]})))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;

    assert_eq!(event_ids(&body), vec![1, 4]);
}

#[tokio::test]
async fn test_unmatched_organizer_kept_only_without_tags() {
    let (_dir, _pool, app) = seeded_app().await;

    let response = app
        .clone()
        .oneshot(json_request(SEARCH, json!({"categories": ["Market"]})))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(event_ids(&body), vec![5]);
    assert!(body["events"][0]["location"].is_null());

    let response = app
        .oneshot(json_request(
            SEARCH,
            json!({"categories": ["Market"], "accessibility": ["kids"]}),
        ))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert!(event_ids(&body).is_empty());
}

#[tokio::test]
async fn test_unknown_accessibility_tag_rejected() {
    let (_dir, _pool, app) = seeded_app().await;

    let response = app
        .oneshot(json_request(SEARCH, json!({"accessibility": ["wheelchair"]})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("wheelchair"));
}

#[tokio::test]
async fn test_null_lists_mean_no_filter() {
    let (_dir, _pool, app) = seeded_app().await;

    let response = app
        .oneshot(json_request(
            SEARCH,
            json!({"categories": null, "accessibility": null, "sort": null}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(event_ids(&body), vec![5, 2, 1, 4, 6, 3]);
}

#[tokio::test]
async fn test_malformed_json_gets_json_error() {
    let (_dir, _pool, app) = seeded_app().await;

    let request = Request::builder()
        .method("POST")
        .uri(SEARCH)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"categories\": ["))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["success"], false);
}

// =============================================================================
// Geocoding and sorting
// =============================================================================

#[tokio::test]
async fn test_location_sort_from_reference_point() {
    let (_dir, _pool, app) = seeded_app().await;

    let response = app
        .oneshot(json_request(
            SEARCH,
            json!({"sort": {"param": "location", "latitude": 45.8, "longitude": 16.0}}),
        ))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;

    // Unplaced events (no organizer, failed lookup) trail in store order
    assert_eq!(event_ids(&body), vec![2, 4, 1, 3, 5, 6]);
}

#[tokio::test]
async fn test_location_sort_reversed_keeps_unplaced_last() {
    let (_dir, _pool, app) = seeded_app().await;

    let response = app
        .oneshot(json_request(
            SEARCH,
            json!({"sort": {"param": "location", "reverse": true, "latitude": 45.8, "longitude": 16.0}}),
        ))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;

    assert_eq!(event_ids(&body), vec![3, 1, 4, 2, 5, 6]);
}

#[tokio::test]
async fn test_earliest_reversed() {
    let (_dir, _pool, app) = seeded_app().await;

    let response = app
        .oneshot(json_request(SEARCH, json!({"sort": {"param": "earliest", "reverse": true}})))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;

    assert_eq!(event_ids(&body), vec![3, 6, 4, 1, 2, 5]);
}

#[tokio::test]
async fn test_failed_lookup_keeps_address_without_coordinates() {
    let (_dir, _pool, app) = seeded_app().await;

    let response = app
        .oneshot(json_request(SEARCH, json!({"organizers": ["Outage Club"]})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    let location = &body["events"][0]["location"];
    assert_eq!(location["address"], "unreachable road 7");
    assert!(location.get("latitude").is_none());
    assert!(location.get("longitude").is_none());
}

#[tokio::test]
async fn test_geocoder_outage_is_not_fatal() {
    let (_dir, pool) = create_test_db().await;
    seed_catalog(&pool).await;
    let app = setup_app(pool, Arc::new(FailingGeocoder));

    let response = app
        .oneshot(json_request(SEARCH, json!({"sort": {"param": "location"}})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    // Nobody is placed, so the store order survives
    assert_eq!(event_ids(&body), vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(body["events"][1]["location"]["address"], "Vukovarska 10, Zagreb");
}

#[tokio::test]
async fn test_unknown_sort_param_rejected() {
    let (_dir, _pool, app) = seeded_app().await;

    let response = app
        .oneshot(json_request(SEARCH, json!({"sort": {"param": "price"}})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_out_of_range_reference_rejected() {
    let (_dir, _pool, app) = seeded_app().await;

    let response = app
        .oneshot(json_request(
            SEARCH,
            json!({"sort": {"param": "location", "latitude": 123.0, "longitude": 16.0}}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("latitude"));
}

// =============================================================================
// Store failure
// =============================================================================

#[tokio::test]
async fn test_store_failure_reports_generic_message() {
    let (_dir, pool, app) = seeded_app().await;
    sqlx::query("DROP TABLE events").execute(&pool).await.unwrap();

    let response = app.oneshot(json_request(SEARCH, json!({}))).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Failed to execute query.");
}
