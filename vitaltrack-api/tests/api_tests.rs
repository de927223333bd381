use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Once;
use tower::ServiceExt;

use vitaltrack_api::api::create_application;

// Ensure tracing is initialized only once
static INIT: Once = Once::new();

fn initialize() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt::try_init();
    });
}

async fn test_app() -> Router {
    initialize();
    create_application().await
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", mime::APPLICATION_JSON.as_ref())
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn register_person(app: &Router, name: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/persons",
            json!({
                "name": name,
                "age": 45,
                "gender": "female",
                "description": "integration test subject"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response_json(response).await;
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_check() {
    let app = test_app().await;

    let response = app.oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_person_registration_and_lookup() {
    let app = test_app().await;
    let id = register_person(&app, "Alice Example").await;

    let response = app
        .clone()
        .oneshot(get_request(&format!("/api/v1/persons/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["name"], "Alice Example");

    let response = app.oneshot(get_request("/api/v1/persons")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert!(body.as_array().unwrap().len() >= 1);
}

#[tokio::test]
async fn test_person_validation_rejects_bad_age() {
    let app = test_app().await;

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/v1/persons",
            json!({
                "name": "Bob",
                "age": 0,
                "gender": "male",
                "description": null
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_entry_crud_lifecycle() {
    let app = test_app().await;
    let person_id = register_person(&app, "Carol Example").await;

    // Create
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/entries",
            json!({
                "person_id": person_id,
                "systolic": 128,
                "diastolic": 82,
                "heart_rate": 70,
                "tags": "morning",
                "timestamp": "2024-03-15T08:30:00Z"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = response_json(response).await;
    let entry_id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["systolic"], 128);

    // Read back
    let response = app
        .clone()
        .oneshot(get_request(&format!("/api/v1/entries/{}", entry_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Update
    let response = app
        .clone()
        .oneshot(json_request(
            Method::PUT,
            &format!("/api/v1/entries/{}", entry_id),
            json!({
                "person_id": person_id,
                "systolic": 132,
                "diastolic": 84,
                "heart_rate": 72,
                "tags": "morning",
                "timestamp": "2024-03-15T08:30:00Z"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = response_json(response).await;
    assert_eq!(updated["systolic"], 132);

    // Delete
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::DELETE)
                .uri(format!("/api/v1/entries/{}", entry_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Gone
    let response = app
        .oneshot(get_request(&format!("/api/v1/entries/{}", entry_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_entry_validation_rejects_out_of_range() {
    let app = test_app().await;
    let person_id = register_person(&app, "Dave Example").await;

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/v1/entries",
            json!({
                "person_id": person_id,
                "systolic": 250,
                "diastolic": 80,
                "heart_rate": 70,
                "timestamp": "2024-03-15T08:30:00Z"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_duplicate_timestamp_rejected() {
    let app = test_app().await;
    let person_id = register_person(&app, "Erin Example").await;

    let entry = json!({
        "person_id": person_id,
        "systolic": 120,
        "diastolic": 80,
        "heart_rate": 65,
        "timestamp": "2024-03-16T07:00:00Z"
    });

    let response = app
        .clone()
        .oneshot(json_request(Method::POST, "/api/v1/entries", entry.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(json_request(Method::POST, "/api/v1/entries", entry))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_unknown_person_rejected() {
    let app = test_app().await;

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/v1/entries",
            json!({
                "person_id": "00000000-0000-0000-0000-000000000000",
                "systolic": 120,
                "diastolic": 80,
                "heart_rate": 65,
                "timestamp": "2024-03-16T07:00:00Z"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_import_skips_duplicates_and_counts_failures() {
    let app = test_app().await;
    let person_id = register_person(&app, "Frank Example").await;

    // Seed one entry that the import will collide with
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/entries",
            json!({
                "person_id": person_id,
                "systolic": 118,
                "diastolic": 76,
                "heart_rate": 60,
                "timestamp": "2024-04-01T08:00:00Z"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/v1/entries/import",
            json!({
                "person_id": person_id,
                "rows": [
                    { "systolic": 122, "diastolic": 78, "heart_rate": 62,
                      "timestamp": "2024-04-02T08:00:00Z" },
                    { "systolic": 118, "diastolic": 76, "heart_rate": 60,
                      "timestamp": "2024-04-01T08:00:00Z" },
                    { "systolic": 300, "diastolic": 78, "heart_rate": 62,
                      "timestamp": "2024-04-03T08:00:00Z" }
                ]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let report = response_json(response).await;
    assert_eq!(report["imported"], 1);
    assert_eq!(report["skipped"], 1);
    assert_eq!(report["failed"], 1);
    assert_eq!(report["errors"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_list_entries_pagination_and_sort() {
    let app = test_app().await;
    let person_id = register_person(&app, "Grace Example").await;

    for (i, ts) in [
        "2024-05-01T08:00:00Z",
        "2024-05-02T08:00:00Z",
        "2024-05-03T08:00:00Z",
    ]
    .iter()
    .enumerate()
    {
        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/v1/entries",
                json!({
                    "person_id": person_id,
                    "systolic": 120 + i as u16,
                    "diastolic": 80,
                    "heart_rate": 70,
                    "timestamp": ts
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .oneshot(get_request(&format!(
            "/api/v1/entries?person_id={}&limit=2&sort=asc",
            person_id
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["total_count"], 3);
    assert_eq!(body["limit"], 2);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["systolic"], 120);
    assert_eq!(data[1]["systolic"], 121);
}

#[tokio::test]
async fn test_chart_aggregates_daily_averages() {
    let app = test_app().await;
    let person_id = register_person(&app, "Heidi Example").await;

    // Two readings on Jan 1, one on Jan 2
    let readings = [
        ("2024-01-01T08:00:00Z", 120, 80),
        ("2024-01-01T20:00:00Z", 130, 85),
        ("2024-01-02T08:00:00Z", 150, 95),
    ];
    for (ts, systolic, diastolic) in readings {
        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/v1/entries",
                json!({
                    "person_id": person_id,
                    "systolic": systolic,
                    "diastolic": diastolic,
                    "heart_rate": 70,
                    "timestamp": ts
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .oneshot(get_request(&format!(
            "/api/v1/chart/blood-pressure?person_id={}",
            person_id
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["dates"], json!(["2024/01/01", "2024/01/02"]));
    assert_eq!(body["avg_systolic"], json!([125.0, 150.0]));
    assert_eq!(body["avg_diastolic"], json!([82.5, 95.0]));
    assert_eq!(body["y_axis"]["min"], 40);
    assert_eq!(body["y_axis"]["max"], 220);

    let points = body["points"].as_array().unwrap();
    assert_eq!(points[0]["level"], "normal");
    assert_eq!(points[1]["level"], "elevated");
}

#[tokio::test]
async fn test_chart_empty_for_person_without_entries() {
    let app = test_app().await;
    let person_id = register_person(&app, "Ivan Example").await;

    let response = app
        .oneshot(get_request(&format!(
            "/api/v1/chart/blood-pressure?person_id={}",
            person_id
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["dates"], json!([]));
    assert_eq!(body["points"], json!([]));
}

#[tokio::test]
async fn test_chart_rejects_malformed_dates() {
    let app = test_app().await;
    let person_id = register_person(&app, "Judy Example").await;

    let response = app
        .oneshot(get_request(&format!(
            "/api/v1/chart/blood-pressure?person_id={}&start_date=not-a-date",
            person_id
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
