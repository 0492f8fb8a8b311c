mod common;

use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, Method, Request, StatusCode};
use chrono::{DateTime, Utc};
use serde_json::json;
use uuid::Uuid;

use common::{assert_envelope, build_test_app, send, send_request};

#[tokio::test]
async fn create_author_returns_201_with_trimmed_name() {
    let app = build_test_app().await;

    let (status, json) = send(
        &app,
        Method::POST,
        "/authors",
        Some(json!({ "name": "  Jane Austen  " })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["name"], "Jane Austen");

    let id = Uuid::parse_str(json["id"].as_str().unwrap()).unwrap();
    assert_eq!(id.get_version_num(), 4);

    let created: DateTime<Utc> = json["created_at"].as_str().unwrap().parse().unwrap();
    let updated: DateTime<Utc> = json["updated_at"].as_str().unwrap().parse().unwrap();
    assert_eq!(created, updated);
}

#[tokio::test]
async fn duplicate_author_names_get_distinct_ids() {
    let app = build_test_app().await;

    let first = common::create_author(&app, "Anonymous").await;
    let second = common::create_author(&app, "Anonymous").await;

    assert_ne!(first, second);
}

#[tokio::test]
async fn extra_fields_are_ignored() {
    let app = build_test_app().await;

    let (status, json) = send(
        &app,
        Method::POST,
        "/authors",
        Some(json!({ "name": "Jane Austen", "born": 1775 })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(json.get("born").is_none());
}

#[tokio::test]
async fn missing_name_is_a_validation_error() {
    let app = build_test_app().await;

    let (status, json) = send(&app, Method::POST, "/authors", Some(json!({}))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let details = assert_envelope(&json, "VALIDATION_ERROR", "Request validation failed");
    assert_eq!(
        details,
        vec![json!({ "field": "body.name", "message": "Field required" })]
    );
}

#[tokio::test]
async fn rejected_names_report_the_failing_rule() {
    let app = build_test_app().await;
    let cases = [
        (json!("   "), "name must not be empty"),
        (json!("x".repeat(51)), "String should have at most 50 characters"),
        (json!(7), "Input should be a valid string"),
        (json!(null), "Field required"),
    ];

    for (name, message) in cases {
        let (status, json) =
            send(&app, Method::POST, "/authors", Some(json!({ "name": name }))).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "name: {name}");
        let details = assert_envelope(&json, "VALIDATION_ERROR", "Request validation failed");
        assert_eq!(details[0]["field"], "body.name");
        assert_eq!(details[0]["message"], message);
    }
}

#[tokio::test]
async fn fifty_character_name_is_accepted() {
    let app = build_test_app().await;
    let name = "n".repeat(50);

    let (status, json) =
        send(&app, Method::POST, "/authors", Some(json!({ "name": name }))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["name"], name);
}

#[tokio::test]
async fn malformed_json_uses_validation_envelope() {
    let app = build_test_app().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/authors")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();

    let (status, json) = send_request(&app, request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let details = assert_envelope(&json, "VALIDATION_ERROR", "Request validation failed");
    assert_eq!(details[0]["field"], "body");
}

#[tokio::test]
async fn non_object_body_is_rejected() {
    let app = build_test_app().await;

    let (status, json) = send(&app, Method::POST, "/authors", Some(json!(["Jane"]))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let details = assert_envelope(&json, "VALIDATION_ERROR", "Request validation failed");
    assert_eq!(details[0]["message"], "Input should be a valid dictionary");
}
