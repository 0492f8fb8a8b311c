//! Shared harness for the HTTP integration tests.
//!
//! Every test gets its own in-memory store with all module migrations
//! applied and the same router `library-app` serves in production.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use library_db::DbPool;
use library_kernel::settings::Settings;
use serde_json::Value;
use tower::ServiceExt;

/// Build the full application router over a fresh, migrated store.
pub async fn build_test_app() -> Router {
    let db = library_db::memory_pool().await.expect("memory pool");
    build_app_with_pool(db).await
}

/// Migrate `db` and build the full application router over it.
pub async fn build_app_with_pool(db: DbPool) -> Router {
    let registry = library_app::app::registry().expect("registry");
    library_app::app::migrate(&db, &registry)
        .await
        .expect("migrations");

    library_http::build_router(&registry, &Settings::default(), db)
}

/// Send a request through the router and decode the JSON response body.
///
/// Empty bodies (204) decode to `Value::Null`.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    send_request(app, request).await
}

/// Send a prebuilt request, for bodies that are not valid JSON.
pub async fn send_request(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body is JSON")
    };

    (status, json)
}

/// POST an author and return its id.
pub async fn create_author(app: &Router, name: &str) -> String {
    let (status, json) = send(
        app,
        Method::POST,
        "/authors",
        Some(serde_json::json!({ "name": name })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create author: {json}");
    json["id"].as_str().expect("author id").to_string()
}

/// POST a book and return the raw response.
pub async fn create_book(app: &Router, title: &str, author_id: &str) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        "/books",
        Some(serde_json::json!({ "title": title, "author_id": author_id })),
    )
    .await
}

/// Assert the uniform error envelope and return its `details` array.
pub fn assert_envelope(json: &Value, code: &str, message: &str) -> Vec<Value> {
    assert_eq!(json["error"]["code"], code, "envelope: {json}");
    assert_eq!(json["error"]["message"], message, "envelope: {json}");
    json["error"]["details"]
        .as_array()
        .expect("details is an array")
        .clone()
}
