//! Integration tests for the generic entity endpoints.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_create_then_get_one() {
    let app = helpers::TestApp::new();
    let id = app
        .create("/api/courses", json!({"name": "Laboratory Safety", "ou": 4}))
        .await;

    let response = app.request("GET", &format!("/api/courses/{id}"), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["data"]["name"], "Laboratory Safety");
    assert_eq!(response.body["data"]["ou"], 4);
    assert!(response.body["data"]["createdAt"].is_string());
    assert!(response.body["pagination"].is_null());
}

#[tokio::test]
async fn test_list_envelope_has_fixed_pagination() {
    let app = helpers::TestApp::new();
    for name in ["Algebra", "Biology", "Chemistry"] {
        app.create("/api/programs", json!({"name": name})).await;
    }

    let response = app.request("GET", "/api/programs?page=1&offset=2", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"].as_array().map(Vec::len), Some(2));
    assert_eq!(
        response.body["pagination"],
        json!({"total": 2, "pagesize": 10, "page": 1})
    );

    let second = app.request("GET", "/api/programs?page=2&offset=2", None).await;
    assert_eq!(second.body["data"][0]["name"], "Chemistry");
}

#[tokio::test]
async fn test_page_zero_is_bad_request() {
    let app = helpers::TestApp::new();
    let response = app.request("GET", "/api/courses?page=0", None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["statusCode"], 400);
    assert!(response.body["timestamp"].is_string());
}

#[tokio::test]
async fn test_update_uses_path_id_and_returns_new_state() {
    let app = helpers::TestApp::new();
    let id = app
        .create("/api/settings", json!({"key": "theme", "value": "light"}))
        .await;

    let response = app
        .request(
            "PUT",
            &format!("/api/settings/{id}"),
            Some(json!({"value": "dark"})),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    assert_eq!(response.body["data"]["id"], id.as_str());
    assert_eq!(response.body["data"]["value"], "dark");
    assert_eq!(response.body["data"]["key"], "theme");
}

#[tokio::test]
async fn test_update_missing_record_is_not_found() {
    let app = helpers::TestApp::new();
    let response = app
        .request(
            "PUT",
            "/api/courses/00000000-0000-4000-8000-000000000000",
            Some(json!({"name": "Ghost"})),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["statusCode"], 404);
}

#[tokio::test]
async fn test_delete_twice_acknowledges_zero() {
    let app = helpers::TestApp::new();
    let id = app.create("/api/permissions", json!({"name": "course:read"})).await;
    let path = format!("/api/permissions/{id}");

    let first = app.request("DELETE", &path, None).await;
    assert_eq!(first.body["data"]["deletedCount"], 1);
    let second = app.request("DELETE", &path, None).await;
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(second.body["data"]["deletedCount"], 0);

    let gone = app.request("GET", &path, None).await;
    assert_eq!(gone.status, StatusCode::OK);
    assert_eq!(gone.body["success"], false);
    assert!(gone.body["data"].is_null());
}

#[tokio::test]
async fn test_invalid_body_is_validation_error() {
    let app = helpers::TestApp::new();
    let response = app
        .request("POST", "/api/courses", Some(json!({"name": ""})))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(
        response.body["message"]
            .as_str()
            .is_some_and(|m| m.starts_with("Validation failed"))
    );

    let response = app
        .request("POST", "/api/courses", Some(json!({"credits": 3})))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_id_is_bad_request() {
    let app = helpers::TestApp::new();
    let response = app.request("GET", "/api/courses/not-a-uuid", None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_role_permissions_are_expanded() {
    let app = helpers::TestApp::new();
    let read = app.create("/api/permissions", json!({"name": "course:read"})).await;
    let role = app
        .create(
            "/api/roles",
            json!({"name": "Instructor", "permissions": [read]}),
        )
        .await;

    let response = app.request("GET", &format!("/api/roles/{role}"), None).await;
    assert_eq!(response.body["data"]["permissions"][0]["name"], "course:read");
}

#[tokio::test]
async fn test_health() {
    let app = helpers::TestApp::new();
    let response = app.request("GET", "/api/health", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
}
