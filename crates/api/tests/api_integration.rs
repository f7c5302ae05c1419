//! API integration tests.
//!
//! These tests route requests through the full router over a mock database.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use sea_orm::{DatabaseBackend, MockDatabase};
use shiftedblog_api::{AppState, router};
use shiftedblog_common::LocalStorage;
use shiftedblog_common::config::{
    Config, DatabaseConfig, MediaConfig, SecurityConfig, ServerConfig, SiteConfig,
};
use shiftedblog_db::entities::tag;
use tower::ServiceExt;

const TOKEN: &str = "editor-secret";
const BOUNDARY: &str = "----shiftedblog-test";

/// Create a test configuration.
fn create_test_config(editor_token: Option<&str>) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8000,
            url: "https://blog.example.com".to_string(),
        },
        database: DatabaseConfig {
            url: "postgres://localhost/test".to_string(),
            max_connections: 10,
            min_connections: 1,
        },
        site: SiteConfig {
            allowed_hosts: vec!["blog.example.com".to_string()],
            editor_token: editor_token.map(ToString::to_string),
            ..SiteConfig::default()
        },
        media: MediaConfig {
            root: std::env::temp_dir().join("shiftedblog-api-test-media"),
            url: "/media".to_string(),
        },
        security: SecurityConfig {
            content_security_policy: "default-src 'self'".to_string(),
            ..SecurityConfig::default()
        },
    }
}

/// Create the test router over a prepared mock database.
fn create_test_router(db: MockDatabase, editor_token: Option<&str>) -> Router {
    let config = create_test_config(editor_token);
    let storage = LocalStorage::new(PathBuf::from(&config.media.root), config.media.url.clone());
    let state = AppState::new(Arc::new(db.into_connection()), config, Arc::new(storage));
    router(state)
}

fn empty_db() -> MockDatabase {
    MockDatabase::new(DatabaseBackend::Postgres)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("GET")
        .header(header::HOST, "blog.example.com")
        .body(Body::empty())
        .unwrap()
}

fn upload_request(file_name: &str, field: &str) -> Request<Body> {
    let body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
         Content-Type: application/octet-stream\r\n\
         \r\n\
         data\r\n\
         --{BOUNDARY}--\r\n"
    );

    Request::builder()
        .uri("/custom-image-upload/")
        .method("POST")
        .header(header::HOST, "blog.example.com")
        .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_robots_txt() {
    let app = create_test_router(empty_db(), None);

    let response = app.oneshot(get("/robots.txt")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/plain")
    );
    assert_eq!(
        response.headers()[header::CONTENT_SECURITY_POLICY],
        "default-src 'self'"
    );
    assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("Disallow: /mellon/"));
    assert!(text.contains("Sitemap: https://blog.example.com/sitemap.xml"));
}

#[tokio::test]
async fn test_disallowed_host_is_rejected() {
    let app = create_test_router(empty_db(), None);

    let request = Request::builder()
        .uri("/robots.txt")
        .header(header::HOST, "evil.example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_tag_returns_404() {
    let db = empty_db().append_query_results([Vec::<tag::Model>::new()]);
    let app = create_test_router(db, None);

    let response = app.oneshot(get("/tag/missing/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_blank_search_returns_no_query() {
    let app = create_test_router(empty_db(), None);

    let response = app.oneshot(get("/search/?query=%20%20")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["query"].is_null());
    assert!(json["data"]["page"].is_null());
}

#[tokio::test]
async fn test_invalid_preview_key_is_rejected() {
    let app = create_test_router(empty_db(), None);

    let response = app.oneshot(get("/drafts/not-a-uuid/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_editor_api_disabled_without_token() {
    let app = create_test_router(empty_db(), None);

    let response = app.oneshot(get("/mellon/api/series")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_editor_api_disabled_with_blank_token() {
    let app = create_test_router(empty_db(), Some(""));

    let request = Request::builder()
        .uri("/mellon/api/series")
        .header(header::HOST, "blog.example.com")
        .header(header::AUTHORIZATION, "Bearer ")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_editor_api_requires_token() {
    let app = create_test_router(empty_db(), Some(TOKEN));

    let response = app.oneshot(get("/mellon/api/series")).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_editor_api_with_token() {
    let app = create_test_router(empty_db(), Some(TOKEN));

    let request = Request::builder()
        .uri("/mellon/api/series")
        .header(header::HOST, "blog.example.com")
        .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
        .body(Body::empty())
        .unwrap();
    // The mock has no rows queued, so the handler is reached and fails in the database.
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_upload_rejects_unsupported_type() {
    let app = create_test_router(empty_db(), Some(TOKEN));

    let response = app
        .oneshot(upload_request("payload.exe", "upload"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json, serde_json::json!({"error": "Unsupported file type"}));
}

#[tokio::test]
async fn test_upload_without_file_field() {
    let app = create_test_router(empty_db(), Some(TOKEN));

    let response = app
        .oneshot(upload_request("photo.png", "attachment"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json, serde_json::json!({"error": "Invalid request"}));
}

#[tokio::test]
async fn test_upload_without_multipart_body() {
    let app = create_test_router(empty_db(), Some(TOKEN));

    let request = Request::builder()
        .uri("/custom-image-upload/")
        .method("POST")
        .header(header::HOST, "blog.example.com")
        .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid request");
}
