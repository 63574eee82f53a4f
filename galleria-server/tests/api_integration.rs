//! API integration tests for galleria-server.
//!
//! These tests drive the router with realistic multipart requests against a
//! temporary upload directory, covering the upload → list → fetch flow.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use galleria_core::UploadStore;
use galleria_server::{create_router, create_router_with_config, AppState, Config};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "----TestBoundary7MA4YWxkTrZu0gW";
const BASE_URL: &str = "http://localhost:5000";

/// Helper to create a multipart upload body.
///
/// `file` is `(field name, original filename, bytes)`.
fn create_upload_multipart(
    file: Option<(&str, &str, &[u8])>,
    text_fields: &[(&str, &str)],
) -> (String, Vec<u8>) {
    let mut body = Vec::new();

    if let Some((field, filename, content)) = file {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                field, filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }

    for (name, value) in text_fields {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }

    // End boundary
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    (format!("multipart/form-data; boundary={}", BOUNDARY), body)
}

/// Build a router over a fresh temporary upload directory.
///
/// The `TempDir` must be kept alive for the duration of the test.
async fn create_test_app() -> (Router, AppState, TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let store = UploadStore::open(tmp.path()).await.unwrap();
    let state = AppState::new(store, BASE_URL);
    (create_router(state.clone()), state, tmp)
}

async fn upload_file(
    app: &Router,
    field: &str,
    filename: &str,
    content: &[u8],
    text: &[(&str, &str)],
) -> Response {
    send_upload(app, create_upload_multipart(Some((field, filename, content)), text)).await
}

async fn upload_without_file(app: &Router, text: &[(&str, &str)]) -> Response {
    send_upload(app, create_upload_multipart(None, text)).await
}

async fn send_upload(app: &Router, (content_type, body): (String, Vec<u8>)) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/upload")
                .header("Content-Type", content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn get(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

// ============================================================================
// Upload Endpoint Tests
// ============================================================================

#[tokio::test]
async fn test_upload_returns_record_and_stores_file() {
    let (app, state, tmp) = create_test_app().await;
    let content = b"\x89PNG\r\n\x1a\n fake png payload";

    let response = upload_file(
        &app,
        "image",
        "sunset.png",
        content,
        &[
            ("type", "banner"),
            ("title", "Sunset"),
            ("description", "Over the sea"),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    assert!(json["message"].is_string());
    let image = &json["image"];
    let name = image["name"].as_str().unwrap();

    assert_eq!(image["id"], 1);
    assert_eq!(image["type"], "banner");
    assert_eq!(image["title"], "Sunset");
    assert_eq!(image["description"], "Over the sea");
    assert!(name.starts_with("image-"));
    assert!(name.ends_with(".png"));
    assert_eq!(
        image["url"].as_str().unwrap(),
        format!("{}/uploads/{}", BASE_URL, name)
    );

    assert_eq!(std::fs::read(tmp.path().join(name)).unwrap(), content);
    assert_eq!(state.registry.len(), 1);
}

#[tokio::test]
async fn test_upload_defaults_missing_fields() {
    let (app, _state, _tmp) = create_test_app().await;

    let response = upload_file(&app, "image", "plain.jpg", b"jpeg bytes", &[]).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["image"]["type"], "regular");
    assert_eq!(json["image"]["title"], "");
    assert_eq!(json["image"]["description"], "");
}

#[tokio::test]
async fn test_upload_empty_type_defaults_to_regular() {
    let (app, _state, _tmp) = create_test_app().await;

    let response = upload_file(&app, "image", "a.gif", b"GIF89a", &[("type", "")]).await;

    let json = body_json(response).await;
    assert_eq!(json["image"]["type"], "regular");
}

#[tokio::test]
async fn test_upload_missing_file_is_rejected() {
    let (app, state, tmp) = create_test_app().await;

    let response = upload_without_file(&app, &[("title", "No file here")]).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("image"));
    assert_eq!(json["code"], "INVALID_INPUT");

    assert!(state.registry.is_empty());
    assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_upload_wrong_field_name_is_rejected() {
    let (app, state, _tmp) = create_test_app().await;

    let response = upload_file(&app, "file", "a.png", b"bytes", &[]).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(state.registry.is_empty());
}

#[tokio::test]
async fn test_upload_blank_file_part_is_rejected() {
    let (app, state, _tmp) = create_test_app().await;

    let response = upload_file(&app, "image", "", b"", &[]).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(state.registry.is_empty());
}

#[tokio::test]
async fn test_upload_text_value_in_image_field_is_rejected() {
    let (app, state, tmp) = create_test_app().await;

    let response = upload_without_file(&app, &[("image", "just some text")]).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_INPUT");
    assert!(state.registry.is_empty());
    assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_upload_second_file_part_is_rejected() {
    let (app, state, tmp) = create_test_app().await;

    let mut body = Vec::new();
    for (filename, content) in [("one.png", "first"), ("two.png", "second")] {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, filename, content
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    let content_type = format!("multipart/form-data; boundary={}", BOUNDARY);

    let response = send_upload(&app, (content_type, body)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(state.registry.is_empty());
    assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_upload_with_oversized_body_limit_setting() {
    let tmp = tempfile::tempdir().unwrap();
    let store = UploadStore::open(tmp.path()).await.unwrap();
    let config = Config {
        body_limit_mb: usize::MAX,
        ..Config::default()
    };
    let app = create_router_with_config(&config, AppState::new(store, BASE_URL));

    let response = upload_file(&app, "image", "a.png", b"bytes", &[]).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_upload_same_filename_twice_gives_distinct_records() {
    let (app, state, tmp) = create_test_app().await;

    let first = body_json(upload_file(&app, "image", "dup.png", b"first", &[]).await).await;
    let second = body_json(upload_file(&app, "image", "dup.png", b"second", &[]).await).await;

    let first_name = first["image"]["name"].as_str().unwrap();
    let second_name = second["image"]["name"].as_str().unwrap();

    assert_ne!(first_name, second_name);
    assert_eq!(first["image"]["id"], 1);
    assert_eq!(second["image"]["id"], 2);
    assert_eq!(state.registry.len(), 2);
    assert_eq!(std::fs::read(tmp.path().join(first_name)).unwrap(), b"first");
    assert_eq!(std::fs::read(tmp.path().join(second_name)).unwrap(), b"second");
}

#[tokio::test]
async fn test_upload_without_extension() {
    let (app, _state, _tmp) = create_test_app().await;

    let json = body_json(upload_file(&app, "image", "README", b"data", &[]).await).await;

    assert!(!json["image"]["name"].as_str().unwrap().contains('.'));
}

#[tokio::test]
async fn test_upload_into_removed_directory_is_server_error() {
    let (app, state, tmp) = create_test_app().await;
    std::fs::remove_dir_all(tmp.path()).unwrap();

    let response = upload_file(&app, "image", "a.png", b"bytes", &[]).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["code"], "STORAGE_IO_ERROR");
    assert!(state.registry.is_empty());
}

// ============================================================================
// Listing Endpoint Tests
// ============================================================================

#[tokio::test]
async fn test_list_images_empty() {
    let (app, _state, _tmp) = create_test_app().await;

    let response = get(&app, "/api/images").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::json!([]));
}

#[tokio::test]
async fn test_list_images_in_upload_order() {
    let (app, _state, _tmp) = create_test_app().await;

    let titles = ["first", "second", "third"];
    for title in titles {
        let response = upload_file(&app, "image", "x.png", b"bytes", &[("title", title)]).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let json = body_json(get(&app, "/api/images").await).await;
    let records = json.as_array().unwrap();

    assert_eq!(records.len(), 3);
    for (pos, (record, title)) in records.iter().zip(titles).enumerate() {
        assert_eq!(record["id"], pos as u64 + 1);
        assert_eq!(record["title"], title);
    }
}

#[tokio::test]
async fn test_upload_id_matches_listing_length() {
    let (app, _state, _tmp) = create_test_app().await;

    for _ in 0..4 {
        let uploaded = body_json(upload_file(&app, "image", "a.png", b"a", &[]).await).await;
        let listed = body_json(get(&app, "/api/images").await).await;
        assert_eq!(
            uploaded["image"]["id"].as_u64().unwrap(),
            listed.as_array().unwrap().len() as u64
        );
    }
}

// ============================================================================
// Static File Tests
// ============================================================================

#[tokio::test]
async fn test_uploaded_file_served_from_url_path() {
    let (app, _state, _tmp) = create_test_app().await;
    let content = b"<svg xmlns=\"http://www.w3.org/2000/svg\"/>";

    let json = body_json(upload_file(&app, "image", "logo.svg", content, &[]).await).await;
    let url = json["image"]["url"].as_str().unwrap();
    let path = url.strip_prefix(BASE_URL).unwrap();

    let response = get(&app, path).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "image/svg+xml"
    );
    assert_eq!(body_bytes(response).await, content);
}

#[tokio::test]
async fn test_uploaded_file_served_from_images_alias() {
    let (app, _state, _tmp) = create_test_app().await;

    let json = body_json(upload_file(&app, "image", "a.png", b"alias bytes", &[]).await).await;
    let name = json["image"]["name"].as_str().unwrap();

    let response = get(&app, &format!("/images/{}", name)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"alias bytes");
}

#[tokio::test]
async fn test_unknown_file_is_not_found() {
    let (app, _state, _tmp) = create_test_app().await;

    assert_eq!(
        get(&app, "/uploads/image-0-0.png").await.status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        get(&app, "/images/never-uploaded.jpg").await.status(),
        StatusCode::NOT_FOUND
    );
}

// ============================================================================
// Health, Readiness & OpenAPI Tests
// ============================================================================

#[tokio::test]
async fn test_health_reports_image_count() {
    let (app, _state, _tmp) = create_test_app().await;
    upload_file(&app, "image", "a.png", b"a", &[]).await;

    let response = get(&app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["images"], 1);
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_ready_tracks_upload_directory() {
    let (app, _state, tmp) = create_test_app().await;

    assert_eq!(get(&app, "/ready").await.status(), StatusCode::OK);

    std::fs::remove_dir_all(tmp.path()).unwrap();
    let response = get(&app, "/ready").await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["ready"], false);
}

#[tokio::test]
async fn test_openapi_spec_endpoint() {
    let (app, _state, _tmp) = create_test_app().await;

    let response = get(&app, "/api-docs/openapi.json").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    assert!(json["openapi"].as_str().unwrap().starts_with("3."));
    assert!(json["paths"]["/upload"].is_object());
    assert!(json["paths"]["/api/images"].is_object());
    assert!(json["paths"]["/health"].is_object());
    assert!(json["components"]["schemas"]["ImageRecord"].is_object());
}

// ============================================================================
// CORS Tests
// ============================================================================

#[tokio::test]
async fn test_cors_allows_configured_origin() {
    let (app, _state, _tmp) = create_test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/upload")
                .header("Origin", "http://localhost:3000")
                .header("Access-Control-Request-Method", "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "http://localhost:3000"
    );
}

#[tokio::test]
async fn test_cors_ignores_other_origins() {
    let (app, _state, _tmp) = create_test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/images")
                .header("Origin", "http://evil.test")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response
        .headers()
        .get("access-control-allow-origin")
        .is_none());
}

#[tokio::test]
async fn test_cors_empty_origin_list_stays_restricted() {
    let tmp = tempfile::tempdir().unwrap();
    let store = UploadStore::open(tmp.path()).await.unwrap();
    let config = Config {
        allowed_origins: Some(vec![]),
        ..Config::default()
    };
    let app = create_router_with_config(&config, AppState::new(store, BASE_URL));

    let other = get_with_origin(&app, "http://evil.test").await;
    assert!(other.headers().get("access-control-allow-origin").is_none());

    let default = get_with_origin(&app, "http://localhost:3000").await;
    assert_eq!(
        default.headers()["access-control-allow-origin"],
        "http://localhost:3000"
    );
}

async fn get_with_origin(app: &Router, origin: &str) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .uri("/api/images")
                .header("Origin", origin)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}
