use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use kakomon_portal::config::PortalConfig;
use kakomon_portal::services::storage::LocalStorageService;
use kakomon_portal::{AppState, create_app};
use serde_json::{Value, json};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "---------------------------kakomon123456789";

fn setup() -> (TempDir, PortalConfig, Router) {
    let dir = tempfile::tempdir().unwrap();
    let config = PortalConfig::development(dir.path());
    let storage = Arc::new(LocalStorageService::new(&config.upload_dir));
    let app = create_app(AppState::new(storage, config.clone()));
    (dir, config, app)
}

/// Builds a multipart body from `(field name, filename, content)` parts.
fn multipart_body(parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, filename, content) in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match filename {
            Some(filename) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n",
                    name, filename
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
            ),
        }
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn upload_request(parts: &[(&str, Option<&str>, &[u8])]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, body) = send(app, request).await;
    let json = serde_json::from_slice(&body).unwrap_or_else(|e| {
        panic!("invalid JSON ({}): {}", e, String::from_utf8_lossy(&body))
    });
    (status, json)
}

async fn upload(app: &Router, filename: &str, content: &[u8]) -> Value {
    let (status, json) = send_json(app, upload_request(&[("file", Some(filename), content)])).await;
    assert_eq!(status, StatusCode::OK);
    json
}

async fn list(app: &Router) -> Vec<Value> {
    let request = Request::builder()
        .uri("/api/files")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send_json(app, request).await;
    assert_eq!(status, StatusCode::OK);
    json.as_array().cloned().expect("listing must be a JSON array")
}

#[tokio::test]
async fn test_empty_storage_lists_nothing() {
    let (_dir, config, app) = setup();
    assert!(!config.upload_dir.exists());
    assert!(list(&app).await.is_empty());

    std::fs::create_dir_all(&config.upload_dir).unwrap();
    assert!(list(&app).await.is_empty());
}

#[tokio::test]
async fn test_upload_sanitizes_name_and_appears_in_listing() {
    let (_dir, config, app) = setup();
    let content = b"%PDF-1.5 past exam";

    let json = upload(&app, "exam report (final).pdf", content).await;
    assert_eq!(
        json,
        json!({
            "success": true,
            "message": "File uploaded successfully",
            "file": "examreportfinal.pdf"
        })
    );
    assert_eq!(
        std::fs::read(config.upload_dir.join("examreportfinal.pdf")).unwrap(),
        content
    );

    let files = list(&app).await;
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["name"], "examreportfinal.pdf");
    assert_eq!(files[0]["size"], content.len());
    let date = files[0]["date"].as_str().unwrap();
    assert_eq!(date.len(), "YYYY-MM-DD HH:MM".len());
    assert_eq!(files[0].as_object().unwrap().len(), 3);
}

#[tokio::test]
async fn test_duplicate_upload_gets_timestamped_name() {
    let (_dir, config, app) = setup();

    let first = upload(&app, "notes.txt", b"first version").await;
    let second = upload(&app, "notes.txt", b"second version").await;

    assert_eq!(first["file"], "notes.txt");
    let second_name = second["file"].as_str().unwrap();
    let timestamp = second_name
        .strip_prefix("notes_")
        .and_then(|rest| rest.strip_suffix(".txt"))
        .expect("expected notes_<unixtime>.txt");
    assert!(timestamp.parse::<i64>().unwrap() > 1_700_000_000);

    assert_eq!(
        std::fs::read(config.upload_dir.join("notes.txt")).unwrap(),
        b"first version"
    );
    assert_eq!(
        std::fs::read(config.upload_dir.join(second_name)).unwrap(),
        b"second version"
    );

    let mut names: Vec<_> = list(&app)
        .await
        .iter()
        .map(|f| f["name"].as_str().unwrap().to_string())
        .collect();
    names.sort();
    assert_eq!(names, vec!["notes.txt".to_string(), second_name.to_string()]);
}

#[tokio::test]
async fn test_missing_file_field() {
    let (_dir, config, app) = setup();

    let (status, json) =
        send_json(&app, upload_request(&[("tags", None, b"math,2024")])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"success": false, "message": "No file uploaded"}));

    // A text field that happens to be called `file` is not a file either.
    let (_, json) = send_json(&app, upload_request(&[("file", None, b"hello")])).await;
    assert_eq!(json["message"], "No file uploaded");

    assert!(!config.upload_dir.exists());
}

#[tokio::test]
async fn test_non_multipart_post_is_no_file() {
    let (_dir, _config, app) = setup();
    let request = Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header("Content-Type", "application/json")
        .body(Body::from(r#"{"file": "nope"}"#))
        .unwrap();

    let (status, json) = send_json(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"success": false, "message": "No file uploaded"}));
}

#[tokio::test]
async fn test_wrong_method_on_upload() {
    let (_dir, _config, app) = setup();
    let request = Request::builder()
        .method("GET")
        .uri("/api/upload")
        .body(Body::empty())
        .unwrap();

    let (status, json) = send_json(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({"success": false, "message": "Invalid request method"})
    );
}

#[tokio::test]
async fn test_oversized_upload_is_a_transfer_error() {
    let (_dir, config, app) = setup();
    let content = vec![b'x'; config.max_file_size * 2];

    let json = upload(&app, "huge.bin", &content).await;
    assert_eq!(
        json,
        json!({"success": false, "message": "Upload error code: 1"})
    );
    assert!(list(&app).await.is_empty());
}

#[tokio::test]
async fn test_truncated_upload_is_a_partial_transfer() {
    let (_dir, _config, app) = setup();

    // The body stops mid-file, before the closing boundary.
    let mut body = format!(
        "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"cut.pdf\"\r\n\
         Content-Type: application/pdf\r\n\r\n",
        BOUNDARY
    )
    .into_bytes();
    body.extend_from_slice(b"%PDF-1.5 only the first half");

    let request = Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap();

    let (status, json) = send_json(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({"success": false, "message": "Upload error code: 3"})
    );
    assert!(list(&app).await.is_empty());
}

#[tokio::test]
async fn test_unusable_filename_is_rejected() {
    let (_dir, config, app) = setup();

    let json = upload(&app, "(((  )))", b"data").await;
    assert_eq!(json, json!({"success": false, "message": "Invalid filename"}));
    assert!(!config.upload_dir.exists());
}

#[tokio::test]
async fn test_path_traversal_stays_in_storage() {
    let (dir, config, app) = setup();

    let json = upload(&app, "../../escape.txt", b"contained").await;
    assert_eq!(json["file"], "escape.txt");
    assert!(config.upload_dir.join("escape.txt").is_file());
    assert!(!dir.path().join("escape.txt").exists());
}

#[tokio::test]
async fn test_listing_survives_external_directory_removal() {
    let (_dir, config, app) = setup();
    upload(&app, "gone.pdf", b"soon deleted").await;
    assert_eq!(list(&app).await.len(), 1);

    std::fs::remove_dir_all(&config.upload_dir).unwrap();
    assert!(list(&app).await.is_empty());

    // The next upload recreates the directory.
    let json = upload(&app, "back.pdf", b"again").await;
    assert_eq!(json["success"], true);
    assert_eq!(list(&app).await.len(), 1);
}

#[tokio::test]
async fn test_uploaded_file_is_downloadable() {
    let (_dir, _config, app) = setup();
    upload(&app, "answers.txt", b"42").await;

    let request = Request::builder()
        .uri("/uploads/answers.txt")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"42");
}

#[tokio::test]
async fn test_index_page_language_and_search() {
    let (_dir, _config, app) = setup();
    upload(&app, "math_2023.pdf", b"m").await;
    upload(&app, "physics_2023.pdf", b"p").await;

    let request = Request::builder()
        .uri("/?q=MATH")
        .header("Accept-Language", "ja-JP,ja;q=0.9,en;q=0.8")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    let html = String::from_utf8(body).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<html lang=\"ja\">"));
    assert!(html.contains("math_2023.pdf"));
    assert!(!html.contains("physics_2023.pdf"));

    let request = Request::builder()
        .uri("/?lang=en&q=chemistry")
        .header("Accept-Language", "ja")
        .body(Body::empty())
        .unwrap();
    let (_, body) = send(&app, request).await;
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("<html lang=\"en\">"));
    assert!(html.contains("No files found"));
}

#[tokio::test]
async fn test_translation_tables() {
    let (_dir, _config, app) = setup();

    let request = Request::builder()
        .uri("/api/i18n/ja")
        .body(Body::empty())
        .unwrap();
    let (_, json) = send_json(&app, request).await;
    assert_eq!(json["language"], "ja");
    assert_eq!(json["strings"]["no_files"], "ファイルが見つかりません");

    let request = Request::builder()
        .uri("/api/i18n/xx")
        .body(Body::empty())
        .unwrap();
    let (_, json) = send_json(&app, request).await;
    assert_eq!(json["language"], "en");
    assert_eq!(json["strings"]["load_failed"], "Failed to load files");

    let request = Request::builder()
        .uri("/api/i18n")
        .body(Body::empty())
        .unwrap();
    let (_, json) = send_json(&app, request).await;
    assert_eq!(json.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_health_and_request_id() {
    let (_dir, _config, app) = setup();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "req-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-request-id"], "req-123");
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["storage"], "available");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}
