//! Annotation backend pass-through tests against a mock backend.
//!
//! Run with: `cargo test -p vidreview-api --test proxy_test`

mod helpers;

use axum::http::header;
use helpers::{setup_local_app, setup_local_app_with_backend};
use mockito::Matcher;
use serde_json::json;

#[tokio::test]
async fn test_add_annotation_relays_status_and_body() {
    let mut backend = mockito::Server::new_async().await;
    let mock = backend
        .mock("POST", "/add_annot")
        .match_body(Matcher::Json(json!({ "video": "a.mp4", "label": "ok" })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"saved":true}"#)
        .create_async()
        .await;
    let app = setup_local_app_with_backend(&backend.url(), &[]).await;

    let response = app
        .client()
        .post("/api/add_annot")
        .json(&json!({ "video": "a.mp4", "label": "ok" }))
        .await;

    assert_eq!(response.status_code(), 201);
    assert_eq!(response.json::<serde_json::Value>(), json!({ "saved": true }));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_add_annotation_relays_backend_errors() {
    let mut backend = mockito::Server::new_async().await;
    backend
        .mock("POST", "/add_annot")
        .with_status(422)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":"missing label"}"#)
        .create_async()
        .await;
    let app = setup_local_app_with_backend(&backend.url(), &[]).await;

    let response = app
        .client()
        .post("/api/add_annot")
        .json(&json!({ "video": "a.mp4" }))
        .await;

    assert_eq!(response.status_code(), 422);
    assert_eq!(
        response.json::<serde_json::Value>(),
        json!({ "error": "missing label" })
    );
}

#[tokio::test]
async fn test_add_annotation_non_json_reply_is_500() {
    let mut backend = mockito::Server::new_async().await;
    backend
        .mock("POST", "/add_annot")
        .with_status(200)
        .with_body("<html>oops</html>")
        .create_async()
        .await;
    let app = setup_local_app_with_backend(&backend.url(), &[]).await;

    let response = app
        .client()
        .post("/api/add_annot")
        .json(&json!({}))
        .await;

    assert_eq!(response.status_code(), 500);
    assert_eq!(
        response.json::<serde_json::Value>(),
        json!({ "error": "Failed to add annotation" })
    );
}

#[tokio::test]
async fn test_invalid_json_body_is_400() {
    let app = setup_local_app(&[]).await;

    let response = app
        .client()
        .post("/api/check_user")
        .text("{not json")
        .content_type("application/json")
        .await;

    assert_eq!(response.status_code(), 400);
    let body = response.json::<serde_json::Value>();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid request body"));
}

#[tokio::test]
async fn test_json_body_is_forwarded_without_json_content_type() {
    let mut backend = mockito::Server::new_async().await;
    let mock = backend
        .mock("POST", "/batches/word/videos")
        .match_body(Matcher::Json(json!({ "word": "HELLO" })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[]"#)
        .create_async()
        .await;
    let app = setup_local_app_with_backend(&backend.url(), &[]).await;

    let response = app
        .client()
        .post("/api/batches/word/videos")
        .text(r#"{"word":"HELLO"}"#)
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<serde_json::Value>(), json!([]));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_check_user_success_and_failure() {
    let mut backend = mockito::Server::new_async().await;
    backend
        .mock("POST", "/check_user")
        .match_body(Matcher::Json(json!({ "username": "ana" })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"exists":true}"#)
        .create_async()
        .await;
    backend
        .mock("POST", "/check_user")
        .match_body(Matcher::Json(json!({ "username": "bob" })))
        .with_status(403)
        .with_body("forbidden")
        .create_async()
        .await;
    let app = setup_local_app_with_backend(&backend.url(), &[]).await;

    let ok = app
        .client()
        .post("/api/check_user")
        .json(&json!({ "username": "ana" }))
        .await;
    assert_eq!(ok.status_code(), 200);
    assert_eq!(ok.json::<serde_json::Value>(), json!({ "exists": true }));

    let denied = app
        .client()
        .post("/api/check_user")
        .json(&json!({ "username": "bob" }))
        .await;
    assert_eq!(denied.status_code(), 403);
    assert_eq!(
        denied.json::<serde_json::Value>(),
        json!({ "error": "Backend failed with 403" })
    );
}

#[tokio::test]
async fn test_unreachable_backend_is_500() {
    let app = setup_local_app(&[]).await;

    let response = app
        .client()
        .post("/api/check_user")
        .json(&json!({ "username": "ana" }))
        .await;

    assert_eq!(response.status_code(), 500);
    assert_eq!(
        response.json::<serde_json::Value>(),
        json!({ "error": "Failed to reach backend" })
    );
}

#[tokio::test]
async fn test_user_batches_adds_batch_list() {
    let mut backend = mockito::Server::new_async().await;
    let mock = backend
        .mock("GET", "/batches/ana")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"batch":"b1","done":2},{"batch":"b2","done":0}]"#)
        .create_async()
        .await;
    let app = setup_local_app_with_backend(&backend.url(), &[]).await;

    let response = app.client().get("/api/batches/ana").await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(
        response.json::<serde_json::Value>(),
        json!({
            "batches": [{ "batch": "b1", "done": 2 }, { "batch": "b2", "done": 0 }],
            "batchList": ["b1", "b2"]
        })
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn test_blank_username_is_rejected() {
    let app = setup_local_app(&[]).await;

    let response = app.client().get("/api/batches/%20").await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(
        response.json::<serde_json::Value>(),
        json!({ "error": "Username required" })
    );
}

#[tokio::test]
async fn test_user_batches_backend_status_is_forwarded() {
    let mut backend = mockito::Server::new_async().await;
    backend
        .mock("GET", "/batches/ghost")
        .with_status(404)
        .create_async()
        .await;
    let app = setup_local_app_with_backend(&backend.url(), &[]).await;

    let response = app.client().get("/api/batches/ghost").await;

    assert_eq!(response.status_code(), 404);
    assert_eq!(
        response.json::<serde_json::Value>(),
        json!({ "error": "Backend failed with 404" })
    );
}

#[tokio::test]
async fn test_word_videos_passes_through() {
    let mut backend = mockito::Server::new_async().await;
    backend
        .mock("POST", "/batches/word/videos")
        .match_body(Matcher::Json(json!({ "batch": "b1", "word": "HELLO" })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"videos":["1.mp4","2.mp4"]}"#)
        .create_async()
        .await;
    let app = setup_local_app_with_backend(&backend.url(), &[]).await;

    let response = app
        .client()
        .post("/api/batches/word/videos")
        .json(&json!({ "batch": "b1", "word": "HELLO" }))
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(
        response.json::<serde_json::Value>(),
        json!({ "videos": ["1.mp4", "2.mp4"] })
    );
}

#[tokio::test]
async fn test_word_video_streams_backend_bytes() {
    let mut backend = mockito::Server::new_async().await;
    backend
        .mock("POST", "/batches/word/video")
        .with_status(200)
        .with_header("content-type", "application/octet-stream")
        .with_body(b"\x00\x00\x00\x18ftypmp42".to_vec())
        .create_async()
        .await;
    let app = setup_local_app_with_backend(&backend.url(), &[]).await;

    let response = app
        .client()
        .post("/api/batches/word/video")
        .json(&json!({ "video": "1.mp4" }))
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "video/mp4"
    );
    assert_eq!(response.as_bytes().as_ref(), b"\x00\x00\x00\x18ftypmp42");
}

#[tokio::test]
async fn test_word_video_relays_backend_error() {
    let mut backend = mockito::Server::new_async().await;
    backend
        .mock("POST", "/batches/word/video")
        .match_body(Matcher::Json(json!({ "video": "1.mp4" })))
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":"no such video"}"#)
        .create_async()
        .await;
    backend
        .mock("POST", "/batches/word/video")
        .match_body(Matcher::Json(json!({ "video": "broken.mp4" })))
        .with_status(502)
        .with_body("Bad Gateway")
        .create_async()
        .await;
    let app = setup_local_app_with_backend(&backend.url(), &[]).await;

    let missing = app
        .client()
        .post("/api/batches/word/video")
        .json(&json!({ "video": "1.mp4" }))
        .await;
    assert_eq!(missing.status_code(), 404);
    assert_eq!(
        missing.json::<serde_json::Value>(),
        json!({ "error": "no such video" })
    );

    let broken = app
        .client()
        .post("/api/batches/word/video")
        .json(&json!({ "video": "broken.mp4" }))
        .await;
    assert_eq!(broken.status_code(), 502);
    assert_eq!(broken.json::<serde_json::Value>(), json!({}));
}
