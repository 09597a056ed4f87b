//! Functional tests for the HTTP API

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use cover_art_studio::api::create_router;
use cover_art_studio::backend::{GenerateRequest, GenerateResponse, ImageBackend, ImagePayload};
use cover_art_studio::generation::{GenerationClient, RetryPolicy};
use cover_art_studio::storage::{KeyValueStore, MemoryStore};
use cover_art_studio::{AppError, AppState, Result};

/// Always answers with the same tiny JPEG payload
struct StaticBackend;

#[async_trait]
impl ImageBackend for StaticBackend {
    fn name(&self) -> &str {
        "static"
    }

    async fn generate(&self, _request: GenerateRequest) -> Result<GenerateResponse> {
        Ok(GenerateResponse {
            images: vec![ImagePayload {
                b64_data: "SGVsbG8=".to_string(),
                mime_type: "image/jpeg".to_string(),
            }],
        })
    }
}

/// Rejects every prompt on content grounds
struct BlockingBackend;

#[async_trait]
impl ImageBackend for BlockingBackend {
    fn name(&self) -> &str {
        "blocking"
    }

    async fn generate(&self, _request: GenerateRequest) -> Result<GenerateResponse> {
        Err(AppError::ContentPolicyViolation)
    }
}

fn state_with(backend: Arc<dyn ImageBackend>) -> Arc<AppState> {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let generator = GenerationClient::new(backend, RetryPolicy::none());
    Arc::new(AppState::new(generator, store))
}

fn app(state: Arc<AppState>) -> Router {
    create_router(state)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health() {
    let state = state_with(Arc::new(StaticBackend));
    let (status, body) = send(app(state), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_catalog_endpoints() {
    let state = state_with(Arc::new(StaticBackend));

    let (status, body) = send(app(state.clone()), get("/v1/styles")).await;
    assert_eq!(status, StatusCode::OK);
    let styles: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(styles.as_array().unwrap().len(), 8);

    let (_, body) = send(app(state), get("/v1/aspect-ratios")).await;
    let ratios: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(ratios[0]["value"], "16:9");
}

#[tokio::test]
async fn test_create_cover_records_history_and_preferences() {
    let state = state_with(Arc::new(StaticBackend));

    let (status, body) = send(
        app(state.clone()),
        json_request(
            "POST",
            "/v1/covers",
            json!({ "title": "Async Rust", "aspectRatio": "1:1", "style": "retro" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let image: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(image["title"], "Async Rust");
    assert_eq!(image["imageUrl"], "data:image/jpeg;base64,SGVsbG8=");
    assert_eq!(image["styleName"], "Retro");

    assert_eq!(state.history.len(), 1);
    let prefs = state.preferences.snapshot();
    assert_eq!(prefs.aspect_ratio.as_str(), "1:1");
    assert_eq!(prefs.style.id, "retro");

    let id = image["id"].as_str().unwrap();
    let uri = format!("/v1/history/{}", id);
    let (status, body) = send(app(state.clone()), get(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    let selected: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(selected["id"], id);
}

#[tokio::test]
async fn test_create_cover_uses_saved_preferences() {
    let state = state_with(Arc::new(StaticBackend));

    let (status, _) = send(
        app(state.clone()),
        json_request(
            "PUT",
            "/v1/preferences",
            json!({ "aspectRatio": "9:16", "style": "dark" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(app(state.clone()), get("/v1/preferences")).await;
    let prefs: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(prefs["aspectRatio"], "9:16");
    assert_eq!(prefs["style"]["id"], "dark");

    let (_, body) = send(
        app(state),
        json_request("POST", "/v1/covers", json!({ "title": "Night Mode" })),
    )
    .await;
    let image: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(image["aspectRatio"], "9:16");
    assert_eq!(image["styleName"], "Dark & Moody");
}

#[tokio::test]
async fn test_blank_title_is_rejected() {
    let state = state_with(Arc::new(StaticBackend));
    let (status, _) = send(
        app(state.clone()),
        json_request("POST", "/v1/covers", json!({ "title": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(state.history.is_empty());
}

#[tokio::test]
async fn test_unknown_aspect_ratio_is_rejected() {
    let (status, _) = send(
        app(state_with(Arc::new(StaticBackend))),
        json_request("POST", "/v1/covers", json!({ "title": "t", "aspectRatio": "2:1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_content_policy_error_surfaces_message() {
    let state = state_with(Arc::new(BlockingBackend));
    let (status, body) = send(
        app(state.clone()),
        json_request("POST", "/v1/covers", json!({ "title": "Forbidden" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["error"]["code"], "content_policy_violation");
    assert!(state.history.is_empty());
}

#[tokio::test]
async fn test_second_generation_while_in_flight_is_refused() {
    let state = state_with(Arc::new(StaticBackend));
    let _in_flight = state.generation_slot.clone().try_acquire_owned().unwrap();

    let (status, body) = send(
        app(state.clone()),
        json_request("POST", "/v1/covers", json!({ "title": "Too Eager" })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["error"]["code"], "generation_in_progress");
}

#[tokio::test]
async fn test_clear_requires_confirmation() {
    let state = state_with(Arc::new(StaticBackend));
    send(
        app(state.clone()),
        json_request("POST", "/v1/covers", json!({ "title": "Keep Me" })),
    )
    .await;

    let unconfirmed = Request::builder()
        .method("DELETE")
        .uri("/v1/history")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(app(state.clone()), unconfirmed).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(state.history.len(), 1);

    let confirmed = Request::builder()
        .method("DELETE")
        .uri("/v1/history?confirm=true")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(app(state.clone()), confirmed).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(app(state), get("/v1/history")).await;
    let list: Value = serde_json::from_slice(&body).unwrap();
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_download_sets_filename_and_type() {
    let state = state_with(Arc::new(StaticBackend));
    let (_, body) = send(
        app(state.clone()),
        json_request("POST", "/v1/covers", json!({ "title": "Hello World" })),
    )
    .await;
    let image: Value = serde_json::from_slice(&body).unwrap();
    let id = image["id"].as_str().unwrap().to_string();

    let response = app(state)
        .oneshot(get(&format!("/v1/history/{}/download", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/jpeg");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        format!("attachment; filename=\"hello_world_{}.jpeg\"", id).as_str()
    );

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(bytes.as_ref(), b"Hello");
}

#[tokio::test]
async fn test_unknown_history_entry_is_404() {
    let (status, _) = send(
        app(state_with(Arc::new(StaticBackend))),
        get("/v1/history/does-not-exist"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

async fn create_cover(state: &Arc<AppState>, title: &str) -> String {
    let (_, body) = send(
        app(state.clone()),
        json_request("POST", "/v1/covers", json!({ "title": title })),
    )
    .await;
    let image: Value = serde_json::from_slice(&body).unwrap();
    image["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_cover_download_uses_fixed_suffix() {
    let state = state_with(Arc::new(StaticBackend));
    let id = create_cover(&state, "Hello World").await;

    let response = app(state)
        .oneshot(get(&format!("/v1/history/{}/download?name=cover", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"hello_world_cover_art.jpeg\""
    );
}

#[tokio::test]
async fn test_clipboard_returns_bytes_and_mime() {
    let state = state_with(Arc::new(StaticBackend));
    let id = create_cover(&state, "Clip").await;

    let response = app(state)
        .oneshot(get(&format!("/v1/history/{}/clipboard", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/jpeg");
    assert!(response.headers().get(header::CONTENT_DISPOSITION).is_none());

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(bytes.as_ref(), b"Hello");
}

#[tokio::test]
async fn test_share_payload_and_outcome() {
    let state = state_with(Arc::new(StaticBackend));
    let id = create_cover(&state, "Launch Day").await;
    let uri = format!("/v1/history/{}/share", id);

    let (status, body) = send(app(state.clone()), get(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    let share: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(share["title"], "Launch Day");
    assert_eq!(share["text"], "Cover art for \"Launch Day\"");
    assert_eq!(share["filename"], "launch_day_cover_art.jpeg");
    assert_eq!(share["mimeType"], "image/jpeg");

    for outcome in ["shared", "cancelled"] {
        let (status, _) = send(
            app(state.clone()),
            json_request("POST", &uri, json!({ "outcome": outcome })),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    let (status, _) = send(
        app(state),
        json_request("POST", "/v1/history/missing/share", json!({ "outcome": "shared" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
