//! Functional tests for the generation client against a mocked Imagen endpoint

use std::time::Duration;

use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cover_art_studio::config::GenerationConfig;
use cover_art_studio::generation::{GenerationClient, GenerationRequest};
use cover_art_studio::AppError;

const PREDICT_PATH: &str = "/v1beta/models/imagen-test:predict";

fn config(server: &MockServer) -> GenerationConfig {
    GenerationConfig {
        api_key: Some("test-key".to_string()),
        endpoint: format!("{}/v1beta", server.uri()),
        model: "imagen-test".to_string(),
        timeout_ms: 5_000,
        max_retries: 2,
        base_delay_ms: 10,
    }
}

fn request() -> GenerationRequest {
    GenerationRequest::from_ids("Shipping Rust at Scale", "21:9", "photorealistic").unwrap()
}

fn image_body() -> Value {
    json!({
        "predictions": [
            { "bytesBase64Encoded": "SGVsbG8=", "mimeType": "image/jpeg" }
        ]
    })
}

fn error_body(code: u16, message: &str, status: &str) -> Value {
    json!({ "error": { "code": code, "message": message, "status": status } })
}

async fn call_count(server: &MockServer) -> usize {
    server.received_requests().await.map(|r| r.len()).unwrap_or(0)
}

#[tokio::test]
async fn test_success_returns_data_uri() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PREDICT_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(image_body()))
        .mount(&server)
        .await;

    let client = GenerationClient::from_config(&config(&server)).unwrap();
    let uri = client.generate(&request()).await.unwrap();

    assert_eq!(uri, "data:image/jpeg;base64,SGVsbG8=");
    assert_eq!(call_count(&server).await, 1);
}

#[tokio::test]
async fn test_request_body_carries_prompt_and_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PREDICT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(image_body()))
        .mount(&server)
        .await;

    let client = GenerationClient::from_config(&config(&server)).unwrap();
    client.generate(&request()).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: Value = requests[0].body_json().unwrap();
    let prompt = body["instances"][0]["prompt"].as_str().unwrap();

    assert!(prompt.contains("\"Shipping Rust at Scale\""));
    assert!(prompt.contains("21:9"));
    assert!(prompt.contains("Do not include any text"));
    assert_eq!(body["parameters"]["sampleCount"], 1);
    assert_eq!(body["parameters"]["aspectRatio"], "21:9");
    assert_eq!(body["parameters"]["outputOptions"]["mimeType"], "image/jpeg");
}

#[tokio::test]
async fn test_recovers_after_two_transient_failures() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PREDICT_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_json(error_body(
            503,
            "network timeout",
            "UNAVAILABLE",
        )))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(PREDICT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(image_body()))
        .mount(&server)
        .await;

    let client = GenerationClient::from_config(&config(&server)).unwrap();
    let uri = client.generate(&request()).await.unwrap();

    assert!(uri.starts_with("data:image/jpeg;base64,"));
    assert_eq!(call_count(&server).await, 3);
}

#[tokio::test]
async fn test_exhaustion_surfaces_last_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PREDICT_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_json(error_body(
            500,
            "Internal error encountered.",
            "INTERNAL",
        )))
        .mount(&server)
        .await;

    let client = GenerationClient::from_config(&config(&server)).unwrap();
    let err = client.generate(&request()).await.unwrap_err();

    assert!(matches!(err, AppError::Transient(_)));
    assert_eq!(err.to_string(), "Internal error encountered.");
    assert_eq!(call_count(&server).await, 3);
}

#[tokio::test]
async fn test_invalid_key_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PREDICT_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(error_body(
            400,
            "API key not valid. Please pass a valid API key.",
            "INVALID_ARGUMENT",
        )))
        .mount(&server)
        .await;

    let client = GenerationClient::from_config(&config(&server)).unwrap();
    let err = client.generate(&request()).await.unwrap_err();

    assert!(matches!(err, AppError::InvalidCredential));
    assert_eq!(call_count(&server).await, 1);
}

#[tokio::test]
async fn test_safety_block_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PREDICT_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(error_body(
            400,
            "The prompt could not be submitted. It was blocked by our safety filters.",
            "INVALID_ARGUMENT",
        )))
        .mount(&server)
        .await;

    let client = GenerationClient::from_config(&config(&server)).unwrap();
    let err = client.generate(&request()).await.unwrap_err();

    assert!(matches!(err, AppError::ContentPolicyViolation));
    assert_eq!(call_count(&server).await, 1);
}

#[tokio::test]
async fn test_filtered_predictions_are_content_policy() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PREDICT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "predictions": [ { "raiFilteredReason": "Your current safety filter threshold prohibited one or more images." } ]
        })))
        .mount(&server)
        .await;

    let client = GenerationClient::from_config(&config(&server)).unwrap();
    let err = client.generate(&request()).await.unwrap_err();

    assert!(matches!(err, AppError::ContentPolicyViolation));
    assert_eq!(call_count(&server).await, 1);
}

#[tokio::test]
async fn test_empty_predictions_are_terminal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PREDICT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = GenerationClient::from_config(&config(&server)).unwrap();
    let err = client.generate(&request()).await.unwrap_err();

    assert!(matches!(err, AppError::EmptyResult));
    assert_eq!(call_count(&server).await, 1);
}

#[tokio::test]
async fn test_connection_failure_is_retried() {
    let config = GenerationConfig {
        api_key: Some("test-key".to_string()),
        endpoint: "http://127.0.0.1:1/v1beta".to_string(),
        model: "imagen-test".to_string(),
        timeout_ms: 2_000,
        max_retries: 2,
        base_delay_ms: 10,
    };

    let client = GenerationClient::from_config(&config).unwrap();
    let started = std::time::Instant::now();
    let err = client.generate(&request()).await.unwrap_err();

    assert!(err.is_retryable());
    // Two backoff sleeps: 10ms + 20ms
    assert!(started.elapsed() >= Duration::from_millis(30));
}
