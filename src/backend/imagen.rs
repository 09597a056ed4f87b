//! HTTP client for the Imagen `predict` endpoint

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::backend::traits::{GenerateRequest, GenerateResponse, ImageBackend, ImagePayload};
use crate::config::GenerationConfig;
use crate::error::{AppError, Result};
use crate::generation::classify_failure;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Imagen backend reached over the Generative Language REST API
pub struct ImagenBackend {
    name: String,
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct PredictRequest {
    instances: Vec<PredictInstance>,
    parameters: PredictParameters,
}

#[derive(Debug, Serialize)]
struct PredictInstance {
    prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictParameters {
    sample_count: u32,
    aspect_ratio: String,
    output_options: OutputOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OutputOptions {
    mime_type: String,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    #[serde(default)]
    bytes_base64_encoded: Option<String>,
    #[serde(default)]
    mime_type: Option<String>,
    #[serde(default)]
    rai_filtered_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

impl ImagenBackend {
    /// Create a backend from configuration and a resolved API key
    pub fn new(config: &GenerationConfig, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            name: format!("imagen:{}", config.model),
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: api_key.into(),
        })
    }

    fn predict_url(&self) -> String {
        format!("{}/models/{}:predict", self.endpoint, self.model)
    }
}

/// Pull the human-readable message out of an upstream error body
fn upstream_message(body: &str) -> Option<String> {
    let envelope: ApiErrorEnvelope = serde_json::from_str(body).ok()?;
    let ApiErrorBody { message, status } = envelope.error;
    match (message.is_empty(), status) {
        (false, _) => Some(message),
        (true, Some(status)) => Some(status),
        (true, None) => None,
    }
}

#[async_trait]
impl ImageBackend for ImagenBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        let url = self.predict_url();
        debug!(
            backend = %self.name,
            url = %url,
            aspect_ratio = %request.aspect_ratio,
            "Sending predict request"
        );

        let body = PredictRequest {
            instances: vec![PredictInstance {
                prompt: request.prompt,
            }],
            parameters: PredictParameters {
                sample_count: request.sample_count,
                aspect_ratio: request.aspect_ratio,
                output_options: OutputOptions {
                    mime_type: request.mime_type.clone(),
                },
            },
        };

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!(backend = %self.name, error = %e, "Image service request failed");
                if e.is_timeout() {
                    AppError::Transient(format!("The image service timed out: {}", e))
                } else {
                    AppError::Transient(format!("Connection to the image service failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = upstream_message(&body)
                .unwrap_or_else(|| format!("Image service returned {}", status));
            debug!(
                backend = %self.name,
                status = %status,
                message = %message,
                "Image service rejected request"
            );
            return Err(classify_failure(Some(status.as_u16()), &message));
        }

        let parsed: PredictResponse = response.json().await.map_err(|e| {
            AppError::Transient(format!("Failed to parse image service response: {}", e))
        })?;

        let mut filtered_reason = None;
        let mut images = Vec::with_capacity(parsed.predictions.len());
        for prediction in parsed.predictions {
            match prediction.bytes_base64_encoded {
                Some(b64_data) if !b64_data.is_empty() => images.push(ImagePayload {
                    b64_data,
                    mime_type: prediction
                        .mime_type
                        .unwrap_or_else(|| request.mime_type.clone()),
                }),
                _ => filtered_reason = filtered_reason.or(prediction.rai_filtered_reason),
            }
        }

        // Every sample withheld by the safety filter
        if images.is_empty() {
            if let Some(reason) = filtered_reason {
                debug!(backend = %self.name, reason = %reason, "All images filtered");
                return Err(AppError::ContentPolicyViolation);
            }
        }

        Ok(GenerateResponse { images })
    }
}
