//! Generation client: prompt, call, classify, retry

use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::backend::{GenerateRequest, ImageBackend, ImagenBackend};
use crate::config::GenerationConfig;
use crate::error::{AppError, Result, SERVICE_UNAVAILABLE_MESSAGE};
use crate::generation::{build_prompt, GenerationRequest, RetryPolicy};
use crate::history::GeneratedImage;
use crate::response::base64;

/// Turns a validated request into a displayable image URI
///
/// Holds no mutable state. Callers that need single-flight behaviour
/// must enforce it themselves.
pub struct GenerationClient {
    backend: Arc<dyn ImageBackend>,
    policy: RetryPolicy,
}

impl GenerationClient {
    pub fn new(backend: Arc<dyn ImageBackend>, policy: RetryPolicy) -> Self {
        Self { backend, policy }
    }

    /// Build the Imagen-backed client; fails fast when no key is configured
    pub fn from_config(config: &GenerationConfig) -> Result<Self> {
        Self::from_parts(config, config.resolve_api_key())
    }

    /// Build from an already resolved key; `None` is `MissingCredential`
    pub fn from_parts(config: &GenerationConfig, api_key: Option<String>) -> Result<Self> {
        let api_key = api_key.ok_or(AppError::MissingCredential)?;
        let backend = ImagenBackend::new(config, api_key)?;
        Ok(Self::new(Arc::new(backend), config.retry_policy()))
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Generate one image and return it as a data URI
    pub async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let prompt = build_prompt(request);
        let backend_request = GenerateRequest::cover(prompt, request.aspect_ratio);
        let max_attempts = self.policy.max_attempts();
        let mut last_error: Option<AppError> = None;

        for attempt in 1..=max_attempts {
            if attempt > 1 {
                let delay = self.policy.delay_for(attempt - 1);
                warn!(
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    "Retrying image generation"
                );
                tokio::time::sleep(delay).await;
            }

            debug!(
                backend = %self.backend.name(),
                attempt,
                title = %request.title,
                "Requesting cover art"
            );

            match self.attempt(backend_request.clone()).await {
                Ok(image_url) => {
                    info!(
                        backend = %self.backend.name(),
                        attempt,
                        style = %request.style.id,
                        aspect_ratio = %request.aspect_ratio,
                        "Cover art generated"
                    );
                    return Ok(image_url);
                }
                Err(e) if e.is_retryable() => {
                    warn!(attempt, max_attempts, error = %e, "Transient generation failure");
                    last_error = Some(e);
                }
                Err(e) => {
                    error!(attempt, error = %e, "Generation failed");
                    return Err(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| AppError::Transient(SERVICE_UNAVAILABLE_MESSAGE.to_string())))
    }

    /// Generate and wrap the result as a history entry
    pub async fn generate_image(&self, request: &GenerationRequest) -> Result<GeneratedImage> {
        let image_url = self.generate(request).await?;
        Ok(GeneratedImage::new(request, image_url))
    }

    async fn attempt(&self, request: GenerateRequest) -> Result<String> {
        let response = self.backend.generate(request).await?;
        let image = response.images.into_iter().next().ok_or(AppError::EmptyResult)?;
        base64::to_data_uri(&image.b64_data, &image.mime_type)
            .map_err(|_| {
                AppError::Transient("The image service returned a malformed image".to_string())
            })
    }
}
