//! Common traits and types for image generation backends

use async_trait::async_trait;

use crate::catalog::AspectRatio;
use crate::error::Result;

pub const JPEG_MIME: &str = "image/jpeg";

/// Request to generate images
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    /// The full prompt sent upstream
    pub prompt: String,

    /// Number of images to generate
    pub sample_count: u32,

    /// Requested output encoding
    pub mime_type: String,

    /// Wire aspect ratio, e.g. "16:9"
    pub aspect_ratio: String,
}

impl GenerateRequest {
    /// One JPEG image in the given shape
    pub fn cover(prompt: impl Into<String>, aspect_ratio: AspectRatio) -> Self {
        Self {
            prompt: prompt.into(),
            sample_count: 1,
            mime_type: JPEG_MIME.to_string(),
            aspect_ratio: aspect_ratio.as_str().to_string(),
        }
    }
}

/// One generated image as returned upstream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    /// Base64 encoded image bytes
    pub b64_data: String,
    pub mime_type: String,
}

/// Response from image generation
#[derive(Debug, Clone, Default)]
pub struct GenerateResponse {
    pub images: Vec<ImagePayload>,
}

/// Trait for image generation backends
#[async_trait]
pub trait ImageBackend: Send + Sync {
    /// Get the backend name
    fn name(&self) -> &str;

    /// Run one generation attempt; failures are already classified
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse>;
}
