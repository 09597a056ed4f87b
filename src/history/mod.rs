//! Generated images and the bounded history that keeps them

pub mod store;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::generation::GenerationRequest;

pub use store::{HistoryStore, MAX_HISTORY};

/// A finished generation; never mutated after creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImage {
    pub id: String,
    pub title: String,
    /// Data URI or remote URL
    pub image_url: String,
    pub aspect_ratio: String,
    #[serde(alias = "style")]
    pub style_name: String,
    #[serde(alias = "timestamp")]
    pub timestamp_ms: i64,
}

impl GeneratedImage {
    pub fn new(request: &GenerationRequest, image_url: impl Into<String>) -> Self {
        let timestamp_ms = Utc::now().timestamp_millis();
        Self {
            id: new_image_id(timestamp_ms),
            title: request.title.clone(),
            image_url: image_url.into(),
            aspect_ratio: request.aspect_ratio.as_str().to_string(),
            style_name: request.style.name.clone(),
            timestamp_ms,
        }
    }
}

/// Time-ordered id: `<unix ms>-<8 hex chars>`
fn new_image_id(timestamp_ms: i64) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}", timestamp_ms, &suffix[..8])
}
