//! Prompt construction from user inputs

use crate::catalog::{self, AspectRatio, StylePreset};
use crate::error::{AppError, Result};

/// Appended to every prompt; cover art is lettered separately
pub const NO_TEXT_INSTRUCTION: &str =
    "Do not include any text, letters, words or typography in the image.";

/// Validated inputs for one generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub title: String,
    pub aspect_ratio: AspectRatio,
    pub style: StylePreset,
}

impl GenerationRequest {
    pub fn new(
        title: impl Into<String>,
        aspect_ratio: AspectRatio,
        style: StylePreset,
    ) -> Result<Self> {
        let title = title.into().trim().to_string();
        if title.is_empty() {
            return Err(AppError::InvalidRequest("Title cannot be empty".to_string()));
        }

        if catalog::find_style(&style.id).is_none() {
            return Err(AppError::InvalidRequest(format!(
                "Unknown style preset: {}",
                style.id
            )));
        }

        Ok(Self {
            title,
            aspect_ratio,
            style,
        })
    }

    /// Build from raw wire values
    pub fn from_ids(title: impl Into<String>, aspect_ratio: &str, style_id: &str) -> Result<Self> {
        let aspect_ratio = aspect_ratio.parse::<AspectRatio>()?;
        let style = catalog::find_style(style_id).ok_or_else(|| {
            AppError::InvalidRequest(format!("Unknown style preset: {}", style_id))
        })?;
        Self::new(title, aspect_ratio, style)
    }
}

pub fn build_prompt(request: &GenerationRequest) -> String {
    format!(
        "{} Cover art for a YouTube video or podcast episode titled: \"{}\". Aspect ratio: {}. {}",
        request.style.prompt_fragment, request.title, request.aspect_ratio, NO_TEXT_INSTRUCTION
    )
}
