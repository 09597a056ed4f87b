//! Fixed catalog of aspect ratios and style presets

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// Supported output shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "9:16")]
    Portrait,
    #[serde(rename = "4:3")]
    Classic,
    #[serde(rename = "21:9")]
    Ultrawide,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 5] = [
        AspectRatio::Landscape,
        AspectRatio::Square,
        AspectRatio::Portrait,
        AspectRatio::Classic,
        AspectRatio::Ultrawide,
    ];

    /// Wire value, e.g. "16:9"
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Landscape => "16:9",
            AspectRatio::Square => "1:1",
            AspectRatio::Portrait => "9:16",
            AspectRatio::Classic => "4:3",
            AspectRatio::Ultrawide => "21:9",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AspectRatio::Landscape => "Landscape (16:9)",
            AspectRatio::Square => "Square (1:1)",
            AspectRatio::Portrait => "Portrait (9:16)",
            AspectRatio::Classic => "Classic (4:3)",
            AspectRatio::Ultrawide => "Ultrawide (21:9)",
        }
    }

    /// Width and height units
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            AspectRatio::Landscape => (16, 9),
            AspectRatio::Square => (1, 1),
            AspectRatio::Portrait => (9, 16),
            AspectRatio::Classic => (4, 3),
            AspectRatio::Ultrawide => (21, 9),
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AspectRatio::ALL
            .iter()
            .copied()
            .find(|ratio| ratio.as_str() == s.trim())
            .ok_or_else(|| AppError::InvalidRequest(format!("Unsupported aspect ratio: {}", s)))
    }
}

/// Aspect ratio as listed to clients
#[derive(Debug, Clone, Serialize)]
pub struct AspectRatioInfo {
    pub value: &'static str,
    pub label: &'static str,
    pub width: u32,
    pub height: u32,
}

impl From<AspectRatio> for AspectRatioInfo {
    fn from(ratio: AspectRatio) -> Self {
        let (width, height) = ratio.dimensions();
        Self {
            value: ratio.as_str(),
            label: ratio.label(),
            width,
            height,
        }
    }
}

pub fn aspect_ratios() -> Vec<AspectRatioInfo> {
    AspectRatio::ALL.iter().copied().map(AspectRatioInfo::from).collect()
}

/// Named prompt fragment steering the visual tone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylePreset {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(alias = "prompt")]
    pub prompt_fragment: String,
}

pub const DEFAULT_STYLE_ID: &str = "cinematic";

// (id, name, description, prompt fragment)
const STYLE_PRESETS: [(&str, &str, &str, &str); 8] = [
    (
        "cinematic",
        "Cinematic",
        "Epic, movie-like quality with dramatic lighting",
        "Create cinematic, high-quality cover art with dramatic lighting, epic atmosphere, highly detailed, with vibrant colors and professional graphic design elements. Movie poster style.",
    ),
    (
        "minimalist",
        "Minimalist",
        "Clean, simple, modern design",
        "Create minimalist, clean cover art with simple geometric shapes, modern design, minimal color palette, elegant and professional. Focus on simplicity and negative space.",
    ),
    (
        "vibrant",
        "Vibrant",
        "Bold, colorful, and energetic",
        "Create vibrant, colorful cover art with bold colors, energetic composition, dynamic elements, eye-catching design, and modern aesthetic. Use bright, saturated colors.",
    ),
    (
        "dark",
        "Dark & Moody",
        "Mysterious, dramatic, dark aesthetic",
        "Create dark and moody cover art with mysterious atmosphere, dramatic shadows, noir aesthetic, high contrast, cinematic darkness, and sophisticated design.",
    ),
    (
        "retro",
        "Retro",
        "Vintage 80s/90s inspired design",
        "Create retro-style cover art inspired by 1980s and 1990s aesthetics, vintage colors, nostalgic vibe, retro-futuristic elements, synthwave or vaporwave inspired.",
    ),
    (
        "abstract",
        "Abstract",
        "Artistic, non-representational forms",
        "Create abstract cover art with artistic non-representational forms, creative patterns, unique compositions, modern art style, experimental design.",
    ),
    (
        "photorealistic",
        "Photorealistic",
        "Realistic, photograph-like quality",
        "Create photorealistic cover art that looks like a professional photograph, highly detailed, realistic textures, natural lighting, lifelike quality.",
    ),
    (
        "illustrated",
        "Illustrated",
        "Hand-drawn, artistic illustration style",
        "Create illustrated cover art with hand-drawn artistic style, illustration techniques, painterly quality, artistic brushwork, creative interpretation.",
    ),
];

fn preset_from(entry: &(&str, &str, &str, &str)) -> StylePreset {
    let (id, name, description, prompt_fragment) = *entry;
    StylePreset {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        prompt_fragment: prompt_fragment.to_string(),
    }
}

/// All presets in display order
pub fn style_presets() -> Vec<StylePreset> {
    STYLE_PRESETS.iter().map(preset_from).collect()
}

/// Look up a preset by id
pub fn find_style(id: &str) -> Option<StylePreset> {
    STYLE_PRESETS
        .iter()
        .find(|(preset_id, ..)| *preset_id == id)
        .map(preset_from)
}

pub fn default_style() -> StylePreset {
    preset_from(&STYLE_PRESETS[0])
}
