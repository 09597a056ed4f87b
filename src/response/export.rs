//! Payloads for download, clipboard and share actions
//!
//! The native calls live in the front end; these types carry exactly what
//! each call needs.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AppError, Result};
use crate::history::GeneratedImage;
use crate::response::base64;

const DOWNLOAD_SUFFIX: &str = "_cover_art.jpeg";

/// Replace everything outside `[a-z0-9]` with `_` and lowercase
///
/// Replacement is per UTF-16 code unit, so a character outside the BMP
/// (most emoji) becomes `__`. Filenames match the ones browsers produce.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else {
            slug.extend(std::iter::repeat('_').take(c.len_utf16()));
        }
    }
    slug
}

/// Raw image bytes ready to hand to a native API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageExport {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageExport {
    /// Download of the image currently on screen: `<slug>_cover_art.jpeg`
    pub fn download(image: &GeneratedImage) -> Result<Self> {
        Self::with_filename(image, format!("{}{}", slugify(&image.title), DOWNLOAD_SUFFIX))
    }

    /// Download from the history panel: `<slug>_<id>.jpeg`
    pub fn history_download(image: &GeneratedImage) -> Result<Self> {
        Self::with_filename(image, format!("{}_{}.jpeg", slugify(&image.title), image.id))
    }

    /// Clipboard transfer keeps the source MIME type
    pub fn clipboard(image: &GeneratedImage) -> Result<Self> {
        Self::download(image)
    }

    fn with_filename(image: &GeneratedImage, filename: String) -> Result<Self> {
        let mime_type = base64::mime_type_of(&image.image_url)
            .ok_or_else(|| {
                AppError::InvalidRequest(format!("Image {} is not stored inline", image.id))
            })?
            .to_string();
        let bytes = base64::decode(&image.image_url)?;
        debug!(id = %image.id, filename = %filename, size = bytes.len(), "Prepared image export");

        Ok(Self {
            filename,
            mime_type,
            bytes,
        })
    }
}

/// File attachment plus caption for a native share sheet
#[derive(Debug, Clone)]
pub struct SharePayload {
    pub file: ImageExport,
    pub title: String,
    pub text: String,
}

impl SharePayload {
    pub fn for_image(image: &GeneratedImage) -> Result<Self> {
        Ok(Self {
            file: ImageExport::download(image)?,
            title: image.title.clone(),
            text: format!("Cover art for \"{}\"", image.title),
        })
    }
}

/// Result reported back by the share sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShareOutcome {
    Shared,
    /// The user dismissed the sheet
    Cancelled,
}

impl ShareOutcome {
    /// A dismissed share sheet is a no-op, not an error
    pub fn into_result(self) -> Result<()> {
        match self {
            ShareOutcome::Shared => debug!("Image shared"),
            ShareOutcome::Cancelled => debug!("Share cancelled by user"),
        }
        Ok(())
    }
}
