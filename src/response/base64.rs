//! Base64 and data URI utilities

use base64::{engine::general_purpose::STANDARD, Engine};
use crate::error::{AppError, Result};

/// Encode binary data to base64 string
pub fn encode(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Strip a `data:<mime>;base64,` prefix if present
fn payload(encoded: &str) -> &str {
    match encoded.strip_prefix("data:") {
        Some(rest) => rest.split_once(',').map(|(_, data)| data).unwrap_or(rest),
        None => encoded,
    }
}

/// Decode a plain base64 string or a data URI to binary data
pub fn decode(encoded: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(payload(encoded).trim())
        .map_err(|e| AppError::InvalidRequest(format!("Invalid base64 data: {}", e)))
}

/// Check if a string is valid base64
pub fn is_valid(data: &str) -> bool {
    STANDARD.decode(payload(data).trim()).is_ok()
}

/// MIME type of a data URI, e.g. "image/jpeg"
pub fn mime_type_of(data_uri: &str) -> Option<&str> {
    let rest = data_uri.strip_prefix("data:")?;
    let end = rest.find([';', ','])?;
    let mime = &rest[..end];
    (!mime.is_empty()).then_some(mime)
}

/// Create a data URI from binary image data
pub fn create_data_uri(data: &[u8], mime_type: &str) -> String {
    format!("data:{};base64,{}", mime_type, encode(data))
}

/// Wrap an already-encoded payload in a data URI after checking it decodes
pub fn to_data_uri(b64_data: &str, mime_type: &str) -> Result<String> {
    let trimmed = b64_data.trim();
    if trimmed.is_empty() || !is_valid(trimmed) {
        return Err(AppError::InvalidRequest("Image payload is not valid base64".to_string()));
    }
    Ok(format!("data:{};base64,{}", mime_type, trimmed))
}
