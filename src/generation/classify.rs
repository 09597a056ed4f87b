//! Maps upstream failures onto the user-facing error taxonomy

use crate::error::AppError;

const CREDENTIAL_MARKERS: &[&str] = &[
    "api key not valid",
    "api_key_invalid",
    "invalid api key",
    "permission denied",
    "permission_denied",
    "unauthenticated",
];

const CONTENT_POLICY_MARKERS: &[&str] = &[
    "safety",
    "content policy",
    "policy violation",
    "blocked",
    "responsible ai",
];

/// Classify a failed call by HTTP status (when there was a response) and message.
///
/// Credential and content-policy failures are terminal; everything else is transient.
pub fn classify_failure(status: Option<u16>, message: &str) -> AppError {
    let lowered = message.to_lowercase();

    if matches!(status, Some(401) | Some(403))
        || CREDENTIAL_MARKERS.iter().any(|marker| lowered.contains(marker))
    {
        return AppError::InvalidCredential;
    }

    if CONTENT_POLICY_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
    {
        return AppError::ContentPolicyViolation;
    }

    AppError::Transient(message.to_string())
}
