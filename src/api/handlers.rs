//! Request handlers

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use crate::catalog::{self, AspectRatio, AspectRatioInfo, StylePreset};
use crate::error::{AppError, Result};
use crate::generation::GenerationRequest;
use crate::history::GeneratedImage;
use crate::preferences::PreferenceState;
use crate::response::{ImageExport, ShareOutcome, SharePayload};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCoverRequest {
    pub title: String,
    #[serde(default)]
    pub aspect_ratio: Option<String>,
    /// Style preset id
    #[serde(default)]
    pub style: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePreferencesRequest {
    #[serde(default)]
    pub aspect_ratio: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ClearParams {
    #[serde(default)]
    pub confirm: bool,
}

/// Which download name to use
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DownloadName {
    /// `<slug>_<id>.jpeg`, as saved from the history panel
    #[default]
    History,
    /// `<slug>_cover_art.jpeg`, as saved from the result view
    Cover,
}

#[derive(Debug, Default, Deserialize)]
pub struct DownloadParams {
    #[serde(default)]
    pub name: DownloadName,
}

/// Everything a native share sheet needs besides the bytes themselves
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareResponse {
    pub title: String,
    pub text: String,
    pub filename: String,
    pub mime_type: String,
}

impl From<SharePayload> for ShareResponse {
    fn from(payload: SharePayload) -> Self {
        Self {
            title: payload.title,
            text: payload.text,
            filename: payload.file.filename,
            mime_type: payload.file.mime_type,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ShareReport {
    pub outcome: ShareOutcome,
}

fn find_entry(state: &AppState, id: &str) -> Result<GeneratedImage> {
    state
        .history
        .select(id)
        .ok_or_else(|| AppError::NotFound(format!("History entry {}", id)))
}

fn resolve_style(id: &str) -> Result<StylePreset> {
    catalog::find_style(id)
        .ok_or_else(|| AppError::InvalidRequest(format!("Unknown style preset: {}", id)))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn list_styles() -> Json<Vec<StylePreset>> {
    Json(catalog::style_presets())
}

pub async fn list_aspect_ratios() -> Json<Vec<AspectRatioInfo>> {
    Json(catalog::aspect_ratios())
}

pub async fn get_preferences(State(state): State<Arc<AppState>>) -> Json<PreferenceState> {
    Json(state.preferences.snapshot())
}

pub async fn update_preferences(
    State(state): State<Arc<AppState>>,
    Json(body): Json<UpdatePreferencesRequest>,
) -> Result<Json<PreferenceState>> {
    if let Some(raw) = body.aspect_ratio {
        state.preferences.set_aspect_ratio(raw.parse()?)?;
    }
    if let Some(id) = body.style {
        state.preferences.set_style(resolve_style(&id)?)?;
    }
    Ok(Json(state.preferences.snapshot()))
}

/// Generate a cover, record it in history and remember the form choices
pub async fn create_cover(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateCoverRequest>,
) -> Result<Json<GeneratedImage>> {
    let _permit = state
        .generation_slot
        .clone()
        .try_acquire_owned()
        .map_err(|_| AppError::GenerationInProgress)?;

    let aspect_ratio = match body.aspect_ratio {
        Some(raw) => raw.parse::<AspectRatio>()?,
        None => state.preferences.aspect_ratio(),
    };
    let style = match body.style {
        Some(id) => resolve_style(&id)?,
        None => state.preferences.style(),
    };

    let request = GenerationRequest::new(body.title, aspect_ratio, style)?;
    state.preferences.set_aspect_ratio(request.aspect_ratio)?;
    state.preferences.set_style(request.style.clone())?;

    let image = state.generator.generate_image(&request).await?;
    state.history.append(image.clone())?;
    info!(id = %image.id, history = state.history.len(), "Stored generated cover");

    Ok(Json(image))
}

pub async fn list_history(State(state): State<Arc<AppState>>) -> Json<Vec<GeneratedImage>> {
    Json(state.history.list())
}

pub async fn get_history_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<GeneratedImage>> {
    find_entry(&state, &id).map(Json)
}

/// Clearing is destructive, so the caller must pass `?confirm=true`
pub async fn clear_history(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ClearParams>,
) -> Result<Json<Value>> {
    if !params.confirm {
        return Err(AppError::InvalidRequest(
            "Clearing history requires confirm=true".to_string(),
        ));
    }
    state.history.clear()?;
    Ok(Json(json!({ "cleared": true })))
}

/// Raw bytes as an attachment; `?name=cover` selects the result-view filename
pub async fn download_history_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<DownloadParams>,
) -> Result<impl IntoResponse> {
    let image = find_entry(&state, &id)?;
    let export = match params.name {
        DownloadName::History => ImageExport::history_download(&image)?,
        DownloadName::Cover => ImageExport::download(&image)?,
    };

    Ok((
        [
            (header::CONTENT_TYPE, export.mime_type),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export.filename),
            ),
        ],
        export.bytes,
    ))
}

/// Raw bytes and MIME type for a clipboard write
pub async fn clipboard_history_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let image = find_entry(&state, &id)?;
    let export = ImageExport::clipboard(&image)?;
    Ok(([(header::CONTENT_TYPE, export.mime_type)], export.bytes))
}

pub async fn share_history_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ShareResponse>> {
    let image = find_entry(&state, &id)?;
    Ok(Json(SharePayload::for_image(&image)?.into()))
}

/// Outcome reported by the share sheet; a cancelled share is still a success
pub async fn report_share_outcome(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(report): Json<ShareReport>,
) -> Result<StatusCode> {
    find_entry(&state, &id)?;
    report.outcome.into_result()?;
    Ok(StatusCode::NO_CONTENT)
}
