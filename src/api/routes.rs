//! Router construction

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::api::handlers;
use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/v1/styles", get(handlers::list_styles))
        .route("/v1/aspect-ratios", get(handlers::list_aspect_ratios))
        .route(
            "/v1/preferences",
            get(handlers::get_preferences).put(handlers::update_preferences),
        )
        .route("/v1/covers", post(handlers::create_cover))
        .route(
            "/v1/history",
            get(handlers::list_history).delete(handlers::clear_history),
        )
        .route("/v1/history/:id", get(handlers::get_history_entry))
        .route("/v1/history/:id/download", get(handlers::download_history_entry))
        .route("/v1/history/:id/clipboard", get(handlers::clipboard_history_entry))
        .route(
            "/v1/history/:id/share",
            get(handlers::share_history_entry).post(handlers::report_share_outcome),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
