pub mod controllers;
pub mod error;
pub mod principal;

use crate::ServerConfig;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use controllers::{TranslationController, translation};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Uploads above this size are rejected before they reach a handler.
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

pub fn create_app(config: ServerConfig) -> Router {
    let controller = TranslationController::new(config);

    let translation_routes = Router::new()
        .route("/text", post(translation::translate_text))
        .route("/file/{task_name}", post(translation::submit_file))
        .route("/status", get(translation::get_status))
        .route("/status/all", get(translation::get_all_status))
        .route("/download", get(translation::download))
        .route("/file/history/create", post(translation::create_history))
        .route("/file/history", get(translation::list_history))
        .with_state(controller);

    Router::new()
        .route("/health", get(health_check))
        .nest("/translation", translation_routes)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn health_check() -> &'static str {
    "OK"
}
