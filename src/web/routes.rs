//! Route definitions for the HTTP API

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::HttpConfig;
use crate::AppState;

use super::api;

/// Create the main router with all routes
pub fn create_router(app_state: Arc<AppState>, config: &HttpConfig) -> Router {
    let cors = if config.cors_enabled {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    Router::new()
        // Signing
        .route("/api/sign", post(api::sign))
        .route("/api/sign/speech", post(api::sign_speech))
        .route("/api/clear", post(api::clear))
        .route("/api/status", get(api::get_status))
        .route("/api/config", get(api::get_config).post(api::update_config))
        .route("/api/avatar", post(api::set_avatar))
        .route("/api/gestures", get(api::list_gestures))
        // Speech capture
        .route("/api/speech", get(api::get_speech))
        .route("/api/speech/start", post(api::start_speech))
        .route("/api/speech/stop", post(api::stop_speech))
        .route("/api/speech/reset", post(api::reset_speech))
        .route("/api/speech/result", post(api::push_speech_result))
        .route("/api/speech/language", post(api::set_speech_language))
        // SSE stream of poses and text
        .route("/api/stream", get(api::scene_stream))
        // Translation, same shape as the external service
        .route("/translate", get(api::translate))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
