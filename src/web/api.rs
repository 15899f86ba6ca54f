//! REST API endpoints

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::avatar::AvatarAsset;
use crate::config::{PAUSE_RANGE_MS, SPEED_RANGE};
use crate::output::sse;
use crate::speech::SpeechLanguage;
use crate::AppState;

/// API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
        })
    }

    pub fn failure(message: &str) -> Json<Self> {
        Json(Self {
            success: false,
            data: None,
            error: Some(message.to_string()),
        })
    }
}

impl ApiResponse<()> {
    pub fn error(message: &str) -> Json<Self> {
        Self::failure(message)
    }

    pub fn ok() -> Json<Self> {
        Json(Self {
            success: true,
            data: None,
            error: None,
        })
    }
}

/// Text to sign
#[derive(Debug, Deserialize)]
pub struct SignRequest {
    pub text: String,
}

/// Translate and sign a phrase
pub async fn sign(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SignRequest>,
) -> impl IntoResponse {
    match state.sign(&request.text).await {
        Some(signed) => ApiResponse::success(signed),
        None => ApiResponse::failure("Nothing to sign"),
    }
}

/// Sign the current speech transcript
pub async fn sign_speech(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let transcript = state.speech.read().await.transcript().to_string();

    match state.sign(&transcript).await {
        Some(signed) => ApiResponse::success(signed),
        None => ApiResponse::failure("Transcript is empty"),
    }
}

/// Stop listening, drop the transcript and stop signing
pub async fn clear(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.speech.write().await.reset();
    state.reset().await;
    ApiResponse::<()>::ok()
}

/// Status response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub running: bool,
    pub paused: bool,
    pub queued: usize,
    pub displayed: String,
    pub avatar: String,
    pub speed: f32,
    pub pause_ms: u64,
    pub version: String,
}

/// Get current status
pub async fn get_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let session = state.session.lock().await;
    let schedule = session.schedule();

    ApiResponse::success(StatusResponse {
        running: schedule.is_running(),
        paused: schedule.is_paused(Instant::now()),
        queued: session.queue().len(),
        displayed: session.displayed().to_string(),
        avatar: session.rig().name().to_string(),
        speed: session.speed(),
        pause_ms: session.pause().as_millis() as u64,
        version: crate::VERSION.to_string(),
    })
}

/// Get current configuration
pub async fn get_config(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let config = state.config.read().await;
    Json(config.clone())
}

/// Update configuration
#[derive(Debug, Deserialize)]
pub struct ConfigUpdate {
    #[serde(default)]
    pub speed: Option<f32>,
    #[serde(default)]
    pub pause_ms: Option<u64>,
    #[serde(default)]
    pub avatar: Option<AvatarAsset>,
}

pub async fn update_config(
    State(state): State<Arc<AppState>>,
    Json(update): Json<ConfigUpdate>,
) -> impl IntoResponse {
    if let Some(speed) = update.speed {
        if !SPEED_RANGE.contains(&speed) {
            return ApiResponse::error(&format!(
                "Speed must be between {} and {}",
                SPEED_RANGE.start(),
                SPEED_RANGE.end()
            ));
        }
    }
    if let Some(pause_ms) = update.pause_ms {
        if !PAUSE_RANGE_MS.contains(&pause_ms) {
            return ApiResponse::error(&format!(
                "Pause must be at most {} ms",
                PAUSE_RANGE_MS.end()
            ));
        }
    }

    if update.speed.is_some() || update.pause_ms.is_some() {
        let current = state.config.read().await.animation.clone();
        state
            .set_timing(
                update.speed.unwrap_or(current.speed),
                update.pause_ms.unwrap_or(current.pause_ms),
            )
            .await;
    }

    if let Some(avatar) = update.avatar {
        let current = state.config.read().await.avatar.asset;
        if avatar != current {
            state.swap_avatar(avatar).await;
        }
    }

    ApiResponse::<()>::ok()
}

/// Avatar selection
#[derive(Debug, Deserialize)]
pub struct AvatarRequest {
    pub avatar: AvatarAsset,
}

/// Swap the avatar rig
pub async fn set_avatar(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AvatarRequest>,
) -> impl IntoResponse {
    state.swap_avatar(request.avatar).await;
    ApiResponse::success(serde_json::json!({ "avatar": request.avatar }))
}

/// Known gesture tokens
#[derive(Debug, Serialize)]
pub struct GesturesResponse {
    pub words: Vec<String>,
    pub alphabet: Vec<String>,
}

pub async fn list_gestures(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let to_owned = |tokens: Vec<&str>| tokens.into_iter().map(str::to_string).collect();

    ApiResponse::success(GesturesResponse {
        words: to_owned(state.library.words().tokens()),
        alphabet: to_owned(state.library.alphabet().tokens()),
    })
}

/// Get speech capture state
pub async fn get_speech(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let speech = state.speech.read().await;
    ApiResponse::success(speech.clone())
}

pub async fn start_speech(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.speech.write().await.start();
    ApiResponse::<()>::ok()
}

pub async fn stop_speech(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.speech.write().await.stop();
    ApiResponse::<()>::ok()
}

pub async fn reset_speech(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.speech.write().await.reset();
    ApiResponse::<()>::ok()
}

/// Final recognition result
#[derive(Debug, Deserialize)]
pub struct SpeechResult {
    pub text: String,
}

pub async fn push_speech_result(
    State(state): State<Arc<AppState>>,
    Json(result): Json<SpeechResult>,
) -> impl IntoResponse {
    let mut speech = state.speech.write().await;
    if speech.push_result(&result.text) {
        ApiResponse::success(speech.transcript().to_string())
    } else {
        ApiResponse::failure("Not listening")
    }
}

/// Recognition language selection
#[derive(Debug, Deserialize)]
pub struct LanguageRequest {
    pub language: SpeechLanguage,
}

pub async fn set_speech_language(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LanguageRequest>,
) -> impl IntoResponse {
    state.speech.write().await.set_language(request.language);
    state.config.write().await.speech.language = request.language;
    ApiResponse::<()>::ok()
}

/// Translation query
#[derive(Debug, Deserialize)]
pub struct TranslateQuery {
    pub text: String,
}

/// Translate without signing, in the translation service's response format
pub async fn translate(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TranslateQuery>,
) -> impl IntoResponse {
    Json(state.translate(&query.text).await)
}

/// SSE stream endpoint
pub async fn scene_stream(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    sse::create_scene_stream(state)
}
