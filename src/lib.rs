//! SignAvatar - Headless Sign-Language Avatar Service
//!
//! A Rust service that signs text with a 3D humanoid rig:
//! - Translates text (or a speech transcript) into sign tokens
//! - Compiles tokens into a queue of bone-pose targets and text markers
//! - Animates the rig one tick at a time, pausing between gestures
//! - Streams the posed skeleton and displayed text over HTTP/SSE

pub mod animation;
pub mod avatar;
pub mod config;
pub mod error;
pub mod gesture;
pub mod output;
pub mod speech;
pub mod translate;
pub mod web;

pub use config::Config;
pub use error::{Result, SignAvatarError};

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex, RwLock};

use animation::{run_tick_loop, Generation};
use avatar::{AvatarAsset, SignSession, Skeleton};
use error::TranslateError;
use gesture::GestureLibrary;
use output::{BroadcastRenderer, SceneEvent};
use speech::SpeechCapture;
use translate::{Translation, Translator};

/// A phrase accepted for signing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignedPhrase {
    /// Tick loop now driving the session
    pub generation: Generation,
    pub translation: Translation,
}

/// Application state shared across all components
pub struct AppState {
    /// Current configuration
    pub config: RwLock<Config>,
    /// The avatar's signing session
    pub session: Arc<Mutex<SignSession>>,
    /// Word and finger-spelling gestures
    pub library: Arc<GestureLibrary>,
    /// Text to sign-token translation
    pub translator: Arc<dyn Translator>,
    /// Speech transcript pushed by the recognizer
    pub speech: RwLock<SpeechCapture>,
    /// Channel for scene updates
    pub scene_tx: broadcast::Sender<SceneEvent>,
    /// Shutdown signal
    pub shutdown_tx: broadcast::Sender<()>,
}

impl AppState {
    /// Create a new application state around a loaded rig
    pub fn new(
        config: Config,
        library: Arc<GestureLibrary>,
        rig: Skeleton,
        translator: Arc<dyn Translator>,
    ) -> Arc<Self> {
        let (scene_tx, _) = broadcast::channel(256);
        let (shutdown_tx, _) = broadcast::channel(1);

        let renderer = BroadcastRenderer::new(scene_tx.clone());
        let session = SignSession::from_config(&config, Arc::clone(&library), rig, Box::new(renderer));
        let speech = SpeechCapture::new(config.speech.language);

        Arc::new(Self {
            config: RwLock::new(config),
            session: Arc::new(Mutex::new(session)),
            library,
            translator,
            speech: RwLock::new(speech),
            scene_tx,
            shutdown_tx,
        })
    }

    /// Translate on a blocking worker; failures degrade to a passthrough
    pub async fn translate(&self, text: &str) -> Translation {
        let translator = Arc::clone(&self.translator);
        let input = text.to_string();

        match tokio::task::spawn_blocking(move || translator.translate(&input)).await {
            Ok(translation) => translation,
            Err(e) => {
                tracing::warn!("{}", TranslateError::Worker(e.to_string()));
                Translation::passthrough(text)
            }
        }
    }

    /// Translate `text` and sign it, replacing anything in progress.
    ///
    /// The previous phrase is stopped and cleared before translation starts.
    /// Blank input is ignored and returns `None`.
    pub async fn sign(self: &Arc<Self>, text: &str) -> Option<SignedPhrase> {
        if text.trim().is_empty() {
            return None;
        }

        self.session.lock().await.reset();
        let translation = self.translate(text).await;
        let generation = self.session.lock().await.sign_translation(&translation);
        self.spawn_tick_loop(generation).await;
        Some(SignedPhrase {
            generation,
            translation,
        })
    }

    /// Stop signing and clear the queue
    pub async fn reset(&self) {
        self.session.lock().await.reset();
    }

    /// Load another avatar and ease it into the rest pose
    pub async fn swap_avatar(self: &Arc<Self>, asset: AvatarAsset) -> Generation {
        self.config.write().await.avatar.asset = asset;
        let generation = self.session.lock().await.swap_avatar(asset.skeleton());
        self.spawn_tick_loop(generation).await;
        generation
    }

    /// Ease the current rig into the rest pose
    pub async fn return_to_rest(self: &Arc<Self>) -> Generation {
        let generation = self.session.lock().await.return_to_rest();
        self.spawn_tick_loop(generation).await;
        generation
    }

    /// Apply new timing to the session and the stored configuration
    pub async fn set_timing(&self, speed: f32, pause_ms: u64) {
        {
            let mut config = self.config.write().await;
            config.animation.speed = speed;
            config.animation.pause_ms = pause_ms;
        }
        self.session
            .lock()
            .await
            .set_timing(speed, Duration::from_millis(pause_ms));
    }

    async fn spawn_tick_loop(&self, generation: Generation) {
        let tick_rate_hz = self.config.read().await.animation.tick_rate_hz;
        tokio::spawn(run_tick_loop(
            Arc::clone(&self.session),
            generation,
            tick_rate_hz,
            self.subscribe_shutdown(),
        ));
    }

    /// Subscribe to scene updates
    pub fn subscribe_scene(&self) -> broadcast::Receiver<SceneEvent> {
        self.scene_tx.subscribe()
    }

    /// Subscribe to shutdown signal
    pub fn subscribe_shutdown(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Signal shutdown
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
