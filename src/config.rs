//! Configuration parsing and management for SignAvatar

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::avatar::AvatarAsset;
use crate::error::{ConfigError, SignAvatarError};
use crate::speech::SpeechLanguage;

/// Bounds of the per-tick increment magnitude
pub const SPEED_RANGE: std::ops::RangeInclusive<f32> = 0.05..=0.50;
/// Bounds of the rest interval between gestures, in milliseconds
pub const PAUSE_RANGE_MS: std::ops::RangeInclusive<u64> = 0..=2000;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub animation: AnimationConfig,
    pub avatar: AvatarConfig,
    pub translator: TranslatorConfig,
    pub speech: SpeechConfig,
    pub render: RenderConfig,
    pub http: HttpConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SignAvatarError> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::ReadFile(format!("{}: {}", path.as_ref().display(), e))
        })?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string
    pub fn from_str(s: &str) -> Result<Self, SignAvatarError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()).into())
    }

    /// Load configuration from default paths
    pub fn load() -> Result<Self, SignAvatarError> {
        let paths = [
            PathBuf::from("config.toml"),
            PathBuf::from("config/default.toml"),
            dirs_path().join("config.toml"),
        ];

        for path in &paths {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), SignAvatarError> {
        if !SPEED_RANGE.contains(&self.animation.speed) {
            return Err(invalid(
                "animation.speed",
                format!(
                    "Speed must be between {} and {}",
                    SPEED_RANGE.start(),
                    SPEED_RANGE.end()
                ),
            ));
        }

        if !PAUSE_RANGE_MS.contains(&self.animation.pause_ms) {
            return Err(invalid(
                "animation.pause_ms",
                format!("Pause must be at most {} ms", PAUSE_RANGE_MS.end()),
            ));
        }

        if !(1..=240).contains(&self.animation.tick_rate_hz) {
            return Err(invalid(
                "animation.tick_rate_hz",
                "Tick rate must be between 1 and 240 Hz".to_string(),
            ));
        }

        if self.translator.mode == TranslatorMode::Http {
            if self.translator.url.is_empty() {
                return Err(invalid(
                    "translator.url",
                    "URL is required in http mode".to_string(),
                ));
            }
            if self.translator.timeout_ms == 0 {
                return Err(invalid(
                    "translator.timeout_ms",
                    "Timeout must be greater than 0".to_string(),
                ));
            }
        }

        if !(1.0..=179.0).contains(&self.render.fov_deg) {
            return Err(invalid(
                "render.fov_deg",
                "Field of view must be between 1 and 179 degrees".to_string(),
            ));
        }

        Ok(())
    }
}

fn invalid(field: &str, message: String) -> SignAvatarError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message,
    }
    .into()
}

/// Animation timing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Per-tick increment applied to every active bone axis
    pub speed: f32,
    /// Rest between two motion frames, in milliseconds
    pub pause_ms: u64,
    /// Host refresh rate driving the scheduler
    pub tick_rate_hz: u32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            speed: 0.1,
            pause_ms: 800,
            tick_rate_hz: 60,
        }
    }
}

/// Avatar configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AvatarConfig {
    /// Rig asset loaded on startup
    pub asset: AvatarAsset,
    /// TOML rig file replacing the built-in skeleton
    pub rig_path: Option<PathBuf>,
    /// TOML gesture library merged over the built-in dictionaries.
    ///
    /// The built-in vocabulary is small: basic words plus the numbers zero
    /// to ten. Known tokens the translation service reports
    /// without a word gesture here are skipped, not finger-spelled.
    pub gestures_path: Option<PathBuf>,
}

/// Which translation backend to use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslatorMode {
    /// Remote translation service over HTTP
    #[default]
    Http,
    /// Offline controlled-vocabulary rules
    Vocabulary,
}

/// Translation boundary configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    pub mode: TranslatorMode,
    /// Base URL of the translation service
    pub url: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            mode: TranslatorMode::Http,
            url: "http://localhost:8000".to_string(),
            timeout_ms: 5000,
        }
    }
}

/// Speech capture configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    pub language: SpeechLanguage,
}

/// Camera handed to the renderer each tick
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Camera position (x, y, z)
    pub camera_position: [f32; 3],
    /// Vertical field of view in degrees
    pub fov_deg: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            camera_position: [0.0, 1.4, 1.6],
            fov_deg: 30.0,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Enable HTTP server
    pub enabled: bool,
    /// HTTP server host
    pub host: String,
    /// HTTP server port
    pub port: u16,
    /// Enable CORS
    pub cors_enabled: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: "127.0.0.1".to_string(),
            port: 8080,
            cors_enabled: true,
        }
    }
}

/// Get the platform-specific configuration directory
fn dirs_path() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        if let Some(config_dir) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(config_dir).join("signavatar");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".config/signavatar");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join("Library/Application Support/signavatar");
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("signavatar");
        }
    }

    PathBuf::from(".")
}
