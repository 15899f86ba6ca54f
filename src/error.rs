//! Error types for SignAvatar

use thiserror::Error;

/// Main error type for SignAvatar
#[derive(Error, Debug)]
pub enum SignAvatarError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Gesture error: {0}")]
    Gesture(#[from] GestureError),

    #[error("Rig error: {0}")]
    Rig(#[from] RigError),

    #[error("Translation error: {0}")]
    Translate(#[from] TranslateError),

    #[error("Web server error: {0}")]
    Web(#[from] WebError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid configuration value: {field} - {message}")]
    InvalidValue { field: String, message: String },
}

/// Gesture library errors
#[derive(Error, Debug)]
pub enum GestureError {
    #[error("Failed to read gesture library: {0}")]
    ReadFile(String),

    #[error("Failed to parse gesture library: {0}")]
    Parse(String),

    #[error("Invalid gesture {name}: {message}")]
    InvalidGesture { name: String, message: String },
}

/// Rig (skeleton) errors
#[derive(Error, Debug)]
pub enum RigError {
    #[error("Failed to read rig file: {0}")]
    ReadFile(String),

    #[error("Failed to parse rig file: {0}")]
    Parse(String),

    #[error("Rig has no bones")]
    Empty,

    #[error("Duplicate bone name: {0}")]
    DuplicateBone(String),
}

/// Translation service errors.
///
/// These never reach the user: the translator degrades to a passthrough
/// result and only logs them.
#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("Translation service unreachable: {0}")]
    Transport(String),

    #[error("Malformed translation response: {0}")]
    Decode(String),

    #[error("Translation worker failed: {0}")]
    Worker(String),
}

/// Web server errors
#[derive(Error, Debug)]
pub enum WebError {
    #[error("Failed to bind to address: {0}")]
    Bind(String),

    #[error("Server startup failed: {0}")]
    Startup(String),
}

/// Result type alias for SignAvatar operations
pub type Result<T> = std::result::Result<T, SignAvatarError>;
