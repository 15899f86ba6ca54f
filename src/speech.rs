//! Speech capture state
//!
//! Recognition itself happens in the browser; this module keeps the
//! transcript the recognizer pushes while listening, so it can be signed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ConfigError, SignAvatarError};

/// Recognition language
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpeechLanguage {
    #[default]
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "hi-IN")]
    HiIn,
}

impl SpeechLanguage {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpeechLanguage::EnUs => "en-US",
            SpeechLanguage::HiIn => "hi-IN",
        }
    }
}

impl fmt::Display for SpeechLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpeechLanguage {
    type Err = SignAvatarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en-US" => Ok(SpeechLanguage::EnUs),
            "hi-IN" => Ok(SpeechLanguage::HiIn),
            other => Err(ConfigError::InvalidValue {
                field: "speech.language".to_string(),
                message: format!("unsupported language: {}", other),
            }
            .into()),
        }
    }
}

/// Transcript accumulated from recognizer results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechCapture {
    language: SpeechLanguage,
    listening: bool,
    transcript: String,
}

impl SpeechCapture {
    pub fn new(language: SpeechLanguage) -> Self {
        Self {
            language,
            ..Default::default()
        }
    }

    pub fn language(&self) -> SpeechLanguage {
        self.language
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    pub fn start(&mut self) {
        self.listening = true;
    }

    pub fn stop(&mut self) {
        self.listening = false;
    }

    /// Stop listening and discard the transcript
    pub fn reset(&mut self) {
        self.listening = false;
        self.transcript.clear();
    }

    /// Append a final recognition result. Ignored unless listening.
    pub fn push_result(&mut self, text: &str) -> bool {
        let text = text.trim();
        if !self.listening || text.is_empty() {
            return false;
        }

        if !self.transcript.is_empty() {
            self.transcript.push(' ');
        }
        self.transcript.push_str(text);
        true
    }

    /// Switching language mid-utterance restarts capture
    pub fn set_language(&mut self, language: SpeechLanguage) {
        if language != self.language {
            self.language = language;
            self.reset();
        }
    }
}
