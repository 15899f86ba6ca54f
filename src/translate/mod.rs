//! Translation boundary
//!
//! Maps free text to a sign-token stream plus the words that have no
//! word-level sign. Failures never surface: a translator that cannot reach
//! its backend returns [`Translation::passthrough`].

pub mod http;
pub mod vocabulary;

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::{TranslatorConfig, TranslatorMode};
use crate::gesture::GestureLibrary;

pub use http::HttpTranslator;
pub use vocabulary::VocabularyTranslator;

/// Translation service response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Translation {
    /// Text as submitted
    pub original: String,
    /// English rendering of the input
    pub english: String,
    /// Space-delimited sign tokens in signing order
    pub isl: String,
    /// Words with no sign, to be finger-spelled
    pub unknown: Vec<String>,
}

impl Translation {
    /// No-op translation used when the backend is unavailable
    pub fn passthrough(input: &str) -> Self {
        Self {
            original: input.to_string(),
            english: input.to_string(),
            isl: String::new(),
            unknown: Vec::new(),
        }
    }

    /// Known sign tokens, empty entries removed
    pub fn known_tokens(&self) -> impl Iterator<Item = &str> {
        self.isl.split_whitespace()
    }

    /// Whether compiling this translation would produce no gestures
    pub fn is_empty(&self) -> bool {
        self.known_tokens().next().is_none() && self.unknown.is_empty()
    }
}

/// Text to sign-token translation.
///
/// Implementations may block; async callers run them on a blocking worker.
pub trait Translator: Send + Sync {
    fn translate(&self, text: &str) -> Translation;
}

/// Build the translator selected by configuration
pub fn build_translator(config: &TranslatorConfig, library: &GestureLibrary) -> Arc<dyn Translator> {
    match config.mode {
        TranslatorMode::Http => {
            tracing::info!("Using translation service at {}", config.url);
            Arc::new(HttpTranslator::new(config))
        }
        TranslatorMode::Vocabulary => {
            tracing::info!(
                "Using offline vocabulary translator ({} words)",
                library.words().len()
            );
            Arc::new(VocabularyTranslator::from_dictionary(library.words()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passthrough_is_empty() {
        let t = Translation::passthrough("namaste");
        assert_eq!(t.original, "namaste");
        assert_eq!(t.english, "namaste");
        assert!(t.is_empty());
    }

    #[test]
    fn test_known_tokens_skip_blanks() {
        let t = Translation {
            isl: " TODAY  I GO ".to_string(),
            ..Default::default()
        };
        assert_eq!(t.known_tokens().collect::<Vec<_>>(), vec!["TODAY", "I", "GO"]);
        assert!(!t.is_empty());
    }

    #[test]
    fn test_response_with_missing_fields_decodes() {
        let t: Translation = serde_json::from_str(r#"{"original": "hi", "isl": "HELLO"}"#).unwrap();
        assert_eq!(t.isl, "HELLO");
        assert!(t.unknown.is_empty());
    }
}
