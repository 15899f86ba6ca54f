//! Client for the remote translation service

use std::time::Duration;

use super::{Translation, Translator};
use crate::config::TranslatorConfig;
use crate::error::TranslateError;

/// Calls `GET {url}/translate?text=...` on the translation service
pub struct HttpTranslator {
    agent: ureq::Agent,
    endpoint: String,
}

impl HttpTranslator {
    pub fn new(config: &TranslatorConfig) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_millis(config.timeout_ms)))
            .build()
            .into();

        Self {
            agent,
            endpoint: format!("{}/translate", config.url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Translate, reporting transport and decoding failures
    pub fn try_translate(&self, text: &str) -> Result<Translation, TranslateError> {
        let mut response = self
            .agent
            .get(&self.endpoint)
            .query("text", text)
            .call()
            .map_err(|e| TranslateError::Transport(e.to_string()))?;

        response
            .body_mut()
            .read_json::<Translation>()
            .map_err(|e| TranslateError::Decode(e.to_string()))
    }
}

impl Translator for HttpTranslator {
    fn translate(&self, text: &str) -> Translation {
        match self.try_translate(text) {
            Ok(translation) => translation,
            Err(e) => {
                tracing::warn!("{}; signing nothing for this phrase", e);
                Translation::passthrough(text)
            }
        }
    }
}
