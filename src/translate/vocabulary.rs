//! Offline translator
//!
//! A rule-based stand-in for the translation service: keeps content words,
//! drops function words, and reorders time words to the front and numbers to
//! the end.

use std::collections::HashSet;

use super::{Translation, Translator};
use crate::gesture::GestureDictionary;

const NUMBER_WORDS: [&str; 11] = [
    "ZERO", "ONE", "TWO", "THREE", "FOUR", "FIVE", "SIX", "SEVEN", "EIGHT", "NINE", "TEN",
];

const TIME_WORDS: [&str; 5] = ["today", "tomorrow", "yesterday", "now", "later"];

const FUNCTION_WORDS: &[&str] = &[
    "a", "an", "the", "is", "am", "are", "was", "were", "be", "been", "being", "to", "of", "in",
    "on", "at", "for", "and", "or", "but", "do", "does", "did", "will", "shall", "would", "can",
    "could", "should", "may", "might", "must", "has", "have", "had", "my", "your", "his", "her",
    "our", "their", "its", "it", "this", "that", "these", "those", "with", "from", "by", "as",
];

#[derive(Debug, Clone, Default)]
pub struct VocabularyTranslator {
    known: HashSet<String>,
}

impl VocabularyTranslator {
    /// Translator whose known set is `words`, matched uppercase
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            known: words.into_iter().map(|w| w.as_ref().to_uppercase()).collect(),
        }
    }

    /// Treat every token of a word dictionary as known
    pub fn from_dictionary(dictionary: &GestureDictionary) -> Self {
        Self::new(dictionary.tokens())
    }

    pub fn knows(&self, token: &str) -> bool {
        self.known.contains(token)
    }
}

/// Exact spelling of 0..=10 as a number word
fn number_word(word: &str) -> Option<&'static str> {
    let n: usize = word.parse().ok()?;
    if n.to_string() != word {
        return None;
    }
    NUMBER_WORDS.get(n).copied()
}

impl Translator for VocabularyTranslator {
    fn translate(&self, text: &str) -> Translation {
        let lowered = text.to_lowercase();

        let mut time = Vec::new();
        let mut content = Vec::new();
        let mut numbers = Vec::new();

        for raw in lowered.split_whitespace() {
            let word: String = raw.chars().filter(|c| c.is_alphanumeric()).collect();
            if word.is_empty() {
                continue;
            }

            if word.chars().all(|c| c.is_ascii_digit()) {
                match number_word(&word) {
                    Some(n) => numbers.push(n.to_string()),
                    None => tracing::debug!("Dropping unsupported number: {}", word),
                }
            } else if TIME_WORDS.contains(&word.as_str()) {
                time.push(word.to_uppercase());
            } else if !FUNCTION_WORDS.contains(&word.as_str()) {
                content.push(word.to_uppercase());
            }
        }

        let (known, unknown): (Vec<String>, Vec<String>) = time
            .into_iter()
            .chain(content)
            .chain(numbers)
            .partition(|token| self.knows(token));

        Translation {
            original: text.to_string(),
            english: text.to_string(),
            isl: known.join(" "),
            unknown,
        }
    }
}
