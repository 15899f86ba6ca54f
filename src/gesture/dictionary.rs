//! Token to gesture lookup tables

use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use super::procedure::{Gesture, GestureProcedure, Goal, RestPose};
use crate::error::{GestureError, SignAvatarError};

/// Exact-match, case-sensitive map from token to gesture procedure.
///
/// A missing key means "no known gesture"; callers decide what to do.
#[derive(Clone, Default)]
pub struct GestureDictionary {
    entries: HashMap<String, Arc<dyn GestureProcedure>>,
}

impl GestureDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a procedure, replacing any existing entry for `token`
    pub fn insert(&mut self, token: impl Into<String>, procedure: impl GestureProcedure + 'static) {
        self.entries.insert(token.into(), Arc::new(procedure));
    }

    pub fn get(&self, token: &str) -> Option<&dyn GestureProcedure> {
        self.entries.get(token).map(|p| p.as_ref())
    }

    pub fn contains(&self, token: &str) -> bool {
        self.entries.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All tokens, sorted
    pub fn tokens(&self) -> Vec<&str> {
        let mut tokens: Vec<&str> = self.entries.keys().map(|s| s.as_str()).collect();
        tokens.sort_unstable();
        tokens
    }

    /// Merge `other` into this dictionary; its entries win
    pub fn extend(&mut self, other: GestureDictionary) {
        self.entries.extend(other.entries);
    }
}

impl fmt::Debug for GestureDictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GestureDictionary")
            .field("tokens", &self.tokens())
            .finish()
    }
}

/// Word-level and finger-spelling dictionaries sharing one rest pose
#[derive(Debug, Clone, Default)]
pub struct GestureLibrary {
    words: GestureDictionary,
    alphabet: GestureDictionary,
    rest: RestPose,
}

impl GestureLibrary {
    pub fn new(words: GestureDictionary, alphabet: GestureDictionary, rest: RestPose) -> Self {
        Self {
            words,
            alphabet,
            rest,
        }
    }

    pub fn words(&self) -> &GestureDictionary {
        &self.words
    }

    pub fn alphabet(&self) -> &GestureDictionary {
        &self.alphabet
    }

    pub fn rest_pose(&self) -> &RestPose {
        &self.rest
    }

    /// Merge gestures from a TOML library file
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize, SignAvatarError> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            GestureError::ReadFile(format!("{}: {}", path.as_ref().display(), e))
        })?;

        let count = self.load_toml_str(&contents)?;
        tracing::info!(
            "Loaded {} gestures from {}",
            count,
            path.as_ref().display()
        );
        Ok(count)
    }

    /// Merge gestures from TOML, overriding built-ins with the same token.
    ///
    /// ```toml
    /// [words.HELLO]
    /// frames = [
    ///     [{ bone = "mixamorigRightArm", axis = "z", target = 0.4 }],
    /// ]
    ///
    /// [alphabet.A]
    /// frames = [[{ bone = "mixamorigRightHandIndex1", axis = "z", target = 1.4 }]]
    /// ```
    ///
    /// Nothing is merged if any gesture is invalid.
    pub fn load_toml_str(&mut self, s: &str) -> Result<usize, SignAvatarError> {
        let file: LibraryFile =
            toml::from_str(s).map_err(|e| GestureError::Parse(e.to_string()))?;

        let mut words = GestureDictionary::new();
        for (token, entry) in file.words {
            let gesture = entry.build(&token, &self.rest)?;
            words.insert(token, gesture);
        }

        let mut alphabet = GestureDictionary::new();
        for (token, entry) in file.alphabet {
            if token.chars().count() != 1 {
                return Err(GestureError::InvalidGesture {
                    name: token,
                    message: "alphabet keys must be a single character".to_string(),
                }
                .into());
            }
            let gesture = entry.build(&token, &self.rest)?;
            alphabet.insert(token, gesture);
        }

        let count = words.len() + alphabet.len();
        self.words.extend(words);
        self.alphabet.extend(alphabet);
        Ok(count)
    }
}

#[derive(Debug, Deserialize)]
struct LibraryFile {
    #[serde(default)]
    words: BTreeMap<String, GestureEntry>,
    #[serde(default)]
    alphabet: BTreeMap<String, GestureEntry>,
}

#[derive(Debug, Deserialize)]
struct GestureEntry {
    frames: Vec<Vec<Goal>>,
}

impl GestureEntry {
    fn build(self, name: &str, rest: &RestPose) -> Result<Gesture, GestureError> {
        let invalid = |message: &str| GestureError::InvalidGesture {
            name: name.to_string(),
            message: message.to_string(),
        };

        if self.frames.is_empty() {
            return Err(invalid("gesture has no frames"));
        }
        if self.frames.iter().any(|frame| frame.is_empty()) {
            return Err(invalid("gesture has an empty frame"));
        }
        if self.frames.iter().flatten().any(|goal| !goal.target.is_finite()) {
            return Err(invalid("target values must be finite"));
        }

        let builder = self
            .frames
            .into_iter()
            .fold(Gesture::builder(name, rest), |builder, frame| builder.frame(frame));
        Ok(builder.build())
    }
}
