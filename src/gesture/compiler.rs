//! Text-to-gesture compiler
//!
//! Turns a translated phrase into text markers and motion frames. Tokens and
//! characters without a gesture are skipped: a partial rendering beats
//! refusing the whole phrase.

use super::dictionary::GestureLibrary;
use crate::animation::AnimationQueue;
use crate::translate::Translation;

/// Counts of what a compilation produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileSummary {
    /// Known tokens signed with a word gesture
    pub words: usize,
    /// Characters finger-spelled
    pub letters: usize,
    /// Tokens and characters with no gesture
    pub skipped: usize,
}

/// Append the gestures for `known` tokens, then finger-spell `unknown` words.
///
/// Expects the caller to have cleared `queue`.
pub fn compile<K, U>(
    known: K,
    unknown: U,
    library: &GestureLibrary,
    queue: &mut AnimationQueue,
) -> CompileSummary
where
    K: IntoIterator,
    K::Item: AsRef<str>,
    U: IntoIterator,
    U::Item: AsRef<str>,
{
    let mut summary = CompileSummary::default();

    for token in known {
        let token = token.as_ref();
        match library.words().get(token) {
            Some(procedure) => {
                queue.push_text(format!("{} ", token));
                procedure.apply(queue);
                summary.words += 1;
            }
            None => {
                tracing::debug!("No gesture for token: {}", token);
                summary.skipped += 1;
            }
        }
    }

    for word in unknown {
        let mut buf = [0u8; 4];
        for ch in word.as_ref().chars() {
            let key = ch.encode_utf8(&mut buf);
            match library.alphabet().get(key) {
                Some(procedure) => {
                    queue.push_text(key.to_string());
                    procedure.apply(queue);
                    summary.letters += 1;
                }
                None => {
                    tracing::debug!("No finger-spelling for character: {:?}", ch);
                    summary.skipped += 1;
                }
            }
        }
        queue.push_text(" ");
    }

    summary
}

/// Compile a translation result
pub fn compile_translation(
    translation: &Translation,
    library: &GestureLibrary,
    queue: &mut AnimationQueue,
) -> CompileSummary {
    compile(
        translation.known_tokens(),
        &translation.unknown,
        library,
        queue,
    )
}
