//! Gesture module
//!
//! Gesture procedures, the word and finger-spelling dictionaries, the
//! built-in vocabulary, and the compiler that turns a translation into queue
//! entries.

pub mod builtin;
pub mod compiler;
pub mod dictionary;
pub mod procedure;

pub use compiler::{compile, compile_translation, CompileSummary};
pub use dictionary::{GestureDictionary, GestureLibrary};
pub use procedure::{Gesture, GestureBuilder, GestureProcedure, Goal, RestPose};
