//! Dictation.
//!
//! Speech capture runs outside the core. It delivers recognition events,
//! which are accumulated here and inserted at the editor cursor once the
//! user stops dictating.

pub mod transcript;

pub use transcript::{dictate_into, SpeechEvent, TranscriptBuffer};
