//! Transcript accumulation for dictation.
//!
//! # Responsibility
//! - Collect final recognition segments and the latest interim hypothesis.
//! - Hand the finished transcript to an open editor session.
//!
//! # Invariants
//! - Interim text is display-only and never inserted into a page.

use crate::editor::debounce::Clock;
use crate::editor::session::EditorSession;
use crate::markdown::LinkResolver;
use crate::repo::page_repo::PageRepository;
use log::info;

/// One recognition result from the speech engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    /// Provisional hypothesis; replaced by the next event.
    Interim(String),
    /// Stable segment.
    Final(String),
}

/// Accumulates final segments and tracks the latest interim hypothesis.
#[derive(Debug, Default, Clone)]
pub struct TranscriptBuffer {
    segments: Vec<String>,
    interim: String,
}

impl TranscriptBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: SpeechEvent) {
        match event {
            SpeechEvent::Interim(text) => self.interim = text,
            SpeechEvent::Final(text) => {
                self.interim.clear();
                let text = text.trim();
                if !text.is_empty() {
                    self.segments.push(text.to_string());
                }
            }
        }
    }

    /// Committed text so far.
    pub fn committed(&self) -> String {
        self.segments.join(" ")
    }

    /// Committed text followed by the current interim hypothesis, for a
    /// live preview.
    pub fn display_text(&self) -> String {
        let interim = self.interim.trim();
        match (self.segments.is_empty(), interim.is_empty()) {
            (_, true) => self.committed(),
            (true, false) => interim.to_string(),
            (false, false) => format!("{} {interim}", self.committed()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty() && self.interim.trim().is_empty()
    }

    /// Takes the committed transcript and resets the buffer. Pending
    /// interim text is discarded.
    pub fn finish(&mut self) -> String {
        let text = self.committed().trim().to_string();
        self.segments.clear();
        self.interim.clear();
        text
    }
}

/// Inserts the finished transcript at the session cursor. Returns the
/// inserted text, or `None` when nothing was recognized.
pub fn dictate_into<R, L, C>(
    session: &mut EditorSession<R, L, C>,
    buffer: &mut TranscriptBuffer,
) -> Option<String>
where
    R: PageRepository,
    L: LinkResolver,
    C: Clock,
{
    let text = buffer.finish();
    if text.is_empty() {
        return None;
    }
    session.insert_at_cursor(&text);
    info!(
        "event=dictation_insert module=speech status=ok page_id={} chars={}",
        session.page_id(),
        text.chars().count()
    );
    Some(text)
}
