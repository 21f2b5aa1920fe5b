//! Page record.
//!
//! # Invariants
//! - `content` is a serialized block document: blocks joined by `"\n\n"`.
//! - `updated_at >= created_at`.

use super::now_epoch_ms;
use crate::model::folder::FolderId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type PageId = Uuid;

/// Title assigned to pages created with a blank title.
pub const UNTITLED_PAGE_TITLE: &str = "Untitled";

/// Transcript captured by speech input and attached to a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceMemo {
    pub id: Uuid,
    pub transcript: String,
    pub created_at: i64,
}

impl VoiceMemo {
    pub fn new(transcript: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            transcript: transcript.into(),
            created_at: now_epoch_ms(),
        }
    }
}

/// One note page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: PageId,
    pub title: String,
    /// Markdown source, one block per blank-line separated group.
    #[serde(default)]
    pub content: String,
    /// `None` means the page sits at the sidebar root.
    #[serde(default)]
    pub folder_id: Option<FolderId>,
    #[serde(default)]
    pub voice_memos: Vec<VoiceMemo>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Page {
    /// Creates an empty page with a generated ID.
    pub fn new(title: impl Into<String>) -> Self {
        let now = now_epoch_ms();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            content: String::new(),
            folder_id: None,
            voice_memos: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Stamps `updated_at`, never moving it before `created_at`.
    pub fn touch(&mut self) {
        self.updated_at = now_epoch_ms().max(self.created_at);
    }
}
