//! Folder record for the sidebar hierarchy.

use super::now_epoch_ms;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type FolderId = Uuid;

/// Grouping node; pages reference their folder through `Page::folder_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: FolderId,
    pub name: String,
    /// `None` means a root-level folder.
    #[serde(default)]
    pub parent_id: Option<FolderId>,
    pub created_at: i64,
}

impl Folder {
    pub fn new(name: impl Into<String>, parent_id: Option<FolderId>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            parent_id,
            created_at: now_epoch_ms(),
        }
    }
}
