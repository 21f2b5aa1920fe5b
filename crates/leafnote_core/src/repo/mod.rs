//! Record repositories over the key-value store.
//!
//! # Responsibility
//! - Map pages, folders and settings to store keys and JSON records.
//! - Keep key layout details out of the service and editor layers.
//!
//! # Invariants
//! - Repository APIs return semantic `NotFound` errors in addition to store
//!   transport errors.

pub mod folder_repo;
pub mod page_repo;
pub mod settings_repo;

use crate::model::folder::FolderId;
use crate::model::page::PageId;
use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by page and folder repositories.
#[derive(Debug)]
pub enum RepoError {
    Store(StoreError),
    PageNotFound(PageId),
    FolderNotFound(FolderId),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::PageNotFound(id) => write!(f, "page not found: {id}"),
            Self::FolderNotFound(id) => write!(f, "folder not found: {id}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::PageNotFound(_) | Self::FolderNotFound(_) => None,
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}
