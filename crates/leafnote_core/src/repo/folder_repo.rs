//! Folder repository contract and key-value implementation.
//!
//! # Invariants
//! - Folders live under `folder:<uuid>`.
//! - `list_folders` is sorted by `created_at ASC, id ASC`.

use super::{RepoError, RepoResult};
use crate::model::folder::{Folder, FolderId};
use crate::store::{get_record, put_record, scan_records, KvStore, FOLDER_KEY_PREFIX};

/// Repository interface for folder persistence.
pub trait FolderRepository {
    fn get_folder(&self, id: FolderId) -> RepoResult<Option<Folder>>;
    fn list_folders(&self) -> RepoResult<Vec<Folder>>;
    fn save_folder(&self, folder: &Folder) -> RepoResult<()>;
    fn delete_folder(&self, id: FolderId) -> RepoResult<()>;
}

impl<R: FolderRepository + ?Sized> FolderRepository for &R {
    fn get_folder(&self, id: FolderId) -> RepoResult<Option<Folder>> {
        (**self).get_folder(id)
    }

    fn list_folders(&self) -> RepoResult<Vec<Folder>> {
        (**self).list_folders()
    }

    fn save_folder(&self, folder: &Folder) -> RepoResult<()> {
        (**self).save_folder(folder)
    }

    fn delete_folder(&self, id: FolderId) -> RepoResult<()> {
        (**self).delete_folder(id)
    }
}

pub fn folder_key(id: FolderId) -> String {
    format!("{FOLDER_KEY_PREFIX}{id}")
}

/// Folder repository over any [`KvStore`].
pub struct KvFolderRepository<S: KvStore> {
    store: S,
}

impl<S: KvStore> KvFolderRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S: KvStore> FolderRepository for KvFolderRepository<S> {
    fn get_folder(&self, id: FolderId) -> RepoResult<Option<Folder>> {
        Ok(get_record(&self.store, &folder_key(id))?)
    }

    fn list_folders(&self) -> RepoResult<Vec<Folder>> {
        let mut folders: Vec<Folder> = scan_records(&self.store, FOLDER_KEY_PREFIX)?;
        folders.sort_by(|left, right| {
            left.created_at
                .cmp(&right.created_at)
                .then_with(|| left.id.cmp(&right.id))
        });
        Ok(folders)
    }

    fn save_folder(&self, folder: &Folder) -> RepoResult<()> {
        Ok(put_record(&self.store, &folder_key(folder.id), folder)?)
    }

    fn delete_folder(&self, id: FolderId) -> RepoResult<()> {
        if !self.store.delete(&folder_key(id))? {
            return Err(RepoError::FolderNotFound(id));
        }
        Ok(())
    }
}
