//! Folder tree use-case service.
//!
//! # Responsibility
//! - Create, rename, move and delete folders.
//! - Reparent pages between folders.
//! - Build the nested sidebar tree.
//!
//! # Invariants
//! - A parent folder must exist when provided.
//! - Moves never create parent-child cycles.
//! - Records pointing at a missing folder are shown at the root.

use crate::model::folder::{Folder, FolderId};
use crate::model::page::{Page, PageId};
use crate::repo::folder_repo::FolderRepository;
use crate::repo::page_repo::PageRepository;
use crate::repo::RepoError;
use log::info;
use std::collections::{BTreeMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Folder delete mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderDeleteMode {
    /// Delete the folder only; its subfolders and pages move to its parent.
    Dissolve,
    /// Delete the folder, every nested folder and every page inside them.
    DeleteAll,
}

/// Errors from folder tree operations.
#[derive(Debug)]
pub enum FolderServiceError {
    /// Folder name is blank after trim.
    InvalidName,
    FolderNotFound(FolderId),
    ParentNotFound(FolderId),
    PageNotFound(PageId),
    CycleDetected {
        folder_id: FolderId,
        parent_id: FolderId,
    },
    Repo(RepoError),
}

impl Display for FolderServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName => write!(f, "folder name must not be blank"),
            Self::FolderNotFound(id) => write!(f, "folder not found: {id}"),
            Self::ParentNotFound(id) => write!(f, "parent folder not found: {id}"),
            Self::PageNotFound(id) => write!(f, "page not found: {id}"),
            Self::CycleDetected {
                folder_id,
                parent_id,
            } => write!(
                f,
                "move would create cycle: folder {folder_id} under parent {parent_id}"
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for FolderServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for FolderServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::FolderNotFound(id) => Self::FolderNotFound(id),
            RepoError::PageNotFound(id) => Self::PageNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// One sidebar entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidebarNode {
    Folder {
        id: FolderId,
        name: String,
        children: Vec<SidebarNode>,
    },
    Page {
        id: PageId,
        title: String,
    },
}

impl SidebarNode {
    pub fn label(&self) -> &str {
        match self {
            Self::Folder { name, .. } => name,
            Self::Page { title, .. } => title,
        }
    }
}

/// Folder tree service facade.
pub struct FolderService<F: FolderRepository, P: PageRepository> {
    folders: F,
    pages: P,
}

impl<F: FolderRepository, P: PageRepository> FolderService<F, P> {
    pub fn new(folders: F, pages: P) -> Self {
        Self { folders, pages }
    }

    /// Creates one folder under an optional parent.
    pub fn create_folder(
        &self,
        name: &str,
        parent_id: Option<FolderId>,
    ) -> Result<Folder, FolderServiceError> {
        let name = normalize_name(name)?;
        if let Some(parent_id) = parent_id {
            self.ensure_parent_exists(parent_id)?;
        }
        let folder = Folder::new(name, parent_id);
        self.folders.save_folder(&folder)?;
        info!(
            "event=folder_create module=service status=ok folder_id={}",
            folder.id
        );
        Ok(folder)
    }

    pub fn rename_folder(&self, id: FolderId, name: &str) -> Result<Folder, FolderServiceError> {
        let name = normalize_name(name)?;
        let mut folder = self.require_folder(id)?;
        folder.name = name;
        self.folders.save_folder(&folder)?;
        Ok(folder)
    }

    /// Moves a folder under another folder, or to the root with `None`.
    pub fn move_folder(
        &self,
        id: FolderId,
        new_parent_id: Option<FolderId>,
    ) -> Result<(), FolderServiceError> {
        let mut folder = self.require_folder(id)?;
        if let Some(parent_id) = new_parent_id {
            self.ensure_parent_exists(parent_id)?;
            if self.would_create_cycle(id, parent_id)? {
                return Err(FolderServiceError::CycleDetected {
                    folder_id: id,
                    parent_id,
                });
            }
        }
        folder.parent_id = new_parent_id;
        self.folders.save_folder(&folder)?;
        Ok(())
    }

    /// Moves a page into a folder, or to the root with `None`.
    pub fn move_page(
        &self,
        page_id: PageId,
        folder_id: Option<FolderId>,
    ) -> Result<(), FolderServiceError> {
        if let Some(folder_id) = folder_id {
            self.require_folder(folder_id)?;
        }
        let mut page = self
            .pages
            .get_page(page_id)?
            .ok_or(FolderServiceError::PageNotFound(page_id))?;
        page.folder_id = folder_id;
        page.touch();
        self.pages.save_page(&page)?;
        Ok(())
    }

    /// Deletes a folder by mode.
    pub fn delete_folder(
        &self,
        id: FolderId,
        mode: FolderDeleteMode,
    ) -> Result<(), FolderServiceError> {
        let folder = self.require_folder(id)?;
        let folders = self.folders.list_folders()?;
        let pages = self.pages.list_pages()?;

        match mode {
            FolderDeleteMode::Dissolve => {
                for mut child in folders.into_iter().filter(|f| f.parent_id == Some(id)) {
                    child.parent_id = folder.parent_id;
                    self.folders.save_folder(&child)?;
                }
                for mut page in pages.into_iter().filter(|p| p.folder_id == Some(id)) {
                    page.folder_id = folder.parent_id;
                    page.touch();
                    self.pages.save_page(&page)?;
                }
                self.folders.delete_folder(id)?;
            }
            FolderDeleteMode::DeleteAll => {
                let subtree = collect_subtree(id, &folders);
                for page in pages
                    .iter()
                    .filter(|p| p.folder_id.is_some_and(|f| subtree.contains(&f)))
                {
                    self.pages.delete_page(page.id)?;
                }
                for folder_id in &subtree {
                    self.folders.delete_folder(*folder_id)?;
                }
            }
        }

        info!("event=folder_delete module=service status=ok folder_id={id} mode={mode:?}");
        Ok(())
    }

    /// Builds the sidebar: folders first by name, then pages by title,
    /// both case-insensitive.
    pub fn sidebar_tree(&self) -> Result<Vec<SidebarNode>, FolderServiceError> {
        let folders = self.folders.list_folders()?;
        let pages = self.pages.list_pages()?;
        let known: HashSet<FolderId> = folders.iter().map(|f| f.id).collect();

        let mut child_folders: BTreeMap<Option<FolderId>, Vec<&Folder>> = BTreeMap::new();
        for folder in &folders {
            let parent = folder.parent_id.filter(|p| known.contains(p) && *p != folder.id);
            child_folders.entry(parent).or_default().push(folder);
        }
        let mut child_pages: BTreeMap<Option<FolderId>, Vec<&Page>> = BTreeMap::new();
        for page in &pages {
            let parent = page.folder_id.filter(|f| known.contains(f));
            child_pages.entry(parent).or_default().push(page);
        }

        let mut visited = HashSet::new();
        let mut roots = build_level(None, &child_folders, &child_pages, &mut visited);

        // Folders only reachable through a stored cycle are surfaced at the root.
        for folder in &folders {
            if visited.insert(folder.id) {
                let children =
                    build_level(Some(folder.id), &child_folders, &child_pages, &mut visited);
                roots.push(SidebarNode::Folder {
                    id: folder.id,
                    name: folder.name.clone(),
                    children,
                });
            }
        }
        Ok(roots)
    }

    fn ensure_parent_exists(&self, parent_id: FolderId) -> Result<(), FolderServiceError> {
        self.folders
            .get_folder(parent_id)?
            .map(|_| ())
            .ok_or(FolderServiceError::ParentNotFound(parent_id))
    }

    fn require_folder(&self, id: FolderId) -> Result<Folder, FolderServiceError> {
        self.folders
            .get_folder(id)?
            .ok_or(FolderServiceError::FolderNotFound(id))
    }

    fn would_create_cycle(
        &self,
        folder_id: FolderId,
        candidate_parent_id: FolderId,
    ) -> Result<bool, FolderServiceError> {
        let mut visited = HashSet::new();
        let mut cursor = Some(candidate_parent_id);
        while let Some(current) = cursor {
            if current == folder_id || !visited.insert(current) {
                return Ok(true);
            }
            cursor = self
                .folders
                .get_folder(current)?
                .ok_or(FolderServiceError::ParentNotFound(current))?
                .parent_id;
        }
        Ok(false)
    }
}

fn build_level(
    parent: Option<FolderId>,
    child_folders: &BTreeMap<Option<FolderId>, Vec<&Folder>>,
    child_pages: &BTreeMap<Option<FolderId>, Vec<&Page>>,
    visited: &mut HashSet<FolderId>,
) -> Vec<SidebarNode> {
    let mut folders: Vec<&Folder> = child_folders.get(&parent).cloned().unwrap_or_default();
    folders.sort_by_key(|folder| folder.name.to_lowercase());
    let mut pages: Vec<&Page> = child_pages.get(&parent).cloned().unwrap_or_default();
    pages.sort_by_key(|page| page.title.to_lowercase());

    let mut nodes = Vec::with_capacity(folders.len() + pages.len());
    for folder in folders {
        if !visited.insert(folder.id) {
            continue;
        }
        nodes.push(SidebarNode::Folder {
            id: folder.id,
            name: folder.name.clone(),
            children: build_level(Some(folder.id), child_folders, child_pages, visited),
        });
    }
    nodes.extend(pages.into_iter().map(|page| SidebarNode::Page {
        id: page.id,
        title: page.title.clone(),
    }));
    nodes
}

fn collect_subtree(root: FolderId, folders: &[Folder]) -> Vec<FolderId> {
    let mut subtree = vec![root];
    let mut cursor = 0;
    while cursor < subtree.len() {
        let current = subtree[cursor];
        for folder in folders {
            if folder.parent_id == Some(current) && !subtree.contains(&folder.id) {
                subtree.push(folder.id);
            }
        }
        cursor += 1;
    }
    subtree
}

fn normalize_name(value: &str) -> Result<String, FolderServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FolderServiceError::InvalidName);
    }
    Ok(trimmed.to_string())
}
