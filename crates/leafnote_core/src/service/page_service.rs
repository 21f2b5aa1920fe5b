//! Page use-case service.
//!
//! # Responsibility
//! - Create, rename, delete, list and search pages.
//! - Keep `[[links]]` in other pages pointing at a renamed page.
//! - Attach and remove voice memos.
//!
//! # Invariants
//! - Titles are trimmed; blank titles become `Untitled`.
//! - Renaming with link rewrite touches only pages that link to the old title.

use crate::markdown::wikilink::{links_to, replace_wiki_links};
use crate::model::page::{Page, PageId, VoiceMemo, UNTITLED_PAGE_TITLE};
use crate::repo::page_repo::PageRepository;
use crate::repo::RepoError;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Service error for page use-cases.
#[derive(Debug)]
pub enum PageServiceError {
    PageNotFound(PageId),
    VoiceMemoNotFound { page_id: PageId, memo_id: Uuid },
    /// Transcript is blank after trim.
    EmptyTranscript,
    Repo(RepoError),
}

impl Display for PageServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PageNotFound(id) => write!(f, "page not found: {id}"),
            Self::VoiceMemoNotFound { page_id, memo_id } => {
                write!(f, "voice memo {memo_id} not found on page {page_id}")
            }
            Self::EmptyTranscript => write!(f, "voice transcript must not be blank"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PageServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for PageServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::PageNotFound(id) => Self::PageNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Outcome of a rename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameResult {
    pub page: Page,
    /// Pages whose links were rewritten to the new title.
    pub relinked_pages: Vec<PageId>,
}

/// Page service facade over a repository implementation.
pub struct PageService<R: PageRepository> {
    repo: R,
}

impl<R: PageRepository> PageService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates an empty root-level page.
    pub fn create_page(&self, title: &str) -> Result<Page, PageServiceError> {
        let page = Page::new(normalize_title(title));
        self.repo.save_page(&page)?;
        info!(
            "event=page_create module=service status=ok page_id={}",
            page.id
        );
        Ok(page)
    }

    pub fn get_page(&self, id: PageId) -> Result<Option<Page>, PageServiceError> {
        Ok(self.repo.get_page(id)?)
    }

    /// Lists pages, most recently updated first.
    pub fn list_pages(&self) -> Result<Vec<Page>, PageServiceError> {
        Ok(self.repo.list_pages()?)
    }

    /// Renames one page, optionally rewriting `[[old title]]` links elsewhere.
    pub fn rename_page(
        &self,
        id: PageId,
        title: &str,
        rewrite_links: bool,
    ) -> Result<RenameResult, PageServiceError> {
        let mut page = self.require_page(id)?;
        let old_title = std::mem::replace(&mut page.title, normalize_title(title));
        page.touch();
        self.repo.save_page(&page)?;

        let mut relinked_pages = Vec::new();
        if rewrite_links && !old_title.eq_ignore_ascii_case(&page.title) {
            for mut other in self.repo.list_pages()? {
                if other.id == id || !links_to(&other.content, &old_title) {
                    continue;
                }
                other.content = replace_wiki_links(&other.content, &old_title, &page.title);
                other.touch();
                self.repo.save_page(&other)?;
                relinked_pages.push(other.id);
            }
        }

        info!(
            "event=page_rename module=service status=ok page_id={id} relinked={}",
            relinked_pages.len()
        );
        Ok(RenameResult {
            page,
            relinked_pages,
        })
    }

    pub fn delete_page(&self, id: PageId) -> Result<(), PageServiceError> {
        self.repo.delete_page(id)?;
        info!("event=page_delete module=service status=ok page_id={id}");
        Ok(())
    }

    /// Case-insensitive substring search over titles and content.
    ///
    /// Returns an empty list for blank queries.
    pub fn search(&self, query: &str) -> Result<Vec<Page>, PageServiceError> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .repo
            .list_pages()?
            .into_iter()
            .filter(|page| {
                page.title.to_lowercase().contains(&needle)
                    || page.content.to_lowercase().contains(&needle)
            })
            .collect())
    }

    /// Attaches a finished transcript to a page.
    pub fn add_voice_memo(
        &self,
        page_id: PageId,
        transcript: &str,
    ) -> Result<VoiceMemo, PageServiceError> {
        let transcript = transcript.trim();
        if transcript.is_empty() {
            return Err(PageServiceError::EmptyTranscript);
        }
        let mut page = self.require_page(page_id)?;
        let memo = VoiceMemo::new(transcript);
        page.voice_memos.push(memo.clone());
        page.touch();
        self.repo.save_page(&page)?;
        Ok(memo)
    }

    pub fn delete_voice_memo(&self, page_id: PageId, memo_id: Uuid) -> Result<(), PageServiceError> {
        let mut page = self.require_page(page_id)?;
        let before = page.voice_memos.len();
        page.voice_memos.retain(|memo| memo.id != memo_id);
        if page.voice_memos.len() == before {
            return Err(PageServiceError::VoiceMemoNotFound { page_id, memo_id });
        }
        page.touch();
        self.repo.save_page(&page)?;
        Ok(())
    }

    fn require_page(&self, id: PageId) -> Result<Page, PageServiceError> {
        self.repo
            .get_page(id)?
            .ok_or(PageServiceError::PageNotFound(id))
    }
}

fn normalize_title(title: &str) -> String {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        UNTITLED_PAGE_TITLE.to_string()
    } else {
        trimmed.to_string()
    }
}
