//! Page link resolution and backlink discovery.
//!
//! # Responsibility
//! - Resolve `[[Title]]` targets to page ids (case-insensitive exact match).
//! - Discover backlinks by scanning every page's content.
//!
//! # Invariants
//! - Backlinks are computed on demand; no link index is stored.
//! - A page never counts as its own backlink.
//! - Resolution failures caused by the store degrade to "unresolved".

use crate::markdown::wikilink::{extract_wiki_links, links_to, LinkResolver};
use crate::model::page::{Page, PageId};
use crate::repo::page_repo::PageRepository;
use crate::repo::RepoResult;
use log::warn;

/// Page that links to another page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backlink {
    pub page_id: PageId,
    pub title: String,
}

/// Link found in a page, with its resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingLink {
    pub title: String,
    pub target: Option<PageId>,
}

/// Link service over a page repository.
pub struct LinkService<R: PageRepository> {
    pages: R,
}

impl<R: PageRepository> LinkService<R> {
    pub fn new(pages: R) -> Self {
        Self { pages }
    }

    /// Finds the page titled `title`, ignoring case. When titles collide the
    /// most recently updated page wins.
    pub fn find_by_title(&self, title: &str) -> RepoResult<Option<Page>> {
        let wanted = title.trim().to_lowercase();
        if wanted.is_empty() {
            return Ok(None);
        }
        Ok(self
            .pages
            .list_pages()?
            .into_iter()
            .find(|page| page.title.trim().to_lowercase() == wanted))
    }

    /// Pages whose content links to `page_id`'s title, sorted by title.
    pub fn backlinks(&self, page_id: PageId) -> RepoResult<Vec<Backlink>> {
        let pages = self.pages.list_pages()?;
        let Some(target) = pages.iter().find(|page| page.id == page_id) else {
            return Ok(Vec::new());
        };

        let mut backlinks: Vec<Backlink> = pages
            .iter()
            .filter(|page| page.id != page_id && links_to(&page.content, &target.title))
            .map(|page| Backlink {
                page_id: page.id,
                title: page.title.clone(),
            })
            .collect();
        backlinks.sort_by_key(|link| link.title.to_lowercase());
        Ok(backlinks)
    }

    /// Links contained in `page_id`, in first-seen order.
    pub fn outgoing_links(&self, page_id: PageId) -> RepoResult<Vec<OutgoingLink>> {
        let Some(page) = self.pages.get_page(page_id)? else {
            return Ok(Vec::new());
        };
        extract_wiki_links(&page.content)
            .into_iter()
            .map(|title| {
                let target = self.find_by_title(&title)?.map(|found| found.id);
                Ok(OutgoingLink { title, target })
            })
            .collect()
    }
}

impl<R: PageRepository> LinkResolver for LinkService<R> {
    fn resolve(&self, title: &str) -> Option<PageId> {
        match self.find_by_title(title) {
            Ok(page) => page.map(|page| page.id),
            Err(err) => {
                warn!(
                    "event=link_resolve module=service status=fallback error_code=store_unavailable error={err}"
                );
                None
            }
        }
    }
}
