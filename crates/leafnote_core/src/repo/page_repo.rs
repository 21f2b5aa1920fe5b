//! Page repository contract and key-value implementation.
//!
//! # Invariants
//! - Pages live under `page:<uuid>`.
//! - `list_pages` is sorted by `updated_at DESC, id ASC`.
//! - `update_content` replaces the content fully and stamps `updated_at`.

use super::{RepoError, RepoResult};
use crate::model::page::{Page, PageId};
use crate::store::{get_record, put_record, scan_records, KvStore, PAGE_KEY_PREFIX};

/// Repository interface for page persistence.
pub trait PageRepository {
    fn get_page(&self, id: PageId) -> RepoResult<Option<Page>>;
    fn list_pages(&self) -> RepoResult<Vec<Page>>;
    /// Inserts or replaces one page.
    fn save_page(&self, page: &Page) -> RepoResult<()>;
    /// Deletes one page. Missing pages are reported as `PageNotFound`.
    fn delete_page(&self, id: PageId) -> RepoResult<()>;
    /// Replaces the serialized block content of one page.
    fn update_content(&self, id: PageId, content: &str) -> RepoResult<()> {
        let mut page = self.get_page(id)?.ok_or(RepoError::PageNotFound(id))?;
        page.content = content.to_string();
        page.touch();
        self.save_page(&page)
    }
}

impl<R: PageRepository + ?Sized> PageRepository for &R {
    fn get_page(&self, id: PageId) -> RepoResult<Option<Page>> {
        (**self).get_page(id)
    }

    fn list_pages(&self) -> RepoResult<Vec<Page>> {
        (**self).list_pages()
    }

    fn save_page(&self, page: &Page) -> RepoResult<()> {
        (**self).save_page(page)
    }

    fn delete_page(&self, id: PageId) -> RepoResult<()> {
        (**self).delete_page(id)
    }

    fn update_content(&self, id: PageId, content: &str) -> RepoResult<()> {
        (**self).update_content(id, content)
    }
}

/// Store key for one page.
pub fn page_key(id: PageId) -> String {
    format!("{PAGE_KEY_PREFIX}{id}")
}

/// Page repository over any [`KvStore`].
pub struct KvPageRepository<S: KvStore> {
    store: S,
}

impl<S: KvStore> KvPageRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S: KvStore> PageRepository for KvPageRepository<S> {
    fn get_page(&self, id: PageId) -> RepoResult<Option<Page>> {
        Ok(get_record(&self.store, &page_key(id))?)
    }

    fn list_pages(&self) -> RepoResult<Vec<Page>> {
        let mut pages: Vec<Page> = scan_records(&self.store, PAGE_KEY_PREFIX)?;
        pages.sort_by(|left, right| {
            right
                .updated_at
                .cmp(&left.updated_at)
                .then_with(|| left.id.cmp(&right.id))
        });
        Ok(pages)
    }

    fn save_page(&self, page: &Page) -> RepoResult<()> {
        Ok(put_record(&self.store, &page_key(page.id), page)?)
    }

    fn delete_page(&self, id: PageId) -> RepoResult<()> {
        if !self.store.delete(&page_key(id))? {
            return Err(RepoError::PageNotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{KvPageRepository, PageRepository};
    use crate::model::page::Page;
    use crate::repo::RepoError;
    use crate::store::{KvStore, MemoryKvStore};

    #[test]
    fn list_skips_undecodable_records() {
        let store = MemoryKvStore::new();
        let repo = KvPageRepository::new(&store);
        let good = Page::new("Good");
        repo.save_page(&good).unwrap();
        store.set("page:zzzz", "{not json").unwrap();

        let pages = repo.list_pages().unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].id, good.id);
    }

    #[test]
    fn list_is_most_recently_updated_first() {
        let store = MemoryKvStore::new();
        let repo = KvPageRepository::new(&store);
        let mut old = Page::new("old");
        old.updated_at = 10;
        let mut new = Page::new("new");
        new.updated_at = 20;
        repo.save_page(&old).unwrap();
        repo.save_page(&new).unwrap();

        let titles: Vec<String> = repo
            .list_pages()
            .unwrap()
            .into_iter()
            .map(|page| page.title)
            .collect();
        assert_eq!(titles, vec!["new".to_string(), "old".to_string()]);
    }

    #[test]
    fn update_content_requires_an_existing_page() {
        let store = MemoryKvStore::new();
        let repo = KvPageRepository::new(&store);
        let page = Page::new("p");
        assert!(matches!(
            repo.update_content(page.id, "x"),
            Err(RepoError::PageNotFound(_))
        ));

        repo.save_page(&page).unwrap();
        repo.update_content(page.id, "x").unwrap();
        let stored = repo.get_page(page.id).unwrap().unwrap();
        assert_eq!(stored.content, "x");
        assert!(stored.updated_at >= page.updated_at);
    }
}
