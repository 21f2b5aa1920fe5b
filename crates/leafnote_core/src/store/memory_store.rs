//! In-memory key-value store for tests and ephemeral sessions.

use super::{KvStore, StoreError, StoreResult};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

/// `BTreeMap`-backed store. Not thread-safe; the editor is single-threaded.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: RefCell<BTreeMap<String, String>>,
    offline: Cell<bool>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates an unavailable backend: every call fails until re-enabled.
    pub fn set_offline(&self, offline: bool) {
        self.offline.set(offline);
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    fn ensure_online(&self) -> StoreResult<()> {
        if self.offline.get() {
            return Err(StoreError::Unavailable("memory store is offline".to_string()));
        }
        Ok(())
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.ensure_online()?;
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.ensure_online()?;
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> StoreResult<bool> {
        self.ensure_online()?;
        Ok(self.entries.borrow_mut().remove(key).is_some())
    }

    fn scan_prefix(&self, prefix: &str) -> StoreResult<Vec<(String, String)>> {
        self.ensure_online()?;
        Ok(self
            .entries
            .borrow()
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryKvStore;
    use crate::store::{KvStore, StoreError};

    #[test]
    fn scan_prefix_stops_at_prefix_boundary() {
        let store = MemoryKvStore::new();
        store.set("page:b", "2").unwrap();
        store.set("page:a", "1").unwrap();
        store.set("pagex", "x").unwrap();
        store.set("folder:a", "f").unwrap();

        let entries = store.scan_prefix("page:").unwrap();
        assert_eq!(
            entries,
            vec![
                ("page:a".to_string(), "1".to_string()),
                ("page:b".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn offline_store_rejects_calls() {
        let store = MemoryKvStore::new();
        store.set_offline(true);
        assert!(matches!(
            store.get("settings"),
            Err(StoreError::Unavailable(_))
        ));
        store.set_offline(false);
        assert!(store.get("settings").unwrap().is_none());
    }
}
