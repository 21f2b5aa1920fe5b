//! Settings persistence with default fallback.
//!
//! # Invariants
//! - `load` never fails: missing, unreadable or corrupt records yield
//!   `Settings::default()` and a logged warning.

use crate::model::settings::Settings;
use crate::store::{get_record, put_record, KvStore, StoreResult, SETTINGS_KEY};
use log::warn;

/// Settings repository over any [`KvStore`].
pub struct SettingsRepository<S: KvStore> {
    store: S,
}

impl<S: KvStore> SettingsRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Loads settings, falling back to defaults on any store failure.
    pub fn load(&self) -> Settings {
        match get_record::<_, Settings>(&self.store, SETTINGS_KEY) {
            Ok(Some(settings)) => settings,
            Ok(None) => Settings::default(),
            Err(err) => {
                warn!(
                    "event=settings_load module=repo status=fallback error_code=settings_unreadable error={err}"
                );
                Settings::default()
            }
        }
    }

    pub fn save(&self, settings: &Settings) -> StoreResult<()> {
        put_record(&self.store, SETTINGS_KEY, settings)
    }
}

#[cfg(test)]
mod tests {
    use super::SettingsRepository;
    use crate::model::settings::{AiProviderKind, Settings};
    use crate::store::{KvStore, MemoryKvStore, SETTINGS_KEY};

    #[test]
    fn saved_settings_load_back() {
        let store = MemoryKvStore::new();
        let repo = SettingsRepository::new(&store);
        let settings = Settings {
            ai_provider: Some(AiProviderKind::Gemini),
            gemini_api_key: Some("g-key".to_string()),
            ..Settings::default()
        };
        repo.save(&settings).unwrap();
        assert_eq!(repo.load(), settings);
    }

    #[test]
    fn corrupt_or_unreachable_settings_fall_back_to_defaults() {
        let store = MemoryKvStore::new();
        store.set(SETTINGS_KEY, "[1, 2").unwrap();
        let repo = SettingsRepository::new(&store);
        assert_eq!(repo.load(), Settings::default());

        store.set_offline(true);
        assert_eq!(repo.load(), Settings::default());
    }

    #[test]
    fn partial_records_keep_defaults_for_missing_fields() {
        let store = MemoryKvStore::new();
        store
            .set(SETTINGS_KEY, r#"{"aiProvider":"openai","autosaveDelayMs":800}"#)
            .unwrap();
        let loaded = SettingsRepository::new(&store).load();
        assert_eq!(loaded.ai_provider, Some(AiProviderKind::OpenAi));
        assert_eq!(loaded.autosave_delay_ms, 800);
        assert_eq!(loaded.speech_language, "en-US");
    }
}
