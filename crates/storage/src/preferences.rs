use std::rc::Rc;

use tankobon_core::{ReadingMode, ReadingPreferences};

use crate::{MemoryStore, SharedStore, read_json, write_json};

const PREFERENCES_KEY: &str = "reading_preferences";
/// Bare mode string written by builds that predate the preferences record.
const LEGACY_MODE_KEY: &str = "reading_mode";

/// Process-wide reading preferences, written through on every change.
#[derive(Debug)]
pub struct PreferencesStore {
    backend: SharedStore,
    preferences: ReadingPreferences,
    degraded: bool,
}

impl PreferencesStore {
    pub fn open(backend: SharedStore) -> Self {
        let mut store = Self {
            backend,
            preferences: ReadingPreferences::default(),
            degraded: false,
        };
        store.load();
        store
    }

    pub fn in_memory() -> Self {
        Self::open(Rc::new(MemoryStore::new()))
    }

    fn load(&mut self) {
        match read_json::<ReadingPreferences>(self.backend.as_ref(), PREFERENCES_KEY) {
            Ok(Some(mut preferences)) => {
                preferences.normalize();
                self.preferences = preferences;
            }
            Ok(None) => self.migrate_legacy_mode(),
            Err(crate::StorageError::Corrupt(err)) => {
                log::warn!("discarding unreadable reading preferences: {err}");
            }
            Err(err) => {
                log::warn!("reading preferences unavailable, keeping them in memory: {err}");
                self.degraded = true;
            }
        }
    }

    fn migrate_legacy_mode(&mut self) {
        let legacy = match self.backend.get(LEGACY_MODE_KEY) {
            Ok(Some(value)) => value,
            Ok(None) => return,
            Err(err) => {
                log::warn!("reading preferences unavailable, keeping them in memory: {err}");
                self.degraded = true;
                return;
            }
        };

        self.preferences.mode = ReadingMode::from_persisted(&legacy);
        log::info!(
            "migrated legacy reading mode {legacy:?} to {}",
            self.preferences.mode
        );
        self.persist();
        if !self.degraded
            && let Err(err) = self.backend.remove(LEGACY_MODE_KEY)
        {
            log::debug!("failed to drop legacy reading mode key: {err}");
        }
    }

    pub fn get(&self) -> &ReadingPreferences {
        &self.preferences
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn update(&mut self, apply: impl FnOnce(&mut ReadingPreferences)) {
        apply(&mut self.preferences);
        self.preferences.normalize();
        self.persist();
    }

    pub fn toggle_mode(&mut self) -> ReadingMode {
        self.update(ReadingPreferences::toggle_mode);
        self.preferences.mode
    }

    fn persist(&mut self) {
        if self.degraded {
            return;
        }
        if let Err(err) = write_json(self.backend.as_ref(), PREFERENCES_KEY, &self.preferences) {
            log::warn!("failed to persist reading preferences, continuing in memory: {err}");
            self.degraded = true;
        }
    }
}
