//! User preferences: language, per-language translation version, theme.
//!
//! Preferences load once at startup. Mutators change memory synchronously and
//! then write the affected key through to the [`KeyValueStore`]. A failed
//! write is logged and reported as [`Durability::MemoryOnly`]; the in-memory
//! change is never rolled back.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use versebook_core::{Language, MemoryStore, PreferenceStore};
//!
//! # async fn example() {
//! let prefs = PreferenceStore::load(Arc::new(MemoryStore::new())).await;
//! let _ = prefs.change_language(Language::Es).await;
//! assert_eq!(prefs.selected_version(), "RV1960");
//! # }
//! ```

use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::model::{Language, ThemeMode};
use crate::store::{Durability, KeyValueStore, keys};

/// Version used for English when nothing is stored.
pub const DEFAULT_VERSION_EN: &str = "WEB";

/// Version used for Spanish when nothing is stored.
pub const DEFAULT_VERSION_ES: &str = "RV1960";

/// Selected translation version for each language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionSelection {
    pub en: String,
    pub es: String,
}

impl Default for VersionSelection {
    fn default() -> Self {
        Self {
            en: DEFAULT_VERSION_EN.to_string(),
            es: DEFAULT_VERSION_ES.to_string(),
        }
    }
}

impl VersionSelection {
    #[must_use]
    pub fn get(&self, language: Language) -> &str {
        match language {
            Language::En => &self.en,
            Language::Es => &self.es,
        }
    }

    fn set(&mut self, language: Language, version: String) {
        match language {
            Language::En => self.en = version,
            Language::Es => self.es = version,
        }
    }
}

/// Snapshot of all preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preferences {
    pub language: Language,
    pub versions: VersionSelection,
    pub theme: ThemeMode,
}

/// Owned preference state with write-through persistence.
#[derive(Debug)]
pub struct PreferenceStore {
    state: RwLock<Preferences>,
    store: Arc<dyn KeyValueStore>,
    /// Serializes durable writes so the last mutation is the last write.
    write_lock: Mutex<()>,
}

impl PreferenceStore {
    /// Loads preferences from `store`, falling back to defaults per key.
    ///
    /// Read failures and unrecognized values are logged and replaced by defaults.
    #[instrument(skip(store))]
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let mut prefs = Preferences::default();

        if let Some(raw) = read_key(store.as_ref(), keys::LANGUAGE).await {
            match raw.parse::<Language>() {
                Ok(language) => prefs.language = language,
                Err(reason) => warn!(%reason, "ignoring stored language"),
            }
        }
        if let Some(version) = read_key(store.as_ref(), keys::VERSION_EN).await
            && !version.trim().is_empty()
        {
            prefs.versions.en = version;
        }
        if let Some(version) = read_key(store.as_ref(), keys::VERSION_ES).await
            && !version.trim().is_empty()
        {
            prefs.versions.es = version;
        }
        if let Some(raw) = read_key(store.as_ref(), keys::THEME).await {
            match raw.parse::<ThemeMode>() {
                Ok(theme) => prefs.theme = theme,
                Err(reason) => warn!(%reason, "ignoring stored theme"),
            }
        }

        debug!(
            language = %prefs.language,
            version_en = %prefs.versions.en,
            version_es = %prefs.versions.es,
            theme = %prefs.theme,
            "preferences loaded"
        );

        Self {
            state: RwLock::new(prefs),
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Returns a copy of the current preferences.
    #[must_use]
    pub fn snapshot(&self) -> Preferences {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn language(&self) -> Language {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .language
    }

    #[must_use]
    pub fn theme(&self) -> ThemeMode {
        self.state.read().unwrap_or_else(PoisonError::into_inner).theme
    }

    #[must_use]
    pub fn selected_versions(&self) -> VersionSelection {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .versions
            .clone()
    }

    /// Version selected for the current language.
    #[must_use]
    pub fn selected_version(&self) -> String {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.versions.get(state.language).to_string()
    }

    /// Version selected for `language`.
    #[must_use]
    pub fn version_for(&self, language: Language) -> String {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .versions
            .get(language)
            .to_string()
    }

    /// Switches the interface language.
    #[instrument(skip(self))]
    pub async fn change_language(&self, language: Language) -> Durability {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .language = language;
        info!(%language, "language changed");

        let _guard = self.write_lock.lock().await;
        let current = self.language();
        self.persist(keys::LANGUAGE, current.as_str()).await
    }

    /// Selects `version` for the current language; the other language keeps its selection.
    #[instrument(skip(self))]
    pub async fn change_version(&self, version: &str) -> Durability {
        let language = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            let language = state.language;
            state.versions.set(language, version.to_string());
            language
        };
        info!(%language, version, "version changed");

        let _guard = self.write_lock.lock().await;
        let current = self.version_for(language);
        self.persist(version_key(language), &current).await
    }

    /// Flips between light and dark and returns the new mode with its durability.
    #[instrument(skip(self))]
    pub async fn cycle_theme(&self) -> (ThemeMode, Durability) {
        let theme = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            state.theme = state.theme.toggled();
            state.theme
        };
        info!(%theme, "theme changed");

        let _guard = self.write_lock.lock().await;
        let current = self.theme();
        (theme, self.persist(keys::THEME, current.as_str()).await)
    }

    async fn persist(&self, key: &str, value: &str) -> Durability {
        match self.store.set(key, value).await {
            Ok(()) => Durability::Persisted,
            Err(error) => {
                warn!(key, error = %error, "failed to persist preference; keeping in-memory value");
                Durability::MemoryOnly
            }
        }
    }
}

fn version_key(language: Language) -> &'static str {
    match language {
        Language::En => keys::VERSION_EN,
        Language::Es => keys::VERSION_ES,
    }
}

async fn read_key(store: &dyn KeyValueStore, key: &str) -> Option<String> {
    match store.get(key).await {
        Ok(value) => value,
        Err(error) => {
            warn!(key, error = %error, "failed to read preference; using default");
            None
        }
    }
}
