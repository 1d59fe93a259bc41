//! Shared runtime context built after CLI and config handling.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;
use versebook_core::{
    AcquisitionEngine, BollsClient, BookLibrary, Database, FavoritesStore, KeyValueStore,
    PreferenceStore, RateLimiter, SqliteStore,
};

use super::config_runtime::Settings;

/// Stores and services opened once per invocation.
///
/// Commands borrow the context; nothing holds a private copy of a collection.
pub(crate) struct AppContext {
    pub(crate) settings: Settings,
    pub(crate) source: Arc<BollsClient>,
    pub(crate) preferences: Arc<PreferenceStore>,
    pub(crate) favorites: FavoritesStore,
    pub(crate) library: Arc<BookLibrary>,
    pub(crate) engine: AcquisitionEngine,
    db: Database,
}

impl AppContext {
    pub(crate) async fn open(settings: Settings) -> Result<Self> {
        let db = Database::new(&settings.db_path).await.with_context(|| {
            format!("Failed to open database '{}'", settings.db_path.display())
        })?;
        let store: Arc<dyn KeyValueStore> = Arc::new(SqliteStore::new(db.clone()));

        let source = Arc::new(
            BollsClient::with_timeouts(
                &settings.base_url,
                settings.connect_timeout_secs,
                settings.read_timeout_secs,
            )
            .context("Failed to create verse service client")?,
        );

        let preferences = Arc::new(PreferenceStore::load(store.clone()).await);
        let favorites = FavoritesStore::load(store.clone()).await;
        let library = Arc::new(BookLibrary::load(store).await);
        let engine = AcquisitionEngine::new(
            source.clone(),
            library.clone(),
            preferences.clone(),
            Arc::new(RateLimiter::new(settings.request_delay)),
        );
        debug!(db = %settings.db_path.display(), base_url = %settings.base_url, "context ready");

        Ok(Self {
            settings,
            source,
            preferences,
            favorites,
            library,
            engine,
            db,
        })
    }

    pub(crate) async fn close(self) {
        self.db.close().await;
    }
}
