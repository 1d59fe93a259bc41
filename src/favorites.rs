//! Favorites collection.
//!
//! At most one favorite per id (`reference-translation`), most recent first.
//! Every mutation rewrites the whole `favorites` blob while holding the
//! collection lock, so concurrent toggles cannot lose each other's writes.

use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tracing::{debug, info, instrument, warn};

use crate::model::{FavoriteVerse, Verse};
use crate::store::{Durability, KeyValueStore, keys, load_json, save_json};

/// What a toggle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteToggle {
    Added,
    Removed,
}

/// Owned favorites state with write-through persistence.
#[derive(Debug)]
pub struct FavoritesStore {
    favorites: Mutex<Vec<FavoriteVerse>>,
    store: Arc<dyn KeyValueStore>,
    updates: watch::Sender<Arc<Vec<FavoriteVerse>>>,
}

impl FavoritesStore {
    /// Loads the favorites collection; unreadable data yields an empty collection.
    #[instrument(skip(store))]
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let favorites = match load_json::<Vec<FavoriteVerse>>(store.as_ref(), keys::FAVORITES).await
        {
            Ok(Some(favorites)) => dedupe(favorites),
            Ok(None) => Vec::new(),
            Err(error) => {
                warn!(error = %error, "failed to load favorites; starting empty");
                Vec::new()
            }
        };
        debug!(count = favorites.len(), "favorites loaded");

        let (updates, _) = watch::channel(Arc::new(favorites.clone()));
        Self {
            favorites: Mutex::new(favorites),
            store,
            updates,
        }
    }

    /// Returns the favorites, most recent first.
    pub async fn list(&self) -> Vec<FavoriteVerse> {
        self.favorites.lock().await.clone()
    }

    /// Subscribes to collection snapshots published after every mutation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<FavoriteVerse>>> {
        self.updates.subscribe()
    }

    /// Returns true when `verse` (same reference and translation) is saved.
    pub async fn is_favorite(&self, verse: &Verse) -> bool {
        let id = verse.favorite_id();
        self.favorites.lock().await.iter().any(|fav| fav.id == id)
    }

    /// Adds `verse` at the front, or removes it when already saved.
    #[instrument(
        skip(self, verse),
        fields(reference = %verse.reference, translation = %verse.translation_id)
    )]
    pub async fn toggle(&self, verse: &Verse) -> (FavoriteToggle, Durability) {
        let id = verse.favorite_id();
        let mut favorites = self.favorites.lock().await;

        let outcome = if let Some(index) = favorites.iter().position(|fav| fav.id == id) {
            favorites.remove(index);
            FavoriteToggle::Removed
        } else {
            favorites.insert(0, FavoriteVerse::new(verse.clone()));
            FavoriteToggle::Added
        };
        info!(%id, ?outcome, "favorite toggled");

        let durability = self.save(&favorites).await;
        (outcome, durability)
    }

    /// Removes the favorite with `id`. Returns `None` when nothing matched.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: &str) -> Option<Durability> {
        let mut favorites = self.favorites.lock().await;
        let index = favorites.iter().position(|fav| fav.id == id)?;
        favorites.remove(index);
        info!(%id, "favorite removed");
        Some(self.save(&favorites).await)
    }

    async fn save(&self, favorites: &[FavoriteVerse]) -> Durability {
        self.updates.send_replace(Arc::new(favorites.to_vec()));
        match save_json(self.store.as_ref(), keys::FAVORITES, favorites).await {
            Ok(()) => Durability::Persisted,
            Err(error) => {
                warn!(error = %error, "failed to save favorites; keeping in-memory collection");
                Durability::MemoryOnly
            }
        }
    }
}

/// Keeps the first (most recent) favorite for each id.
fn dedupe(favorites: Vec<FavoriteVerse>) -> Vec<FavoriteVerse> {
    let mut seen = std::collections::HashSet::new();
    let before = favorites.len();
    let kept: Vec<_> = favorites
        .into_iter()
        .filter(|fav| seen.insert(fav.id.clone()))
        .collect();
    if kept.len() != before {
        warn!(dropped = before - kept.len(), "dropped duplicate favorites");
    }
    kept
}
