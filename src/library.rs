//! Downloaded-books collection.
//!
//! Each `(book name, translation)` key has at most one [`LibraryEntry`]. An
//! entry is either [`LibraryEntry::Pending`] while a download runs or
//! [`LibraryEntry::Complete`] once it has finished. Only complete books are
//! written to the `downloadedBooks` blob; pending entries live in memory and
//! disappear with the process.
//!
//! All mutations happen under one collection lock, and the durable write is
//! issued before that lock is released. A progress update racing a delete
//! therefore cannot drop either change.

use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tracing::{debug, info, instrument, warn};

use crate::model::{BookKey, DownloadedBook, Language, LibraryEntry, PendingBook, Verse, now_millis};
use crate::store::{Durability, KeyValueStore, keys, load_json, save_json};

/// Status of one key in the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookStatus {
    Absent,
    /// Download in flight with the last reported progress.
    Pending { progress: u8 },
    Complete { verse_count: usize },
}

/// Owned downloaded-books state with write-through persistence.
#[derive(Debug)]
pub struct BookLibrary {
    entries: Mutex<Vec<LibraryEntry>>,
    store: Arc<dyn KeyValueStore>,
    updates: watch::Sender<Arc<Vec<LibraryEntry>>>,
}

impl BookLibrary {
    /// Loads the persisted books. Unreadable data yields an empty library.
    ///
    /// Duplicate keys in the stored blob keep their last occurrence.
    #[instrument(skip(store))]
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let books = match load_json::<Vec<DownloadedBook>>(store.as_ref(), keys::DOWNLOADED_BOOKS)
            .await
        {
            Ok(Some(books)) => books,
            Ok(None) => Vec::new(),
            Err(error) => {
                warn!(error = %error, "failed to load downloaded books; starting empty");
                Vec::new()
            }
        };

        let mut entries: Vec<LibraryEntry> = Vec::with_capacity(books.len());
        for book in books {
            let key = book.key();
            entries.retain(|entry| !entry.matches(&key));
            entries.push(LibraryEntry::Complete(book));
        }
        debug!(count = entries.len(), "downloaded books loaded");

        let (updates, _) = watch::channel(Arc::new(entries.clone()));
        Self {
            entries: Mutex::new(entries),
            store,
            updates,
        }
    }

    /// Snapshot of every entry, pending ones included.
    pub async fn entries(&self) -> Vec<LibraryEntry> {
        self.entries.lock().await.clone()
    }

    /// Snapshot of completed books only.
    pub async fn completed(&self) -> Vec<DownloadedBook> {
        self.entries
            .lock()
            .await
            .iter()
            .filter_map(LibraryEntry::as_complete)
            .cloned()
            .collect()
    }

    pub async fn find_complete(&self, key: &BookKey) -> Option<DownloadedBook> {
        self.entries
            .lock()
            .await
            .iter()
            .find(|entry| entry.matches(key))
            .and_then(LibraryEntry::as_complete)
            .cloned()
    }

    pub async fn status(&self, key: &BookKey) -> BookStatus {
        let entries = self.entries.lock().await;
        match entries.iter().find(|entry| entry.matches(key)) {
            None => BookStatus::Absent,
            Some(LibraryEntry::Pending(pending)) => BookStatus::Pending {
                progress: pending.progress,
            },
            Some(LibraryEntry::Complete(book)) => BookStatus::Complete {
                verse_count: book.verses.len(),
            },
        }
    }

    /// Subscribes to snapshots published after every change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<LibraryEntry>>> {
        self.updates.subscribe()
    }

    /// Inserts an empty pending entry for `key`.
    ///
    /// Returns `false` and changes nothing when any entry for `key` exists.
    #[instrument(skip(self), fields(key = %key))]
    pub async fn begin_download(&self, key: &BookKey, language: Language) -> bool {
        let mut entries = self.entries.lock().await;
        if entries.iter().any(|entry| entry.matches(key)) {
            return false;
        }
        entries.push(LibraryEntry::Pending(PendingBook {
            key: key.clone(),
            language,
            verses: Vec::new(),
            progress: 0,
            started_at: now_millis(),
        }));
        debug!("pending entry created");
        self.publish(&entries);
        true
    }

    /// Appends a finished chapter's verses to the pending entry for `key`.
    ///
    /// Returns `false` when no pending entry exists for `key`.
    pub async fn append_to_pending(&self, key: &BookKey, verses: Vec<Verse>, progress: u8) -> bool {
        let mut entries = self.entries.lock().await;
        let Some(LibraryEntry::Pending(pending)) =
            entries.iter_mut().find(|entry| entry.matches(key))
        else {
            return false;
        };
        pending.verses.extend(verses);
        pending.progress = progress;
        self.publish(&entries);
        true
    }

    /// Promotes the pending entry to a complete book and persists the collection.
    ///
    /// Any entry with the same key is replaced, so exactly one remains.
    #[instrument(skip(self, book), fields(book = %book.book_name, translation = %book.translation))]
    pub async fn finish_download(&self, book: DownloadedBook) -> Durability {
        let key = book.key();
        let verse_count = book.verses.len();
        let mut entries = self.entries.lock().await;
        entries.retain(|entry| !entry.matches(&key));
        entries.push(LibraryEntry::Complete(book));
        info!(verse_count, "book stored");
        self.save(&entries).await
    }

    /// Drops the pending entry for `key` without touching durable storage.
    ///
    /// Complete entries are left alone. Returns `true` if an entry was removed.
    #[instrument(skip(self), fields(key = %key))]
    pub async fn abandon_download(&self, key: &BookKey) -> bool {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|entry| !(entry.is_pending() && entry.matches(key)));
        let removed = entries.len() != before;
        if removed {
            debug!("pending entry discarded");
            self.publish(&entries);
        }
        removed
    }

    /// Deletes the complete book for `key` and persists the collection.
    ///
    /// Returns `None` when no complete book matched; pending entries cannot be deleted.
    #[instrument(skip(self), fields(key = %key))]
    pub async fn delete(&self, key: &BookKey) -> Option<Durability> {
        let mut entries = self.entries.lock().await;
        let index = entries
            .iter()
            .position(|entry| !entry.is_pending() && entry.matches(key))?;
        entries.remove(index);
        info!("book deleted");
        Some(self.save(&entries).await)
    }

    fn publish(&self, entries: &[LibraryEntry]) {
        self.updates.send_replace(Arc::new(entries.to_vec()));
    }

    async fn save(&self, entries: &[LibraryEntry]) -> Durability {
        self.publish(entries);
        let books: Vec<&DownloadedBook> =
            entries.iter().filter_map(LibraryEntry::as_complete).collect();
        match save_json(self.store.as_ref(), keys::DOWNLOADED_BOOKS, &books).await {
            Ok(()) => Durability::Persisted,
            Err(error) => {
                warn!(
                    error = %error,
                    "failed to save downloaded books; keeping in-memory collection"
                );
                Durability::MemoryOnly
            }
        }
    }
}
