//! Book download engine.
//!
//! The verse service returns one verse per request and cannot report chapter
//! lengths, so a book is fetched by walking every chapter in order with a
//! [`ChapterProbe`] until the service reports a miss. Requests are strictly
//! sequential and spaced by the shared [`RateLimiter`].
//!
//! While a download runs the book sits in the [`BookLibrary`] as a pending
//! entry that grows one chapter at a time. Success replaces it with the
//! complete book and persists the collection. Failure removes it, so a book is
//! either fully present or absent once the call returns. A pending entry left
//! by a dropped download is discarded by the next request for the same key.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use versebook_core::acquisition::{AcquisitionEngine, DownloadRequest, RateLimiter};
//! use versebook_core::catalog::find_book;
//! use versebook_core::source::BollsClient;
//! use versebook_core::{BookLibrary, MemoryStore, PreferenceStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(MemoryStore::new());
//! let engine = AcquisitionEngine::new(
//!     Arc::new(BollsClient::new("https://bolls.life")?),
//!     Arc::new(BookLibrary::load(store.clone()).await),
//!     Arc::new(PreferenceStore::load(store).await),
//!     Arc::new(RateLimiter::new(Duration::from_millis(50))),
//! );
//! let jude = find_book("Jude").ok_or("unknown book")?;
//! let outcome = engine.download_book(DownloadRequest::new(jude).translation("KJV")).await?;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use dashmap::DashSet;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, instrument, warn};

use super::error::AcquisitionError;
use super::probe::{ChapterProbe, ProbeStep};
use super::rate_limiter::RateLimiter;
use crate::catalog::BookCatalogEntry;
use crate::constants::MAX_VERSES_PER_CHAPTER;
use crate::library::{BookLibrary, BookStatus};
use crate::model::{BookKey, DownloadedBook, Language, Verse, now_millis};
use crate::preferences::{PreferenceStore, Preferences};
use crate::source::VerseSource;
use crate::store::Durability;

/// Progress notifications for one download, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadEvent {
    /// The pending entry exists and the first request is about to go out.
    Started { key: BookKey, chapters: u32 },
    /// A chapter finished; `progress` is the rounded percentage of chapters done.
    ChapterCompleted { chapter: u32, progress: u8 },
    /// The complete book was stored.
    Completed { verse_count: usize },
    /// The download was abandoned. Emitted at most once.
    Failed { message: String },
}

/// How a download request settled without error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The book was fetched and stored.
    Completed {
        key: BookKey,
        verse_count: usize,
        durability: Durability,
    },
    /// Another download for the same key is running; nothing was done.
    AlreadyInProgress { key: BookKey },
    /// The book is already in the library; nothing was done.
    AlreadyDownloaded { key: BookKey },
}

/// Parameters for [`AcquisitionEngine::download_book`].
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    book: &'static BookCatalogEntry,
    translation: Option<String>,
    events: Option<UnboundedSender<DownloadEvent>>,
}

impl DownloadRequest {
    /// Downloads `book` in the currently selected version.
    #[must_use]
    pub fn new(book: &'static BookCatalogEntry) -> Self {
        Self {
            book,
            translation: None,
            events: None,
        }
    }

    /// Overrides the translation code.
    #[must_use]
    pub fn translation(mut self, translation: impl Into<String>) -> Self {
        self.translation = Some(translation.into());
        self
    }

    /// Sends progress events to `events`. A dropped receiver is ignored.
    #[must_use]
    pub fn events(mut self, events: UnboundedSender<DownloadEvent>) -> Self {
        self.events = Some(events);
        self
    }

    fn emit(&self, event: DownloadEvent) {
        if let Some(events) = &self.events {
            let _ = events.send(event);
        }
    }
}

/// Downloads whole books into a [`BookLibrary`].
///
/// Share one engine (behind `Arc`) between callers so the in-flight guard
/// sees every request.
#[derive(Debug)]
pub struct AcquisitionEngine {
    source: Arc<dyn VerseSource>,
    library: Arc<BookLibrary>,
    preferences: Arc<PreferenceStore>,
    rate_limiter: Arc<RateLimiter>,
    in_flight: DashSet<BookKey>,
    max_verses_per_chapter: u32,
}

impl AcquisitionEngine {
    #[must_use]
    pub fn new(
        source: Arc<dyn VerseSource>,
        library: Arc<BookLibrary>,
        preferences: Arc<PreferenceStore>,
        rate_limiter: Arc<RateLimiter>,
    ) -> Self {
        Self {
            source,
            library,
            preferences,
            rate_limiter,
            in_flight: DashSet::new(),
            max_verses_per_chapter: MAX_VERSES_PER_CHAPTER,
        }
    }

    /// Overrides the per-chapter verse ceiling.
    #[must_use]
    pub fn with_max_verses_per_chapter(mut self, max_verses: u32) -> Self {
        self.max_verses_per_chapter = max_verses;
        self
    }

    #[must_use]
    pub fn library(&self) -> &Arc<BookLibrary> {
        &self.library
    }

    /// True while a download for `key` is running on this engine.
    #[must_use]
    pub fn is_in_flight(&self, key: &BookKey) -> bool {
        self.in_flight.contains(key)
    }

    /// Library key a request resolves to under the current preferences.
    #[must_use]
    pub fn key_for(&self, book: &BookCatalogEntry, translation: Option<&str>) -> BookKey {
        key_in(book, translation, &self.preferences.snapshot())
    }

    /// Finds a complete download of `book` under either language's name.
    ///
    /// The current language is tried first. Without an explicit translation
    /// each language pairs with its own selected version, so a book downloaded
    /// before a language switch stays reachable.
    pub async fn find_downloaded(
        &self,
        book: &BookCatalogEntry,
        translation: Option<&str>,
    ) -> Option<BookKey> {
        let prefs = self.preferences.snapshot();
        let others = Language::ALL
            .into_iter()
            .filter(|language| *language != prefs.language);
        for language in std::iter::once(prefs.language).chain(others) {
            let translation = translation
                .map_or_else(|| prefs.versions.get(language).to_string(), str::to_string);
            let key = BookKey::new(book.localized_name(language), translation);
            if matches!(self.library.status(&key).await, BookStatus::Complete { .. }) {
                return Some(key);
            }
        }
        None
    }

    /// Downloads every chapter of the requested book.
    ///
    /// The book is named in the current language and fetched in the requested
    /// translation, or the version selected for the current language.
    ///
    /// # Errors
    ///
    /// Returns [`AcquisitionError`] when any verse request fails. The pending
    /// entry is removed and a single [`DownloadEvent::Failed`] is emitted
    /// first; nothing of the book is kept.
    #[instrument(skip(self, request), fields(book = request.book.name, translation))]
    pub async fn download_book(
        &self,
        request: DownloadRequest,
    ) -> Result<DownloadOutcome, AcquisitionError> {
        let prefs = self.preferences.snapshot();
        let language = prefs.language;
        let key = key_in(request.book, request.translation.as_deref(), &prefs);
        tracing::Span::current().record("translation", key.translation.as_str());

        let Some(_guard) = InFlightGuard::acquire(&self.in_flight, &key) else {
            info!(%key, "download already in progress");
            return Ok(DownloadOutcome::AlreadyInProgress { key });
        };

        if !self.library.begin_download(&key, language).await {
            match self.library.status(&key).await {
                // We hold the in-flight key, so nothing is filling this entry.
                BookStatus::Pending { progress } => {
                    warn!(%key, progress, "discarding stale pending entry");
                    let _ = self.library.abandon_download(&key).await;
                    if !self.library.begin_download(&key, language).await {
                        return Ok(DownloadOutcome::AlreadyInProgress { key });
                    }
                }
                BookStatus::Complete { .. } | BookStatus::Absent => {
                    info!(%key, "book already downloaded");
                    return Ok(DownloadOutcome::AlreadyDownloaded { key });
                }
            }
        }

        let chapters = request.book.chapters;
        info!(%key, chapters, "starting book download");
        request.emit(DownloadEvent::Started {
            key: key.clone(),
            chapters,
        });

        let mut verses = Vec::new();
        for chapter in 1..=chapters {
            let chapter_verses = match self.fetch_chapter(request.book, &key, chapter).await {
                Ok(chapter_verses) => chapter_verses,
                Err(error) => {
                    warn!(
                        %key,
                        chapter,
                        error = %error,
                        "book download failed; discarding partial verses"
                    );
                    let _ = self.library.abandon_download(&key).await;
                    request.emit(DownloadEvent::Failed {
                        message: error.to_string(),
                    });
                    return Err(error);
                }
            };

            let progress = progress_percent(chapter, chapters);
            debug!(chapter, verses = chapter_verses.len(), progress, "chapter complete");
            verses.extend(chapter_verses.iter().cloned());
            let _ = self
                .library
                .append_to_pending(&key, chapter_verses, progress)
                .await;
            request.emit(DownloadEvent::ChapterCompleted { chapter, progress });
        }

        let verse_count = verses.len();
        let durability = self
            .library
            .finish_download(DownloadedBook {
                book_name: key.book_name.clone(),
                translation: key.translation.clone(),
                language,
                verses,
                downloaded_at: now_millis(),
            })
            .await;

        info!(
            %key,
            verse_count,
            throttled_ms = self.rate_limiter.cumulative_delay(self.source.host()).as_millis(),
            "book download complete"
        );
        request.emit(DownloadEvent::Completed { verse_count });

        Ok(DownloadOutcome::Completed {
            key,
            verse_count,
            durability,
        })
    }

    /// Deletes a downloaded book.
    ///
    /// Returns `None` when no complete book matched `key`. A book that is
    /// still downloading cannot be deleted.
    pub async fn delete_book(&self, key: &BookKey) -> Option<Durability> {
        self.library.delete(key).await
    }

    async fn fetch_chapter(
        &self,
        book: &BookCatalogEntry,
        key: &BookKey,
        chapter: u32,
    ) -> Result<Vec<Verse>, AcquisitionError> {
        let mut probe = ChapterProbe::new(
            book,
            key.book_name.as_str(),
            key.translation.as_str(),
            chapter,
        )
        .with_max_verse(self.max_verses_per_chapter);
        let mut verses = Vec::new();

        while let Some(verse_number) = probe.next_verse() {
            self.rate_limiter.acquire(self.source.host()).await;
            let lookup = self
                .source
                .verse(&key.translation, book.numeric_id, chapter, verse_number)
                .await
                .map_err(|source| {
                    AcquisitionError::from_source(key.clone(), chapter, verse_number, source)
                })?;

            match probe.record(lookup.into()) {
                ProbeStep::Verse(verse) => verses.push(verse),
                ProbeStep::Skipped { verse } => debug!(chapter, verse, "skipping empty verse"),
                ProbeStep::EndOfChapter => break,
            }
        }

        if probe.reached_ceiling() {
            warn!(
                chapter,
                max_verses = self.max_verses_per_chapter,
                "verse ceiling reached; treating as end of chapter"
            );
        }
        Ok(verses)
    }
}

fn key_in(book: &BookCatalogEntry, translation: Option<&str>, prefs: &Preferences) -> BookKey {
    let translation =
        translation.map_or_else(|| prefs.versions.get(prefs.language).to_string(), str::to_string);
    BookKey::new(book.localized_name(prefs.language), translation)
}

/// Holds a key in the in-flight set until dropped.
struct InFlightGuard<'a> {
    set: &'a DashSet<BookKey>,
    key: BookKey,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(set: &'a DashSet<BookKey>, key: &BookKey) -> Option<Self> {
        set.insert(key.clone()).then(|| Self {
            set,
            key: key.clone(),
        })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.set.remove(&self.key);
    }
}

/// `round(completed / total * 100)`, with halves rounded up.
#[must_use]
pub fn progress_percent(completed: u32, total: u32) -> u8 {
    if total == 0 {
        return 100;
    }
    let completed = u64::from(completed.min(total));
    let total = u64::from(total);
    u8::try_from((200 * completed + total) / (2 * total)).unwrap_or(100)
}
