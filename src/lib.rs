//! Versebook Core Library
//!
//! Fetches scripture verses from a remote verse service, keeps a favorites
//! collection, and downloads whole books for offline reading.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`acquisition`] - Whole-book download engine with progress and in-flight guard
//! - [`catalog`] - Static 66-book catalog and translation versions
//! - [`db`] - Database connection and schema management
//! - [`favorites`] - Favorites collection store
//! - [`library`] - Downloaded-books collection with pending/complete entries
//! - [`lookup`] - Random verse and single verse lookups
//! - [`preferences`] - Language, version, and theme preferences
//! - [`source`] - Verse service client
//! - [`store`] - Durable key-value persistence
//! - [`text`] - Markup stripping and share text

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod acquisition;
pub mod catalog;
pub mod constants;
pub mod db;
pub mod favorites;
pub mod library;
pub mod lookup;
pub mod model;
pub mod preferences;
pub mod source;
pub mod store;
pub mod text;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use acquisition::{
    AcquisitionEngine, AcquisitionError, DownloadEvent, DownloadOutcome, DownloadRequest,
    RateLimiter,
};
pub use catalog::{BIBLE_BOOKS, BookCatalogEntry, TranslationVersion, available_versions, find_book};
pub use db::{Database, DbError};
pub use favorites::{FavoriteToggle, FavoritesStore};
pub use library::{BookLibrary, BookStatus};
pub use model::{
    BookKey, DownloadedBook, FavoriteVerse, Language, LibraryEntry, PendingBook, ThemeMode, Verse,
};
pub use preferences::{PreferenceStore, Preferences, VersionSelection};
pub use source::{BollsClient, SourceError, VerseLookup, VerseSource};
pub use store::{Durability, KeyValueStore, MemoryStore, SqliteStore, StoreError};
pub use text::share_text;
