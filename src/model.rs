//! Domain records shared by the preference, favorites, and library stores.
//!
//! Serialized field names match the JSON blobs written by earlier releases of
//! the app, so collections saved there load unchanged.

use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Interface language. Selects localized book names and the version slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English.
    #[default]
    En,
    /// Spanish.
    Es,
}

impl Language {
    /// Both supported languages, in display order.
    pub const ALL: [Self; 2] = [Self::En, Self::Es];

    /// Returns the stable storage code (`en` / `es`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "es" => Ok(Self::Es),
            other => Err(format!("unsupported language '{other}': expected en or es")),
        }
    }
}

/// Light or dark presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    /// Returns the stable storage code (`light` / `dark`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Returns the other mode.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(format!("unsupported theme '{other}': expected light or dark")),
        }
    }
}

/// A single verse as fetched from the verse service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    /// Verse text with markup stripped.
    pub text: String,
    /// Human readable `Book Chapter:Verse`.
    pub reference: String,
    /// Translation code the verse was fetched with.
    pub translation_id: String,
    /// 1-based canonical book ordinal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verse: Option<u32>,
}

impl Verse {
    /// Returns the favorites de-duplication key: `reference-translation`.
    #[must_use]
    pub fn favorite_id(&self) -> String {
        crate::text::favorite_id(&self.reference, &self.translation_id)
    }
}

/// A verse saved to favorites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteVerse {
    #[serde(flatten)]
    pub verse: Verse,
    /// Always `verse.favorite_id()`.
    pub id: String,
    /// Epoch milliseconds.
    #[serde(rename = "savedAt")]
    pub saved_at: u64,
}

impl FavoriteVerse {
    /// Wraps a verse, deriving its id and stamping the current time.
    #[must_use]
    pub fn new(verse: Verse) -> Self {
        let id = verse.favorite_id();
        Self {
            verse,
            id,
            saved_at: now_millis(),
        }
    }
}

/// Identity of a downloaded book: localized name plus translation code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BookKey {
    pub book_name: String,
    pub translation: String,
}

impl BookKey {
    #[must_use]
    pub fn new(book_name: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            book_name: book_name.into(),
            translation: translation.into(),
        }
    }
}

impl fmt::Display for BookKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.book_name, self.translation)
    }
}

/// A fully downloaded book as persisted in the `downloadedBooks` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadedBook {
    pub book_name: String,
    pub translation: String,
    pub language: Language,
    pub verses: Vec<Verse>,
    /// Epoch milliseconds.
    pub downloaded_at: u64,
}

impl DownloadedBook {
    #[must_use]
    pub fn key(&self) -> BookKey {
        BookKey::new(&self.book_name, &self.translation)
    }
}

/// A download that has started but not finished.
///
/// Holds the verses accumulated so far so observers can watch the book grow.
/// Never written to durable storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingBook {
    pub key: BookKey,
    pub language: Language,
    pub verses: Vec<Verse>,
    /// Last reported progress, 0..=100.
    pub progress: u8,
    /// Epoch milliseconds.
    pub started_at: u64,
}

/// Status of a book in the library view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryEntry {
    /// Download in flight.
    Pending(PendingBook),
    /// Download finished; a zero-verse book is still complete.
    Complete(DownloadedBook),
}

impl LibraryEntry {
    #[must_use]
    pub fn key(&self) -> BookKey {
        match self {
            Self::Pending(pending) => pending.key.clone(),
            Self::Complete(book) => book.key(),
        }
    }

    /// Returns true when `key` identifies this entry.
    #[must_use]
    pub fn matches(&self, key: &BookKey) -> bool {
        match self {
            Self::Pending(pending) => pending.key == *key,
            Self::Complete(book) => {
                book.book_name == key.book_name && book.translation == key.translation
            }
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }

    #[must_use]
    pub fn verses(&self) -> &[Verse] {
        match self {
            Self::Pending(pending) => &pending.verses,
            Self::Complete(book) => &book.verses,
        }
    }

    /// Returns the completed book, or `None` while the download is pending.
    #[must_use]
    pub fn as_complete(&self) -> Option<&DownloadedBook> {
        match self {
            Self::Complete(book) => Some(book),
            Self::Pending(_) => None,
        }
    }
}

/// Current wall clock time in epoch milliseconds.
#[must_use]
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}
