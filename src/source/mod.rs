//! Remote verse service access.
//!
//! The service answers one verse per request and has no bulk or
//! chapter-length endpoint. [`VerseSource`] is the seam the acquisition engine
//! and the CLI talk to; [`BollsClient`] is the HTTP implementation.
//!
//! # Example
//!
//! ```no_run
//! use versebook_core::source::{BollsClient, VerseLookup, VerseSource};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = BollsClient::new("https://bolls.life")?;
//! if let VerseLookup::Found(verse) = client.verse("KJV", 43, 3, 16).await? {
//!     println!("{}", verse.clean_text());
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod error;

use async_trait::async_trait;
use serde::Deserialize;

pub use client::BollsClient;
pub use error::SourceError;

use crate::text::strip_markup;

/// Verse payload as returned by the service.
///
/// `text` may carry inline markup; the structural fields echo what the
/// service thinks it returned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FetchedVerse {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub book: Option<u32>,
    #[serde(default)]
    pub chapter: Option<u32>,
    #[serde(default)]
    pub verse: Option<u32>,
}

impl FetchedVerse {
    /// Verse text with markup stripped and whitespace trimmed.
    #[must_use]
    pub fn clean_text(&self) -> String {
        self.text.as_deref().map(strip_markup).unwrap_or_default()
    }
}

/// Result of a single verse lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerseLookup {
    /// The service returned the verse.
    Found(FetchedVerse),
    /// The service answered with a non-success status: no such verse.
    NotFound,
}

/// A service that resolves verses by coordinates.
#[async_trait]
pub trait VerseSource: Send + Sync + std::fmt::Debug {
    /// Fetches a random verse in `translation`.
    ///
    /// # Errors
    ///
    /// Any network, status, or decode failure; a missing verse is an error here.
    async fn random_verse(&self, translation: &str) -> Result<FetchedVerse, SourceError>;

    /// Looks up one verse by book ordinal, chapter, and verse number.
    ///
    /// # Errors
    ///
    /// Network and decode failures. A non-success status is
    /// [`VerseLookup::NotFound`], not an error.
    async fn verse(
        &self,
        translation: &str,
        book: u32,
        chapter: u32,
        verse: u32,
    ) -> Result<VerseLookup, SourceError>;

    /// Host used to key request throttling.
    fn host(&self) -> &str;
}
