//! Errors surfaced by a failed book download.

use thiserror::Error;

use crate::model::BookKey;
use crate::source::SourceError;

/// A download aborted; nothing of the book was kept.
///
/// Persistence failures never appear here. They are logged and reported
/// through [`Durability`](crate::store::Durability) instead.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    /// A verse request failed for a reason other than "verse does not exist".
    #[error("downloading {key} failed at chapter {chapter}, verse {verse}: {source}")]
    Source {
        key: BookKey,
        chapter: u32,
        verse: u32,
        #[source]
        source: SourceError,
    },
}

impl AcquisitionError {
    pub fn from_source(key: BookKey, chapter: u32, verse: u32, source: SourceError) -> Self {
        Self::Source {
            key,
            chapter,
            verse,
            source,
        }
    }

    /// Identity of the book whose download failed.
    #[must_use]
    pub fn key(&self) -> &BookKey {
        match self {
            Self::Source { key, .. } => key,
        }
    }

    /// True when retrying later may succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Source { source, .. } => source.is_transient(),
        }
    }
}
