//! Single-verse lookups: the random verse of the day and verses by coordinates.

use tracing::{debug, instrument};

use crate::catalog::book_by_id;
use crate::model::{Language, Verse};
use crate::source::{FetchedVerse, SourceError, VerseLookup, VerseSource};
use crate::text::format_reference;

/// Fetches a random verse in `translation`.
///
/// The reference names the book in `language`; books outside the catalog
/// fall back to their ordinal.
///
/// # Errors
///
/// Returns [`SourceError`] when the request fails, the service answers with a
/// non-success status, or the payload lacks its coordinates.
#[instrument(skip(source))]
pub async fn random_verse(
    source: &dyn VerseSource,
    language: Language,
    translation: &str,
) -> Result<Verse, SourceError> {
    let fetched = source.random_verse(translation).await?;
    let (Some(book), Some(chapter), Some(verse)) = (fetched.book, fetched.chapter, fetched.verse)
    else {
        return Err(SourceError::decode(
            format!("random verse ({translation})"),
            "response is missing book, chapter or verse",
        ));
    };
    debug!(book, chapter, verse, "random verse fetched");
    Ok(build_verse(&fetched, language, translation, book, chapter, verse))
}

/// Fetches one verse by book ordinal, chapter, and verse number.
///
/// Returns `Ok(None)` when the service has no such verse.
///
/// # Errors
///
/// Returns [`SourceError`] for network and decode failures.
#[instrument(skip(source))]
pub async fn lookup_verse(
    source: &dyn VerseSource,
    language: Language,
    translation: &str,
    book: u32,
    chapter: u32,
    verse: u32,
) -> Result<Option<Verse>, SourceError> {
    match source.verse(translation, book, chapter, verse).await? {
        VerseLookup::Found(fetched) => Ok(Some(build_verse(
            &fetched,
            language,
            translation,
            book,
            chapter,
            verse,
        ))),
        VerseLookup::NotFound => Ok(None),
    }
}

fn build_verse(
    fetched: &FetchedVerse,
    language: Language,
    translation: &str,
    book: u32,
    chapter: u32,
    verse: u32,
) -> Verse {
    let book_name = book_by_id(book)
        .map_or_else(|| book.to_string(), |entry| entry.localized_name(language).to_string());
    Verse {
        text: fetched.clean_text(),
        reference: format_reference(&book_name, chapter, verse),
        translation_id: translation.to_string(),
        book: Some(book),
        chapter: Some(chapter),
        verse: Some(verse),
    }
}
