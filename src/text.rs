//! Verse text helpers: markup stripping, favorite ids, share text.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::Verse;

/// Any `<...>` tag. The verse service embeds `<br/>`, `<i>`, `<S>` and similar.
#[allow(clippy::expect_used)]
static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag regex is valid"));

/// Removes inline markup tags and trims surrounding whitespace.
///
/// A `<` with no closing `>` after it is left in place; every `<...>` span is
/// removed, so the result never contains a complete tag.
#[must_use]
pub fn strip_markup(raw: &str) -> String {
    TAG_PATTERN.replace_all(raw, "").trim().to_string()
}

/// Builds the favorites key for a verse reference in a translation.
#[must_use]
pub fn favorite_id(reference: &str, translation_id: &str) -> String {
    format!("{reference}-{translation_id}")
}

/// Composes the text handed to a share sheet or clipboard.
#[must_use]
pub fn share_text(verse: &Verse) -> String {
    format!(
        "{}\n\n\u{2014} {} ({})",
        verse.text, verse.reference, verse.translation_id
    )
}

/// Formats a `Book Chapter:Verse` reference.
#[must_use]
pub fn format_reference(book_name: &str, chapter: u32, verse: u32) -> String {
    format!("{book_name} {chapter}:{verse}")
}
