//! CLI command handlers.

mod books;
mod config;
mod favorites;
mod prefs;
mod verse;

use anyhow::{Result, bail};
use versebook_core::{BookCatalogEntry, Durability, Verse, find_book, share_text};

pub(crate) use books::{
    run_books_command, run_delete_command, run_download_command, run_read_command,
};
pub(crate) use config::run_config_show_command;
pub(crate) use favorites::{
    run_favorite_command, run_favorites_command, run_unfavorite_command,
};
pub(crate) use prefs::{
    run_prefs_language_command, run_prefs_show_command, run_prefs_theme_command,
    run_prefs_version_command, run_versions_command,
};
pub(crate) use verse::{run_random_command, run_verse_command};

/// Resolves a book argument (name in either language, or 1-66).
pub(crate) fn resolve_book(query: &str) -> Result<&'static BookCatalogEntry> {
    match find_book(query) {
        Some(book) => Ok(book),
        None => bail!("Unknown book '{query}'. Use an English or Spanish name, or a number 1-66"),
    }
}

/// Tells the user when a change only lives in memory.
pub(crate) fn report_durability(durability: Durability) {
    if !durability.is_persisted() {
        eprintln!("warning: the change could not be saved and will be lost when versebook exits");
    }
}

pub(crate) fn render_verse(verse: &Verse, favorite: bool, share: bool) -> String {
    if share {
        return share_text(verse);
    }
    let marker = if favorite { " *" } else { "" };
    format!(
        "{} ({}){marker}\n{}",
        verse.reference, verse.translation_id, verse.text
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verse() -> Verse {
        Verse {
            text: "Jesus wept.".to_string(),
            reference: "John 11:35".to_string(),
            translation_id: "KJV".to_string(),
            book: Some(43),
            chapter: Some(11),
            verse: Some(35),
        }
    }

    #[test]
    fn test_render_verse_plain_and_favorite() {
        assert_eq!(render_verse(&verse(), false, false), "John 11:35 (KJV)\nJesus wept.");
        assert_eq!(
            render_verse(&verse(), true, false),
            "John 11:35 (KJV) *\nJesus wept."
        );
    }

    #[test]
    fn test_render_verse_share_format() {
        assert_eq!(
            render_verse(&verse(), true, true),
            "Jesus wept.\n\n\u{2014} John 11:35 (KJV)"
        );
    }

    #[test]
    fn test_resolve_book_accepts_spanish_and_numbers() {
        assert_eq!(resolve_book("Génesis").unwrap().numeric_id, 1);
        assert_eq!(resolve_book("66").unwrap().name, "Revelation");
        assert!(resolve_book("Xyzzy").is_err());
    }
}
