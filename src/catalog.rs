//! Static book catalog and translation versions.
//!
//! The verse service addresses books by their 1-based position in the
//! canonical 66-book ordering, so the catalog is the only place names map to
//! ordinals.

use strsim::normalized_levenshtein;

use crate::model::Language;

/// One book of the canonical ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookCatalogEntry {
    /// English name.
    pub name: &'static str,
    /// Spanish name.
    pub spanish_name: &'static str,
    /// Number of chapters.
    pub chapters: u32,
    /// 1-based canonical position.
    pub numeric_id: u32,
}

impl BookCatalogEntry {
    /// Returns the book name in `language`.
    #[must_use]
    pub fn localized_name(&self, language: Language) -> &'static str {
        match language {
            Language::En => self.name,
            Language::Es => self.spanish_name,
        }
    }
}

/// A translation the verse service offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslationVersion {
    /// Service code, e.g. `WEB`.
    pub code: &'static str,
    /// Display name.
    pub name: &'static str,
}

/// Minimum similarity for a fuzzy book name match.
const FUZZY_MATCH_THRESHOLD: f64 = 0.75;

const RAW_BOOKS: [(&str, &str, u32); 66] = [
    ("Genesis", "Génesis", 50),
    ("Exodus", "Éxodo", 40),
    ("Leviticus", "Levítico", 27),
    ("Numbers", "Números", 36),
    ("Deuteronomy", "Deuteronomio", 34),
    ("Joshua", "Josué", 24),
    ("Judges", "Jueces", 21),
    ("Ruth", "Rut", 4),
    ("1 Samuel", "1 Samuel", 31),
    ("2 Samuel", "2 Samuel", 24),
    ("1 Kings", "1 Reyes", 22),
    ("2 Kings", "2 Reyes", 25),
    ("1 Chronicles", "1 Crónicas", 29),
    ("2 Chronicles", "2 Crónicas", 36),
    ("Ezra", "Esdras", 10),
    ("Nehemiah", "Nehemías", 13),
    ("Esther", "Ester", 10),
    ("Job", "Job", 42),
    ("Psalms", "Salmos", 150),
    ("Proverbs", "Proverbios", 31),
    ("Ecclesiastes", "Eclesiastés", 12),
    ("Song of Solomon", "Cantares", 8),
    ("Isaiah", "Isaías", 66),
    ("Jeremiah", "Jeremías", 52),
    ("Lamentations", "Lamentaciones", 5),
    ("Ezekiel", "Ezequiel", 48),
    ("Daniel", "Daniel", 12),
    ("Hosea", "Oseas", 14),
    ("Joel", "Joel", 3),
    ("Amos", "Amós", 9),
    ("Obadiah", "Abdías", 1),
    ("Jonah", "Jonás", 4),
    ("Micah", "Miqueas", 7),
    ("Nahum", "Nahúm", 3),
    ("Habakkuk", "Habacuc", 3),
    ("Zephaniah", "Sofonías", 3),
    ("Haggai", "Hageo", 2),
    ("Zechariah", "Zacarías", 14),
    ("Malachi", "Malaquías", 4),
    ("Matthew", "Mateo", 28),
    ("Mark", "Marcos", 16),
    ("Luke", "Lucas", 24),
    ("John", "Juan", 21),
    ("Acts", "Hechos", 28),
    ("Romans", "Romanos", 16),
    ("1 Corinthians", "1 Corintios", 16),
    ("2 Corinthians", "2 Corintios", 13),
    ("Galatians", "Gálatas", 6),
    ("Ephesians", "Efesios", 6),
    ("Philippians", "Filipenses", 4),
    ("Colossians", "Colosenses", 4),
    ("1 Thessalonians", "1 Tesalonicenses", 5),
    ("2 Thessalonians", "2 Tesalonicenses", 3),
    ("1 Timothy", "1 Timoteo", 6),
    ("2 Timothy", "2 Timoteo", 4),
    ("Titus", "Tito", 3),
    ("Philemon", "Filemón", 1),
    ("Hebrews", "Hebreos", 13),
    ("James", "Santiago", 5),
    ("1 Peter", "1 Pedro", 5),
    ("2 Peter", "2 Pedro", 3),
    ("1 John", "1 Juan", 5),
    ("2 John", "2 Juan", 1),
    ("3 John", "3 Juan", 1),
    ("Jude", "Judas", 1),
    ("Revelation", "Apocalipsis", 22),
];

/// All 66 books in canonical order.
pub static BIBLE_BOOKS: [BookCatalogEntry; 66] = {
    let mut books = [BookCatalogEntry {
        name: "",
        spanish_name: "",
        chapters: 0,
        numeric_id: 0,
    }; 66];
    let mut index = 0;
    while index < RAW_BOOKS.len() {
        let (name, spanish_name, chapters) = RAW_BOOKS[index];
        #[allow(clippy::cast_possible_truncation)]
        let numeric_id = index as u32 + 1;
        books[index] = BookCatalogEntry {
            name,
            spanish_name,
            chapters,
            numeric_id,
        };
        index += 1;
    }
    books
};

const ENGLISH_VERSIONS: &[TranslationVersion] = &[
    TranslationVersion { code: "WEB", name: "World English Bible" },
    TranslationVersion { code: "KJV", name: "King James Version" },
    TranslationVersion { code: "NKJV", name: "New King James Version" },
    TranslationVersion { code: "ASV", name: "American Standard Version" },
    TranslationVersion { code: "YLT", name: "Young's Literal Translation" },
    TranslationVersion { code: "BSB", name: "Berean Standard Bible" },
];

const SPANISH_VERSIONS: &[TranslationVersion] = &[
    TranslationVersion { code: "RV1960", name: "Reina-Valera 1960" },
    TranslationVersion { code: "NVI", name: "Nueva Versión Internacional" },
    TranslationVersion { code: "LBLA", name: "La Biblia de las Américas" },
    TranslationVersion { code: "PDT", name: "Palabra de Dios para Todos" },
];

/// Translations offered for `language`.
#[must_use]
pub fn available_versions(language: Language) -> &'static [TranslationVersion] {
    match language {
        Language::En => ENGLISH_VERSIONS,
        Language::Es => SPANISH_VERSIONS,
    }
}

/// Looks a book up by its 1-based ordinal.
#[must_use]
pub fn book_by_id(numeric_id: u32) -> Option<&'static BookCatalogEntry> {
    let index = usize::try_from(numeric_id.checked_sub(1)?).ok()?;
    BIBLE_BOOKS.get(index)
}

/// Finds a book by ordinal, English or Spanish name.
///
/// Exact matches (case-insensitive, also ignoring spaces) win; otherwise the
/// closest name above a similarity threshold is returned.
#[must_use]
pub fn find_book(query: &str) -> Option<&'static BookCatalogEntry> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }
    if let Ok(numeric_id) = query.parse::<u32>() {
        return book_by_id(numeric_id);
    }

    let wanted = normalize(query);
    if let Some(book) = BIBLE_BOOKS
        .iter()
        .find(|book| normalize(book.name) == wanted || normalize(book.spanish_name) == wanted)
    {
        return Some(book);
    }

    BIBLE_BOOKS
        .iter()
        .map(|book| {
            let score = normalized_levenshtein(&wanted, &normalize(book.name))
                .max(normalized_levenshtein(&wanted, &normalize(book.spanish_name)));
            (book, score)
        })
        .filter(|(_, score)| *score >= FUZZY_MATCH_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(book, _)| book)
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|ch| !ch.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}
