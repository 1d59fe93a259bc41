//! Chapter length discovery.
//!
//! The verse service cannot say how many verses a chapter has, so a chapter
//! is walked verse by verse until the service reports a miss. [`ChapterProbe`]
//! holds that walk as a bounded state machine: it hands out the next verse
//! number to request and turns each lookup result into a [`ProbeStep`].
//! It never performs I/O itself.

use crate::catalog::BookCatalogEntry;
use crate::constants::MAX_VERSES_PER_CHAPTER;
use crate::model::Verse;
use crate::source::VerseLookup;
use crate::text::{format_reference, strip_markup};

/// Result of one verse request, reduced to what the probe needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The service returned a verse with this raw (possibly marked-up) text.
    Found(String),
    /// The service reported that the verse does not exist.
    NotFound,
}

impl From<VerseLookup> for ProbeOutcome {
    fn from(lookup: VerseLookup) -> Self {
        match lookup {
            VerseLookup::Found(fetched) => Self::Found(fetched.text.unwrap_or_default()),
            VerseLookup::NotFound => Self::NotFound,
        }
    }
}

/// What the probe made of one outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeStep {
    /// A verse with non-empty text.
    Verse(Verse),
    /// The verse exists but its text is empty after stripping markup.
    Skipped { verse: u32 },
    /// No further verses will be requested for this chapter.
    EndOfChapter,
}

/// Bounded verse-by-verse walk over one chapter.
#[derive(Debug, Clone)]
pub struct ChapterProbe {
    book_name: String,
    book_id: u32,
    translation: String,
    chapter: u32,
    next_verse: u32,
    max_verse: u32,
    finished: bool,
    at_ceiling: bool,
}

impl ChapterProbe {
    /// Starts a probe at verse 1 of `chapter`.
    ///
    /// `book_name` is the localized name used in references; the service's
    /// echoed book field is never trusted for naming.
    #[must_use]
    pub fn new(
        book: &BookCatalogEntry,
        book_name: impl Into<String>,
        translation: impl Into<String>,
        chapter: u32,
    ) -> Self {
        Self {
            book_name: book_name.into(),
            book_id: book.numeric_id,
            translation: translation.into(),
            chapter,
            next_verse: 1,
            max_verse: MAX_VERSES_PER_CHAPTER,
            finished: false,
            at_ceiling: false,
        }
    }

    /// Overrides the runaway guard (verse numbers above it are never requested).
    #[must_use]
    pub fn with_max_verse(mut self, max_verse: u32) -> Self {
        self.max_verse = max_verse;
        self
    }

    #[must_use]
    pub fn chapter(&self) -> u32 {
        self.chapter
    }

    /// The verse number to request next, or `None` once the chapter is over.
    #[must_use]
    pub fn next_verse(&self) -> Option<u32> {
        (!self.finished && self.next_verse <= self.max_verse).then_some(self.next_verse)
    }

    /// True when the walk stopped because it hit the verse ceiling.
    #[must_use]
    pub fn reached_ceiling(&self) -> bool {
        self.at_ceiling || self.next_verse > self.max_verse
    }

    /// Feeds the result for [`next_verse`](Self::next_verse) into the probe.
    pub fn record(&mut self, outcome: ProbeOutcome) -> ProbeStep {
        let Some(verse_number) = self.next_verse() else {
            return ProbeStep::EndOfChapter;
        };

        let raw = match outcome {
            ProbeOutcome::NotFound => {
                self.finished = true;
                return ProbeStep::EndOfChapter;
            }
            ProbeOutcome::Found(raw) => raw,
        };

        if verse_number >= self.max_verse {
            self.finished = true;
            self.at_ceiling = true;
        } else {
            self.next_verse = verse_number + 1;
        }

        let text = strip_markup(&raw);
        if text.is_empty() {
            return ProbeStep::Skipped {
                verse: verse_number,
            };
        }

        ProbeStep::Verse(Verse {
            text,
            reference: format_reference(&self.book_name, self.chapter, verse_number),
            translation_id: self.translation.clone(),
            book: Some(self.book_id),
            chapter: Some(self.chapter),
            verse: Some(verse_number),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::find_book;

    fn probe(chapter: u32) -> ChapterProbe {
        let john = find_book("John").unwrap();
        ChapterProbe::new(john, "Juan", "RV1960", chapter)
    }

    #[test]
    fn test_probe_starts_at_verse_one() {
        assert_eq!(probe(3).next_verse(), Some(1));
    }

    #[test]
    fn test_found_verse_uses_local_name_and_coordinates() {
        let mut probe = probe(3);
        let step = probe.record(ProbeOutcome::Found("<b>Porque</b> de tal manera ".into()));
        let ProbeStep::Verse(verse) = step else {
            panic!("expected verse, got {step:?}");
        };
        assert_eq!(verse.text, "Porque de tal manera");
        assert_eq!(verse.reference, "Juan 3:1");
        assert_eq!(verse.translation_id, "RV1960");
        assert_eq!(verse.book, Some(43));
        assert_eq!(verse.chapter, Some(3));
        assert_eq!(verse.verse, Some(1));
        assert_eq!(probe.next_verse(), Some(2));
    }

    #[test]
    fn test_not_found_ends_chapter() {
        let mut probe = probe(1);
        assert_eq!(probe.record(ProbeOutcome::NotFound), ProbeStep::EndOfChapter);
        assert_eq!(probe.next_verse(), None);
        assert!(!probe.reached_ceiling());
        assert_eq!(
            probe.record(ProbeOutcome::Found("late".into())),
            ProbeStep::EndOfChapter
        );
    }

    #[test]
    fn test_empty_text_is_skipped_but_advances() {
        let mut probe = probe(1);
        assert_eq!(
            probe.record(ProbeOutcome::Found("<br/>  ".into())),
            ProbeStep::Skipped { verse: 1 }
        );
        assert_eq!(probe.next_verse(), Some(2));
    }

    #[test]
    fn test_runaway_guard_stops_at_ceiling() {
        let mut probe = probe(1);
        let mut verses = 0;
        while probe.next_verse().is_some() {
            if let ProbeStep::Verse(_) = probe.record(ProbeOutcome::Found("text".into())) {
                verses += 1;
            }
        }
        assert_eq!(verses, MAX_VERSES_PER_CHAPTER);
        assert!(probe.reached_ceiling());
        assert_eq!(probe.record(ProbeOutcome::Found("text".into())), ProbeStep::EndOfChapter);
    }

    #[test]
    fn test_custom_ceiling() {
        let mut probe = probe(1).with_max_verse(2);
        assert!(matches!(probe.record(ProbeOutcome::Found("a".into())), ProbeStep::Verse(_)));
        assert!(matches!(probe.record(ProbeOutcome::Found("b".into())), ProbeStep::Verse(_)));
        assert_eq!(probe.next_verse(), None);
    }

    #[test]
    fn test_ceiling_at_u32_max_does_not_overflow() {
        let mut probe = probe(1).with_max_verse(u32::MAX);
        probe.next_verse = u32::MAX;
        let step = probe.record(ProbeOutcome::Found("last".into()));
        assert!(matches!(step, ProbeStep::Verse(v) if v.verse == Some(u32::MAX)));
        assert_eq!(probe.next_verse(), None);
        assert!(probe.reached_ceiling());
    }

    #[test]
    fn test_outcome_from_lookup() {
        assert_eq!(ProbeOutcome::from(VerseLookup::NotFound), ProbeOutcome::NotFound);
        let found = VerseLookup::Found(crate::source::FetchedVerse::default());
        assert_eq!(ProbeOutcome::from(found), ProbeOutcome::Found(String::new()));
    }
}
