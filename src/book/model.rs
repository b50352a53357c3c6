//! Study-tracking model
//!
//! Chapters and sections as read from a study document, with the progress
//! metadata attached to each section. Both are snapshots: they are built by
//! the parser and never mutated afterwards.
//!
//! Identity is by number alone. Two chapters (or sections) with the same
//! number are the same entity even if their names differ, so maps and sets are
//! keyed by [`ChapterKey`] / [`SectionKey`] rather than by the entities.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use super::duration::Minutes;
use crate::error::{Error, Result};
use crate::progress;

/// Entities identified by a key rather than by their full contents
pub trait Keyed {
    type Key: Eq + Hash + Clone;

    fn key(&self) -> &Self::Key;
}

/// Chapter number as written in the document (e.g. "3")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChapterKey(String);

impl ChapterKey {
    pub fn new(number: impl Into<String>) -> Self {
        Self(number.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value, if the number is an integer
    pub fn ordinal(&self) -> Option<u64> {
        self.0.trim().parse().ok()
    }
}

/// Section number as written in the document ("3.2", or "7" in flat documents)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionKey(String);

impl SectionKey {
    pub fn new(number: impl Into<String>) -> Self {
        Self(number.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key of the chapter this section belongs to: everything before the first `.`
    pub fn chapter_key(&self) -> ChapterKey {
        let prefix = self.0.split('.').next().unwrap_or_default();
        ChapterKey::new(prefix)
    }

    /// Sort position of the section
    ///
    /// Dotted numbers sort by `(chapter, section)`; flat numbers by their
    /// single integer, as `(n, 0)`.
    pub fn ordinal(&self, has_chapters: bool) -> Result<(u64, u64)> {
        let non_numeric = || Error::NonNumericOrdinal { number: self.0.clone() };
        let parse = |segment: &str| segment.trim().parse::<u64>().map_err(|_| non_numeric());

        if has_chapters {
            let mut segments = self.0.split('.');
            let chapter = segments.next().ok_or_else(non_numeric)?;
            let section = segments.next().ok_or_else(non_numeric)?;
            Ok((parse(chapter)?, parse(section)?))
        } else {
            Ok((parse(&self.0)?, 0))
        }
    }
}

macro_rules! key_conversions {
    ($key:ty) => {
        impl fmt::Display for $key {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl Borrow<str> for $key {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $key {
            fn from(number: &str) -> Self {
                Self::new(number)
            }
        }
    };
}

key_conversions!(ChapterKey);
key_conversions!(SectionKey);

/// A chapter in a study document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chapter {
    /// Chapter title
    pub name: String,
    /// Chapter number
    pub number: ChapterKey,
    /// Sections within this chapter, keyed by section number
    pub sections: HashMap<SectionKey, Section>,
}

impl Chapter {
    /// Create a chapter with no sections
    pub fn new(name: impl Into<String>, number: impl Into<ChapterKey>) -> Self {
        Self { name: name.into(), number: number.into(), sections: HashMap::new() }
    }

    /// Page progress across this chapter's sections
    pub fn progress_percent(&self) -> Result<f64> {
        let sections: Vec<Section> = self.sections.values().cloned().collect();
        progress::total_progress_percent(&sections)
    }

    /// A chapter is done once it has sections and all of them are done
    pub fn is_done(&self) -> bool {
        !self.sections.is_empty() && self.sections.values().all(Section::is_done)
    }

    /// Sum of section page counts
    pub fn total_pages(&self) -> u32 {
        self.sections.values().map(|s| s.pg).sum()
    }
}

impl Keyed for Chapter {
    type Key = ChapterKey;

    fn key(&self) -> &ChapterKey {
        &self.number
    }
}

impl From<String> for ChapterKey {
    fn from(number: String) -> Self {
        Self(number)
    }
}

impl From<String> for SectionKey {
    fn from(number: String) -> Self {
        Self(number)
    }
}

/// The atomic unit of study: pages, time and performance for one section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// Section title
    pub name: String,
    /// Section number
    pub number: SectionKey,
    /// Owning chapter; `None` in flat documents
    pub chapter: Option<ChapterKey>,
    /// Total pages
    pub pg: u32,
    /// Pages read so far in an unfinished section (0 when unused)
    pub temp_pg: u32,
    /// Time the section is expected to take
    pub time_req: Minutes,
    /// Time spent on the section so far
    pub time_done: Minutes,
    /// Performance percentage (0-100)
    pub performance: u32,
    /// Number of practice questions
    pub questions: u32,
    /// Number of practice questions answered
    pub questions_done: u32,
    pub practice_time_req: Minutes,
    pub practice_time_done: Minutes,
    /// Practice performance percentage (0-100)
    pub p_performance: u32,
}

impl Section {
    /// Create a section with all progress fields at zero
    pub fn new(name: impl Into<String>, number: impl Into<SectionKey>) -> Self {
        Self {
            name: name.into(),
            number: number.into(),
            chapter: None,
            pg: 0,
            temp_pg: 0,
            time_req: Minutes::ZERO,
            time_done: Minutes::ZERO,
            performance: 0,
            questions: 0,
            questions_done: 0,
            practice_time_req: Minutes::ZERO,
            practice_time_done: Minutes::ZERO,
            p_performance: 0,
        }
    }

    /// Set the page counts
    pub fn with_pages(mut self, pg: u32, temp_pg: u32) -> Self {
        self.pg = pg;
        self.temp_pg = temp_pg;
        self
    }

    /// Set the time spent
    pub fn with_time_done(mut self, time_done: Minutes) -> Self {
        self.time_done = time_done;
        self
    }

    /// Copy of this section with a different required time
    pub fn with_time_req(&self, time_req: Minutes) -> Self {
        Self { time_req, ..self.clone() }
    }

    /// A section is done when its page counter is back at zero and time was logged.
    ///
    /// A partially read section (`temp_pg > 0`) is never done, whatever time
    /// was logged.
    pub fn is_done(&self) -> bool {
        self.temp_pg == 0 && !self.time_done.is_zero()
    }

    /// Pages still to read in an unfinished section
    pub fn remaining_pages(&self) -> u32 {
        if self.temp_pg > 0 { self.pg.saturating_sub(self.temp_pg) } else { self.pg }
    }
}

impl Keyed for Section {
    type Key = SectionKey;

    fn key(&self) -> &SectionKey {
        &self.number
    }
}

/// Everything a parse pass produces
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedDocument {
    /// Chapters keyed by number (empty for flat documents)
    pub chapters: HashMap<ChapterKey, Chapter>,
    /// Sections in document order
    pub sections: Vec<Section>,
}

impl ParsedDocument {
    /// Chapters sorted by numeric chapter number, non-numeric numbers last
    pub fn chapters_in_order(&self) -> Vec<&Chapter> {
        let mut chapters: Vec<&Chapter> = self.chapters.values().collect();
        chapters.sort_by(|a, b| {
            let key = |c: &Chapter| (c.number.ordinal().unwrap_or(u64::MAX), c.number.clone());
            key(a).cmp(&key(b))
        });
        chapters
    }

    /// Find a section by its number
    pub fn section(&self, number: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.number.as_str() == number)
    }

    /// Find a chapter by its number
    pub fn chapter(&self, number: &str) -> Option<&Chapter> {
        self.chapters.get(number)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn minutes(m: f64) -> Minutes {
        Minutes::new(m)
    }

    #[test]
    fn done_requires_reset_counter_and_logged_time() {
        let done = Section::new("A", "1.1").with_pages(10, 0).with_time_done(minutes(30.0));
        let partial = Section::new("B", "1.2").with_pages(10, 5).with_time_done(minutes(30.0));
        let untouched = Section::new("C", "1.3").with_pages(10, 0);

        assert!(done.is_done());
        assert!(!partial.is_done());
        assert!(!untouched.is_done());
    }

    #[test]
    fn remaining_pages_accounts_for_partial_progress() {
        assert_eq!(Section::new("A", "1").with_pages(10, 4).remaining_pages(), 6);
        assert_eq!(Section::new("A", "1").with_pages(10, 0).remaining_pages(), 10);
        assert_eq!(Section::new("A", "1").with_pages(3, 7).remaining_pages(), 0);
    }

    #[test]
    fn identity_is_by_number_only() {
        let a = Chapter::new("Intro", "1");
        let b = Chapter::new("Introduction", "1");

        let mut seen = HashSet::new();
        assert!(seen.insert(a.key().clone()));
        assert!(!seen.insert(b.key().clone()));

        let s1 = Section::new("Old title", "2.1");
        let s2 = Section::new("New title", "2.1");
        assert_eq!(s1.key(), s2.key());
    }

    #[test]
    fn section_key_chapter_prefix() {
        assert_eq!(SectionKey::new("3.2").chapter_key(), ChapterKey::new("3"));
        assert_eq!(SectionKey::new("12").chapter_key(), ChapterKey::new("12"));
    }

    #[test]
    fn section_key_ordinals() {
        assert_eq!(SectionKey::new("3.12").ordinal(true).unwrap(), (3, 12));
        assert_eq!(SectionKey::new("7").ordinal(false).unwrap(), (7, 0));
        assert!(matches!(
            SectionKey::new("3.a").ordinal(true),
            Err(Error::NonNumericOrdinal { .. })
        ));
        assert!(matches!(SectionKey::new("3").ordinal(true), Err(Error::NonNumericOrdinal { .. })));
        assert!(matches!(
            SectionKey::new("x").ordinal(false),
            Err(Error::NonNumericOrdinal { .. })
        ));
    }

    #[test]
    fn with_time_req_leaves_original_untouched() {
        let section = Section::new("A", "1.1");
        let updated = section.with_time_req(minutes(42.0));
        assert!(section.time_req.is_zero());
        assert_eq!(updated.time_req, minutes(42.0));
    }

    #[test]
    fn chapter_aggregates() {
        let mut chapter = Chapter::new("Basics", "1");
        assert!(!chapter.is_done());

        let s1 = Section::new("A", "1.1").with_pages(10, 0).with_time_done(minutes(20.0));
        let s2 = Section::new("B", "1.2").with_pages(10, 5);
        chapter.sections.insert(s1.number.clone(), s1);
        chapter.sections.insert(s2.number.clone(), s2);

        assert_eq!(chapter.total_pages(), 20);
        assert_eq!(chapter.progress_percent().unwrap(), 75.0);
        assert!(!chapter.is_done());
    }

    #[test]
    fn chapters_in_numeric_order() {
        let mut doc = ParsedDocument::default();
        for number in ["10", "2", "1"] {
            doc.chapters.insert(ChapterKey::new(number), Chapter::new("c", number));
        }
        let order: Vec<&str> = doc.chapters_in_order().iter().map(|c| c.number.as_str()).collect();
        assert_eq!(order, vec!["1", "2", "10"]);
        assert!(doc.chapter("10").is_some());
    }
}
