//! Markdown parser for study-tracking documents
//!
//! A study document is a markdown file whose headings mark chapters and
//! sections. Each section heading is followed by annotation lines holding its
//! progress metadata:
//!
//! ```text
//! #### Chapter 1: Vector Spaces
//! ##### 1.1 Complex Numbers
//! > `pg: 12`
//! > `temp pg: 4`
//! > `time done: 1' 20"`
//! > `performance: 87.5%`
//! ```
//!
//! Everything else (prose, blank lines, unknown annotations) is ignored.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace, warn};

use super::duration::parse_duration;
use super::headings::HeadingExtractor;
use super::model::{Chapter, ChapterKey, ParsedDocument, Section};
use crate::error::{Error, Result};

/// Regex for annotation lines: > `field: value`
static ANNOTATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^>\s*`\s*([a-z][a-z -]*?)\s*:\s*([^`]*?)\s*`?\s*$").unwrap());

/// Heading layout of a study document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Whether sections are grouped under chapter headings
    pub has_chapters: bool,
    /// Number of `#` introducing a chapter heading
    pub chapter_heading_depth: usize,
    /// Number of `#` introducing a section heading
    pub section_heading_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { has_chapters: true, chapter_heading_depth: 4, section_heading_depth: 5 }
    }
}

impl ParseOptions {
    /// Options for a document without chapters, sections at the given depth
    pub fn flat(section_heading_depth: usize) -> Self {
        Self { has_chapters: false, section_heading_depth, ..Self::default() }
    }

    fn validate(&self) -> Result<()> {
        let valid = |depth: usize| (1..=6).contains(&depth);
        if self.chapter_heading_depth == self.section_heading_depth
            || !valid(self.chapter_heading_depth)
            || !valid(self.section_heading_depth)
        {
            return Err(Error::InvalidHeadingDepths {
                chapter: self.chapter_heading_depth,
                section: self.section_heading_depth,
            });
        }
        Ok(())
    }
}

/// Annotation fields recognized under a section heading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Pages,
    TempPages,
    TimeReq,
    TimeDone,
    Performance,
    Questions,
    QuestionsDone,
    PracticeTimeReq,
    PracticeTimeDone,
    PracticePerformance,
}

impl Field {
    fn from_label(label: &str) -> Option<Self> {
        let field = match label {
            "pg" => Field::Pages,
            "temp pg" => Field::TempPages,
            "time req" => Field::TimeReq,
            "time done" => Field::TimeDone,
            "performance" => Field::Performance,
            "questions" => Field::Questions,
            "questions done" => Field::QuestionsDone,
            "practice time req" => Field::PracticeTimeReq,
            "practice time done" => Field::PracticeTimeDone,
            "p-performance" => Field::PracticePerformance,
            _ => return None,
        };
        Some(field)
    }

    fn label(self) -> &'static str {
        match self {
            Field::Pages => "pg",
            Field::TempPages => "temp pg",
            Field::TimeReq => "time req",
            Field::TimeDone => "time done",
            Field::Performance => "performance",
            Field::Questions => "questions",
            Field::QuestionsDone => "questions done",
            Field::PracticeTimeReq => "practice time req",
            Field::PracticeTimeDone => "practice time done",
            Field::PracticePerformance => "p-performance",
        }
    }
}

/// Turns the lines of a study document into chapters and sections
pub struct DocumentParser<E> {
    options: ParseOptions,
    extractor: E,
    chapter_prefix: String,
    section_prefix: String,
}

impl<E: HeadingExtractor> DocumentParser<E> {
    /// Create a parser for the given heading layout and naming convention
    pub fn new(options: ParseOptions, extractor: E) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            options,
            extractor,
            chapter_prefix: format!("{} ", "#".repeat(options.chapter_heading_depth)),
            section_prefix: format!("{} ", "#".repeat(options.section_heading_depth)),
        })
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse a whole document held in a string
    pub fn parse_str(&self, text: &str) -> Result<ParsedDocument> {
        let lines: Vec<&str> = text.lines().collect();
        self.parse(&lines)
    }

    /// Parse a study document file
    pub fn parse_file(&self, path: &Path) -> Result<ParsedDocument> {
        let lines = read_document(path)?;
        self.parse(&lines)
    }

    /// Parse document lines
    ///
    /// Sections come back sorted by `(chapter, section)` number, or by their
    /// single number in flat documents.
    pub fn parse<S: AsRef<str>>(&self, lines: &[S]) -> Result<ParsedDocument> {
        let mut chapters: HashMap<ChapterKey, Chapter> = HashMap::new();
        let mut sections = Vec::new();

        let mut idx = 0;
        while idx < lines.len() {
            let line = lines[idx].as_ref();

            if self.options.has_chapters && line.starts_with(&self.chapter_prefix) {
                let heading = line[self.chapter_prefix.len()..].trim();
                let chapter = Chapter::new(
                    self.extractor.chapter_name(heading),
                    self.extractor.chapter_number(heading),
                );
                debug!("Chapter {}: {}", chapter.number, chapter.name);

                match chapters.entry(chapter.number.clone()) {
                    Entry::Occupied(existing) => {
                        warn!(
                            "Chapter {} declared twice, keeping {:?}",
                            chapter.number,
                            existing.get().name
                        );
                    }
                    Entry::Vacant(slot) => {
                        slot.insert(chapter);
                    }
                }
                idx += 1;
                continue;
            }

            if !line.starts_with(&self.section_prefix) {
                idx += 1;
                continue;
            }

            let heading = line[self.section_prefix.len()..].trim();
            let mut section = Section::new(
                self.extractor.section_name(heading),
                self.extractor.section_number(heading),
            );

            let end = self.span_end(lines, idx + 1);
            for annotation in &lines[idx + 1..end] {
                apply_annotation(&mut section, annotation.as_ref())?;
            }
            debug!("Section {}: {} ({} pages)", section.number, section.name, section.pg);

            if self.options.has_chapters {
                let chapter_key = section.number.chapter_key();
                let Some(chapter) = chapters.get_mut(&chapter_key) else {
                    return Err(Error::UnknownChapterReference {
                        section: section.number.to_string(),
                        chapter: chapter_key.to_string(),
                    });
                };
                section.chapter = Some(chapter_key);
                chapter.sections.insert(section.number.clone(), section.clone());
            }

            sections.push(section);
            idx = end;
        }

        let sections = sort_sections(sections, self.options.has_chapters)?;
        Ok(ParsedDocument { chapters, sections })
    }

    /// Index of the next chapter or section heading at or after `from`
    fn span_end<S: AsRef<str>>(&self, lines: &[S], from: usize) -> usize {
        lines[from..]
            .iter()
            .position(|line| {
                let line = line.as_ref();
                line.starts_with(&self.chapter_prefix) || line.starts_with(&self.section_prefix)
            })
            .map_or(lines.len(), |offset| from + offset)
    }
}

/// Read a study document into lines
pub fn read_document(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    Ok(content.lines().map(str::to_string).collect())
}

fn sort_sections(sections: Vec<Section>, has_chapters: bool) -> Result<Vec<Section>> {
    let mut keyed = sections
        .into_iter()
        .map(|section| -> Result<_> { Ok((section.number.ordinal(has_chapters)?, section)) })
        .collect::<Result<Vec<_>>>()?;
    keyed.sort_by_key(|(ordinal, _)| *ordinal);
    Ok(keyed.into_iter().map(|(_, section)| section).collect())
}

fn apply_annotation(section: &mut Section, line: &str) -> Result<()> {
    let Some(caps) = ANNOTATION_RE.captures(line.trim_end()) else {
        return Ok(());
    };
    let label = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
    let value = caps.get(2).map(|m| m.as_str().trim()).unwrap_or_default();

    let Some(field) = Field::from_label(label) else {
        trace!("Ignoring annotation `{}` in section {}", label, section.number);
        return Ok(());
    };
    if value.is_empty() {
        return Ok(());
    }

    match field {
        Field::Pages => section.pg = parse_count(section, field, value)?,
        Field::TempPages => section.temp_pg = parse_count(section, field, value)?,
        Field::TimeReq => section.time_req = parse_duration(value)?,
        Field::TimeDone => section.time_done = parse_duration(value)?,
        Field::Performance => section.performance = parse_percent(section, field, value)?,
        Field::Questions => section.questions = parse_count(section, field, value)?,
        Field::QuestionsDone => section.questions_done = parse_count(section, field, value)?,
        Field::PracticeTimeReq => section.practice_time_req = parse_duration(value)?,
        Field::PracticeTimeDone => section.practice_time_done = parse_duration(value)?,
        Field::PracticePerformance => {
            section.p_performance = parse_percent(section, field, value)?;
        }
    }
    Ok(())
}

fn malformed(section: &Section, field: Field, value: &str) -> Error {
    Error::MalformedAnnotation {
        section: section.number.to_string(),
        field: field.label(),
        value: value.to_string(),
    }
}

fn parse_count(section: &Section, field: Field, value: &str) -> Result<u32> {
    value.parse().map_err(|_| malformed(section, field, value))
}

/// Percentages like `87.5%` truncate to whole numbers
fn parse_percent(section: &Section, field: Field, value: &str) -> Result<u32> {
    let number = value.trim_end_matches('%').trim();
    match number.parse::<f64>() {
        Ok(percent) if percent.is_finite() && percent >= 0.0 => Ok(percent.trunc() as u32),
        _ => Err(malformed(section, field, value)),
    }
}
