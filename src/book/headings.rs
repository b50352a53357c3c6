//! Heading conventions
//!
//! Study documents number their headings in different ways ("Chapter 3:
//! Title", "3.2 Title", "3. Title"). A [`HeadingExtractor`] pulls the name and
//! number out of a heading once its `#` prefix has been removed.

use serde::{Deserialize, Serialize};

/// Extracts names and numbers from chapter and section headings
pub trait HeadingExtractor {
    fn chapter_name(&self, heading: &str) -> String;
    fn chapter_number(&self, heading: &str) -> String;
    fn section_name(&self, heading: &str) -> String;
    fn section_number(&self, heading: &str) -> String;
}

/// `Chapter 3: Title` chapters with `3.2 Title` sections
#[derive(Debug, Clone, Copy, Default)]
pub struct LabelledChapters;

/// Flat documents whose sections read like `Part 3: Title`
#[derive(Debug, Clone, Copy, Default)]
pub struct LabelledSections;

/// Flat documents whose sections read like `3. Title`
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberedSections;

impl HeadingExtractor for LabelledChapters {
    fn chapter_name(&self, heading: &str) -> String {
        words_from(heading, 2)
    }

    fn chapter_number(&self, heading: &str) -> String {
        labelled_number(heading)
    }

    fn section_name(&self, heading: &str) -> String {
        words_from(heading, 1)
    }

    fn section_number(&self, heading: &str) -> String {
        leading_token(heading).to_string()
    }
}

impl HeadingExtractor for LabelledSections {
    fn chapter_name(&self, heading: &str) -> String {
        words_from(heading, 2)
    }

    fn chapter_number(&self, heading: &str) -> String {
        labelled_number(heading)
    }

    fn section_name(&self, heading: &str) -> String {
        words_from(heading, 2)
    }

    fn section_number(&self, heading: &str) -> String {
        labelled_number(heading)
    }
}

impl HeadingExtractor for NumberedSections {
    fn chapter_name(&self, heading: &str) -> String {
        words_from(heading, 1)
    }

    fn chapter_number(&self, heading: &str) -> String {
        leading_token(heading).replace('.', "")
    }

    fn section_name(&self, heading: &str) -> String {
        words_from(heading, 1)
    }

    fn section_number(&self, heading: &str) -> String {
        leading_token(heading).replace('.', "")
    }
}

/// Built-in heading conventions, selectable from configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeadingDialect {
    #[default]
    LabelledChapters,
    LabelledSections,
    NumberedSections,
}

impl HeadingDialect {
    /// Whether documents in this dialect have a chapter level
    pub fn has_chapters(self) -> bool {
        matches!(self, HeadingDialect::LabelledChapters)
    }

    /// Boxed extractor for this dialect
    pub fn extractor(self) -> Box<dyn HeadingExtractor> {
        match self {
            HeadingDialect::LabelledChapters => Box::new(LabelledChapters),
            HeadingDialect::LabelledSections => Box::new(LabelledSections),
            HeadingDialect::NumberedSections => Box::new(NumberedSections),
        }
    }

    /// Parse a dialect name (e.g. "numbered-sections")
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "labelled-chapters" | "chapters" => Some(HeadingDialect::LabelledChapters),
            "labelled-sections" | "labelled" => Some(HeadingDialect::LabelledSections),
            "numbered-sections" | "numbered" => Some(HeadingDialect::NumberedSections),
            _ => None,
        }
    }
}

impl<T: HeadingExtractor + ?Sized> HeadingExtractor for Box<T> {
    fn chapter_name(&self, heading: &str) -> String {
        (**self).chapter_name(heading)
    }

    fn chapter_number(&self, heading: &str) -> String {
        (**self).chapter_number(heading)
    }

    fn section_name(&self, heading: &str) -> String {
        (**self).section_name(heading)
    }

    fn section_number(&self, heading: &str) -> String {
        (**self).section_number(heading)
    }
}

fn leading_token(heading: &str) -> &str {
    heading.split_whitespace().next().unwrap_or_default()
}

/// Number in `Label N: ...`, with the colon removed
fn labelled_number(heading: &str) -> String {
    heading.split_whitespace().nth(1).unwrap_or_default().replace(':', "")
}

fn words_from(heading: &str, skip: usize) -> String {
    heading.split_whitespace().skip(skip).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labelled_chapters() {
        let ex = LabelledChapters;
        assert_eq!(ex.chapter_number("Chapter 3: Linear Maps"), "3");
        assert_eq!(ex.chapter_name("Chapter 3: Linear Maps"), "Linear Maps");
        assert_eq!(ex.section_number("3.2 Null Spaces and Ranges"), "3.2");
        assert_eq!(ex.section_name("3.2 Null Spaces and Ranges"), "Null Spaces and Ranges");
    }

    #[test]
    fn labelled_sections() {
        let ex = LabelledSections;
        assert_eq!(ex.section_number("Lecture 12: Entropy"), "12");
        assert_eq!(ex.section_name("Lecture 12: Entropy"), "Entropy");
    }

    #[test]
    fn numbered_sections() {
        let ex = NumberedSections;
        assert_eq!(ex.section_number("4. Ownership"), "4");
        assert_eq!(ex.section_name("4. Ownership"), "Ownership");
    }

    #[test]
    fn missing_parts_give_empty_strings() {
        let ex = LabelledChapters;
        assert_eq!(ex.chapter_number("Preface"), "");
        assert_eq!(ex.chapter_name("Preface"), "");
    }

    #[test]
    fn dialect_names() {
        assert_eq!(HeadingDialect::from_name("numbered"), Some(HeadingDialect::NumberedSections));
        assert_eq!(
            HeadingDialect::from_name("Labelled-Chapters"),
            Some(HeadingDialect::LabelledChapters)
        );
        assert_eq!(HeadingDialect::from_name("roman"), None);
        assert!(HeadingDialect::default().has_chapters());
        assert!(!HeadingDialect::NumberedSections.has_chapters());
    }

    #[test]
    fn dialect_serializes_kebab_case() {
        let json = serde_json::to_string(&HeadingDialect::NumberedSections).unwrap();
        assert_eq!(json, "\"numbered-sections\"");
    }

    #[test]
    fn boxed_extractor_delegates() {
        let ex = HeadingDialect::LabelledChapters.extractor();
        assert_eq!(ex.section_number("1.4 Sets"), "1.4");
    }
}
