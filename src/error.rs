//! Error types for parsing and planning

use thiserror::Error;

/// Result type alias for pagewise operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while reading a study document or computing from it
#[derive(Debug, Error)]
pub enum Error {
    /// A duration token has no `'`/`"` marker or non-digit characters
    #[error("Malformed duration token {token:?}")]
    MalformedDuration {
        /// The offending whitespace-separated token
        token: String,
    },

    /// A section names a chapter that was never declared
    #[error("Section {section} references unknown chapter {chapter}")]
    UnknownChapterReference {
        /// Section number as written in the document
        section: String,
        /// Chapter prefix taken from the section number
        chapter: String,
    },

    /// A chapter or section number segment is not an integer
    #[error("Section number {number:?} is not a numeric ordinal")]
    NonNumericOrdinal {
        /// Section number as written in the document
        number: String,
    },

    /// A ratio has a zero denominator (empty document, nothing done yet, ...)
    #[error("Cannot compute {metric}: denominator is zero")]
    DegenerateRatio {
        /// Name of the metric being computed
        metric: &'static str,
    },

    /// An integer or percentage annotation could not be read
    #[error("Malformed value {value:?} for field `{field}` in section {section}")]
    MalformedAnnotation {
        /// Section the annotation belongs to
        section: String,
        /// Annotation field name
        field: &'static str,
        /// Raw value text
        value: String,
    },

    /// A section number that does not appear in the document
    #[error("No section numbered {number}")]
    UnknownSection {
        /// Requested section number
        number: String,
    },

    /// Chapter and section headings cannot be told apart
    #[error("Invalid heading depths: chapter {chapter}, section {section}")]
    InvalidHeadingDepths {
        /// Chapter heading depth
        chapter: usize,
        /// Section heading depth
        section: usize,
    },

    /// IO error while reading a document
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if this error describes a problem in the source document
    pub fn is_document_error(&self) -> bool {
        matches!(
            self,
            Error::MalformedDuration { .. }
                | Error::UnknownChapterReference { .. }
                | Error::NonNumericOrdinal { .. }
                | Error::MalformedAnnotation { .. }
        )
    }
}
