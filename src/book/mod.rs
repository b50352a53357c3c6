//! Study documents: model, heading conventions and parsing

pub mod duration;
pub mod headings;
pub mod markdown;
pub mod model;

pub use duration::{Minutes, format_duration, parse_duration};
pub use headings::{HeadingDialect, HeadingExtractor};
pub use markdown::{DocumentParser, ParseOptions, read_document};
pub use model::{Chapter, ChapterKey, Keyed, ParsedDocument, Section, SectionKey};
