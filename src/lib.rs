//! pagewise - study-progress analytics for markdown study trackers
//!
//! pagewise reads a markdown document whose headings mark chapters and
//! sections, collects the progress annotations under each section, and
//! computes reading progress, performance and a daily page target.

pub mod book;
pub mod config;
pub mod error;
pub mod progress;

pub use book::{Chapter, DocumentParser, ParseOptions, ParsedDocument, Section};
pub use config::Config;
pub use error::{Error, Result};
pub use progress::plan::{DailyPlan, PlanRequest, plan_targets};
