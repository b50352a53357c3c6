//! Study-progress analytics
//!
//! Pure functions over a slice of sections. None of them mutate their input,
//! so they can be called repeatedly on the same parsed document.

pub mod plan;

use serde::Serialize;

use crate::book::duration::Minutes;
use crate::book::model::Section;
use crate::error::{Error, Result};

/// Pages read: all pages of done sections plus partial progress elsewhere
pub fn done_pages(sections: &[Section]) -> u32 {
    sections
        .iter()
        .map(|s| if s.is_done() { s.pg } else { s.temp_pg })
        .sum()
}

/// Pages still to read in sections that are not done
pub fn undone_pages(sections: &[Section]) -> u32 {
    sections.iter().filter(|s| !s.is_done()).map(Section::remaining_pages).sum()
}

pub fn total_pages(sections: &[Section]) -> u32 {
    sections.iter().map(|s| s.pg).sum()
}

/// Share of pages read, in percent
pub fn total_progress_percent(sections: &[Section]) -> Result<f64> {
    let done = done_pages(sections) as f64;
    let undone = undone_pages(sections) as f64;
    ratio_percent(done, done + undone, "total progress")
}

/// Mean performance over done sections
pub fn average_performance(sections: &[Section]) -> Result<f64> {
    let performances: Vec<u32> =
        sections.iter().filter(|s| s.is_done()).map(|s| s.performance).collect();
    if performances.is_empty() {
        return Err(Error::DegenerateRatio { metric: "average performance" });
    }
    let sum: u32 = performances.iter().sum();
    Ok(round2(sum as f64 / performances.len() as f64))
}

/// Required time over time spent on done sections, in percent
///
/// Required time is summed over every section, time spent only over done ones.
pub fn total_time_efficiency(sections: &[Section]) -> Result<f64> {
    let required: Minutes = sections.iter().map(|s| s.time_req).sum();
    let spent: Minutes = sections.iter().filter(|s| s.is_done()).map(|s| s.time_done).sum();
    ratio_percent(required.as_f64(), spent.as_f64(), "time efficiency")
}

/// New sections whose `time_req` is `pg * minutes_per_page`
pub fn calculate_section_times(sections: &[Section], minutes_per_page: f64) -> Vec<Section> {
    sections
        .iter()
        .map(|s| s.with_time_req(Minutes::new(minutes_per_page * s.pg as f64)))
        .collect()
}

fn ratio_percent(numerator: f64, denominator: f64, metric: &'static str) -> Result<f64> {
    if denominator == 0.0 {
        return Err(Error::DegenerateRatio { metric });
    }
    Ok(round2(numerator / denominator * 100.0))
}

/// Round to two decimal places
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Snapshot of all analytics for a document
///
/// Ratios that cannot be computed yet (nothing done, nothing sized) are `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSummary {
    pub sections: usize,
    pub done_sections: usize,
    pub total_pages: u32,
    pub done_pages: u32,
    pub undone_pages: u32,
    pub progress_percent: Option<f64>,
    pub average_performance: Option<f64>,
    pub time_efficiency: Option<f64>,
    pub time_done: Minutes,
    pub questions: u32,
    pub questions_done: u32,
    pub practice_time_done: Minutes,
}

impl ProgressSummary {
    pub fn from_sections(sections: &[Section]) -> Self {
        Self {
            sections: sections.len(),
            done_sections: sections.iter().filter(|s| s.is_done()).count(),
            total_pages: total_pages(sections),
            done_pages: done_pages(sections),
            undone_pages: undone_pages(sections),
            progress_percent: total_progress_percent(sections).ok(),
            average_performance: average_performance(sections).ok(),
            time_efficiency: total_time_efficiency(sections).ok(),
            time_done: sections.iter().map(|s| s.time_done).sum(),
            questions: sections.iter().map(|s| s.questions).sum(),
            questions_done: sections.iter().map(|s| s.questions_done).sum(),
            practice_time_done: sections.iter().map(|s| s.practice_time_done).sum(),
        }
    }
}
