//! Daily reading targets
//!
//! Spreads a page quota over unfinished sections in document order. The
//! quota is either fixed by the reader or derived from the pages left and the
//! days until the deadline.

use std::fmt;

use chrono::{Local, NaiveDate};
use tracing::debug;

use super::{round2, undone_pages};
use crate::book::model::{Section, SectionKey};
use crate::error::{Error, Result};

/// What to plan for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRequest {
    /// Day everything should be read by
    pub deadline: NaiveDate,
    /// First day of the plan (defaults to today)
    pub start: Option<NaiveDate>,
    /// Fixed pages per day (derived from the deadline when unset)
    pub daily_quota: Option<u32>,
    /// Ignore sections sorted before this one
    pub from_section: Option<SectionKey>,
}

impl PlanRequest {
    pub fn new(deadline: NaiveDate) -> Self {
        Self { deadline, start: None, daily_quota: None, from_section: None }
    }

    /// Set the first day of the plan
    pub fn starting(mut self, start: NaiveDate) -> Self {
        self.start = Some(start);
        self
    }

    /// Use a fixed number of pages per day
    pub fn with_quota(mut self, pages: u32) -> Self {
        self.daily_quota = Some(pages);
        self
    }

    /// Start planning at the given section
    pub fn from_section(mut self, number: impl Into<SectionKey>) -> Self {
        self.from_section = Some(number.into());
        self
    }
}

/// Pages assigned to one section for the day
#[derive(Debug, Clone, Copy)]
pub struct Assignment<'a> {
    pub section: &'a Section,
    pub pages: u32,
}

impl Assignment<'_> {
    /// Share of the section covered by this assignment, in percent
    pub fn percent(&self) -> f64 {
        if self.section.pg == 0 {
            return 0.0;
        }
        round2(100.0 * self.pages as f64 / self.section.pg as f64)
    }
}

/// A day's reading targets
#[derive(Debug, Clone)]
pub struct DailyPlan<'a> {
    pub start: NaiveDate,
    pub deadline: NaiveDate,
    /// Days from start to deadline
    pub days: i64,
    /// Pages to read today
    pub quota: u32,
    pub assignments: Vec<Assignment<'a>>,
}

impl DailyPlan<'_> {
    /// Pages handed out to sections (at most the quota)
    pub fn assigned_pages(&self) -> u32 {
        self.assignments.iter().map(|a| a.pages).sum()
    }

    /// Text report of the plan
    pub fn report(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DailyPlan<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} {} :: {} :: {} days",
            self.deadline.format("%Y"),
            self.start.format("%m-%d"),
            self.deadline.format("%m-%d"),
            self.days
        )?;
        writeln!(f)?;
        writeln!(f, "{} pages left", self.quota)?;
        for assignment in &self.assignments {
            let section = assignment.section;
            writeln!(f, "\t{}: {}", section.number, section.name)?;
            writeln!(f, "\t\t{}/{} {:.2}%", assignment.pages, section.pg, assignment.percent())?;
        }
        Ok(())
    }
}

/// Plan today's targets for `sections` (already in document order)
pub fn plan_targets<'a>(sections: &'a [Section], request: &PlanRequest) -> Result<DailyPlan<'a>> {
    plan_targets_on(sections, request, Local::now().date_naive())
}

/// Plan targets as if today were `today`
pub fn plan_targets_on<'a>(
    sections: &'a [Section],
    request: &PlanRequest,
    today: NaiveDate,
) -> Result<DailyPlan<'a>> {
    let start = request.start.unwrap_or(today);
    let days = (request.deadline - start).num_days();

    let sections = match &request.from_section {
        Some(number) => {
            let position = sections
                .iter()
                .position(|s| &s.number == number)
                .ok_or_else(|| Error::UnknownSection { number: number.to_string() })?;
            &sections[position..]
        }
        None => sections,
    };

    let quota = match request.daily_quota {
        Some(quota) => quota,
        None => {
            if days <= 0 {
                return Err(Error::DegenerateRatio { metric: "daily quota" });
            }
            undone_pages(sections).div_ceil(u32::try_from(days).unwrap_or(u32::MAX))
        }
    };
    debug!("Planning {} pages/day over {} days from {}", quota, days, start);

    let mut budget = quota;
    let mut assignments = Vec::new();
    for section in sections {
        if budget == 0 {
            break;
        }
        if section.is_done() {
            continue;
        }
        let remaining = section.remaining_pages();
        if remaining == 0 {
            continue;
        }
        let pages = remaining.min(budget);
        budget -= pages;
        assignments.push(Assignment { section, pages });
    }

    Ok(DailyPlan { start, deadline: request.deadline, days, quota, assignments })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::book::duration::Minutes;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn section(number: &str, name: &str, pg: u32, temp_pg: u32) -> Section {
        Section::new(name, number).with_pages(pg, temp_pg)
    }

    #[test]
    fn derives_quota_from_deadline() {
        let sections = vec![section("1.1", "Sets", 10, 0), section("1.2", "Maps", 5, 0)];
        let request = PlanRequest::new(date(2024, 3, 4)).starting(date(2024, 3, 1));

        let plan = plan_targets(&sections, &request).unwrap();

        assert_eq!(plan.days, 3);
        assert_eq!(plan.quota, 5);
        assert_eq!(plan.assignments.len(), 1);
        assert_eq!(plan.assignments[0].section.number.as_str(), "1.1");
        assert_eq!(plan.assignments[0].pages, 5);
        assert_eq!(plan.assignments[0].percent(), 50.0);
    }

    #[test]
    fn renders_report() {
        let sections = vec![section("1.1", "Sets", 10, 0), section("1.2", "Maps", 5, 0)];
        let request = PlanRequest::new(date(2024, 3, 4)).starting(date(2024, 3, 1));
        let plan = plan_targets(&sections, &request).unwrap();

        assert_eq!(
            plan.report(),
            "2024 03-01 :: 03-04 :: 3 days\n\n5 pages left\n\t1.1: Sets\n\t\t5/10 50.00%\n"
        );
    }

    #[test]
    fn fills_sections_in_order_and_skips_done_ones() {
        let done = section("1.1", "Done", 9, 0).with_time_done(Minutes::new(30.0));
        let sections = vec![
            done,
            section("1.2", "Partial", 10, 6),
            section("1.3", "Fresh", 3, 0),
            section("2.1", "Later", 8, 0),
        ];
        let request = PlanRequest::new(date(2024, 5, 1)).starting(date(2024, 4, 1)).with_quota(9);

        let plan = plan_targets(&sections, &request).unwrap();
        let picked: Vec<(&str, u32)> =
            plan.assignments.iter().map(|a| (a.section.number.as_str(), a.pages)).collect();

        assert_eq!(picked, vec![("1.2", 4), ("1.3", 3), ("2.1", 2)]);
        assert_eq!(plan.assigned_pages(), 9);
        assert_eq!(plan.assignments[2].percent(), 25.0);
    }

    #[test]
    fn quota_larger_than_work_assigns_everything() {
        let sections = vec![section("1", "A", 4, 0), section("2", "B", 0, 0)];
        let request = PlanRequest::new(date(2024, 1, 10)).starting(date(2024, 1, 1)).with_quota(50);

        let plan = plan_targets(&sections, &request).unwrap();
        assert_eq!(plan.assigned_pages(), 4);
        assert_eq!(plan.assignments.len(), 1);
    }

    #[test]
    fn zero_day_window_is_degenerate() {
        let sections = vec![section("1", "A", 4, 0)];
        let same_day = PlanRequest::new(date(2024, 1, 1)).starting(date(2024, 1, 1));
        assert!(matches!(
            plan_targets(&sections, &same_day),
            Err(Error::DegenerateRatio { metric: "daily quota" })
        ));

        let past = PlanRequest::new(date(2023, 12, 1)).starting(date(2024, 1, 1));
        assert!(matches!(plan_targets(&sections, &past), Err(Error::DegenerateRatio { .. })));
    }

    #[test]
    fn explicit_quota_ignores_the_window() {
        let sections = vec![section("1", "A", 4, 0)];
        let request = PlanRequest::new(date(2024, 1, 1)).starting(date(2024, 1, 1)).with_quota(2);
        let plan = plan_targets(&sections, &request).unwrap();
        assert_eq!(plan.days, 0);
        assert_eq!(plan.assigned_pages(), 2);
    }

    #[test]
    fn starts_from_a_given_section() {
        let sections = vec![section("1.1", "A", 10, 0), section("1.2", "B", 6, 0)];
        let request = PlanRequest::new(date(2024, 1, 3))
            .starting(date(2024, 1, 1))
            .from_section("1.2");

        let plan = plan_targets(&sections, &request).unwrap();
        assert_eq!(plan.quota, 3);
        assert_eq!(plan.assignments[0].section.number.as_str(), "1.2");

        let unknown = request.clone().from_section("7.7");
        assert!(matches!(plan_targets(&sections, &unknown), Err(Error::UnknownSection { .. })));
    }

    #[test]
    fn start_defaults_to_today() {
        let sections = vec![section("1", "A", 10, 0)];
        let request = PlanRequest::new(date(2030, 1, 11));
        let plan = plan_targets_on(&sections, &request, date(2030, 1, 1)).unwrap();
        assert_eq!(plan.start, date(2030, 1, 1));
        assert_eq!(plan.quota, 1);
    }

    #[test]
    fn nothing_left_gives_an_empty_plan() {
        let sections = vec![section("1", "A", 10, 0).with_time_done(Minutes::new(5.0))];
        let request = PlanRequest::new(date(2024, 1, 5)).starting(date(2024, 1, 1));
        let plan = plan_targets(&sections, &request).unwrap();
        assert_eq!(plan.quota, 0);
        assert!(plan.assignments.is_empty());
        assert_eq!(plan.report(), "2024 01-01 :: 01-05 :: 4 days\n\n0 pages left\n");
    }
}
