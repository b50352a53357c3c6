//! Study durations and their compact `H' M"` text form
//!
//! `1' 30"` is one hour thirty minutes, `45"` is forty-five minutes and `2'`
//! is two hours. A zero duration is written as an empty string.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A non-negative duration measured in (possibly fractional) minutes
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Minutes(f64);

impl Minutes {
    /// Zero minutes
    pub const ZERO: Minutes = Minutes(0.0);

    /// Create a duration, clamping negative values to zero
    pub fn new(minutes: f64) -> Self {
        Self(minutes.max(0.0))
    }

    /// Create a duration from whole hours and minutes
    pub fn from_hm(hours: u64, minutes: u64) -> Self {
        Self(hours.saturating_mul(60).saturating_add(minutes) as f64)
    }

    /// Total minutes
    pub fn as_f64(self) -> f64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }
}

impl Add for Minutes {
    type Output = Minutes;

    fn add(self, rhs: Minutes) -> Minutes {
        Minutes(self.0 + rhs.0)
    }
}

impl Sum for Minutes {
    fn sum<I: Iterator<Item = Minutes>>(iter: I) -> Minutes {
        iter.fold(Minutes::ZERO, Add::add)
    }
}

/// Parse the `H' M"` form into minutes
///
/// Tokens may appear in any order; when a component is repeated the last one
/// wins.
pub fn parse_duration(text: &str) -> Result<Minutes> {
    let mut hours = 0;
    let mut minutes = 0;

    for token in text.split_whitespace() {
        if let Some(digits) = token.strip_suffix('"') {
            minutes = parse_component(digits, token)?;
        } else if let Some(digits) = token.strip_suffix('\'') {
            hours = parse_component(digits, token)?;
        } else {
            return Err(Error::MalformedDuration { token: token.to_string() });
        }
    }

    Ok(Minutes::from_hm(hours, minutes))
}

fn parse_component(digits: &str, token: &str) -> Result<u64> {
    // `u64::from_str` accepts a leading `+`, which is not part of the format
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::MalformedDuration { token: token.to_string() });
    }
    digits.parse().map_err(|_| Error::MalformedDuration { token: token.to_string() })
}

/// Format minutes as `H' M"`, rounding leftover fractional minutes up
pub fn format_duration(minutes: Minutes) -> String {
    let total = minutes.as_f64();
    let hours = (total / 60.0).floor();
    let rest = (total - hours * 60.0).ceil() as u64;
    let hours = hours as u64;

    let mut parts = Vec::with_capacity(2);
    if hours > 0 {
        parts.push(format!("{hours}'"));
    }
    if rest > 0 {
        parts.push(format!("{rest}\""));
    }
    parts.join(" ")
}

impl FromStr for Minutes {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_duration(s)
    }
}

impl fmt::Display for Minutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_duration(*self))
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn parses_hours_and_minutes() {
        assert_eq!(parse_duration("1' 30\"").unwrap(), Minutes::new(90.0));
        assert_eq!(parse_duration("30\" 1'").unwrap(), Minutes::new(90.0));
        assert_eq!(parse_duration("  2'  ").unwrap(), Minutes::new(120.0));
        assert_eq!(parse_duration("45\"").unwrap(), Minutes::new(45.0));
    }

    #[test]
    fn empty_text_is_zero() {
        assert!(parse_duration("").unwrap().is_zero());
        assert!(parse_duration("   ").unwrap().is_zero());
    }

    #[test]
    fn rejects_unmarked_or_non_numeric_tokens() {
        assert!(matches!(parse_duration("90"), Err(Error::MalformedDuration { .. })));
        assert!(matches!(parse_duration("a'"), Err(Error::MalformedDuration { .. })));
        assert!(matches!(parse_duration("+5\""), Err(Error::MalformedDuration { .. })));
        assert!(matches!(parse_duration("\""), Err(Error::MalformedDuration { .. })));
    }

    #[test]
    fn formats_with_ceiling_on_minutes() {
        assert_eq!(format_duration(Minutes::new(61.0)), "1' 1\"");
        assert_eq!(format_duration(Minutes::new(90.2)), "1' 31\"");
        assert_eq!(format_duration(Minutes::new(120.0)), "2'");
        assert_eq!(format_duration(Minutes::new(0.5)), "1\"");
    }

    #[test]
    fn zero_formats_to_empty_string() {
        assert_eq!(format_duration(Minutes::ZERO), "");
        assert_eq!(Minutes::ZERO.to_string(), "");
    }

    #[test]
    fn negative_input_clamps_to_zero() {
        assert!(Minutes::new(-3.0).is_zero());
    }

    #[test]
    fn sums_durations() {
        let total: Minutes = [Minutes::new(30.0), Minutes::new(45.0)].into_iter().sum();
        assert_eq!(total, Minutes::new(75.0));
    }

    proptest! {
        #[test]
        fn whole_minutes_round_trip(m in 0u64..100_000) {
            let minutes = Minutes::new(m as f64);
            let text = format_duration(minutes);
            prop_assert_eq!(text.is_empty(), m == 0);
            prop_assert_eq!(parse_duration(&text).unwrap(), minutes);
        }
    }
}
