//! Recurrence rule evaluation
//!
//! Computes the next occurrence of a task from a reference date ("today"),
//! the task's stored date, its repeat rule and the calling context.
//!
//! Supported rules:
//! - `""`: one-shot task, no recurrence
//! - `"d N"`: every N days, `1 <= N <= 400`
//! - `"y"`: every year on the same month and day
//!
//! The evaluator is exposed in two modes. [`next_date`] is strict and reports
//! unsupported rules as errors; it backs every write path. [`next_date_lenient`]
//! degrades any failure to "no date" so that one corrupt row cannot break a
//! listing.

use crate::error::{Result, SchedulerError};
use crate::time_utils::parse_date;
use chrono::{Datelike, Days, NaiveDate};
use std::fmt;
use std::str::FromStr;

/// Largest accepted interval for the daily rule
pub const MAX_DAILY_INTERVAL: u32 = 400;

/// The calling scenario of an evaluation
///
/// Only the daily rule looks at it: outside of [`RepeatContext::Done`] a task
/// due today stays on today instead of being pushed to its next occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatContext {
    List,
    Add,
    Check,
    Done,
    NextDate,
}

impl RepeatContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepeatContext::List => "list",
            RepeatContext::Add => "add",
            RepeatContext::Check => "check",
            RepeatContext::Done => "done",
            RepeatContext::NextDate => "nextdate",
        }
    }
}

impl fmt::Display for RepeatContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RepeatContext {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "list" => Ok(RepeatContext::List),
            "add" => Ok(RepeatContext::Add),
            "check" => Ok(RepeatContext::Check),
            "done" => Ok(RepeatContext::Done),
            "nextdate" => Ok(RepeatContext::NextDate),
            other => Err(SchedulerError::InvalidInput(format!(
                "Unknown repeat context '{}'. Use list, add, check, done or nextdate",
                other
            ))),
        }
    }
}

/// A recognised repeat rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatRule {
    /// One-shot task
    Never,
    /// Every N days
    Daily(u32),
    /// Every year on the same month/day
    Yearly,
}

impl RepeatRule {
    /// Validate a rule string against the grammar, as done before any write
    ///
    /// Unlike the evaluator this rejects a daily interval outside
    /// `1..=MAX_DAILY_INTERVAL` or a non-numeric one.
    pub fn parse(repeat: &str) -> Result<Self> {
        match classify(repeat)? {
            Some(rule) => Ok(rule),
            None => Err(SchedulerError::InvalidInput(format!(
                "Invalid repeat rule '{}': daily interval must be a number between 1 and {}",
                repeat, MAX_DAILY_INTERVAL
            ))),
        }
    }
}

/// Recognise a rule string
///
/// `Ok(None)` means the daily rule was used with a malformed or out-of-range
/// interval; the evaluator answers such rules with an empty result.
fn classify(repeat: &str) -> Result<Option<RepeatRule>> {
    if repeat.is_empty() {
        return Ok(Some(RepeatRule::Never));
    }

    if let Some(days) = repeat.strip_prefix("d ") {
        return Ok(days
            .parse::<u32>()
            .ok()
            .filter(|d| (1..=MAX_DAILY_INTERVAL).contains(d))
            .map(RepeatRule::Daily));
    }

    if repeat == "y" {
        return Ok(Some(RepeatRule::Yearly));
    }

    Err(SchedulerError::UnsupportedRule(repeat.to_string()))
}

/// Compute the next occurrence of a task (strict mode)
///
/// # Arguments
/// * `now` - reference date against which due-ness is judged
/// * `date` - the task's stored `YYYYMMDD` date
/// * `repeat` - the task's repeat rule
/// * `context` - the calling scenario
///
/// # Returns
/// * `Ok(Some(date))` - the next occurrence (or the stored date, unchanged)
/// * `Ok(None)` - no date: empty/unparseable stored date, a one-shot task that
///   is not in the future, or a daily rule with a bad interval
///
/// # Errors
/// `UnsupportedRule` for any non-empty rule outside the grammar.
pub fn next_date(
    now: NaiveDate,
    date: &str,
    repeat: &str,
    context: RepeatContext,
) -> Result<Option<NaiveDate>> {
    if date.is_empty() {
        return Ok(None);
    }

    let Ok(start) = parse_date(date) else {
        return Ok(None);
    };

    let Some(rule) = classify(repeat)? else {
        return Ok(None);
    };

    match rule {
        RepeatRule::Never => Ok((start > now).then_some(start)),
        RepeatRule::Daily(days) => {
            if context != RepeatContext::Done && start == now {
                return Ok(Some(start));
            }
            next_daily(start, now, days).map(Some)
        },
        RepeatRule::Yearly => next_yearly(start, now).map(Some),
    }
}

/// Compute the next occurrence of a task (lenient mode)
///
/// Any error is logged and reported as "no date".
pub fn next_date_lenient(
    now: NaiveDate,
    date: &str,
    repeat: &str,
    context: RepeatContext,
) -> Option<NaiveDate> {
    match next_date(now, date, repeat, context) {
        Ok(next) => next,
        Err(e) => {
            tracing::warn!(
                error = %e,
                date = date,
                repeat = repeat,
                context = %context,
                "Ignoring repeat rule that cannot be evaluated"
            );
            None
        },
    }
}

/// Smallest `start + k * days` with `k >= 1` that is strictly after `now`
fn next_daily(start: NaiveDate, now: NaiveDate, days: u32) -> Result<NaiveDate> {
    let step = i64::from(days);
    let steps = if start > now {
        1
    } else {
        (now - start).num_days() / step + 1
    };

    // steps and step are both positive here
    start
        .checked_add_days(Days::new((steps * step) as u64))
        .ok_or_else(|| out_of_range(start))
}

/// One year after `start`; if that is already behind `now`, plain years
/// until strictly after `now`
///
/// A first step landing exactly on `now` is kept. A Feb 29 start lands on
/// Mar 1 of the following (never leap) year; later steps start from that
/// Mar 1 and keep it.
fn next_yearly(start: NaiveDate, now: NaiveDate) -> Result<NaiveDate> {
    let mut next = add_year(start)?;

    if next < now {
        while next <= now {
            next = add_year(next)?;
        }
    }

    Ok(next)
}

fn add_year(date: NaiveDate) -> Result<NaiveDate> {
    let year = date.year() + 1;

    NaiveDate::from_ymd_opt(year, date.month(), date.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
        .ok_or_else(|| out_of_range(date))
}

fn out_of_range(date: NaiveDate) -> SchedulerError {
    SchedulerError::InvalidInput(format!("Next occurrence after {} is out of range", date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time_utils::format_date;

    fn d(value: &str) -> NaiveDate {
        parse_date(value).unwrap()
    }

    fn next(now: &str, date: &str, repeat: &str, context: RepeatContext) -> Option<String> {
        next_date(d(now), date, repeat, context)
            .unwrap()
            .map(format_date)
    }

    #[test]
    fn test_empty_date_is_noop() {
        assert_eq!(next("20240101", "", "d 1", RepeatContext::List), None);
        assert_eq!(next("20240101", "", "w 2", RepeatContext::Check), None);
    }

    #[test]
    fn test_unparseable_date_is_noop() {
        assert_eq!(next("20240101", "2024-01-01", "d 1", RepeatContext::List), None);
    }

    #[test]
    fn test_empty_rule_keeps_future_date() {
        assert_eq!(
            next("20240101", "20240102", "", RepeatContext::List),
            Some("20240102".to_string())
        );
    }

    #[test]
    fn test_empty_rule_past_or_today_is_empty() {
        assert_eq!(next("20240101", "20240101", "", RepeatContext::List), None);
        assert_eq!(next("20240101", "20231231", "", RepeatContext::Done), None);
    }

    #[test]
    fn test_daily_smallest_multiple_after_reference() {
        let now = d("20240315");
        let start = d("20240101");

        for n in 1..=MAX_DAILY_INTERVAL {
            let result = next_date(now, "20240101", &format!("d {}", n), RepeatContext::Add)
                .unwrap()
                .unwrap();
            let offset = (result - start).num_days();
            let step = i64::from(n);

            assert!(result > now, "d {} gave {} not after {}", n, result, now);
            assert_eq!(offset % step, 0, "d {} gave non-multiple {}", n, result);
            assert!(offset >= step);
            // The previous multiple must not be after the reference
            let previous = start + chrono::Duration::days(offset - step);
            assert!(offset == step || previous <= now);
        }
    }

    #[test]
    fn test_daily_future_start_advances_once() {
        assert_eq!(
            next("20240101", "20240110", "d 5", RepeatContext::Add),
            Some("20240115".to_string())
        );
    }

    #[test]
    fn test_daily_exact_landing_moves_past_reference() {
        // 20240101 + 14 days is the reference itself, so one more step
        assert_eq!(
            next("20240115", "20240101", "d 7", RepeatContext::List),
            Some("20240122".to_string())
        );
    }

    #[test]
    fn test_daily_same_day_keeps_today_outside_done() {
        for context in [
            RepeatContext::List,
            RepeatContext::Add,
            RepeatContext::Check,
            RepeatContext::NextDate,
        ] {
            for n in [1, 7, 400] {
                assert_eq!(
                    next("20240420", "20240420", &format!("d {}", n), context),
                    Some("20240420".to_string()),
                    "context {} d {}",
                    context,
                    n
                );
            }
        }
    }

    #[test]
    fn test_daily_same_day_done_advances() {
        assert_eq!(
            next("20240420", "20240420", "d 1", RepeatContext::Done),
            Some("20240421".to_string())
        );
        assert_eq!(
            next("20240420", "20240420", "d 30", RepeatContext::Done),
            Some("20240520".to_string())
        );
    }

    #[test]
    fn test_daily_interval_out_of_range_is_empty() {
        assert_eq!(next("20240101", "20231201", "d 0", RepeatContext::Check), None);
        assert_eq!(next("20240101", "20231201", "d 401", RepeatContext::Check), None);
        assert_eq!(next("20240101", "20231201", "d x", RepeatContext::Check), None);
        assert_eq!(next("20240101", "20231201", "d ", RepeatContext::Check), None);
    }

    #[test]
    fn test_yearly_same_month_day() {
        assert_eq!(
            next("20240101", "20230615", "y", RepeatContext::Done),
            Some("20240615".to_string())
        );
    }

    #[test]
    fn test_yearly_catches_up_over_several_years() {
        assert_eq!(
            next("20240701", "20190615", "y", RepeatContext::List),
            Some("20250615".to_string())
        );
    }

    #[test]
    fn test_yearly_first_step_on_reference_is_kept() {
        assert_eq!(
            next("20240615", "20230615", "y", RepeatContext::List),
            Some("20240615".to_string())
        );
    }

    #[test]
    fn test_yearly_catch_up_lands_strictly_after() {
        // 2022 -> 2023 is behind, catch-up skips the reference day itself
        assert_eq!(
            next("20240615", "20220615", "y", RepeatContext::List),
            Some("20250615".to_string())
        );
    }

    #[test]
    fn test_yearly_leap_day_done_on_march_first() {
        assert_eq!(
            next("20250301", "20240229", "y", RepeatContext::Done),
            Some("20250301".to_string())
        );
    }

    #[test]
    fn test_yearly_future_start_still_advances_one_year() {
        assert_eq!(
            next("20240101", "20250301", "y", RepeatContext::NextDate),
            Some("20260301".to_string())
        );
    }

    #[test]
    fn test_yearly_leap_day_lands_on_march_first() {
        assert_eq!(
            next("20240301", "20240229", "y", RepeatContext::Done),
            Some("20250301".to_string())
        );
    }

    #[test]
    fn test_yearly_leap_day_normalized_once_then_plain_years() {
        // Catch-up crosses 2028 (leap) but stays on Mar 1
        assert_eq!(
            next("20290101", "20240229", "y", RepeatContext::List),
            Some("20290301".to_string())
        );
    }

    #[test]
    fn test_unsupported_rule_is_error() {
        for rule in ["w 2", "m 1", "d", "y 1", "Y", " d 1"] {
            let result = next_date(d("20240101"), "20240101", rule, RepeatContext::Check);
            assert!(
                matches!(result, Err(SchedulerError::UnsupportedRule(_))),
                "rule {:?}",
                rule
            );
        }
    }

    #[test]
    fn test_lenient_swallows_unsupported_rule() {
        let result = next_date_lenient(d("20240101"), "20231201", "w 2", RepeatContext::List);
        assert_eq!(result, None);
    }

    #[test]
    fn test_lenient_matches_strict_on_valid_rule() {
        let now = d("20240115");
        assert_eq!(
            next_date_lenient(now, "20240101", "d 7", RepeatContext::List),
            next_date(now, "20240101", "d 7", RepeatContext::List).unwrap()
        );
    }

    #[test]
    fn test_deterministic() {
        let now = d("20240505");
        let first = next_date(now, "20200229", "y", RepeatContext::List).unwrap();
        let second = next_date(now, "20200229", "y", RepeatContext::List).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rule_parse_strict() {
        assert_eq!(RepeatRule::parse("").unwrap(), RepeatRule::Never);
        assert_eq!(RepeatRule::parse("d 14").unwrap(), RepeatRule::Daily(14));
        assert_eq!(RepeatRule::parse("y").unwrap(), RepeatRule::Yearly);
        assert!(matches!(
            RepeatRule::parse("d 401"),
            Err(SchedulerError::InvalidInput(_))
        ));
        assert!(matches!(
            RepeatRule::parse("w 1"),
            Err(SchedulerError::UnsupportedRule(_))
        ));
    }

    #[test]
    fn test_context_from_str() {
        assert_eq!("done".parse::<RepeatContext>().unwrap(), RepeatContext::Done);
        assert_eq!(
            "nextdate".parse::<RepeatContext>().unwrap(),
            RepeatContext::NextDate
        );
        assert!("later".parse::<RepeatContext>().is_err());
    }
}
