//! Recurrence date arithmetic and history logging

use super::blocks::{Period, RecurrenceRule};
use super::task::{Task, TaskOrigin};
use crate::storage::{DocumentStore, append_line, splice_lines};
use anyhow::Result;
use chrono::{Days, Months, NaiveDate};

/// Next due date of a recurring task
///
/// Strict rules count from the current due date, others from `today`.
/// Returns `None` for a strict rule without a due date.
pub fn next_occurrence(
    rule: &RecurrenceRule,
    due: Option<NaiveDate>,
    today: NaiveDate,
) -> Option<NaiveDate> {
    let anchor = if rule.strict { due? } else { today };
    match rule.period {
        Period::Day => anchor.checked_add_days(Days::new(rule.count as u64)),
        Period::Month => anchor.checked_add_months(Months::new(rule.count)),
    }
}

/// Append a completed occurrence to the shared log note
pub(crate) async fn log_completed<S: DocumentStore>(
    store: &S,
    log_path: &str,
    completed: &Task,
) -> Result<()> {
    append_line(store, log_path, &completed.render()).await
}

/// Replace the originating line with the next occurrence followed by the
/// completed one
pub(crate) async fn log_in_place<S: DocumentStore>(
    store: &S,
    origin: &TaskOrigin,
    next: &Task,
    completed: &Task,
) -> Result<()> {
    splice_lines(
        store,
        &origin.path,
        origin.line,
        &[next.render(), completed.render()],
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rule(period: Period, count: u32, strict: bool) -> RecurrenceRule {
        RecurrenceRule {
            period,
            count,
            strict,
            log_in_place: false,
        }
    }

    #[test]
    fn test_strict_counts_from_due() {
        assert_eq!(
            next_occurrence(&rule(Period::Day, 3, true), Some(date(2024, 1, 10)), date(2024, 6, 15)),
            Some(date(2024, 1, 13))
        );
    }

    #[test]
    fn test_lenient_counts_from_today() {
        assert_eq!(
            next_occurrence(&rule(Period::Month, 1, false), Some(date(2024, 1, 10)), date(2024, 6, 15)),
            Some(date(2024, 7, 15))
        );
        assert_eq!(
            next_occurrence(&rule(Period::Day, 1, false), None, date(2024, 12, 31)),
            Some(date(2025, 1, 1))
        );
    }

    #[test]
    fn test_month_end_is_clamped() {
        assert_eq!(
            next_occurrence(&rule(Period::Month, 1, true), Some(date(2024, 1, 31)), date(2024, 1, 1)),
            Some(date(2024, 2, 29))
        );
    }

    #[test]
    fn test_strict_without_due_is_degenerate() {
        assert_eq!(
            next_occurrence(&rule(Period::Day, 1, true), None, date(2024, 1, 1)),
            None
        );
    }
}
