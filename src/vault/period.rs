//! Calendar labels used as periodic note names
//!
//! - day: `2024-03-01`
//! - week: `2024-W9` (ISO week-year and week, weeks start on Monday; notes
//!   named `2024-W09` are recognized as the same week)
//! - month: `2024-03`
//! - quarter: `2024-Q1`

use chrono::{Datelike, Duration, NaiveDate, Weekday};

pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` day label
pub fn parse_day(label: &str) -> Option<NaiveDate> {
    if label.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(label, DAY_FORMAT).ok()
}

/// Parse a `YYYY-Www` week label into the Monday starting that week
///
/// Single-digit weeks (`2024-W9`) are accepted too.
pub fn parse_week(label: &str) -> Option<NaiveDate> {
    let (year, week) = label.split_once("-W")?;
    if year.len() != 4 || week.is_empty() || week.len() > 2 {
        return None;
    }
    if !year.chars().chain(week.chars()).all(|c| c.is_ascii_digit()) {
        return None;
    }
    NaiveDate::from_isoywd_opt(year.parse().ok()?, week.parse().ok()?, Weekday::Mon)
}

/// Parse a `YYYY-MM` month label into the first day of that month
pub fn parse_month(label: &str) -> Option<NaiveDate> {
    let (year, month) = label.split_once('-')?;
    if year.len() != 4 || month.len() != 2 {
        return None;
    }
    if !year.chars().chain(month.chars()).all(|c| c.is_ascii_digit()) {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
}

/// Parse a `YYYY-Qn` quarter label into the first day of that quarter
pub fn parse_quarter(label: &str) -> Option<NaiveDate> {
    let (year, quarter) = label.split_once("-Q")?;
    if year.len() != 4 || !year.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let quarter: u32 = match quarter {
        "1" | "2" | "3" | "4" => quarter.parse().ok()?,
        _ => return None,
    };
    NaiveDate::from_ymd_opt(year.parse().ok()?, (quarter - 1) * 3 + 1, 1)
}

/// Monday of the ISO week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// First day of the month containing `date`
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn day_label(date: NaiveDate) -> String {
    date.format(DAY_FORMAT).to_string()
}

pub fn week_label(date: NaiveDate) -> String {
    let week = date.iso_week();
    format!("{:04}-W{}", week.year(), week.week())
}

pub fn month_label(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

pub fn quarter_label(date: NaiveDate) -> String {
    format!("{:04}-Q{}", date.year(), date.month0() / 3 + 1)
}

/// Every spelling of a period label that names the same note
///
/// Weeks before the tenth are written both `2024-W9` and `2024-W09`; other
/// labels have a single spelling.
pub fn label_spellings(label: &str) -> Vec<String> {
    let Some(monday) = parse_week(label) else {
        return vec![label.to_string()];
    };
    let week = monday.iso_week();
    let short = format!("{:04}-W{}", week.year(), week.week());
    let padded = format!("{:04}-W{:02}", week.year(), week.week());
    if short == padded {
        vec![short]
    } else {
        vec![short, padded]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_day() {
        assert_eq!(parse_day("2024-03-01"), Some(date(2024, 3, 1)));
        assert_eq!(parse_day("2024-3-1"), None);
        assert_eq!(parse_day("Health"), None);
    }

    #[test]
    fn test_parse_week() {
        assert_eq!(parse_week("2024-W09"), Some(date(2024, 2, 26)));
        assert_eq!(parse_week("2024-W9"), Some(date(2024, 2, 26)));
        assert_eq!(parse_week("2024-W1"), Some(date(2024, 1, 1)));
        assert_eq!(parse_week("2024-03"), None);
        assert_eq!(parse_week("2024-W60"), None);
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2024-03"), Some(date(2024, 3, 1)));
        assert_eq!(parse_month("2024-13"), None);
        assert_eq!(parse_month("2024-W09"), None);
        assert_eq!(parse_month("2024-03-01"), None);
    }

    #[test]
    fn test_parse_quarter() {
        assert_eq!(parse_quarter("2024-Q1"), Some(date(2024, 1, 1)));
        assert_eq!(parse_quarter("2024-Q4"), Some(date(2024, 10, 1)));
        assert_eq!(parse_quarter("2024-Q5"), None);
        assert_eq!(parse_quarter("2024-03"), None);
    }

    #[test]
    fn test_labels() {
        let d = date(2024, 3, 1);
        assert_eq!(day_label(d), "2024-03-01");
        assert_eq!(week_label(d), "2024-W9");
        assert_eq!(month_label(d), "2024-03");
        assert_eq!(quarter_label(d), "2024-Q1");
        assert_eq!(quarter_label(date(2024, 12, 31)), "2024-Q4");
        // ISO week-year differs from the calendar year here
        assert_eq!(week_label(date(2024, 12, 30)), "2025-W1");
    }

    #[test]
    fn test_starts() {
        assert_eq!(week_start(date(2024, 3, 1)), date(2024, 2, 26));
        assert_eq!(week_start(date(2024, 2, 26)), date(2024, 2, 26));
        assert_eq!(month_start(date(2024, 3, 17)), date(2024, 3, 1));
    }

    #[test]
    fn test_label_spellings() {
        assert_eq!(label_spellings("2024-W9"), ["2024-W9", "2024-W09"]);
        assert_eq!(label_spellings("2024-W09"), ["2024-W9", "2024-W09"]);
        assert_eq!(label_spellings("2024-W12"), ["2024-W12"]);
        assert_eq!(label_spellings("2024-03"), ["2024-03"]);
        assert_eq!(label_spellings("2024-Q1"), ["2024-Q1"]);
    }
}
