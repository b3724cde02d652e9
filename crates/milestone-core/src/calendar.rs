//! Calendar labels and date arithmetic for plan entries.

use chrono::{Datelike, Duration, NaiveDate};

use crate::model::Granularity;

pub const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

pub const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Zero-based weekday index (Monday = 0) for a weekday name.
pub fn weekday_index(label: &str) -> Option<usize> {
    WEEKDAYS.iter().position(|d| *d == label)
}

/// Zero-based month index (January = 0) for a month name.
pub fn month_index(label: &str) -> Option<usize> {
    MONTHS.iter().position(|m| *m == label)
}

/// Week number from a `"Week N"` label.
pub fn week_number(label: &str) -> Option<usize> {
    label
        .strip_prefix("Week ")
        .and_then(|n| n.trim().parse::<usize>().ok())
}

/// Date (or `"A to B"` range) for an entry of a plan with the given
/// granularity, relative to `today`.
///
/// - week plans: the next occurrence of the named weekday after `today`
/// - month plans: the 7-day range starting `7 * (N - 1)` days from `today`
/// - year plans: the full named month, this year or next
/// - day plans: `today`
pub fn entry_date(plan: Granularity, label: &str, today: NaiveDate) -> String {
    match plan {
        Granularity::Week => next_weekday(label, today).format(DATE_FORMAT).to_string(),
        Granularity::Month => {
            let week = week_number(label).unwrap_or(1).max(1);
            let start = today + Duration::days(7 * (week as i64 - 1));
            range(start, start + Duration::days(6))
        }
        Granularity::Year => match month_bounds(label, today) {
            Some((start, end)) => range(start, end),
            None => today.format(DATE_FORMAT).to_string(),
        },
        Granularity::Day => today.format(DATE_FORMAT).to_string(),
    }
}

fn next_weekday(label: &str, today: NaiveDate) -> NaiveDate {
    let target = weekday_index(label).unwrap_or(0) as i64;
    let current = today.weekday().num_days_from_monday() as i64;
    let mut ahead = target - current;
    if ahead <= 0 {
        ahead += 7;
    }
    today + Duration::days(ahead)
}

/// First and last day of the named month. Months already past in the
/// current year roll over to next year.
fn month_bounds(label: &str, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let month = month_index(label).unwrap_or(0) as u32 + 1;
    let year = if month >= today.month() {
        today.year()
    } else {
        today.year() + 1
    };
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((start, next - Duration::days(1)))
}

fn range(start: NaiveDate, end: NaiveDate) -> String {
    format!(
        "{} to {}",
        start.format(DATE_FORMAT),
        end.format(DATE_FORMAT)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn label_lookups() {
        assert_eq!(weekday_index("Sunday"), Some(6));
        assert_eq!(month_index("March"), Some(2));
        assert_eq!(week_number("Week 3"), Some(3));
        assert_eq!(week_number("Weekend"), None);
        assert_eq!(month_index("Today"), None);
    }

    #[test]
    fn week_plan_uses_next_occurrence() {
        // 2026-10-19 is a Monday.
        let today = date(2026, 10, 19);
        assert_eq!(entry_date(Granularity::Week, "Monday", today), "2026-10-26");
        assert_eq!(entry_date(Granularity::Week, "Tuesday", today), "2026-10-20");
        assert_eq!(entry_date(Granularity::Week, "Sunday", today), "2026-10-25");
    }

    #[test]
    fn month_plan_uses_week_ranges() {
        let today = date(2026, 10, 19);
        assert_eq!(
            entry_date(Granularity::Month, "Week 1", today),
            "2026-10-19 to 2026-10-25"
        );
        assert_eq!(
            entry_date(Granularity::Month, "Week 3", today),
            "2026-11-02 to 2026-11-08"
        );
    }

    #[test]
    fn year_plan_rolls_past_months_forward() {
        let today = date(2026, 10, 19);
        assert_eq!(
            entry_date(Granularity::Year, "December", today),
            "2026-12-01 to 2026-12-31"
        );
        assert_eq!(
            entry_date(Granularity::Year, "February", today),
            "2027-02-01 to 2027-02-28"
        );
        assert_eq!(
            entry_date(Granularity::Year, "October", today),
            "2026-10-01 to 2026-10-31"
        );
    }

    #[test]
    fn day_plan_is_today() {
        let today = date(2026, 10, 19);
        assert_eq!(entry_date(Granularity::Day, "Today", today), "2026-10-19");
    }
}
