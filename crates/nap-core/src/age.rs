//! Baby age from a birthday.

use chrono::{Datelike, NaiveDate};

/// Whole months between `birthday` and `today`, never negative.
pub fn age_in_months(birthday: NaiveDate, today: NaiveDate) -> u32 {
    let mut months = i64::from(today.year() - birthday.year()) * 12 + i64::from(today.month())
        - i64::from(birthday.month());
    if today.day() < birthday.day() {
        months -= 1;
    }
    u32::try_from(months).unwrap_or(0)
}

fn plural(count: u32, unit: &str) -> String {
    if count == 1 {
        format!("{count} {unit}")
    } else {
        format!("{count} {unit}s")
    }
}

/// Formats an age such as `4 months`, `1 year` or `2 years 3 months`.
pub fn format_age(months: u32) -> String {
    if months < 12 {
        return plural(months, "month");
    }
    let years = months / 12;
    let remaining = months % 12;
    if remaining == 0 {
        plural(years, "year")
    } else {
        format!("{} {}", plural(years, "year"), plural(remaining, "month"))
    }
}
