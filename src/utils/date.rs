//! Calendar dates without timezone dependencies.
//!
//! Frontmatter dates are plain `YYYY-MM-DD` strings. Sorting compares the
//! strings directly; this module only exists for humanized display
//! ("3 days ago", "2 months ago").

use std::time::{SystemTime, UNIX_EPOCH};

/// A proleptic Gregorian calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Date {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

impl Date {
    pub const fn from_ymd(year: i32, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    /// Parse `YYYY-MM-DD`, ignoring any trailing time component.
    pub fn parse(s: &str) -> Option<Self> {
        let bytes = s.trim().as_bytes();
        if bytes.len() < 10 || bytes[4] != b'-' || bytes[7] != b'-' {
            return None;
        }
        let year = std::str::from_utf8(&bytes[0..4]).ok()?.parse().ok()?;
        let month = std::str::from_utf8(&bytes[5..7]).ok()?.parse().ok()?;
        let day = std::str::from_utf8(&bytes[8..10]).ok()?.parse().ok()?;

        let date = Self::from_ymd(year, month, day);
        date.is_valid().then_some(date)
    }

    /// Today in UTC.
    pub fn today() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self::from_days(i64::try_from(secs / 86_400).unwrap_or(0))
    }

    fn is_valid(self) -> bool {
        (1..=12).contains(&self.month)
            && self.day >= 1
            && self.day <= days_in_month(self.year, self.month)
    }

    /// Days since 1970-01-01.
    pub fn to_days(self) -> i64 {
        let y = i64::from(self.year) - i64::from(self.month <= 2);
        let era = y.div_euclid(400);
        let yoe = y - era * 400;
        let m = i64::from(self.month);
        let mp = (m + 9) % 12;
        let doy = (153 * mp + 2) / 5 + i64::from(self.day) - 1;
        let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
        era * 146_097 + doe - 719_468
    }

    /// Inverse of [`Date::to_days`].
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_days(days: i64) -> Self {
        let z = days + 719_468;
        let era = z.div_euclid(146_097);
        let doe = z - era * 146_097;
        let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
        let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
        let mp = (5 * doy + 2) / 153;
        let day = (doy - (153 * mp + 2) / 5 + 1) as u8;
        let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u8;
        let year = (yoe + era * 400 + i64::from(month <= 2)) as i32;
        Self { year, month, day }
    }
}

const fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

const fn days_in_month(year: i32, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Humanize `date` relative to `today`.
///
/// Recent dates count days, then weeks, months and years. Returns `None`
/// when `date` is not a valid `YYYY-MM-DD` string.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn relative_date(date: &str, today: Date) -> Option<String> {
    let then = Date::parse(date)?;
    let diff_days = then.to_days() - today.to_days();
    if diff_days == 0 {
        return Some("today".to_string());
    }

    let days = diff_days as f64;
    let (amount, unit) = if diff_days.abs() < 7 {
        (diff_days, "day")
    } else if diff_days.abs() < 30 {
        ((days / 7.0).round() as i64, "week")
    } else if (days / 30.44).round().abs() < 12.0 {
        ((days / 30.44).round() as i64, "month")
    } else {
        ((days / 365.25).round() as i64, "year")
    };

    Some(format_relative(amount, unit))
}

fn format_relative(amount: i64, unit: &str) -> String {
    match amount {
        -1 if unit == "day" => "yesterday".to_string(),
        1 if unit == "day" => "tomorrow".to_string(),
        -1 => format!("last {unit}"),
        1 => format!("next {unit}"),
        n if n < 0 => format!("{} {unit}s ago", -n),
        n => format!("in {n} {unit}s"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_and_invalid() {
        assert_eq!(Date::parse("2024-01-05"), Some(Date::from_ymd(2024, 1, 5)));
        assert_eq!(Date::parse("2024-02-29T10:00:00Z"), Some(Date::from_ymd(2024, 2, 29)));
        assert_eq!(Date::parse("2023-02-29"), None);
        assert_eq!(Date::parse("2024/01/05"), None);
        assert_eq!(Date::parse(""), None);
    }

    #[test]
    fn test_days_roundtrip() {
        for days in [-1000, 0, 1, 19_000, 20_000] {
            assert_eq!(Date::from_days(days).to_days(), days);
        }
        assert_eq!(Date::from_ymd(1970, 1, 1).to_days(), 0);
    }

    #[test]
    fn test_relative_date() {
        let today = Date::from_ymd(2024, 6, 15);
        assert_eq!(relative_date("2024-06-15", today).as_deref(), Some("today"));
        assert_eq!(relative_date("2024-06-14", today).as_deref(), Some("yesterday"));
        assert_eq!(relative_date("2024-06-12", today).as_deref(), Some("3 days ago"));
        assert_eq!(relative_date("2024-06-01", today).as_deref(), Some("2 weeks ago"));
        assert_eq!(relative_date("2024-03-15", today).as_deref(), Some("3 months ago"));
        assert_eq!(relative_date("2022-06-15", today).as_deref(), Some("2 years ago"));
        assert_eq!(relative_date("2024-06-18", today).as_deref(), Some("in 3 days"));
        assert_eq!(relative_date("not a date", today), None);
    }
}
