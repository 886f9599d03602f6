use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeZone, Timelike};
use chrono_tz::Tz;

/// Default timezone for reporting buckets and the age reference year.
pub const DEFAULT_REPORTING_TZ: Tz = chrono_tz::Asia::Seoul;

/// Converts a naive UTC instant into the reporting timezone.
///
/// This is the single source of truth for turning stored timestamps into
/// calendar dates and hours for statistics.
pub fn to_reporting(instant: NaiveDateTime, tz: Tz) -> chrono::DateTime<Tz> {
    tz.from_utc_datetime(&instant)
}

/// Calendar date of a UTC instant in the given timezone.
pub fn reporting_date(instant: NaiveDateTime, tz: Tz) -> NaiveDate {
    to_reporting(instant, tz).date_naive()
}

/// Hour of day (0-23) of a UTC instant in the given timezone.
pub fn reporting_hour(instant: NaiveDateTime, tz: Tz) -> usize {
    to_reporting(instant, tz).hour() as usize
}

/// Calendar year of a UTC instant in the given timezone.
pub fn reporting_year(instant: NaiveDateTime, tz: Tz) -> i32 {
    to_reporting(instant, tz).year()
}

/// Parses an IANA timezone name.
pub fn parse_tz(name: &str) -> Option<Tz> {
    name.trim().parse::<Tz>().ok()
}

pub fn get_days_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    if start > end {
        return Vec::new();
    }
    let mut days = Vec::new();
    let mut current = start;
    while current <= end {
        days.push(current);
        if let Some(next) = current.succ_opt() {
            current = next;
        } else {
            break;
        }
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn seoul_is_nine_hours_ahead() {
        let instant = at("2024-03-01 16:30:00");
        assert_eq!(reporting_hour(instant, DEFAULT_REPORTING_TZ), 1);
        assert_eq!(
            reporting_date(instant, DEFAULT_REPORTING_TZ),
            NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()
        );
    }

    #[test]
    fn year_rolls_over_in_reporting_zone() {
        assert_eq!(
            reporting_year(at("2024-12-31 20:00:00"), DEFAULT_REPORTING_TZ),
            2025
        );
    }

    #[test]
    fn days_between_is_inclusive() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 30).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 2, 2).unwrap();
        assert_eq!(get_days_between(start, end).len(), 4);
        assert!(get_days_between(end, start).is_empty());
    }

    #[test]
    fn parses_known_zone() {
        assert_eq!(parse_tz("Asia/Seoul"), Some(DEFAULT_REPORTING_TZ));
        assert_eq!(parse_tz("Mars/Olympus"), None);
    }
}
