use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;

const SCALES: [(u64, &str); 3] = [(1_000_000_000, "B"), (1_000_000, "M"), (1_000, "K")];

/// Shortens a count to one decimal with a K/M/B suffix. The decimal is
/// truncated, so 999_999 renders as `999.9K` rather than rounding up.
pub fn format_number(num: u64) -> String {
    for (divisor, suffix) in SCALES {
        if num >= divisor {
            let tenths = num / (divisor / 10);
            return format!("{}.{}{}", tenths / 10, tenths % 10, suffix);
        }
    }

    num.to_string()
}

pub fn format_views(views: u64) -> String {
    format!("{} views", format_number(views))
}

/// Renders a length in seconds as `m:ss`, or `h:mm:ss` past the hour.
pub fn format_clock(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

/// Bucketed age of a timestamp relative to some "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeDate {
    Minutes(i64),
    Hours(i64),
    Days(i64),
    Weeks(i64),
    Calendar(NaiveDate),
}

/// Buckets a Unix-seconds timestamp: under an hour in minutes, under a day in
/// hours, under a week in days, under 30 days in whole weeks, otherwise the
/// calendar date. Timestamps in the future count as zero minutes.
pub fn relative_date(timestamp: i64, now: DateTime<Utc>) -> RelativeDate {
    let minutes = (now.timestamp() - timestamp).max(0) / 60;
    if minutes < 60 {
        return RelativeDate::Minutes(minutes);
    }

    let hours = minutes / 60;
    if hours < 24 {
        return RelativeDate::Hours(hours);
    }

    let days = hours / 24;
    if days < 7 {
        return RelativeDate::Days(days);
    }
    if days < 30 {
        return RelativeDate::Weeks(days / 7);
    }

    let date = DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.date_naive())
        .unwrap_or_default();
    RelativeDate::Calendar(date)
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", n, unit)
    }
}

impl fmt::Display for RelativeDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelativeDate::Minutes(n) => f.write_str(&plural(*n, "minute")),
            RelativeDate::Hours(n) => f.write_str(&plural(*n, "hour")),
            RelativeDate::Days(n) => f.write_str(&plural(*n, "day")),
            RelativeDate::Weeks(n) => f.write_str(&plural(*n, "week")),
            RelativeDate::Calendar(date) => write!(f, "{}", date.format("%-d %B %Y")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1.0K");
        assert_eq!(format_number(1500), "1.5K");
        assert_eq!(format_number(999_999), "999.9K");
        assert_eq!(format_number(2_300_000), "2.3M");
        assert_eq!(format_number(1_000_000_000), "1.0B");
        assert_eq!(format_number(12_345_678_901), "12.3B");
    }

    #[test]
    fn test_format_views() {
        assert_eq!(format_views(500), "500 views");
        assert_eq!(format_views(1_200_000), "1.2M views");
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(5), "0:05");
        assert_eq!(format_clock(212), "3:32");
        assert_eq!(format_clock(3725), "1:02:05");
    }

    #[test]
    fn test_relative_date_buckets() {
        let now = now();
        let ts = now.timestamp();

        assert_eq!(relative_date(ts - 45 * 60, now), RelativeDate::Minutes(45));
        assert_eq!(relative_date(ts - 3 * 3600, now), RelativeDate::Hours(3));
        assert_eq!(relative_date(ts - 2 * 86_400, now), RelativeDate::Days(2));
        assert_eq!(relative_date(ts - 10 * 86_400, now), RelativeDate::Weeks(1));
        assert_eq!(relative_date(ts - 29 * 86_400, now), RelativeDate::Weeks(4));
        assert_eq!(
            relative_date(ts - 45 * 86_400, now),
            RelativeDate::Calendar(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
        );
    }

    #[test]
    fn test_relative_date_future_is_zero_minutes() {
        let now = now();
        assert_eq!(
            relative_date(now.timestamp() + 600, now),
            RelativeDate::Minutes(0)
        );
    }

    #[test]
    fn test_relative_date_display() {
        assert_eq!(RelativeDate::Minutes(45).to_string(), "45 minutes ago");
        assert_eq!(RelativeDate::Hours(1).to_string(), "1 hour ago");
        assert_eq!(RelativeDate::Weeks(1).to_string(), "1 week ago");
        assert_eq!(
            RelativeDate::Calendar(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()).to_string(),
            "1 May 2024"
        );
    }
}
