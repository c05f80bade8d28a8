use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime};

use crate::{UtcDateTime, ValidationError};

/// Inclusive calendar date range used by every dashboard fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    start: Date,
    end: Date,
}

impl DateRange {
    pub fn new(start: Date, end: Date) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::InvertedDateRange {
                start: format_date(start),
                end: format_date(end),
            });
        }
        Ok(Self { start, end })
    }

    /// Parse `YYYY-MM-DD` bounds.
    pub fn parse(start: &str, end: &str) -> Result<Self, ValidationError> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    /// The `days` calendar days ending at (and including) `end`.
    pub fn trailing(end: Date, days: u32) -> Self {
        let start = end.saturating_sub(Duration::days(i64::from(days.max(1)) - 1));
        Self { start, end }
    }

    /// Trailing window ending today (UTC).
    pub fn trailing_from_today(days: u32) -> Self {
        Self::trailing(OffsetDateTime::now_utc().date(), days)
    }

    pub const fn start(self) -> Date {
        self.start
    }

    pub const fn end(self) -> Date {
        self.end
    }

    pub fn days(self) -> i64 {
        (self.end - self.start).whole_days() + 1
    }

    /// Midnight UTC of the first day.
    pub fn start_timestamp(self) -> UtcDateTime {
        UtcDateTime::start_of_day(self.start)
    }

    /// Midnight UTC of the day after the last day.
    pub fn end_timestamp_exclusive(self) -> UtcDateTime {
        UtcDateTime::start_of_day(self.end.saturating_add(Duration::days(1)))
    }

    pub fn contains(self, ts: UtcDateTime) -> bool {
        ts >= self.start_timestamp() && ts < self.end_timestamp_exclusive()
    }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", format_date(self.start), format_date(self.end))
    }
}

#[derive(Serialize, Deserialize)]
struct DateRangeRepr {
    start: String,
    end: String,
}

impl Serialize for DateRange {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        DateRangeRepr {
            start: format_date(self.start),
            end: format_date(self.end),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DateRange {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let repr = DateRangeRepr::deserialize(deserializer)?;
        Self::parse(&repr.start, &repr.end).map_err(D::Error::custom)
    }
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(input: &str) -> Result<Date, ValidationError> {
    Date::parse(input.trim(), format_description!("[year]-[month]-[day]")).map_err(|_| {
        ValidationError::InvalidDate {
            value: input.to_owned(),
        }
    })
}

pub fn format_date(date: Date) -> String {
    date.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| date.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_inclusive_range() {
        let range = DateRange::parse("2024-01-01", "2024-01-31").expect("valid range");
        assert_eq!(range.days(), 31);
        assert_eq!(range.to_string(), "2024-01-01..2024-01-31");
        assert_eq!(
            range.end_timestamp_exclusive().format_rfc3339(),
            "2024-02-01T00:00:00Z"
        );
    }

    #[test]
    fn rejects_inverted_range() {
        let err = DateRange::parse("2024-02-01", "2024-01-01").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvertedDateRange { .. }));
    }

    #[test]
    fn rejects_malformed_date() {
        let err = parse_date("01/02/2024").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidDate { .. }));
    }

    #[test]
    fn trailing_window_counts_end_day() {
        let end = parse_date("2024-03-10").expect("date");
        let range = DateRange::trailing(end, 10);
        assert_eq!(format_date(range.start()), "2024-03-01");
        assert_eq!(range.days(), 10);
    }

    #[test]
    fn contains_is_end_inclusive() {
        let range = DateRange::parse("2024-01-01", "2024-01-02").expect("valid");
        let inside = UtcDateTime::parse("2024-01-02T20:00:00Z").expect("ts");
        let outside = UtcDateTime::parse("2024-01-03T00:00:00Z").expect("ts");
        assert!(range.contains(inside));
        assert!(!range.contains(outside));
    }
}
