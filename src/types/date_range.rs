use crate::error::WeatherEtlError;
use chrono::{DateTime, Duration, NaiveDate, SecondsFormat, Utc};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive range of calendar dates. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, WeatherEtlError> {
        if start > end {
            return Err(WeatherEtlError::InvalidInput(format!(
                "start date {} is after end date {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Parses two `YYYY-MM-DD` strings into a range.
    pub fn parse(start: &str, end: &str) -> Result<Self, WeatherEtlError> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days covered, counting both ends.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// The request window sent to the provider: midnight of the first day
    /// through 23:00 of the last day, both UTC.
    pub fn utc_bounds(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = self.start.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc();
        let end = self.end.and_hms_opt(23, 0, 0).unwrap_or_default().and_utc();
        (start, end)
    }

    /// [`Self::utc_bounds`] rendered as RFC 3339 (`2023-12-01T00:00:00+00:00`).
    pub fn rfc3339_bounds(&self) -> (String, String) {
        let (start, end) = self.utc_bounds();
        (
            start.to_rfc3339_opts(SecondsFormat::Secs, false),
            end.to_rfc3339_opts(SecondsFormat::Secs, false),
        )
    }

    /// Splits the range into consecutive sub-ranges of at most `max_days`
    /// days each, in ascending order. A `max_days` of zero is treated as one.
    pub fn split(&self, max_days: u32) -> Vec<DateRange> {
        let step = Duration::days(i64::from(max_days.max(1)));
        let mut chunks = Vec::new();
        let mut chunk_start = self.start;
        while chunk_start <= self.end {
            let chunk_end = (chunk_start + step - Duration::days(1)).min(self.end);
            chunks.push(DateRange {
                start: chunk_start,
                end: chunk_end,
            });
            chunk_start = chunk_end + Duration::days(1);
        }
        chunks
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, WeatherEtlError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|e| {
        WeatherEtlError::InvalidInput(format!(
            "'{}' is not a valid YYYY-MM-DD date: {}",
            value, e
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_iso_dates() {
        let range = DateRange::parse("2023-12-01", "2023-12-07").unwrap();
        assert_eq!(range.start(), date(2023, 12, 1));
        assert_eq!(range.end(), date(2023, 12, 7));
        assert_eq!(range.num_days(), 7);
    }

    #[test]
    fn rejects_bad_format_and_inverted_range() {
        assert!(matches!(
            DateRange::parse("12/01/2023", "2023-12-07"),
            Err(WeatherEtlError::InvalidInput(_))
        ));
        assert!(matches!(
            DateRange::parse("2023-12-08", "2023-12-07"),
            Err(WeatherEtlError::InvalidInput(_))
        ));
    }

    #[test]
    fn single_day_range_is_valid() {
        let range = DateRange::parse("2024-02-29", "2024-02-29").unwrap();
        assert_eq!(range.num_days(), 1);
    }

    #[test]
    fn rfc3339_bounds_cover_whole_days() {
        let range = DateRange::parse("2023-12-01", "2023-12-07").unwrap();
        let (start, end) = range.rfc3339_bounds();
        assert_eq!(start, "2023-12-01T00:00:00+00:00");
        assert_eq!(end, "2023-12-07T23:00:00+00:00");
    }

    #[test]
    fn split_covers_range_in_order() {
        let range = DateRange::parse("2023-12-01", "2023-12-07").unwrap();
        let chunks = range.split(3);
        assert_eq!(
            chunks,
            vec![
                DateRange::new(date(2023, 12, 1), date(2023, 12, 3)).unwrap(),
                DateRange::new(date(2023, 12, 4), date(2023, 12, 6)).unwrap(),
                DateRange::new(date(2023, 12, 7), date(2023, 12, 7)).unwrap(),
            ]
        );
    }

    #[test]
    fn split_larger_than_range_returns_itself() {
        let range = DateRange::parse("2023-12-01", "2023-12-07").unwrap();
        assert_eq!(range.split(30), vec![range]);
        assert_eq!(range.split(0).len(), 7);
    }
}
