use chrono::{DateTime, FixedOffset, NaiveDateTime, ParseError, TimeZone, Utc};

pub trait IntoUtcDateTime {
    fn into_utc(self) -> DateTime<Utc>;
}

impl IntoUtcDateTime for NaiveDateTime {
    fn into_utc(self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self)
    }
}

impl IntoUtcDateTime for DateTime<Utc> {
    fn into_utc(self) -> DateTime<Utc> {
        self
    }
}

impl IntoUtcDateTime for DateTime<FixedOffset> {
    fn into_utc(self) -> DateTime<Utc> {
        self.with_timezone(&Utc)
    }
}

/// Parses a provider timestamp into UTC.
///
/// RFC 3339 values keep their offset until conversion; values without an
/// offset (`2023-12-01T00:00:00`) are taken to already be UTC.
pub(crate) fn parse_utc_timestamp(value: &str) -> Result<DateTime<Utc>, ParseError> {
    match DateTime::parse_from_rfc3339(value) {
        Ok(with_offset) => Ok(with_offset.into_utc()),
        Err(rfc_err) => NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
            .map(IntoUtcDateTime::into_utc)
            .map_err(|_| rfc_err),
    }
}
