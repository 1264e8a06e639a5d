//! Lenient date parsing for event store payloads
//!
//! The event store sends cycle dates either as plain `YYYY-MM-DD` or as full
//! timestamps. Cycle events only care about the calendar date, so any
//! time-of-day is dropped. Schedule events keep their wall-clock time.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

/// Parse a calendar date, discarding any time-of-day component.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        return Some(date);
    }
    parse_wall_clock(raw).map(|dt| dt.date())
}

/// Parse a local wall-clock timestamp. Offsets are accepted and dropped.
pub fn parse_wall_clock(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    DATETIME_FORMATS.iter().find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Serde adapter for `NaiveDate` fields (`#[serde(with = "calendar_date")]`).
pub mod calendar_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    type SerializeResult<S> = Result<<S as Serializer>::Ok, <S as Serializer>::Error>;

    /// Write `YYYY-MM-DD`.
    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> SerializeResult<S>
    where
        S: Serializer,
    {
        serializer.collect_str(&date.format(super::DATE_FORMAT))
    }

    /// Read a date or a timestamp.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_calendar_date(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid calendar date: {raw}")))
    }
}

/// Serde adapter for `Option<NaiveDate>` fields.
pub mod opt_calendar_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    type SerializeResult<S> = Result<<S as Serializer>::Ok, <S as Serializer>::Error>;

    /// Write `YYYY-MM-DD`, or `null`.
    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> SerializeResult<S>
    where
        S: Serializer,
    {
        match date {
            Some(date) => serializer.collect_str(&date.format(super::DATE_FORMAT)),
            None => serializer.serialize_none(),
        }
    }

    /// Read a date, timestamp, `null` or empty string.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => super::parse_calendar_date(value)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid calendar date: {value}"))),
        }
    }
}

/// Serde adapter for `NaiveDateTime` fields.
pub mod wall_clock {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    type SerializeResult<S> = Result<<S as Serializer>::Ok, <S as Serializer>::Error>;

    /// Write `YYYY-MM-DDTHH:MM:SS`.
    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> SerializeResult<S>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format("%Y-%m-%dT%H:%M:%S"))
    }

    /// Read any accepted timestamp.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_wall_clock(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }
}

/// Serde adapter for `Option<NaiveDateTime>` fields.
pub mod opt_wall_clock {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    type SerializeResult<S> = Result<<S as Serializer>::Ok, <S as Serializer>::Error>;

    /// Write `YYYY-MM-DDTHH:MM:SS`, or `null`.
    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> SerializeResult<S>
    where
        S: Serializer,
    {
        match value {
            Some(value) => serializer.collect_str(&value.format("%Y-%m-%dT%H:%M:%S")),
            None => serializer.serialize_none(),
        }
    }

    /// Read any accepted timestamp, `null` or empty string.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => super::parse_wall_clock(value)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {value}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Timelike};

    use super::*;

    #[test]
    fn plain_date_is_parsed() {
        assert_eq!(parse_calendar_date("2024-03-01"), NaiveDate::from_ymd_opt(2024, 3, 1));
    }

    #[test]
    fn time_of_day_is_discarded_for_calendar_dates() {
        assert_eq!(
            parse_calendar_date("2024-03-01T23:30:00"),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        assert_eq!(
            parse_calendar_date("2024-03-01T23:30:00+02:00"),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
    }

    #[test]
    fn wall_clock_keeps_local_time() {
        let parsed = parse_wall_clock("2024-06-12T09:45:00Z").unwrap();
        assert_eq!(parsed.hour(), 9);
        assert_eq!(parsed.minute(), 45);

        let parsed = parse_wall_clock("2024-06-12T17:00").unwrap();
        assert_eq!(parsed.hour(), 17);
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_calendar_date("yesterday").is_none());
        assert!(parse_wall_clock("12/06/2024").is_none());
    }
}
