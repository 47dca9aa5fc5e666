//! Timestamp parsing for incoming requests
//!
//! Clients send appointment times either as RFC 3339 (`2025-06-10T09:00:00Z`)
//! or as a local date-time without offset (`2025-06-10T09:00:00`). Offset-less
//! values are taken as UTC.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

const LOCAL_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parses an RFC 3339 or offset-less ISO 8601 date-time
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, String> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }

    LOCAL_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("invalid date-time '{value}', expected ISO 8601 such as 2025-06-10T09:00:00"))
}

/// `deserialize_with` target for required timestamps
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(D::Error::custom)
}

/// `deserialize_with` target for optional timestamps
pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| parse_timestamp(&raw).map_err(D::Error::custom))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("2025-06-10T09:00:00Z" ; "utc designator")]
    #[test_case("2025-06-10T11:00:00+02:00" ; "explicit offset")]
    #[test_case("2025-06-10T09:00:00" ; "no offset")]
    #[test_case("2025-06-10T09:00:00.000" ; "no offset with fraction")]
    #[test_case("2025-06-10T09:00" ; "no seconds")]
    fn test_parse_timestamp_forms(raw: &str) {
        let expected = DateTime::parse_from_rfc3339("2025-06-10T09:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(parse_timestamp(raw).unwrap(), expected);
    }

    #[test_case("" ; "empty")]
    #[test_case("yesterday" ; "words")]
    #[test_case("2025-13-10T09:00:00" ; "bad month")]
    fn test_parse_timestamp_rejects(raw: &str) {
        assert!(parse_timestamp(raw).is_err());
    }
}
