//! Client-side mirrors of the backend's entities.
//!
//! Nested collections are always owned `Vec`s that default to empty, so a
//! backend that omits `series` or `dropsets` decodes to an empty history
//! rather than a missing one.

pub mod catalog;
pub mod gym;
pub mod history;
pub mod profile;
pub mod routine;
pub mod user;

pub use catalog::*;
pub use gym::*;
pub use history::*;
pub use profile::*;
pub use routine::*;
pub use user::*;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};

/// Backend dates arrive either as `2025-03-14` or as a full timestamp.
pub(crate) fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).ok_or_else(|| Error::custom(format!("invalid date: {}", raw)))
}

pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
}

/// Rep counts are integral, but some forms post them as floats (`8.0`).
pub(crate) fn deserialize_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntOrFloat {
        Int(u32),
        Float(f64),
    }

    match IntOrFloat::deserialize(deserializer)? {
        IntOrFloat::Int(i) => Ok(i),
        IntOrFloat::Float(f) => {
            if f.is_finite() && f >= 0.0 && f <= u32::MAX as f64 {
                Ok(f.round() as u32)
            } else {
                Err(Error::custom(format!("invalid count: {}", f)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_timestamp_dates() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        assert_eq!(parse_date("2025-03-14"), Some(expected));
        assert_eq!(parse_date("2025-03-14T18:30:00"), Some(expected));
        assert_eq!(parse_date("2025-03-14T18:30:00.123Z"), Some(expected));
        assert_eq!(parse_date("2025-03-14 07:00:00"), Some(expected));
        assert_eq!(parse_date("14/03/2025"), None);
    }
}
