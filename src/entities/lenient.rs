//! Tolerant field deserializers for API payloads
//!
//! One odd value in one row must not fail the whole collection, so these map
//! anything unusable to `None` (or the type's default) instead of erroring.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};
use std::str::FromStr;

use crate::entities::work_order::Bay;

/// Naive timestamp layouts, read as UTC
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText<T> {
    Number(T),
    Text(String),
    Other(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Text {
    Text(String),
    Other(IgnoredAny),
}

fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Text>::deserialize(deserializer)? {
        Some(Text::Text(s)) => Some(s),
        _ => None,
    })
}

/// A number sent as a JSON number or as a numeric string (NUMERIC, BIGINT)
pub fn opt_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
{
    Ok(match Option::<NumberOrText<T>>::deserialize(deserializer)? {
        Some(NumberOrText::Number(n)) => Some(n),
        Some(NumberOrText::Text(s)) => s.trim().parse().ok(),
        Some(NumberOrText::Other(_)) | None => None,
    })
}

/// Like [`opt_number`], falling back to the type's default
pub fn number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr + Default,
{
    opt_number(deserializer).map(Option::unwrap_or_default)
}

/// RFC 3339, or a zone-less `YYYY-MM-DD HH:MM:SS[.f]` taken as UTC
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

pub fn opt_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_text(deserializer)?.as_deref().and_then(parse_timestamp))
}

/// Blank or out-of-range bay labels read as no bay
pub fn opt_bay<'de, D>(deserializer: D) -> Result<Option<Bay>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_text(deserializer)?.and_then(|s| s.parse().ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "opt_number")]
        rate: Option<f64>,
        #[serde(default, deserialize_with = "number")]
        qty: i64,
        #[serde(default, deserialize_with = "opt_timestamp")]
        at: Option<DateTime<Utc>>,
        #[serde(default, deserialize_with = "opt_bay")]
        bay: Option<Bay>,
    }

    fn row(value: serde_json::Value) -> Row {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_numbers_accept_strings() {
        let r = row(json!({"rate": "42.50", "qty": "7"}));
        assert_eq!(r.rate, Some(42.5));
        assert_eq!(r.qty, 7);

        let r = row(json!({"rate": 18, "qty": 3}));
        assert_eq!(r.rate, Some(18.0));
        assert_eq!(r.qty, 3);

        let r = row(json!({"rate": "n/a", "qty": null}));
        assert_eq!(r.rate, None);
        assert_eq!(r.qty, 0);

        let r = row(json!({"rate": {"amount": 1}, "qty": [1]}));
        assert_eq!(r.rate, None);
        assert_eq!(r.qty, 0);
    }

    #[test]
    fn test_timestamps() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2024-05-01T10:00:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01T12:00:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01 10:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01T10:00:00"), Some(expected));
        assert!(parse_timestamp("2024-05-01 10:00:00.123").is_some());
        assert_eq!(parse_timestamp("yesterday"), None);

        assert_eq!(row(json!({"at": "2024-05-01 10:00:00"})).at, Some(expected));
        assert_eq!(row(json!({"at": "soon"})).at, None);
        assert_eq!(row(json!({"at": 1714557600})).at, None);
        assert_eq!(row(json!({"at": null})).at, None);
    }

    #[test]
    fn test_bay_blank_or_out_of_range_is_none() {
        assert_eq!(row(json!({"bay": "c"})).bay.map(|b| b.label()), Some('C'));
        assert!(row(json!({"bay": ""})).bay.is_none());
        assert!(row(json!({"bay": null})).bay.is_none());
        assert!(row(json!({"bay": "Z"})).bay.is_none());
        assert!(row(json!({})).bay.is_none());
    }
}
