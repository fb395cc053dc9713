//! Serde helpers for records written by the browser front-end.
//!
//! Form inputs arrive as strings: `"60"` for a duration, `""` for an unset
//! cost or date, `"09:00"` for a time. Reading accepts those shapes;
//! writing always emits the canonical form.

use chrono::{NaiveDate, NaiveTime};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

fn parse_number<E: serde::de::Error>(raw: NumberOrText) -> Result<Option<f64>, E> {
    match raw {
        NumberOrText::Number(n) => Ok(Some(n)),
        NumberOrText::Text(s) if s.trim().is_empty() => Ok(None),
        NumberOrText::Text(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(Some)
            .ok_or_else(|| E::custom(format!("expected a number, got {s:?}"))),
    }
}

/// Whole minutes from `60` or `"60"`.
pub fn minutes<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = parse_number(NumberOrText::deserialize(deserializer)?)?
        .ok_or_else(|| D::Error::custom("duration is empty"))?;
    if value < 0.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
        return Err(D::Error::custom(format!("invalid duration: {value}")));
    }
    Ok(value as u32)
}

/// Optional decimal from `null`, `""`, `50`, `49.5` or `"50"`.
pub fn optional_decimal<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<f64>, D::Error> {
    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => parse_number(raw),
    }
}

/// Optional `YYYY-MM-DD` date, with `""` read as absent.
pub fn optional_date<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|e| D::Error::custom(format!("invalid date {s:?}: {e}"))),
    }
}

/// Time of day stored as `HH:MM`.
pub mod hhmm {
    use super::*;

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse(&s).map_err(D::Error::custom)
    }

    /// Accepts `HH:MM` and `HH:MM:SS`.
    pub fn parse(s: &str) -> Result<NaiveTime, String> {
        let s = s.trim();
        NaiveTime::parse_from_str(s, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
            .map_err(|e| format!("invalid time {s:?}: {e}"))
    }
}
