//! Timeout strings used by the settings document: `"30s"`, `"2m"`, `"1m30s"`

use serde::{Deserialize, Deserializer, Serializer};
use std::time::Duration;

/// Units in descending size, with their length in milliseconds
const UNITS: [(&str, u64); 5] = [
    ("d", 86_400_000),
    ("h", 3_600_000),
    ("m", 60_000),
    ("s", 1_000),
    ("ms", 1),
];

fn unit_millis(unit: &str) -> Option<u64> {
    UNITS
        .iter()
        .find(|(name, _)| *name == unit)
        .map(|(_, millis)| *millis)
}

/// Parse a timeout. A bare number is seconds; otherwise a sequence of
/// `<number><unit>` terms with units `d`, `h`, `m`, `s`, `ms`.
pub fn parse_duration(text: &str) -> std::result::Result<Duration, String> {
    let text = text.trim();
    if text.is_empty() {
        return Err("duration is empty".to_string());
    }
    if let Ok(secs) = text.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }

    let invalid = || format!("'{}' is not a duration (try 30s, 2m or 1m30s)", text);
    let mut rest = text;
    let mut total: u64 = 0;
    while !rest.is_empty() {
        let digits_end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        let value: u64 = rest[..digits_end].parse().map_err(|_| invalid())?;
        rest = &rest[digits_end..];

        let unit_end = rest.find(|c: char| c.is_ascii_digit()).unwrap_or(rest.len());
        let millis = unit_millis(&rest[..unit_end].to_ascii_lowercase()).ok_or_else(invalid)?;
        rest = &rest[unit_end..];

        total = value
            .checked_mul(millis)
            .and_then(|term| total.checked_add(term))
            .ok_or_else(|| format!("duration '{}' is too large", text))?;
    }
    Ok(Duration::from_millis(total))
}

/// Inverse of `parse_duration`. Zero terms are omitted.
pub fn format_duration(duration: &Duration) -> String {
    let mut millis = duration.as_millis() as u64;
    if millis == 0 {
        return "0s".to_string();
    }
    let mut out = String::new();
    for (unit, size) in UNITS {
        if millis >= size {
            out.push_str(&format!("{}{}", millis / size, unit));
            millis %= size;
        }
    }
    out
}

pub fn deserialize_duration<'de, D>(deserializer: D) -> std::result::Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    parse_duration(&text).map_err(serde::de::Error::custom)
}

pub fn serialize_duration<S>(duration: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_duration(duration))
}
