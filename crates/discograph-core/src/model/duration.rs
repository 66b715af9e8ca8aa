//! Track durations.
//!
//! Durations are stored as whole seconds everywhere. The clock notation
//! (`MM:SS`, or `H:MM:SS` for anything an hour or longer) exists only at the
//! edges: when reading XML catalogs or filter literals, and when rendering.

use serde::{Deserialize, Deserializer};

/// Parse a duration written as `SS`, `MM:SS` or `H:MM:SS` into seconds.
///
/// Minutes and seconds after the leading field must be below 60. Returns
/// `None` for anything else, including negative or empty fields.
pub fn parse_clock(text: &str) -> Option<u32> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let fields: Vec<&str> = text.split(':').collect();
    if fields.len() > 3 {
        return None;
    }

    let mut total: u32 = 0;
    for (index, field) in fields.iter().enumerate() {
        if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let value: u32 = field.parse().ok()?;
        if index > 0 && value >= 60 {
            return None;
        }
        total = total.checked_mul(60)?.checked_add(value)?;
    }
    Some(total)
}

/// Format seconds as `MM:SS`, or `H:MM:SS` once the hour mark is reached.
pub fn format_clock(seconds: u32) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes:02}:{secs:02}")
    }
}

/// Accept either a JSON integer or a clock string for a duration field.
pub(crate) fn deserialize_seconds<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Seconds(u32),
        Clock(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Seconds(seconds) => Ok(seconds),
        Raw::Clock(text) => parse_clock(&text).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid duration {text:?}, expected seconds or MM:SS"))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clock_forms() {
        assert_eq!(parse_clock("367"), Some(367));
        assert_eq!(parse_clock("06:07"), Some(367));
        assert_eq!(parse_clock("6:07"), Some(367));
        assert_eq!(parse_clock("1:02:03"), Some(3723));
        assert_eq!(parse_clock(" 04:20 "), Some(260));
    }

    #[test]
    fn test_parse_clock_rejects_garbage() {
        assert_eq!(parse_clock(""), None);
        assert_eq!(parse_clock("5:"), None);
        assert_eq!(parse_clock("5:60"), None);
        assert_eq!(parse_clock("-5"), None);
        assert_eq!(parse_clock("1:2:3:4"), None);
        assert_eq!(parse_clock("five"), None);
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(367), "06:07");
        assert_eq!(format_clock(3599), "59:59");
        assert_eq!(format_clock(3723), "1:02:03");
    }

    #[test]
    fn test_format_then_parse_is_identity() {
        for seconds in [0, 59, 60, 355, 3600, 7384] {
            assert_eq!(parse_clock(&format_clock(seconds)), Some(seconds));
        }
    }
}
