//! String formatting utilities for UI rendering.

use chrono::{DateTime, Local, TimeZone, Utc};

/// Truncate a string to max length, adding ellipsis if needed.
pub fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        return s.to_string();
    }
    if max_len <= 3 {
        return s.chars().take(max_len).collect();
    }
    let truncated: String = s.chars().take(max_len - 3).collect();
    format!("{}...", truncated)
}

/// First non-blank line of `s`, trimmed.
pub fn first_line(s: &str) -> &str {
    s.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("")
}

/// Milliseconds since the epoch as a UTC datetime, if in range.
pub fn millis_to_datetime(millis: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis).single()
}

/// Pretty: local time to the minute. Plain: RFC 3339 UTC.
pub fn format_timestamp(millis: i64, pretty: bool) -> String {
    match millis_to_datetime(millis) {
        Some(dt) if pretty => dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
        Some(dt) => dt.to_rfc3339(),
        None => millis.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
        assert_eq!(truncate("hello", 2), "he");
    }

    #[test]
    fn test_first_line_skips_blank_lines() {
        assert_eq!(first_line("\n  \n  Title \nbody"), "Title");
        assert_eq!(first_line(""), "");
    }

    #[test]
    fn test_format_timestamp_plain_is_rfc3339() {
        assert_eq!(
            format_timestamp(1_700_000_000_000, false),
            "2023-11-14T22:13:20+00:00"
        );
    }

    #[test]
    fn test_out_of_range_timestamp_falls_back_to_number() {
        assert_eq!(format_timestamp(i64::MAX, false), i64::MAX.to_string());
    }
}
