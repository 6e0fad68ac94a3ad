//! Pure formatting helpers shared by the TUI and the one-shot commands.

use chrono::{DateTime, Local};

const BYTE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Human-readable byte count using base-1024 units, rounded to two
/// decimals with insignificant trailing zeros dropped. Zero is special-
/// cased so it never goes through the unit-scaling math.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }
    let exp = ((bytes as f64).ln() / 1024f64.ln()).floor() as usize;
    let exp = exp.min(BYTE_UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(exp as i32);
    let rounded = (value * 100.0).round() / 100.0;
    let mut num = format!("{rounded:.2}");
    while num.ends_with('0') {
        num.pop();
    }
    if num.ends_with('.') {
        num.pop();
    }
    format!("{num} {}", BYTE_UNITS[exp])
}

/// Server timestamps arrive as RFC 3339 strings; render them in local
/// time. Empty input stays empty, unparseable input passes through
/// verbatim.
pub fn format_timestamp(ts: &str) -> String {
    if ts.is_empty() {
        return String::new();
    }
    match DateTime::parse_from_rfc3339(ts) {
        Ok(dt) => dt
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        Err(_) => ts.to_string(),
    }
}

/// A [0, 1] score as a percentage with one decimal, e.g. `87.5%`.
pub fn format_percent(score: f64) -> String {
    format!("{:.1}%", score * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn zero_bytes_skips_unit_scaling() {
        assert_eq!(format_bytes(0), "0 B");
    }

    #[test]
    fn bytes_scale_in_base_1024() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1024), "1 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(1024 * 1024), "1 MB");
        assert_eq!(format_bytes(5 * 1024 * 1024 * 1024), "5 GB");
    }

    #[test]
    fn bytes_round_to_two_decimals() {
        // 1234567 / 1024^2 = 1.17737...
        assert_eq!(format_bytes(1_234_567), "1.18 MB");
    }

    #[test]
    fn huge_sizes_stay_in_terabytes() {
        let two_pb = 2 * 1024u64.pow(5);
        assert!(format_bytes(two_pb).ends_with(" TB"));
    }

    #[test]
    fn empty_timestamp_stays_empty() {
        assert_eq!(format_timestamp(""), "");
    }

    #[test]
    fn unparseable_timestamp_passes_through() {
        assert_eq!(format_timestamp("not-a-date"), "not-a-date");
    }

    #[test]
    fn rfc3339_timestamp_is_reformatted() {
        let out = format_timestamp("2024-03-01T12:30:45+00:00");
        assert!(out.starts_with("2024-03-01") || out.starts_with("2024-03-02"));
        assert_eq!(out.len(), "2024-03-01 12:30:45".len());
    }

    #[test]
    fn percent_has_one_decimal() {
        assert_eq!(format_percent(0.875), "87.5%");
        assert_eq!(format_percent(1.0), "100.0%");
        assert_eq!(format_percent(0.0), "0.0%");
    }
}
