//! Utility functions for UI rendering

use std::io::{self, Write};

use crossterm::queue;
use crossterm::style::{Print, SetBackgroundColor, SetForegroundColor};

use crate::config::ConsoleAttr;
use crate::constants::{BYTES_PER_GB, BYTES_PER_KB, BYTES_PER_MB, METER_WIDTH};

/// Truncates a string to fit within a given width.
///
/// If the string exceeds `max_len` characters, it is cut and "..." is
/// appended. Counts characters, not bytes, so tree markers are safe.
///
/// # Arguments
/// * `s` - The string to truncate
/// * `max_len` - Maximum character length for the output
///
/// # Returns
/// The original string if it fits, or a truncated version with "..." suffix
#[must_use]
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    } else {
        s.chars().take(max_len).collect()
    }
}

/// Cuts or space-pads `s` to exactly `width` characters.
#[must_use]
pub fn fit_width(s: &str, width: usize) -> String {
    let fitted: String = s.chars().take(width).collect();
    let len = fitted.chars().count();
    format!("{}{:pad$}", fitted, "", pad = width - len)
}

/// Formats a byte rate (bytes/sec) as a human-readable string.
///
/// Automatically selects appropriate unit (B/s, KB/s, MB/s, GB/s).
#[must_use]
pub fn format_rate(bytes_per_sec: u64) -> String {
    let rate = bytes_per_sec as f64;
    if bytes_per_sec == 0 {
        "0 B/s".to_string()
    } else if rate < BYTES_PER_KB {
        format!("{} B/s", bytes_per_sec)
    } else if rate < BYTES_PER_MB {
        format!("{:.1} KB/s", rate / BYTES_PER_KB)
    } else if rate < BYTES_PER_GB {
        format!("{:.1} MB/s", rate / BYTES_PER_MB)
    } else {
        format!("{:.1} GB/s", rate / BYTES_PER_GB)
    }
}

/// Formats milliseconds as `dd:hh:mm:ss`.
#[must_use]
pub fn format_duration(ms: u64) -> String {
    let seconds = ms / 1000 % 60;
    let minutes = ms / 60_000 % 60;
    let hours = ms / 3_600_000 % 24;
    let days = ms / 86_400_000;
    format!("{:02}:{:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

/// Number of filled cells for a meter at `fraction` (0..=1).
#[must_use]
pub fn meter_cells(fraction: f64) -> usize {
    ((METER_WIDTH as f64 * fraction.clamp(0.0, 1.0)) as usize).min(METER_WIDTH)
}

/// Queues `text` in the colors of `attr`.
pub fn paint<W: Write>(out: &mut W, attr: ConsoleAttr, text: &str) -> io::Result<()> {
    queue!(
        out,
        SetForegroundColor(attr.fg()),
        SetBackgroundColor(attr.bg()),
        Print(text)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate_string("notepad.exe", 20), "notepad.exe");
        assert_eq!(truncate_string("notepad.exe", 8), "notep...");
        assert_eq!(truncate_string("└─└─└─", 2), "└─");
    }

    #[test]
    fn test_fit_width() {
        assert_eq!(fit_width("ab", 4), "ab  ");
        assert_eq!(fit_width("abcdef", 3), "abc");
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(0), "0 B/s");
        assert_eq!(format_rate(512), "512 B/s");
        assert_eq!(format_rate(1536), "1.5 KB/s");
        assert_eq!(format_rate(5 * 1_048_576), "5.0 MB/s");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "00:00:00:00");
        assert_eq!(format_duration(90_061_000), "01:01:01:01");
        assert_eq!(format_duration(3_600_000), "00:01:00:00");
    }

    #[test]
    fn test_meter_cells() {
        assert_eq!(meter_cells(0.0), 0);
        assert_eq!(meter_cells(0.5), 12);
        assert_eq!(meter_cells(1.0), METER_WIDTH);
        assert_eq!(meter_cells(7.0), METER_WIDTH, "clamped");
    }
}
