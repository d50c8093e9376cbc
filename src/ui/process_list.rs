//! Process list rendering

use std::io::{self, Write};

use crossterm::{cursor::MoveTo, queue};

use crate::app::ProcessSample;
use crate::config::{ColorScheme, ConsoleAttr};
use crate::constants::{LIST_HEADER_ROW, TREE_BRANCH, TREE_INDENT};

use super::render::{Row, Snapshot};
use super::utils::{fit_width, format_duration, format_rate, paint};

/// Formats one process as a list line, without padding to the screen width.
///
/// MEM is shown in decimal megabytes. In tree mode the EXE column is
/// indented by `tree_depth` with a branch marker before every child.
#[must_use]
pub fn format_row(sample: &ProcessSample, tree_mode: bool) -> String {
    let indent = if tree_mode && sample.tree_depth > 0 {
        format!("{}{}", TREE_INDENT.repeat(sample.tree_depth), TREE_BRANCH)
    } else {
        String::new()
    };

    format!(
        "{:>6}  {:>9}  {:>3}  {:04.1}%  {:>6.1} MB  {:>4}  {:>9}  {}  {}{}",
        sample.id,
        fit_width(&sample.user_name, 9).trim_end(),
        sample.base_priority,
        sample.cpu_percent,
        sample.used_memory_bytes as f64 / 1_000_000.0,
        sample.thread_count,
        format_rate(sample.disk_bytes_per_sec),
        format_duration(sample.uptime_ms),
        indent,
        sample.exe_name,
    )
}

/// Renders the visible window of the process list below the column header.
///
/// Rows past the end of the table are blanked so a shrinking table leaves
/// no stale lines.
pub fn render_process_list<W: Write>(
    out: &mut W,
    snapshot: &Snapshot,
    colors: &ColorScheme,
) -> io::Result<()> {
    let tree_mode = snapshot.sort.column.is_tree();
    let first_row = LIST_HEADER_ROW + 1;

    for line in 0..snapshot.visible_rows {
        queue!(out, MoveTo(0, first_row + line as u16))?;
        match snapshot.rows.get(line) {
            Some(row) => {
                let text = fit_width(&format_row(&row.sample, tree_mode), snapshot.width);
                paint(out, row_attr(row, colors), &text)?;
            }
            None => paint(out, colors.fg, &fit_width("", snapshot.width))?,
        }
    }

    Ok(())
}

fn row_attr(row: &Row, colors: &ColorScheme) -> ConsoleAttr {
    match (row.selected, row.tagged) {
        (true, true) => colors.bg | colors.bg_highlight,
        (true, false) => colors.bg_highlight,
        (false, true) => colors.bg,
        (false, false) => colors.fg,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ProcessSample {
        let mut sample = ProcessSample::stub(4242, 1, "explorer.exe");
        sample.user_name = "alice".to_string();
        sample.cpu_percent = 3.3;
        sample.used_memory_bytes = 12_345_678;
        sample.thread_count = 17;
        sample.disk_bytes_per_sec = 2048;
        sample.uptime_ms = 90_061_000;
        sample
    }

    #[test]
    fn test_format_row_columns() {
        let row = format_row(&sample(), false);
        assert_eq!(
            row,
            "  4242      alice    8  03.3%    12.3 MB    17   2.0 KB/s  01:01:01:01  explorer.exe"
        );
    }

    #[test]
    fn test_long_user_name_is_cut() {
        let mut s = sample();
        s.user_name = "administrators".to_string();
        assert!(format_row(&s, false).contains("  administr  "));
    }

    #[test]
    fn test_tree_indent_only_in_tree_mode() {
        let mut s = sample();
        s.tree_depth = 2;
        assert!(format_row(&s, true).ends_with("    └─explorer.exe"));
        assert!(format_row(&s, false).ends_with("  explorer.exe"));
        assert!(!format_row(&s, false).contains(TREE_BRANCH));

        s.tree_depth = 0;
        assert!(!format_row(&s, true).contains(TREE_BRANCH));
    }

    #[test]
    fn test_row_colors() {
        let colors = ColorScheme::default();
        let row = |selected, tagged| Row { sample: sample(), selected, tagged };
        assert_eq!(row_attr(&row(false, false), &colors), colors.fg);
        assert_eq!(row_attr(&row(true, false), &colors), colors.bg_highlight);
        assert_eq!(row_attr(&row(false, true), &colors), colors.bg);
        assert_eq!(
            row_attr(&row(true, true), &colors),
            colors.bg | colors.bg_highlight
        );
    }
}
