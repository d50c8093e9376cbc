//! Menu bar, system meters, column headers, and footer components

use std::io::{self, Write};

use crossterm::{cursor::MoveTo, queue};

use crate::app::{SortColumn, StatusKind};
use crate::config::{ColorScheme, ConsoleAttr};
use crate::constants::{BYTES_PER_GB, DISPLAY_NAME, LIST_HEADER_ROW, METER_WIDTH};

use super::render::{Footer, Snapshot};
use super::utils::{fit_width, format_duration, meter_cells, paint, truncate_string};

/// Row of the first meter; the other two follow directly below
const METER_ROW: u16 = 2;

/// Columns before EXE with their right-aligned widths, in display order
const HEADER_COLUMNS: [(SortColumn, usize); 8] = [
    (SortColumn::Id, 6),
    (SortColumn::UserName, 9),
    (SortColumn::Priority, 3),
    (SortColumn::CpuPercent, 5),
    (SortColumn::UsedMemory, 9),
    (SortColumn::ThreadCount, 4),
    (SortColumn::DiskUsage, 9),
    (SortColumn::UpTime, 11),
];

/// Key hints on the bottom line
const OPTIONS: [(&str, &str); 9] = [
    ("F1", "ID"),
    ("F2", "EXE"),
    ("F3", "USER"),
    ("F4", "CPU%"),
    ("F5", "MEM"),
    ("F6", "TIME"),
    ("F7", "EXEC"),
    ("F9", "KILL"),
    ("F10", "QUIT"),
];

/// Renders the centered `NTop on HOST` title across the top line.
pub fn render_menu_bar<W: Write>(
    out: &mut W,
    snapshot: &Snapshot,
    colors: &ColorScheme,
) -> io::Result<()> {
    let title = format!("{} on {}", DISPLAY_NAME, snapshot.host.host_name);
    let title = truncate_string(&title, snapshot.width);
    let left = snapshot.width.saturating_sub(title.chars().count()) / 2;
    let line = fit_width(&format!("{:left$}{}", "", title, left = left), snapshot.width);

    queue!(out, MoveTo(0, 0))?;
    paint(out, colors.menu_bar, &line)
}

/// Renders the CPU, memory, and page-file meters with their side notes.
pub fn render_meters<W: Write>(
    out: &mut W,
    snapshot: &Snapshot,
    colors: &ColorScheme,
) -> io::Result<()> {
    let meters = &snapshot.meters;
    let (memory_load, page_load, memory_size) = match &meters.memory {
        Some(memory) => (
            memory.physical_load(),
            memory.page_load(),
            memory.total_physical as f64 / BYTES_PER_GB,
        ),
        None => (0.0, 0.0, 0.0),
    };

    let cpu_note = format!(
        "  Name: {} ({} Cores)  Tasks: {}, {} running",
        snapshot.host.cpu_name, snapshot.host.core_count, meters.tasks, meters.running
    );
    let memory_note = format!("  Size: {:.0} GB", memory_size);
    let page_note = format!("  Uptime: {}", format_duration(meters.uptime_ms));

    let lines = [
        ("CPU", meters.cpu_usage, colors.cpu_bar, cpu_note),
        ("Mem", memory_load, colors.memory_bar, memory_note),
        ("Pge", page_load, colors.page_bar, page_note),
    ];

    for (offset, (name, fraction, bar_attr, note)) in lines.iter().enumerate() {
        queue!(out, MoveTo(0, METER_ROW + offset as u16))?;
        render_meter(out, name, *fraction, *bar_attr, colors)?;

        let used = 2 + name.len() + METER_WIDTH + 8;
        paint(out, colors.fg, &fit_width(note, snapshot.width.saturating_sub(used)))?;
    }

    Ok(())
}

/// Draws `  NAME[|||||      NN.N%]`.
fn render_meter<W: Write>(
    out: &mut W,
    name: &str,
    fraction: f64,
    bar_attr: ConsoleAttr,
    colors: &ColorScheme,
) -> io::Result<()> {
    let cells = meter_cells(fraction);
    let percent = format!("{:04.1}%", fraction.clamp(0.0, 1.0) * 100.0);

    paint(out, colors.fg, &format!("  {}[", name))?;
    paint(out, bar_attr, &"|".repeat(cells))?;
    paint(out, colors.fg, &" ".repeat(METER_WIDTH - cells))?;
    paint(out, colors.bg, &format!("{:>6}", percent))?;
    paint(out, colors.fg, "]")
}

/// Renders the list column header; the active sort column carries an arrow.
pub fn render_column_headers<W: Write>(
    out: &mut W,
    snapshot: &Snapshot,
    colors: &ColorScheme,
) -> io::Result<()> {
    let active = snapshot.sort.column;
    let arrow = snapshot.sort.order.arrow();
    let mut used = 0;

    queue!(out, MoveTo(0, LIST_HEADER_ROW))?;
    for (column, width) in HEADER_COLUMNS {
        if column == active {
            let cell = format!("{:>width$}{} ", column.name(), arrow, width = width);
            paint(out, colors.bg_highlight, &cell)?;
        } else {
            let cell = format!("{:>width$}  ", column.name(), width = width);
            paint(out, colors.list_header, &cell)?;
        }
        used += width + 2;
    }

    let rest = snapshot.width.saturating_sub(used);
    let exe = SortColumn::ExeName;
    match active {
        SortColumn::ExeName => {
            let label: String = format!("{}{}", exe.name(), arrow).chars().take(rest).collect();
            let len = label.chars().count();
            paint(out, colors.bg_highlight, &label)?;
            paint(out, colors.list_header, &fit_width("", rest - len))
        }
        SortColumn::Tree => {
            let label = format!("{} ({})", exe.name(), SortColumn::Tree.name());
            paint(out, colors.list_header, &fit_width(&label, rest))
        }
        _ => paint(out, colors.list_header, &fit_width(exe.name(), rest)),
    }
}

/// Renders the message or command line and the options bar.
pub fn render_footer<W: Write>(
    out: &mut W,
    snapshot: &Snapshot,
    colors: &ColorScheme,
) -> io::Result<()> {
    let width = snapshot.width;
    let status_row = snapshot.height.saturating_sub(2) as u16;
    let options_row = snapshot.height.saturating_sub(1) as u16;

    queue!(out, MoveTo(0, status_row))?;
    match &snapshot.footer {
        Footer::CommandLine(input) => {
            paint(out, colors.bg_highlight, &fit_width(&format!("{}_", input), width))?;
        }
        Footer::Message { latest, others } => {
            let attr = match latest.kind {
                StatusKind::Error => colors.error,
                StatusKind::Notice => colors.fg_highlight,
            };
            let text = if *others > 0 {
                format!("{} (+{} more)", latest.text, others)
            } else {
                latest.text.clone()
            };
            paint(out, attr, &fit_width(&text, width))?;
        }
        Footer::Empty => paint(out, colors.fg, &fit_width("", width))?,
    }

    queue!(out, MoveTo(0, options_row))?;
    let mut used = 0;
    for (key, label) in OPTIONS {
        let key_text = format!("{} ", key);
        let label_text = format!("{:<5}", label);
        if used + key_text.len() + label_text.len() > width {
            break;
        }
        paint(out, colors.fg, &key_text)?;
        paint(out, colors.bg_highlight, &label_text)?;
        used += key_text.len() + label_text.len();
    }
    // Never write the bottom-right cell
    paint(out, colors.fg, &fit_width("", width.saturating_sub(used + 1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_widths_match_row_layout() {
        let mut line = String::new();
        for (column, width) in HEADER_COLUMNS {
            line.push_str(&format!("{:>width$}  ", column.name(), width = width));
        }
        // ID .. TIME, each followed by a two-space gap
        assert_eq!(line.chars().count(), 6 + 9 + 3 + 5 + 9 + 4 + 9 + 11 + 8 * 2);
        assert!(line.starts_with("    ID       USER  PRI   CPU%"));
    }

    #[test]
    fn test_options_fit_common_width() {
        let total: usize = OPTIONS.iter().map(|(k, _)| k.len() + 1 + 5).sum();
        assert!(total < 80);
    }
}
