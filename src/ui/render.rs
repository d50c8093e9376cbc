//! Terminal rendering logic
//!
//! A frame is captured from [`App`] while the lock is held, then painted
//! after it is released, so slow terminals never stall the sampler.

use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::ResetColor,
    terminal::{Clear, ClearType},
};

use crate::app::{App, ProcessSample, SortSpec, StatusMessage, SystemMeters};
use crate::config::ColorScheme;
use crate::constants::VISIBLE_ROWS_OVERHEAD;
use crate::system::HostInfo;

use super::components::{render_column_headers, render_footer, render_menu_bar, render_meters};
use super::process_list::render_process_list;

/// One visible list row
#[derive(Debug, Clone)]
pub struct Row {
    pub sample: ProcessSample,
    pub selected: bool,
    pub tagged: bool,
}

/// What the line above the options bar shows
#[derive(Debug, Clone)]
pub enum Footer {
    /// Command line being edited
    CommandLine(String),
    /// Latest message and how many others the same action raised
    Message { latest: StatusMessage, others: usize },
    Empty,
}

/// Everything needed to paint one frame, copied out of the shared state
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub width: usize,
    pub height: usize,
    pub host: HostInfo,
    pub meters: SystemMeters,
    pub sort: SortSpec,
    pub rows: Vec<Row>,
    pub visible_rows: usize,
    pub footer: Footer,
}

impl Snapshot {
    /// Copies the visible part of `app` for a `width` x `height` terminal.
    ///
    /// Also tells the viewport the current list height, so selection and
    /// scroll are clamped before the rows are taken.
    pub fn capture(app: &mut App, width: u16, height: u16) -> Self {
        let visible_rows = (height as usize).saturating_sub(VISIBLE_ROWS_OVERHEAD).max(1);
        app.set_visible_rows(visible_rows);

        let scroll = app.viewport.scroll_offset();
        let selected = app.viewport.selected();
        let rows = app
            .processes
            .iter()
            .enumerate()
            .skip(scroll)
            .take(visible_rows)
            .map(|(index, sample)| Row {
                sample: sample.clone(),
                selected: index == selected,
                tagged: app.tags.contains(sample.id),
            })
            .collect();

        let footer = if app.view_mode.is_command_input() {
            Footer::CommandLine(app.input.clone())
        } else {
            match app.messages.last() {
                Some(latest) => Footer::Message {
                    latest: latest.clone(),
                    others: app.messages.len() - 1,
                },
                None => Footer::Empty,
            }
        };

        Self {
            width: width as usize,
            height: height as usize,
            host: app.host.clone(),
            meters: app.meters.clone(),
            sort: app.sort,
            rows,
            visible_rows,
            footer,
        }
    }
}

/// Paints a captured frame.
pub fn render<W: Write>(out: &mut W, snapshot: &Snapshot, colors: &ColorScheme) -> io::Result<()> {
    queue!(out, MoveTo(0, 0), Clear(ClearType::All))?;

    render_menu_bar(out, snapshot, colors)?;
    render_meters(out, snapshot, colors)?;
    render_column_headers(out, snapshot, colors)?;
    render_process_list(out, snapshot, colors)?;
    render_footer(out, snapshot, colors)?;

    queue!(out, ResetColor)?;
    out.flush()
}
