//! Application state and core logic
//!
//! [`App`] is the single context shared by the sampling and input threads.
//! Every method that touches more than one field leaves the table sorted
//! under the current [`SortSpec`] and the viewport clamped to it.

use std::collections::HashSet;
use std::sync::Arc;

use crate::system::{HostInfo, MemoryStatus, ProcessControl};

use super::history::CommandHistory;
use super::navigation::Viewport;
use super::process_ops::ProcessOp;
use super::sampler::Generation;
use super::search::SearchState;
use super::sort::{sort_samples, SortOrder, SortSpec};
use super::tags::TaggedSet;
use super::{ProcessSample, SortColumn, ViewMode};

/// Severity of a footer message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Error,
    Notice,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

/// Aggregate figures from the latest generation
#[derive(Debug, Clone, Default)]
pub struct SystemMeters {
    /// Busy fraction of all CPUs, `[0, 1]`
    pub cpu_usage: f64,
    pub tasks: usize,
    pub running: usize,
    pub memory: Option<MemoryStatus>,
    pub uptime_ms: u64,
}

/// Application state
pub struct App {
    /// Published table, in display order
    pub processes: Vec<ProcessSample>,
    pub sort: SortSpec,
    pub viewport: Viewport,
    pub tags: TaggedSet,
    pub search: SearchState,
    pub history: CommandHistory,
    /// Current input mode
    pub view_mode: ViewMode,
    /// Command line being edited, including its leading `:` or `/`
    pub input: String,
    /// Messages raised by the last action, oldest first
    pub messages: Vec<StatusMessage>,
    pub meters: SystemMeters,
    pub host: HostInfo,
    /// Number of generations published so far
    pub generation: u64,
    pub(super) control: Arc<dyn ProcessControl>,
    /// Kill and exec requests not yet handed to `control`
    pub(super) pending: Vec<ProcessOp>,
}

impl App {
    /// Creates an empty application context.
    ///
    /// # Arguments
    /// * `sort` - Initial sort column and order
    /// * `host` - Host facts for the header
    /// * `control` - Used by kill and exec
    pub fn new(sort: SortSpec, host: HostInfo, control: Arc<dyn ProcessControl>) -> Self {
        Self {
            processes: Vec::new(),
            sort,
            viewport: Viewport::default(),
            tags: TaggedSet::default(),
            search: SearchState::default(),
            history: CommandHistory::default(),
            view_mode: ViewMode::default(),
            input: String::new(),
            messages: Vec::new(),
            meters: SystemMeters::default(),
            host,
            generation: 0,
            control,
            pending: Vec::new(),
        }
    }

    /// Replaces the table with a fresh generation.
    ///
    /// Sorts it, ages the tags and clamps the viewport in one step, so a
    /// reader holding the lock never sees a half-updated table.
    pub fn publish(&mut self, generation: Generation) {
        let Generation { samples, cpu_usage, running, memory, uptime_ms } = generation;

        self.processes = samples;
        sort_samples(&mut self.processes, self.sort);

        let present: HashSet<u32> = self.processes.iter().map(|p| p.id).collect();
        self.tags.retain_present(&present);
        self.viewport.readjust(&self.processes);

        self.meters = SystemMeters {
            cpu_usage,
            tasks: self.processes.len(),
            running,
            memory,
            uptime_ms,
        };
        self.generation += 1;
    }

    fn resort(&mut self) {
        sort_samples(&mut self.processes, self.sort);
        self.viewport.readjust(&self.processes);
    }

    /// Switches to `column`, keeping the current order.
    pub fn set_sort_column(&mut self, column: SortColumn) {
        self.sort.column = column;
        self.resort();
    }

    pub fn set_sort(&mut self, column: SortColumn, order: SortOrder) {
        self.sort = SortSpec::new(column, order);
        self.resort();
    }

    pub fn invert_sort_order(&mut self) {
        self.sort.order = self.sort.order.inverted();
        self.resort();
    }

    /// Moves to the next (or previous) ordinary column.
    pub fn cycle_sort_column(&mut self, forward: bool) {
        let column = if forward {
            self.sort.column.next()
        } else {
            self.sort.column.prev()
        };
        self.set_sort_column(column);
    }

    pub fn selected_process(&self) -> Option<&ProcessSample> {
        self.processes.get(self.viewport.selected())
    }

    /// Called by the renderer with the current list height.
    pub fn set_visible_rows(&mut self, rows: usize) {
        self.viewport.set_visible_rows(rows, self.processes.len());
    }

    pub fn move_selection(&mut self, delta: isize) {
        self.viewport.scroll(delta, self.processes.len());
    }

    pub fn move_page(&mut self, delta: isize) {
        self.viewport.page(delta, self.processes.len());
    }

    pub fn jump_to_start(&mut self) {
        self.viewport.select(0, self.processes.len());
    }

    pub fn jump_to_end(&mut self) {
        let count = self.processes.len();
        self.viewport.select(count.saturating_sub(1), count);
    }

    /// Tags or untags the selected process, then moves down one row.
    pub fn toggle_tag_and_advance(&mut self) {
        if let Some(pid) = self.selected_process().map(|p| p.id) {
            self.tags.toggle(pid);
            self.move_selection(1);
        }
    }

    /// Pins the selection to the selected process id.
    pub fn follow_selected(&mut self) {
        if let Some(pid) = self.selected_process().map(|p| p.id) {
            self.viewport.follow(pid);
        }
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.messages.push(StatusMessage { kind: StatusKind::Error, text: text.into() });
    }

    pub fn notice(&mut self, text: impl Into<String>) {
        self.messages.push(StatusMessage { kind: StatusKind::Notice, text: text.into() });
    }

    pub fn clear_messages(&mut self) {
        self.messages.clear();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::app::process_ops::perform_all;
    use crate::system::testing::RecordingControl;

    /// App over a published table of `names`, ids 1..=n, 10 visible rows
    pub fn app_with(names: &[&str], control: Arc<RecordingControl>) -> App {
        let mut app = App::new(SortSpec::default(), HostInfo::default(), control);
        app.set_visible_rows(10);
        app.publish(generation(names));
        app
    }

    /// Runs whatever kill and exec requests the last action queued.
    pub fn settle(app: &mut App) {
        if let Some((ops, control)) = app.take_process_ops() {
            let failures = perform_all(control.as_ref(), &ops);
            app.report_failures(failures);
        }
    }

    pub fn generation(names: &[&str]) -> Generation {
        Generation {
            samples: names
                .iter()
                .enumerate()
                .map(|(i, name)| ProcessSample::stub(i as u32 + 1, 0, name))
                .collect(),
            ..Generation::default()
        }
    }

    fn ids(app: &App) -> Vec<u32> {
        app.processes.iter().map(|p| p.id).collect()
    }

    fn assert_viewport_invariants(app: &App) {
        let count = app.processes.len();
        let v = &app.viewport;
        if count > 0 {
            assert!(v.selected() < count);
            assert!(v.scroll_offset() <= v.selected());
            assert!(v.selected() < v.scroll_offset() + v.visible_rows());
        }
    }

    #[test]
    fn test_publish_sorts_under_current_order() {
        let mut app = App::new(
            SortSpec::new(SortColumn::ExeName, SortOrder::Descending),
            HostInfo::default(),
            Arc::new(RecordingControl::default()),
        );
        app.publish(generation(&["b", "c", "a"]));
        assert_eq!(ids(&app), vec![2, 1, 3]);
        assert_eq!(app.meters.tasks, 3);
        assert_eq!(app.generation, 1);
    }

    #[test]
    fn test_shrinking_generation_keeps_viewport_valid() {
        let names: Vec<String> = (0..50).map(|i| format!("p{i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let mut app = app_with(&refs, Arc::new(RecordingControl::default()));
        app.jump_to_end();
        assert_viewport_invariants(&app);

        app.publish(generation(&["a", "b", "c"]));
        assert_eq!(app.viewport.selected(), 2);
        assert_viewport_invariants(&app);

        app.publish(generation(&[]));
        assert_eq!(app.viewport.selected(), 0);
        assert!(app.selected_process().is_none());
    }

    #[test]
    fn test_sort_column_keeps_order_and_invert_flips() {
        let mut app = app_with(&["b", "a", "c"], Arc::new(RecordingControl::default()));
        app.invert_sort_order();
        assert_eq!(ids(&app), vec![3, 2, 1]);
        app.set_sort_column(SortColumn::ExeName);
        assert_eq!(app.sort.order, SortOrder::Descending);
        assert_eq!(ids(&app), vec![3, 1, 2]);
    }

    #[test]
    fn test_follow_survives_resort() {
        let mut app = app_with(&["b", "a", "c"], Arc::new(RecordingControl::default()));
        app.follow_selected();
        assert_eq!(app.selected_process().map(|p| p.id), Some(1));
        app.set_sort_column(SortColumn::ExeName);
        assert_eq!(app.selected_process().map(|p| p.id), Some(1));
        assert_eq!(app.viewport.selected(), 1);
    }

    #[test]
    fn test_toggle_tag_advances() {
        let mut app = app_with(&["a", "b"], Arc::new(RecordingControl::default()));
        app.toggle_tag_and_advance();
        assert!(app.tags.contains(1));
        assert_eq!(app.viewport.selected(), 1);
        app.toggle_tag_and_advance();
        app.toggle_tag_and_advance();
        assert!(!app.tags.contains(2), "second toggle on the last row untags it");
        assert_eq!(app.viewport.selected(), 1);
    }

    #[test]
    fn test_cycle_from_tree_enters_ordinary_columns() {
        let mut app = app_with(&["a"], Arc::new(RecordingControl::default()));
        app.set_sort_column(SortColumn::Tree);
        app.cycle_sort_column(true);
        assert_eq!(app.sort.column, SortColumn::Id);
        app.cycle_sort_column(false);
        assert_eq!(app.sort.column, SortColumn::ExeName);
    }
}
