//! Input/keyboard event handling
//!
//! Two modes:
//! - Normal mode (process list navigation, tagging, sorting)
//! - Command mode (editing the `:` / `/` command line)

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::interpreter::EXEC_SEED;
use super::sort::SortOrder;
use super::state::App;
use super::{SortColumn, ViewMode};

/// Result of handling a key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Continue running the application
    Continue,
    /// Exit the application
    Exit,
}

impl App {
    /// Routes a key event to the handler for the current mode.
    pub fn handle_key(&mut self, key: KeyEvent) -> KeyAction {
        // Windows reports releases too
        if key.kind == KeyEventKind::Release {
            return KeyAction::Continue;
        }

        match self.view_mode {
            ViewMode::ProcessList => self.handle_normal_key(key.code, key.modifiers),
            ViewMode::CommandInput => self.handle_command_key(key.code, key.modifiers),
        }
    }

    /// Handles key events in normal mode (process list).
    /// Returns `KeyAction::Exit` if the application should quit.
    pub fn handle_normal_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> KeyAction {
        self.clear_messages();
        let ctrl = modifiers.contains(KeyModifiers::CONTROL);

        match code {
            KeyCode::Char('c') if ctrl => return KeyAction::Exit,
            KeyCode::Char('q') | KeyCode::F(10) => return KeyAction::Exit,

            KeyCode::Left if ctrl => self.cycle_sort_column(false),
            KeyCode::Right if ctrl => self.cycle_sort_column(true),

            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::PageUp => self.move_page(-1),
            KeyCode::PageDown => self.move_page(1),
            KeyCode::Home | KeyCode::Char('g') => self.jump_to_start(),
            KeyCode::End | KeyCode::Char('G') => self.jump_to_end(),

            KeyCode::Char(' ') => self.toggle_tag_and_advance(),
            KeyCode::Char('U') => self.tags.clear(),
            KeyCode::Char('K') | KeyCode::F(9) => self.kill_tagged(),
            KeyCode::Char('F') => self.follow_selected(),

            KeyCode::Char('I') => self.invert_sort_order(),
            KeyCode::Char('M') => self.set_sort(SortColumn::UsedMemory, SortOrder::Descending),
            KeyCode::Char('P') => self.set_sort(SortColumn::CpuPercent, SortOrder::Descending),
            KeyCode::F(1) => self.set_sort_column(SortColumn::Id),
            KeyCode::F(2) => self.set_sort_column(SortColumn::ExeName),
            KeyCode::F(3) => self.set_sort_column(SortColumn::UserName),
            KeyCode::F(4) => self.set_sort_column(SortColumn::CpuPercent),
            KeyCode::F(5) => self.set_sort_column(SortColumn::UsedMemory),
            KeyCode::F(6) => self.set_sort_column(SortColumn::UpTime),

            KeyCode::Char('n') => self.search_next(),
            KeyCode::Char('N') => self.search_previous(),

            KeyCode::Char(':') => self.enter_command_mode(":"),
            KeyCode::Char('/') => self.enter_command_mode("/"),
            KeyCode::F(7) => self.enter_command_mode(EXEC_SEED),
            _ => {}
        }
        KeyAction::Continue
    }

    /// Handles key events while the command line is open.
    pub fn handle_command_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> KeyAction {
        match code {
            KeyCode::Esc => self.leave_command_mode(),
            KeyCode::Enter => return self.submit_input(),
            KeyCode::Backspace => self.input_backspace(),
            KeyCode::Up => self.recall_previous(),
            KeyCode::Down => self.recall_next(),
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.leave_command_mode();
            }
            KeyCode::Char(c) if !c.is_control() => self.input.push(c),
            _ => {}
        }
        KeyAction::Continue
    }
}
