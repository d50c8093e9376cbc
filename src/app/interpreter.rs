//! Command-mode input line and command dispatch

use super::command::{parse, Command, CommandError};
use super::input::KeyAction;
use super::search::{find, SearchDirection};
use super::state::App;
use super::{SortColumn, ViewMode};

/// Line shown when F7 opens the command line
pub const EXEC_SEED: &str = ":exec ";

impl App {
    /// Opens the command line pre-filled with `seed` (`:`, `/` or a command).
    pub fn enter_command_mode(&mut self, seed: &str) {
        self.clear_messages();
        self.input.clear();
        self.input.push_str(seed);
        self.view_mode = ViewMode::CommandInput;
    }

    pub fn leave_command_mode(&mut self) {
        self.input.clear();
        self.view_mode = ViewMode::ProcessList;
    }

    /// Deletes the last character; an emptied line closes command mode.
    pub fn input_backspace(&mut self) {
        self.input.pop();
        if self.input.is_empty() {
            self.leave_command_mode();
        }
    }

    pub fn recall_previous(&mut self) {
        if let Some(line) = self.history.previous() {
            self.input = line.to_string();
        }
    }

    pub fn recall_next(&mut self) {
        if let Some(line) = self.history.next() {
            self.input = line.to_string();
        }
    }

    /// Runs the command line and leaves command mode.
    ///
    /// Leading colons and whitespace are ignored. A non-empty line is
    /// recorded in the history whether or not it succeeded.
    pub fn submit_input(&mut self) -> KeyAction {
        let raw = std::mem::take(&mut self.input);
        self.leave_command_mode();

        let line = raw.trim_start_matches(|c: char| c == ':' || c.is_whitespace());
        if line.is_empty() {
            return KeyAction::Continue;
        }

        let action = match parse(line).and_then(|command| self.execute(command)) {
            Ok(action) => action,
            Err(e) => {
                log::debug!("command `{}` failed: {}", line, e);
                self.error(e.to_string());
                KeyAction::Continue
            }
        };
        self.history.push(&raw);
        action
    }

    /// Carries out one parsed command.
    ///
    /// `kill` and `exec` are only queued here; their OS failures are
    /// reported once the queue is performed.
    pub fn execute(&mut self, command: Command) -> Result<KeyAction, CommandError> {
        match command {
            Command::Exec(command_line) => self.launch(&command_line),
            Command::Kill(args) => self.kill_pids(&args),
            Command::Quit => return Ok(KeyAction::Exit),
            Command::Sort(column) => self.set_sort_column(column),
            Command::Tree => self.set_sort_column(SortColumn::Tree),
            Command::Search(pattern) => {
                if !pattern.is_empty() {
                    self.search.set_pattern(&pattern);
                    self.search_next();
                }
            }
        }
        Ok(KeyAction::Continue)
    }

    pub fn search_next(&mut self) {
        self.search_in(SearchDirection::Forward);
    }

    pub fn search_previous(&mut self) {
        self.search_in(SearchDirection::Backward);
    }

    /// Repeats the active search; does nothing before the first one.
    fn search_in(&mut self, direction: SearchDirection) {
        let Some(pattern) = self.search.pattern().map(str::to_owned) else {
            return;
        };

        match find(&self.processes, self.viewport.selected(), &pattern, direction) {
            Some(hit) => {
                self.viewport.select(hit.index, self.processes.len());
                if hit.wrapped {
                    self.notice(direction.wrap_notice());
                }
            }
            None => self.error(CommandError::PatternNotFound(pattern).to_string()),
        }
    }
}
