//! Process management operations (kill, exec)
//!
//! Key handling runs with the shared [`App`] locked, so kill and exec only
//! queue a [`ProcessOp`]. The caller drains the queue with
//! [`App::take_process_ops`], performs it with the lock released and hands
//! the failures back through [`App::report_failures`].
//!
//! Failures never abort a batch: each one becomes its own error message
//! and the remaining targets are still attempted.

use std::mem;
use std::sync::Arc;

use crate::system::ProcessControl;

use super::command::{parse_pid, CommandError};
use super::state::App;

/// A request against the OS, deferred until the state lock is released
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOp {
    Kill(u32),
    Launch(String),
}

impl ProcessOp {
    fn perform(&self, control: &dyn ProcessControl) -> Result<(), CommandError> {
        match self {
            ProcessOp::Kill(pid) => {
                let pid = *pid;
                control
                    .terminate(pid)
                    .map_err(|source| CommandError::KillFailed { pid, source })?;
                log::info!("killed process {}", pid);
            }
            ProcessOp::Launch(command_line) => {
                let pid = control.launch(command_line).map_err(CommandError::Launch)?;
                log::info!("launched `{}` as pid {}", command_line, pid);
            }
        }
        Ok(())
    }
}

/// Performs `ops` in order and returns every failure, in the same order.
pub fn perform_all(control: &dyn ProcessControl, ops: &[ProcessOp]) -> Vec<CommandError> {
    ops.iter()
        .filter_map(|op| match op.perform(control) {
            Ok(()) => None,
            Err(e) => {
                log::warn!("{:?} failed: {}", op, e);
                Some(e)
            }
        })
        .collect()
}

impl App {
    /// Kills every pid in `args`, skipping (and reporting) invalid ones.
    ///
    /// # Arguments
    /// * `args` - Raw `kill` arguments as typed
    pub fn kill_pids(&mut self, args: &[String]) {
        for arg in args {
            match parse_pid(arg) {
                Ok(pid) => self.pending.push(ProcessOp::Kill(pid)),
                Err(e) => self.error(e.to_string()),
            }
        }
    }

    /// Kills all tagged processes in ascending pid order, then clears the tags.
    pub fn kill_tagged(&mut self) {
        let pids = self.tags.ids();
        if pids.is_empty() {
            return;
        }
        log::info!("killing {} tagged processes", pids.len());
        self.pending.extend(pids.into_iter().map(ProcessOp::Kill));
        self.tags.clear();
    }

    /// Launches `command_line` as a new process.
    pub fn launch(&mut self, command_line: &str) {
        self.pending.push(ProcessOp::Launch(command_line.to_string()));
    }

    /// Hands out the queued operations together with the control to run them on.
    ///
    /// Returns `None` when nothing is queued.
    pub fn take_process_ops(&mut self) -> Option<(Vec<ProcessOp>, Arc<dyn ProcessControl>)> {
        if self.pending.is_empty() {
            return None;
        }
        Some((mem::take(&mut self.pending), Arc::clone(&self.control)))
    }

    /// Shows each failure as its own error message.
    pub fn report_failures(&mut self, failures: Vec<CommandError>) {
        for failure in failures {
            self.error(failure.to_string());
        }
    }
}
