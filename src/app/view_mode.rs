//! View mode enum for application state
//!
//! Keystrokes either drive the process list directly or build a command
//! line; exactly one of the two is active.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Navigation keys act on the process list
    #[default]
    ProcessList,

    /// Keys edit the command line shown in the footer
    CommandInput,
}

impl ViewMode {
    #[inline]
    pub fn is_command_input(&self) -> bool {
        matches!(self, ViewMode::CommandInput)
    }
}
