//! Command-mode grammar
//!
//! ```text
//! line    := "/" PATTERN | name (ws+ arg)*
//! name    := letter+
//! arg     := argchar+ | '"' (argchar | ws)* '"'
//! argchar := alphanumeric | '%' | '/' | '.'
//! ```
//!
//! Every argument must be followed by whitespace or the end of the line.

use thiserror::Error;

use crate::system::error::ProcessError;

use super::SortColumn;

// ============================================================================
// Errors
// ============================================================================

/// Failures surfaced to the user as transient messages.
///
/// `Display` is the exact text shown in the footer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("parse error")]
    Parse,

    #[error("Not an editor command: {0}")]
    NotAnEditorCommand(String),

    #[error("Usage: kill PID(s)")]
    KillUsage,

    #[error("Not a valid pid: {0}")]
    InvalidPid(String),

    #[error("Failed to kill process {pid}: {source}")]
    KillFailed { pid: u32, source: ProcessError },

    #[error("Usage: exec COMMAND")]
    ExecUsage,

    #[error("Failed to create process: {0}")]
    Launch(ProcessError),

    #[error("Usage: sort COLUMN")]
    SortUsage,

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Error: trailing characters")]
    TrailingCharacters,

    #[error("Usage: search PATTERN")]
    SearchUsage,

    #[error("Pattern not found: {0}")]
    PatternNotFound(String),
}

// ============================================================================
// Commands
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Launch a process; arguments re-joined with single spaces
    Exec(String),
    /// Raw pid arguments, validated one at a time on execution
    Kill(Vec<String>),
    Quit,
    Sort(SortColumn),
    Tree,
    /// An empty pattern is accepted and ignored on execution
    Search(String),
}

fn is_arg_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '%' | '/' | '.')
}

/// Splits a line into a command name and its arguments.
fn tokenize(line: &str) -> Result<(String, Vec<String>), CommandError> {
    let mut chars = line.trim_start().chars().peekable();

    let mut name = String::new();
    while let Some(c) = chars.next_if(|c| c.is_alphabetic()) {
        name.push(c);
    }
    if chars.peek().is_some_and(|c| !c.is_whitespace()) {
        return Err(CommandError::Parse);
    }

    let mut args = Vec::new();
    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        let Some(&first) = chars.peek() else {
            break;
        };

        let mut arg = String::new();
        if first == '"' {
            chars.next();
            loop {
                match chars.next() {
                    Some('"') => break,
                    Some(c) if c.is_whitespace() || is_arg_char(c) => arg.push(c),
                    // Unterminated, or a character no argument may hold
                    _ => return Err(CommandError::Parse),
                }
            }
        } else {
            while let Some(c) = chars.next_if(|&c| is_arg_char(c)) {
                arg.push(c);
            }
        }

        if chars.peek().is_some_and(|c| !c.is_whitespace()) {
            return Err(CommandError::Parse);
        }
        args.push(arg);
    }

    Ok((name, args))
}

/// Parses one input line with its leading `:` and whitespace removed.
///
/// # Arguments
/// * `line` - Non-empty command text, e.g. `sort mem` or `/chrome`
///
/// # Returns
/// The command, or the error to show for a malformed or unknown one.
pub fn parse(line: &str) -> Result<Command, CommandError> {
    if let Some(pattern) = line.strip_prefix('/') {
        return Ok(Command::Search(pattern.to_string()));
    }

    let (name, mut args) = tokenize(line)?;

    match name.to_ascii_lowercase().as_str() {
        "exec" if args.is_empty() => Err(CommandError::ExecUsage),
        "exec" => Ok(Command::Exec(args.join(" "))),
        "kill" if args.is_empty() => Err(CommandError::KillUsage),
        "kill" => Ok(Command::Kill(args)),
        "q" | "quit" => Ok(Command::Quit),
        "sort" => match args.as_slice() {
            [column] => SortColumn::from_name(column)
                .map(Command::Sort)
                .ok_or_else(|| CommandError::UnknownColumn(column.clone())),
            _ => Err(CommandError::SortUsage),
        },
        "tree" if args.is_empty() => Ok(Command::Tree),
        "tree" => Err(CommandError::TrailingCharacters),
        "search" if args.len() == 1 => Ok(Command::Search(args.remove(0))),
        "search" => Err(CommandError::SearchUsage),
        _ => Err(CommandError::NotAnEditorCommand(name)),
    }
}

/// Parses a `kill` argument. Zero is never a valid target.
pub fn parse_pid(arg: &str) -> Result<u32, CommandError> {
    arg.parse::<u32>()
        .ok()
        .filter(|&pid| pid != 0)
        .ok_or_else(|| CommandError::InvalidPid(arg.to_string()))
}
