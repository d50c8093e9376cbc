//! Custom error types for type-safe error handling
//!
//! Sampling failures and process-control failures are kept apart: the
//! former decide whether the monitor can run at all, the latter are shown
//! to the user and never stop the program.

use thiserror::Error;

// ============================================================================
// Probe Error
// ============================================================================

/// Errors raised while reading the process table or system counters.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The process enumeration primitive could not be created
    #[error("cannot enumerate processes: {0}")]
    Enumeration(String),

    /// Aggregate CPU counters are unavailable
    #[error("cannot read system times: {0}")]
    SystemTimes(String),

    /// No probe exists for this operating system
    #[error("unsupported platform: {0}")]
    Unsupported(&'static str),
}

// ============================================================================
// Process Error
// ============================================================================

/// Errors that can occur during process operations (kill, exec).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessError {
    /// Zero or otherwise unusable process id
    #[error("invalid process id {0}")]
    InvalidPid(u32),

    /// Process does not exist or has already terminated
    #[error("process not found or has terminated")]
    NotFound,

    /// Access denied - typically requires elevation
    #[error("access denied")]
    AccessDenied,

    /// Operating system call failed
    #[error("{api} failed: {message}")]
    Os {
        /// Name of the failing call
        api: &'static str,
        /// OS supplied description
        message: String,
    },

    /// The command line was empty after trimming
    #[error("empty command line")]
    EmptyCommand,

    /// The new process could not be spawned
    #[error("{0}")]
    Launch(String),
}

// ============================================================================
// Result type aliases
// ============================================================================

/// Result type for probe operations
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Result type for process operations
pub type ProcessResult<T> = Result<T, ProcessError>;
