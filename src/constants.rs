//! Centralized constants for the application
//!
//! Magic numbers and tunables used throughout the application, kept in one
//! place so they are easy to find and modify.

// ============================================================================
// Application Info
// ============================================================================

/// Name shown in the menu bar and version banner
pub const DISPLAY_NAME: &str = "NTop";

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// Application version from Cargo.toml
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Intervals (milliseconds)
// ============================================================================

/// Default full-redraw interval
pub const DEFAULT_REDRAW_MS: u64 = 1000;

/// Default sampling interval (one generation per second)
pub const DEFAULT_SAMPLE_MS: u64 = 1000;

/// Smallest accepted redraw or sample interval
pub const MIN_INTERVAL_MS: u64 = 100;

/// Largest accepted redraw or sample interval
pub const MAX_INTERVAL_MS: u64 = 10000;

/// Input poll timeout inside the redraw loop
pub const INPUT_POLL_MS: u64 = 30;

// ============================================================================
// Files and Environment
// ============================================================================

/// Config file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "ntop.conf";

/// Environment variable holding the log filter, e.g. `debug`
pub const LOG_FILTER_ENV: &str = "NTOP_LOG";

/// Environment variable overriding the log file path
pub const LOG_FILE_ENV: &str = "NTOP_LOG_FILE";

/// Log file name inside the temp directory
pub const DEFAULT_LOG_FILE: &str = "ntop.log";

// ============================================================================
// Layout
// ============================================================================

/// Cells inside the brackets of a CPU / memory / page meter
pub const METER_WIDTH: usize = 25;

/// Screen row of the process list column header
pub const LIST_HEADER_ROW: u16 = 6;

/// Rows below the list: message or command line, then the options bar
pub const FOOTER_ROWS: usize = 2;

/// Lines subtracted from terminal height to calculate visible rows
pub const VISIBLE_ROWS_OVERHEAD: usize = LIST_HEADER_ROW as usize + 1 + FOOTER_ROWS;

/// Spaces per tree level in the EXE column
pub const TREE_INDENT: &str = "  ";

/// Marker drawn before a child in tree mode
pub const TREE_BRANCH: &str = "└─";

// ============================================================================
// Byte Size Conversions
// ============================================================================

/// Bytes in a kilobyte
pub const BYTES_PER_KB: f64 = 1024.0;

/// Bytes in a megabyte
pub const BYTES_PER_MB: f64 = 1_048_576.0;

/// Bytes in a gigabyte
pub const BYTES_PER_GB: f64 = 1_073_741_824.0;
