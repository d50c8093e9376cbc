//! User interface rendering
//!
//! This module provides all terminal UI rendering functionality:
//! - `render` - Frame snapshot and main rendering entry point
//! - `components` - Menu bar, meters, column headers, footer
//! - `process_list` - Process list rendering
//! - `utils` - Shared utilities

mod components;
mod process_list;
mod render;
mod utils;

pub use render::{render, Snapshot};
