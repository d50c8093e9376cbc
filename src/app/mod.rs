//! Application state and logic

pub mod cli;
mod command;
mod history;
pub mod input;
mod interpreter;
mod navigation;
mod process_ops;
mod process_sample;
pub mod sampler;
mod search;
pub mod sort;
mod state;
mod tags;
mod tree_builder;
mod view_mode;

pub use input::KeyAction;
pub use process_ops::perform_all;
pub use process_sample::ProcessSample;
pub use sampler::{Generation, SampleFilter, Sampler};
pub use sort::{SortColumn, SortOrder, SortSpec};
pub use state::{App, StatusKind, StatusMessage, SystemMeters};
pub use view_mode::ViewMode;
