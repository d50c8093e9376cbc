//! NTop: an htop-like terminal process monitor
//!
//! Shows every process with its CPU share, memory, threads, disk rate and
//! uptime, refreshed in the background while the list stays interactive.
//!
//! Controls:
//! - ↑/↓, j/k, PgUp/PgDn, g/G: Navigate process list
//! - Space: Tag process, U: Untag all, K/F9: Kill tagged
//! - I: Invert sort order, M/P: Sort by memory/CPU, F1-F6: Sort by column
//! - F: Follow selected process
//! - : or /: Command line (`:exec`, `:kill`, `:sort`, `:tree`, `:search`)
//! - n/N: Repeat search
//! - q, F10: Quit

mod app;
mod config;
mod constants;
#[cfg(windows)]
mod ffi;
mod logging;
mod orchestrator;
mod system;
mod ui;

use std::process::ExitCode;

use clap::Parser;

use app::cli::{version_banner, Args};
use app::{App, Sampler, SortOrder, SortSpec};
use config::Config;
use constants::APP_VERSION;
use orchestrator::AppError;

fn main() -> ExitCode {
    let args = Args::parse();

    if args.version {
        println!("{}", version_banner());
        return ExitCode::SUCCESS;
    }

    if let Some(path) = logging::init() {
        log::info!("ntop {} logging to {}", APP_VERSION, path.display());
    }

    match start(&args) {
        Ok(()) => {
            log::info!("exited normally");
            ExitCode::SUCCESS
        }
        Err(e) => {
            // The terminal guard has been dropped by now
            eprintln!("ntop: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Builds the initial state from the flags and hands over to the loops.
fn start(args: &Args) -> Result<(), AppError> {
    let config = Config::load(args.monochrome)?;
    log::info!(
        "redraw every {:?}, sample every {:?}, monochrome: {}",
        config.redraw_interval,
        config.sample_interval,
        args.monochrome
    );

    let mut sampler = Sampler::new(system::platform_probe()?, args.sample_filter());
    let host = sampler.host_info();
    log::info!("host {} ({}, {} cores)", host.host_name, host.cpu_name, host.core_count);

    let sort = SortSpec::new(args.sort.unwrap_or_default(), SortOrder::Ascending);
    let app = App::new(sort, host, system::platform_control());

    orchestrator::run(app, sampler, &config)
}
