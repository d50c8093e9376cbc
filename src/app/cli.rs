//! Command-line argument parsing

use std::collections::HashSet;

use clap::Parser;

use crate::constants::{APP_NAME, APP_VERSION, DISPLAY_NAME};

use super::sampler::SampleFilter;
use super::SortColumn;

const AFTER_HELP: &str = "\
COMMANDS (type : in the process list):
    :exec COMMAND       Launch a new process
    :kill PID...        Kill processes by id
    :sort COLUMN        Sort by ID, USER, PRI, CPU%, MEM, THRD, DISK, TIME or EXE
    :tree               Show the process tree
    :search PATTERN     Find a process by executable name (also /PATTERN)
    :q, :quit           Quit

KEYS:
    Up/Down, j/k        Move the selection       Space   Tag process
    PgUp/PgDn, g/G      Page, top, bottom        U       Untag all
    Ctrl+Left/Right     Change sort column       K, F9   Kill tagged
    I                   Invert sort order        F       Follow process
    M / P               Sort by memory / CPU     n/N     Next/previous match
    F1-F6               Sort by column           F7      Exec
    q, F10              Quit";

/// Parsed command-line arguments
#[derive(Debug, Parser)]
#[command(
    name = APP_NAME,
    about = "An htop-like process monitor",
    disable_version_flag = true,
    after_help = AFTER_HELP
)]
pub struct Args {
    /// Use the monochrome color scheme and skip the config file
    #[arg(short = 'C')]
    pub monochrome: bool,

    /// Print version information and exit
    #[arg(short = 'v')]
    pub version: bool,

    /// Only show processes with these ids
    #[arg(short = 'p', value_name = "PID[,PID...]", value_delimiter = ',', value_parser = parse_pid)]
    pub pids: Option<Vec<u32>>,

    /// Initial sort column
    #[arg(short = 's', value_name = "COLUMN", value_parser = parse_column)]
    pub sort: Option<SortColumn>,

    /// Only show processes owned by this user
    #[arg(short = 'u', value_name = "USERNAME")]
    pub user: Option<String>,
}

impl Args {
    pub fn sample_filter(&self) -> SampleFilter {
        SampleFilter {
            user: self.user.clone(),
            pids: self
                .pids
                .as_ref()
                .map(|pids| pids.iter().copied().collect::<HashSet<u32>>()),
        }
    }
}

/// Banner printed for `-v`
pub fn version_banner() -> String {
    format!("{} {}", DISPLAY_NAME, APP_VERSION)
}

fn parse_pid(s: &str) -> Result<u32, String> {
    match s.trim().parse::<u32>() {
        Ok(0) | Err(_) => Err(format!("invalid process id '{}'", s)),
        Ok(pid) => Ok(pid),
    }
}

fn parse_column(s: &str) -> Result<SortColumn, String> {
    SortColumn::from_name(s).ok_or_else(|| {
        format!(
            "invalid sort column '{}'. Valid values: ID, USER, PRI, CPU%, MEM, THRD, DISK, TIME, EXE, TREE",
            s
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("ntop").chain(argv.iter().copied()))
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]).expect("no flags");
        assert!(!args.monochrome);
        assert!(!args.version);
        assert!(args.pids.is_none());
        assert!(args.sort.is_none());
        let filter = args.sample_filter();
        assert!(filter.user.is_none() && filter.pids.is_none());
    }

    #[test]
    fn test_pid_list() {
        let args = parse(&["-p", "4,8,15"]).expect("pid list");
        assert_eq!(args.pids, Some(vec![4, 8, 15]));
        let pids = args.sample_filter().pids.expect("allow-list");
        assert!(pids.contains(&8));
        assert!(parse(&["-p", "4,x"]).is_err());
        assert!(parse(&["-p", "0"]).is_err());
    }

    #[test]
    fn test_sort_column_by_name() {
        let args = parse(&["-s", "mem"]).expect("known column");
        assert_eq!(args.sort, Some(SortColumn::UsedMemory));
        assert!(parse(&["-s", "bogus"]).is_err());
    }

    #[test]
    fn test_flags() {
        let args = parse(&["-C", "-v", "-u", "alice"]).expect("flags");
        assert!(args.monochrome);
        assert!(args.version);
        assert_eq!(args.user.as_deref(), Some("alice"));
        assert!(parse(&["--bogus"]).is_err());
    }
}
