//! System information module - Process, memory, and CPU counters
//!
//! Everything the monitor needs from the OS goes through two traits:
//! [`SystemProbe`] for reading and [`ProcessControl`] for acting. The
//! Windows backend talks to Win32 through the `windows` crate, the Linux
//! backend reads `/proc` through `procfs`.

pub mod cpu;
pub mod error;
pub mod launch;

#[cfg(target_os = "linux")]
mod linux;
#[cfg(windows)]
mod win32;

#[cfg(test)]
pub mod testing;

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

pub use cpu::{ProcessTimes, SystemTimes};
pub use error::{ProbeError, ProbeResult, ProcessError, ProcessResult};

/// User name shown for processes whose owner cannot be read
pub const PLACEHOLDER_USER: &str = "SYSTEM";

/// One row of a process enumeration pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInfo {
    /// Process ID
    pub pid: u32,
    /// Parent process ID
    pub parent_pid: u32,
    /// Number of threads
    pub thread_count: u32,
    /// Base priority of the process
    pub base_priority: i32,
    /// Executable name (e.g., "notepad.exe")
    pub name: String,
}

/// Raw cumulative counters for one process at one instant
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessCounters {
    /// Kernel and user CPU time, same unit as [`SystemTimes`]
    pub times: ProcessTimes,
    /// Bytes read plus bytes written since the process started
    pub io_bytes: u64,
    /// Creation time in milliseconds since the Unix epoch
    pub creation_ms: u64,
    /// Resident memory in bytes
    pub memory_bytes: u64,
    /// Owning account, if it could be resolved
    pub user_name: Option<String>,
}

/// System-wide memory statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryStatus {
    /// Total physical memory in bytes
    pub total_physical: u64,
    /// Available physical memory in bytes
    pub available_physical: u64,
    /// Total page file (swap) size in bytes
    pub total_page_file: u64,
    /// Available page file (swap) size in bytes
    pub available_page_file: u64,
}

impl MemoryStatus {
    pub fn used_physical(&self) -> u64 {
        self.total_physical.saturating_sub(self.available_physical)
    }

    /// Fraction of physical memory in use, `[0, 1]`.
    pub fn physical_load(&self) -> f64 {
        ratio(self.used_physical(), self.total_physical)
    }

    /// Fraction of the page file in use, `[0, 1]`.
    pub fn page_load(&self) -> f64 {
        let used = self.total_page_file.saturating_sub(self.available_page_file);
        ratio(used, self.total_page_file)
    }
}

fn ratio(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        (part as f64 / whole as f64).clamp(0.0, 1.0)
    }
}

/// Static facts about the host, read once at startup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostInfo {
    pub host_name: String,
    pub cpu_name: String,
    pub core_count: usize,
}

/// Read access to the OS process table and counters.
///
/// Per-process reads return `None` rather than an error: a process that
/// exited or refused access is still shown, just without metrics.
pub trait SystemProbe: Send {
    /// One enumeration pass over all processes. Failure is fatal.
    fn processes(&mut self) -> ProbeResult<Vec<ProcessInfo>>;

    /// Cumulative counters for `pid`, or `None` if no handle could be opened.
    fn process_counters(&mut self, pid: u32) -> Option<ProcessCounters>;

    /// Cumulative idle, kernel and user time of the whole machine.
    fn system_times(&mut self) -> ProbeResult<SystemTimes>;

    fn memory_status(&mut self) -> Option<MemoryStatus>;

    fn host_info(&mut self) -> HostInfo;

    /// Milliseconds since the machine booted.
    fn system_uptime_ms(&mut self) -> u64;

    /// Wall-clock time in milliseconds since the Unix epoch.
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default()
    }
}

/// Process termination and launch.
pub trait ProcessControl: Send + Sync {
    /// Forcefully terminates `pid`.
    fn terminate(&self, pid: u32) -> ProcessResult<()>;

    /// Launches `command_line` as a new detached process and returns its pid.
    fn launch(&self, command_line: &str) -> ProcessResult<u32> {
        launch::spawn_detached(command_line)
    }
}

/// Creates the probe for the running operating system.
#[cfg(windows)]
pub fn platform_probe() -> ProbeResult<Box<dyn SystemProbe>> {
    Ok(Box::new(win32::WindowsProbe::new()))
}

/// Creates the probe for the running operating system.
#[cfg(target_os = "linux")]
pub fn platform_probe() -> ProbeResult<Box<dyn SystemProbe>> {
    Ok(Box::new(linux::LinuxProbe::new()?))
}

/// Creates the probe for the running operating system.
#[cfg(not(any(windows, target_os = "linux")))]
pub fn platform_probe() -> ProbeResult<Box<dyn SystemProbe>> {
    Err(ProbeError::Unsupported(std::env::consts::OS))
}

/// Creates the process-control capability for the running operating system.
#[cfg(windows)]
pub fn platform_control() -> Arc<dyn ProcessControl> {
    Arc::new(win32::WindowsControl)
}

/// Creates the process-control capability for the running operating system.
#[cfg(target_os = "linux")]
pub fn platform_control() -> Arc<dyn ProcessControl> {
    Arc::new(linux::LinuxControl)
}

/// Creates the process-control capability for the running operating system.
#[cfg(not(any(windows, target_os = "linux")))]
pub fn platform_control() -> Arc<dyn ProcessControl> {
    struct Unsupported;

    impl ProcessControl for Unsupported {
        fn terminate(&self, _pid: u32) -> ProcessResult<()> {
            Err(ProcessError::Os {
                api: "terminate",
                message: format!("not supported on {}", std::env::consts::OS),
            })
        }
    }

    Arc::new(Unsupported)
}
