//! Windows backend built on raw Win32 calls via the `windows` crate

mod account;
mod control;
mod counters;
mod memory;
mod processes;

pub use control::WindowsControl;

use crate::system::{
    HostInfo, MemoryStatus, ProbeResult, ProcessCounters, ProcessInfo, SystemProbe, SystemTimes,
};

/// Converts a null-terminated wide string (u16 slice) to a Rust String
fn wide_to_string(wide: &[u16]) -> String {
    let len = wide.iter().position(|&c| c == 0).unwrap_or(wide.len());
    String::from_utf16_lossy(&wide[..len])
}

/// Stateless probe; every call opens and closes its own handles.
pub struct WindowsProbe;

impl WindowsProbe {
    pub fn new() -> Self {
        Self
    }
}

impl SystemProbe for WindowsProbe {
    fn processes(&mut self) -> ProbeResult<Vec<ProcessInfo>> {
        processes::enumerate_processes()
    }

    fn process_counters(&mut self, pid: u32) -> Option<ProcessCounters> {
        counters::read_process_counters(pid)
    }

    fn system_times(&mut self) -> ProbeResult<SystemTimes> {
        counters::read_system_times()
    }

    fn memory_status(&mut self) -> Option<MemoryStatus> {
        memory::read_memory_status()
    }

    fn host_info(&mut self) -> HostInfo {
        memory::read_host_info()
    }

    fn system_uptime_ms(&mut self) -> u64 {
        memory::uptime_ms()
    }
}
