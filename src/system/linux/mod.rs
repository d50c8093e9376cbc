//! Linux backend reading `/proc` through the `procfs` crate
//!
//! System times are folded into the Windows shape the sampler expects:
//! kernel time includes idle, and idle includes iowait.

mod accounts;
mod control;
mod processes;

use std::fs;

use procfs::{CpuInfo, Current, CurrentSI, KernelStats, Meminfo};

pub use control::LinuxControl;

use crate::system::{
    HostInfo, MemoryStatus, ProbeError, ProbeResult, ProcessCounters, ProcessInfo, SystemProbe,
    SystemTimes,
};

use accounts::UserCache;
use processes::Clock;

pub struct LinuxProbe {
    clock: Clock,
    accounts: UserCache,
}

impl LinuxProbe {
    /// Reads the clock facts once; fails if `/proc/stat` is unreadable.
    pub fn new() -> ProbeResult<Self> {
        let stats = KernelStats::current().map_err(|e| ProbeError::Enumeration(e.to_string()))?;
        let clock = Clock {
            ticks_per_second: procfs::ticks_per_second(),
            page_size: procfs::page_size(),
            boot_time_ms: stats.btime.saturating_mul(1000),
        };
        log::debug!("linux probe clock: {:?}", clock);
        Ok(Self { clock, accounts: UserCache::default() })
    }
}

impl SystemProbe for LinuxProbe {
    fn processes(&mut self) -> ProbeResult<Vec<ProcessInfo>> {
        processes::enumerate_processes()
    }

    fn process_counters(&mut self, pid: u32) -> Option<ProcessCounters> {
        processes::read_process_counters(pid, &self.clock, &mut self.accounts)
    }

    fn system_times(&mut self) -> ProbeResult<SystemTimes> {
        let total = KernelStats::current()
            .map_err(|e| ProbeError::SystemTimes(e.to_string()))?
            .total;
        let iowait = total.iowait.unwrap_or(0);
        let idle = total.idle + iowait;
        let kernel = total.system
            + idle
            + total.irq.unwrap_or(0)
            + total.softirq.unwrap_or(0)
            + total.steal.unwrap_or(0);
        Ok(SystemTimes { idle, kernel, user: total.user + total.nice })
    }

    fn memory_status(&mut self) -> Option<MemoryStatus> {
        let info = Meminfo::current().ok()?;
        Some(MemoryStatus {
            total_physical: info.mem_total,
            available_physical: info.mem_available.unwrap_or(info.mem_free),
            total_page_file: info.swap_total,
            available_page_file: info.swap_free,
        })
    }

    fn host_info(&mut self) -> HostInfo {
        let host_name = fs::read_to_string("/proc/sys/kernel/hostname")
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|_| "localhost".to_string());
        let (cpu_name, core_count) = match CpuInfo::current() {
            Ok(info) => (
                info.model_name(0).unwrap_or("Unknown CPU").to_string(),
                info.num_cores(),
            ),
            Err(_) => ("Unknown CPU".to_string(), 1),
        };
        HostInfo { host_name, cpu_name, core_count }
    }

    fn system_uptime_ms(&mut self) -> u64 {
        self.now_ms().saturating_sub(self.clock.boot_time_ms)
    }
}
