//! Process enumeration and per-process counters from `/proc`

use procfs::process::{all_processes, Process};

use crate::system::{ProbeError, ProbeResult, ProcessCounters, ProcessInfo, ProcessTimes};

use super::accounts::UserCache;

/// Enumerates all running processes on the system.
///
/// Processes that vanish between listing `/proc` and reading their `stat`
/// are skipped; failing to list `/proc` at all is an error.
pub fn enumerate_processes() -> ProbeResult<Vec<ProcessInfo>> {
    let iter = all_processes().map_err(|e| ProbeError::Enumeration(e.to_string()))?;

    let processes = iter
        .filter_map(|process| process.ok())
        .filter_map(|process| process.stat().ok())
        .map(|stat| ProcessInfo {
            pid: stat.pid.max(0) as u32,
            parent_pid: stat.ppid.max(0) as u32,
            thread_count: stat.num_threads.max(0) as u32,
            base_priority: stat.priority as i32,
            name: stat.comm,
        })
        .collect();

    Ok(processes)
}

/// Clock facts needed to turn `stat` ticks into wall-clock values.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    pub ticks_per_second: u64,
    pub page_size: u64,
    pub boot_time_ms: u64,
}

impl Clock {
    fn ticks_to_ms(&self, ticks: u64) -> u64 {
        if self.ticks_per_second == 0 {
            return 0;
        }
        ticks.saturating_mul(1000) / self.ticks_per_second
    }
}

/// Reads every counter the sampler needs for `pid`.
pub fn read_process_counters(
    pid: u32,
    clock: &Clock,
    accounts: &mut UserCache,
) -> Option<ProcessCounters> {
    let process = match Process::new(pid as i32) {
        Ok(p) => p,
        Err(e) => {
            log::trace!("open /proc/{} failed: {}", pid, e);
            return None;
        }
    };
    let stat = process.stat().ok()?;

    // /proc/PID/io is only readable for our own processes unless privileged.
    let io_bytes = process
        .io()
        .map(|io| io.read_bytes.saturating_add(io.write_bytes))
        .unwrap_or(0);
    let user_name = process.uid().ok().and_then(|uid| accounts.name(uid));

    Some(ProcessCounters {
        times: ProcessTimes { kernel: stat.stime, user: stat.utime },
        io_bytes,
        creation_ms: clock.boot_time_ms.saturating_add(clock.ticks_to_ms(stat.starttime)),
        memory_bytes: stat.rss.saturating_mul(clock.page_size),
        user_name,
    })
}
