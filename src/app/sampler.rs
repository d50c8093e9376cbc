//! Two-snapshot sampling of the process table
//!
//! One call to [`Sampler::sample`] reads every process and the system
//! counters, sleeps for the interval, reads them again and derives
//! per-process CPU share, disk rate and uptime from the deltas.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use crate::system::cpu::{bytes_per_second, cpu_percent};
use crate::system::{
    HostInfo, MemoryStatus, ProbeResult, ProcessCounters, ProcessInfo, SystemProbe, SystemTimes,
};

use super::ProcessSample;

/// Samples at or above this CPU share count as running
const RUNNING_CPU_THRESHOLD: f64 = 0.01;

/// One complete, internally consistent snapshot of the machine
#[derive(Debug, Clone, Default)]
pub struct Generation {
    /// Unique by id, in enumeration order
    pub samples: Vec<ProcessSample>,
    /// Busy fraction of all CPUs over the interval, `[0, 1]`
    pub cpu_usage: f64,
    /// Samples whose CPU share reached the running threshold
    pub running: usize,
    pub memory: Option<MemoryStatus>,
    /// Milliseconds since boot
    pub uptime_ms: u64,
}

/// Which processes may enter the table at all
#[derive(Debug, Clone, Default)]
pub struct SampleFilter {
    /// Only this account (case-insensitive)
    pub user: Option<String>,
    /// Only these ids
    pub pids: Option<HashSet<u32>>,
}

impl SampleFilter {
    fn admits_pid(&self, pid: u32) -> bool {
        self.pids.as_ref().map_or(true, |pids| pids.contains(&pid))
    }

    fn admits_user(&self, user_name: &str) -> bool {
        self.user
            .as_ref()
            .map_or(true, |user| user.eq_ignore_ascii_case(user_name))
    }
}

pub struct Sampler {
    probe: Box<dyn SystemProbe>,
    filter: SampleFilter,
}

impl Sampler {
    pub fn new(probe: Box<dyn SystemProbe>, filter: SampleFilter) -> Self {
        Self { probe, filter }
    }

    pub fn host_info(&mut self) -> HostInfo {
        self.probe.host_info()
    }

    /// Produces the next generation, calling `pause` between the two reads.
    ///
    /// `pause` normally blocks for `interval`; it may return early on
    /// shutdown, in which case rates are still normalized to `interval`.
    ///
    /// # Errors
    /// Fails only if process enumeration itself fails; unreadable processes
    /// are kept with zeroed metrics.
    pub fn sample(
        &mut self,
        interval: Duration,
        pause: impl FnOnce(Duration),
    ) -> ProbeResult<Generation> {
        let started = Instant::now();

        let before_list = self.enumerate()?;
        let before: HashMap<u32, ProcessCounters> = before_list
            .iter()
            .filter_map(|info| self.probe.process_counters(info.pid).map(|c| (info.pid, c)))
            .collect();
        let system_before = self.system_times();

        pause(interval);

        let after_list = self.enumerate()?;
        let system_after = self.system_times();
        let now_ms = self.probe.now_ms();

        let system_delta = match (system_before, system_after) {
            (Some(b), Some(a)) => b.delta_to(&a),
            _ => SystemTimes::default(),
        };
        let interval_ms = interval.as_millis() as u64;

        let mut samples = Vec::with_capacity(after_list.len());
        for info in &after_list {
            let after = self.probe.process_counters(info.pid);
            let mut sample = ProcessSample::from_info(info);

            if let Some(after) = &after {
                if let Some(name) = &after.user_name {
                    sample.user_name.clone_from(name);
                }
                sample.used_memory_bytes = after.memory_bytes;
                sample.uptime_ms = now_ms.saturating_sub(after.creation_ms);
            }

            if !self.filter.admits_user(&sample.user_name) {
                continue;
            }

            // A different creation time means the pid was reused mid-interval.
            let pair = before
                .get(&info.pid)
                .zip(after.as_ref())
                .filter(|(b, a)| b.creation_ms == a.creation_ms);
            if let Some((before, after)) = pair {
                sample.cpu_percent = cpu_percent(
                    before.times.busy_delta_to(&after.times),
                    system_delta.total(),
                );
                sample.disk_bytes_per_sec = bytes_per_second(
                    after.io_bytes.saturating_sub(before.io_bytes),
                    interval_ms,
                );
            } else {
                log::trace!("pid {} has no counter pair this cycle", info.pid);
            }

            samples.push(sample);
        }

        let running = samples
            .iter()
            .filter(|s| s.cpu_percent >= RUNNING_CPU_THRESHOLD)
            .count();

        log::debug!(
            "sampled {} processes ({} running) in {:?}",
            samples.len(),
            running,
            started.elapsed()
        );

        Ok(Generation {
            samples,
            cpu_usage: system_delta.usage(),
            running,
            memory: self.probe.memory_status(),
            uptime_ms: self.probe.system_uptime_ms(),
        })
    }

    /// Enumerates, drops id 0 and duplicates, applies the id allow-list.
    fn enumerate(&mut self) -> ProbeResult<Vec<ProcessInfo>> {
        let mut seen = HashSet::new();
        let processes = self
            .probe
            .processes()?
            .into_iter()
            .filter(|p| p.pid != 0 && seen.insert(p.pid))
            .filter(|p| self.filter.admits_pid(p.pid))
            .collect();
        Ok(processes)
    }

    fn system_times(&mut self) -> Option<SystemTimes> {
        match self.probe.system_times() {
            Ok(times) => Some(times),
            Err(e) => {
                log::warn!("{}", e);
                None
            }
        }
    }
}
