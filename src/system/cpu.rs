//! CPU time accumulators and delta math
//!
//! CPU usage requires delta measurements between two time points. The
//! probes report cumulative counters in whatever unit the OS uses
//! (100ns FILETIME ticks on Windows, clock ticks on Linux); only ratios
//! of deltas are ever computed, so the unit cancels out as long as
//! process and system counters share it.

/// Snapshot of system-wide CPU times
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemTimes {
    /// Time spent in idle
    pub idle: u64,
    /// Time spent in kernel mode (includes idle)
    pub kernel: u64,
    /// Time spent in user mode
    pub user: u64,
}

impl SystemTimes {
    /// Total time = kernel + user (kernel includes idle)
    pub fn total(&self) -> u64 {
        self.kernel.saturating_add(self.user)
    }

    /// Counter growth from `self` to `later`.
    pub fn delta_to(&self, later: &SystemTimes) -> SystemTimes {
        SystemTimes {
            idle: later.idle.saturating_sub(self.idle),
            kernel: later.kernel.saturating_sub(self.kernel),
            user: later.user.saturating_sub(self.user),
        }
    }

    /// Busy fraction of this delta in `[0, 1]`.
    pub fn usage(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        (1.0 - self.idle as f64 / total as f64).clamp(0.0, 1.0)
    }
}

/// Snapshot of per-process CPU times
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessTimes {
    /// Time spent in kernel mode
    pub kernel: u64,
    /// Time spent in user mode
    pub user: u64,
}

impl ProcessTimes {
    pub fn busy(&self) -> u64 {
        self.kernel.saturating_add(self.user)
    }

    /// Busy time accumulated from `self` to `later`.
    pub fn busy_delta_to(&self, later: &ProcessTimes) -> u64 {
        later.busy().saturating_sub(self.busy())
    }
}

/// Share of the system's total time delta spent in one process, in percent.
///
/// Not normalized per core: a single saturated thread on an N-core machine
/// reports roughly `100 / N`.
pub fn cpu_percent(process_delta: u64, system_delta: u64) -> f64 {
    if system_delta == 0 {
        return 0.0;
    }
    100.0 * process_delta as f64 / system_delta as f64
}

/// Normalizes a byte delta measured over `interval_ms` to bytes per second.
///
/// A zero interval yields the raw delta.
pub fn bytes_per_second(delta: u64, interval_ms: u64) -> u64 {
    if interval_ms == 0 {
        return delta;
    }
    (delta as u128 * 1000 / interval_ms as u128).min(u64::MAX as u128) as u64
}
