//! Process sample data structure

use crate::system::{ProcessInfo, PLACEHOLDER_USER};

/// One process's state for the current generation
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessSample {
    /// Process ID (never 0)
    pub id: u32,
    /// Parent process ID as reported by the OS, possibly stale
    pub parent_id: u32,
    /// Owning account
    pub user_name: String,
    pub base_priority: i32,
    pub thread_count: u32,
    /// Resident memory in bytes
    pub used_memory_bytes: u64,
    /// Share of total system CPU time during the last interval
    pub cpu_percent: f64,
    /// Disk I/O normalized to bytes per second
    pub disk_bytes_per_sec: u64,
    /// Milliseconds since the process was created
    pub uptime_ms: u64,
    /// Executable name
    pub exe_name: String,
    /// Indentation level, only meaningful in tree mode
    pub tree_depth: usize,
}

impl ProcessSample {
    /// A sample carrying only enumeration data; derived fields are zeroed.
    pub fn from_info(info: &ProcessInfo) -> Self {
        Self {
            id: info.pid,
            parent_id: info.parent_pid,
            user_name: PLACEHOLDER_USER.to_string(),
            base_priority: info.base_priority,
            thread_count: info.thread_count,
            used_memory_bytes: 0,
            cpu_percent: 0.0,
            disk_bytes_per_sec: 0,
            uptime_ms: 0,
            exe_name: info.name.clone(),
            tree_depth: 0,
        }
    }
}

#[cfg(test)]
impl ProcessSample {
    /// Minimal sample for ordering tests
    pub fn stub(id: u32, parent_id: u32, exe_name: &str) -> Self {
        Self::from_info(&ProcessInfo {
            pid: id,
            parent_pid: parent_id,
            thread_count: 1,
            base_priority: 8,
            name: exe_name.to_string(),
        })
    }
}
