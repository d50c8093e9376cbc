//! In-memory probe and control doubles for unit tests

use std::collections::HashMap;
use std::sync::Mutex;

use super::{
    HostInfo, MemoryStatus, ProbeError, ProbeResult, ProcessControl, ProcessCounters,
    ProcessError, ProcessInfo, ProcessResult, ProcessTimes, SystemProbe, SystemTimes,
};

/// What the fake OS looks like during one enumeration pass.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub processes: Vec<ProcessInfo>,
    pub counters: HashMap<u32, ProcessCounters>,
    pub system: SystemTimes,
}

impl Frame {
    pub fn process(mut self, pid: u32, parent_pid: u32, name: &str) -> Self {
        self.processes.push(ProcessInfo {
            pid,
            parent_pid,
            thread_count: 1,
            base_priority: 8,
            name: name.to_string(),
        });
        self
    }

    pub fn counters(mut self, pid: u32, busy: u64, io_bytes: u64, user: &str) -> Self {
        self.counters.insert(
            pid,
            ProcessCounters {
                times: ProcessTimes { kernel: busy / 2, user: busy - busy / 2 },
                io_bytes,
                creation_ms: 1_000,
                memory_bytes: 4096 * pid as u64,
                user_name: Some(user.to_string()),
            },
        );
        self
    }

    /// Overrides the creation time recorded by [`Frame::counters`].
    pub fn created(mut self, pid: u32, creation_ms: u64) -> Self {
        if let Some(counters) = self.counters.get_mut(&pid) {
            counters.creation_ms = creation_ms;
        }
        self
    }

    pub fn system(mut self, idle: u64, kernel: u64, user: u64) -> Self {
        self.system = SystemTimes { idle, kernel, user };
        self
    }
}

/// Replays frames: every `processes()` call moves to the next frame and
/// the last frame repeats forever.
pub struct FakeProbe {
    frames: Vec<Frame>,
    current: usize,
    started: bool,
    pub fail_enumeration: bool,
    pub now: u64,
}

impl FakeProbe {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self { frames, current: 0, started: false, fail_enumeration: false, now: 11_000 }
    }

    fn frame(&self) -> Option<&Frame> {
        self.frames.get(self.current)
    }
}

impl SystemProbe for FakeProbe {
    fn processes(&mut self) -> ProbeResult<Vec<ProcessInfo>> {
        if self.fail_enumeration {
            return Err(ProbeError::Enumeration("fake failure".to_string()));
        }
        if self.started && self.current + 1 < self.frames.len() {
            self.current += 1;
        }
        self.started = true;
        Ok(self.frame().map(|f| f.processes.clone()).unwrap_or_default())
    }

    fn process_counters(&mut self, pid: u32) -> Option<ProcessCounters> {
        self.frame().and_then(|f| f.counters.get(&pid).cloned())
    }

    fn system_times(&mut self) -> ProbeResult<SystemTimes> {
        Ok(self.frame().map(|f| f.system).unwrap_or_default())
    }

    fn memory_status(&mut self) -> Option<MemoryStatus> {
        Some(MemoryStatus {
            total_physical: 8 << 30,
            available_physical: 6 << 30,
            total_page_file: 2 << 30,
            available_page_file: 2 << 30,
        })
    }

    fn host_info(&mut self) -> HostInfo {
        HostInfo {
            host_name: "testhost".to_string(),
            cpu_name: "Test CPU".to_string(),
            core_count: 4,
        }
    }

    fn system_uptime_ms(&mut self) -> u64 {
        3_600_000
    }

    fn now_ms(&self) -> u64 {
        self.now
    }
}

/// Records every request, fails kills of pids listed in `refuse` and fails
/// every launch when `refuse_launch` is set.
#[derive(Default)]
pub struct RecordingControl {
    pub killed: Mutex<Vec<u32>>,
    pub launched: Mutex<Vec<String>>,
    pub refuse: Vec<u32>,
    pub refuse_launch: bool,
}

impl RecordingControl {
    pub fn refusing(refuse: Vec<u32>) -> Self {
        Self { refuse, ..Self::default() }
    }

    pub fn killed(&self) -> Vec<u32> {
        self.killed.lock().map(|k| k.clone()).unwrap_or_default()
    }

    pub fn launched(&self) -> Vec<String> {
        self.launched.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

impl ProcessControl for RecordingControl {
    fn terminate(&self, pid: u32) -> ProcessResult<()> {
        if self.refuse.contains(&pid) {
            return Err(ProcessError::AccessDenied);
        }
        if let Ok(mut killed) = self.killed.lock() {
            killed.push(pid);
        }
        Ok(())
    }

    fn launch(&self, command_line: &str) -> ProcessResult<u32> {
        if self.refuse_launch {
            return Err(ProcessError::NotFound);
        }
        if let Ok(mut launched) = self.launched.lock() {
            launched.push(command_line.to_string());
        }
        Ok(4242)
    }
}
