//! Process enumeration using the ToolHelp32 API
//!
//! Walks a CreateToolhelp32Snapshot with Process32FirstW/Process32NextW.

use std::mem;

use windows::Win32::System::Diagnostics::ToolHelp::{
    Process32FirstW, Process32NextW, PROCESSENTRY32W,
};

use crate::ffi::SnapshotHandle;
use crate::system::{ProbeError, ProbeResult, ProcessInfo};

use super::wide_to_string;

fn info_from_entry(entry: &PROCESSENTRY32W) -> ProcessInfo {
    ProcessInfo {
        pid: entry.th32ProcessID,
        parent_pid: entry.th32ParentProcessID,
        thread_count: entry.cntThreads,
        base_priority: entry.pcPriClassBase,
        name: wide_to_string(&entry.szExeFile),
    }
}

/// Enumerates all running processes on the system.
///
/// # Returns
/// * `Ok(Vec<ProcessInfo>)` - One entry per process in the snapshot
/// * `Err(ProbeError::Enumeration)` - If the snapshot cannot be created
pub fn enumerate_processes() -> ProbeResult<Vec<ProcessInfo>> {
    let snapshot = SnapshotHandle::create_process_snapshot()
        .map_err(|e| ProbeError::Enumeration(e.message()))?;
    let mut processes = Vec::new();

    // dwSize must be set or Process32FirstW fails.
    let mut entry = PROCESSENTRY32W {
        dwSize: mem::size_of::<PROCESSENTRY32W>() as u32,
        ..Default::default()
    };

    // SAFETY: We have a valid snapshot handle and properly initialized entry.
    let mut success = unsafe { Process32FirstW(snapshot.as_raw(), &mut entry) };

    while success.is_ok() {
        processes.push(info_from_entry(&entry));

        // SAFETY: Same as above - valid handles and initialized struct.
        success = unsafe { Process32NextW(snapshot.as_raw(), &mut entry) };
    }

    Ok(processes)
}
