//! Per-process and system-wide counters using Win32 APIs
//!
//! GetProcessTimes, GetProcessMemoryInfo and GetProcessIoCounters are read
//! through one handle per process; GetSystemTimes gives the aggregate.

use std::mem;

use windows::Win32::Foundation::FILETIME;
use windows::Win32::System::ProcessStatus::{GetProcessMemoryInfo, PROCESS_MEMORY_COUNTERS};
use windows::Win32::System::Threading::{
    GetProcessIoCounters, GetProcessTimes, GetSystemTimes, IO_COUNTERS,
    PROCESS_QUERY_LIMITED_INFORMATION,
};

use crate::ffi::ProcessHandle;
use crate::system::{ProbeError, ProbeResult, ProcessCounters, ProcessTimes, SystemTimes};

use super::account::process_user_name;

/// 100ns intervals between 1601-01-01 and 1970-01-01
const FILETIME_UNIX_EPOCH: u64 = 116_444_736_000_000_000;

/// Converts a FILETIME to a u64 (100-nanosecond intervals since 1601)
fn filetime_to_u64(ft: &FILETIME) -> u64 {
    ((ft.dwHighDateTime as u64) << 32) | (ft.dwLowDateTime as u64)
}

/// Converts an absolute FILETIME to milliseconds since the Unix epoch.
fn filetime_to_epoch_ms(ft: u64) -> u64 {
    ft.saturating_sub(FILETIME_UNIX_EPOCH) / 10_000
}

/// Reads every counter the sampler needs for `pid`.
///
/// Returns `None` when the process cannot be opened or its times cannot be
/// read; memory, I/O and owner fall back to zero/unknown individually.
pub fn read_process_counters(pid: u32) -> Option<ProcessCounters> {
    let handle = match ProcessHandle::open(pid, PROCESS_QUERY_LIMITED_INFORMATION) {
        Ok(h) => h,
        Err(e) => {
            log::trace!("OpenProcess({}) failed: {}", pid, e.message());
            return None;
        }
    };

    let mut creation_time = FILETIME::default();
    let mut exit_time = FILETIME::default();
    let mut kernel_time = FILETIME::default();
    let mut user_time = FILETIME::default();

    // SAFETY: GetProcessTimes is safe with a valid handle and pointers.
    let times = unsafe {
        GetProcessTimes(
            handle.as_raw(),
            &mut creation_time,
            &mut exit_time,
            &mut kernel_time,
            &mut user_time,
        )
    };
    if times.is_err() {
        return None;
    }

    Some(ProcessCounters {
        times: ProcessTimes {
            kernel: filetime_to_u64(&kernel_time),
            user: filetime_to_u64(&user_time),
        },
        io_bytes: io_bytes(&handle),
        creation_ms: filetime_to_epoch_ms(filetime_to_u64(&creation_time)),
        memory_bytes: working_set(&handle),
        user_name: process_user_name(&handle),
    })
}

fn working_set(handle: &ProcessHandle) -> u64 {
    let mut counters = PROCESS_MEMORY_COUNTERS {
        cb: mem::size_of::<PROCESS_MEMORY_COUNTERS>() as u32,
        ..Default::default()
    };

    // SAFETY: GetProcessMemoryInfo is safe with a valid handle and initialized struct.
    let result = unsafe {
        GetProcessMemoryInfo(
            handle.as_raw(),
            &mut counters,
            mem::size_of::<PROCESS_MEMORY_COUNTERS>() as u32,
        )
    };

    if result.is_ok() {
        counters.WorkingSetSize as u64
    } else {
        0
    }
}

fn io_bytes(handle: &ProcessHandle) -> u64 {
    let mut io_counters = IO_COUNTERS::default();

    // SAFETY: GetProcessIoCounters is safe with a valid handle and initialized struct.
    let result = unsafe { GetProcessIoCounters(handle.as_raw(), &mut io_counters) };

    if result.is_ok() {
        io_counters
            .ReadTransferCount
            .saturating_add(io_counters.WriteTransferCount)
    } else {
        0
    }
}

/// Gets a snapshot of system-wide CPU times.
pub fn read_system_times() -> ProbeResult<SystemTimes> {
    let mut idle_time = FILETIME::default();
    let mut kernel_time = FILETIME::default();
    let mut user_time = FILETIME::default();

    // SAFETY: GetSystemTimes is safe to call with valid pointers.
    unsafe {
        GetSystemTimes(
            Some(&mut idle_time),
            Some(&mut kernel_time),
            Some(&mut user_time),
        )
    }
    .map_err(|e| ProbeError::SystemTimes(e.message()))?;

    Ok(SystemTimes {
        idle: filetime_to_u64(&idle_time),
        kernel: filetime_to_u64(&kernel_time),
        user: filetime_to_u64(&user_time),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filetime_epoch_conversion() {
        assert_eq!(filetime_to_epoch_ms(FILETIME_UNIX_EPOCH), 0);
        assert_eq!(filetime_to_epoch_ms(FILETIME_UNIX_EPOCH + 10_000 * 1500), 1500);
        assert_eq!(filetime_to_epoch_ms(0), 0, "pre-1970 clamps to zero");
    }

    #[test]
    fn test_system_times() {
        let times = read_system_times().expect("Should get CPU times");
        assert!(times.kernel > 0, "Should have some kernel time");
        assert!(times.kernel >= times.idle, "kernel time includes idle");
    }

    #[test]
    fn test_own_counters() {
        let counters = read_process_counters(std::process::id()).expect("own process readable");
        assert!(counters.memory_bytes > 0, "Our process should use some memory");
    }
}
