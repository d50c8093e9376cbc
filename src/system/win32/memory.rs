//! Memory and host information using Win32 APIs

use std::env;
use std::mem;

use windows::Win32::System::SystemInformation::{
    GetSystemInfo, GetTickCount64, GlobalMemoryStatusEx, MEMORYSTATUSEX, SYSTEM_INFO,
};

use crate::system::{HostInfo, MemoryStatus};

/// Gets system-wide memory information via GlobalMemoryStatusEx.
pub fn read_memory_status() -> Option<MemoryStatus> {
    // dwLength must be set!
    let mut mem_status = MEMORYSTATUSEX {
        dwLength: mem::size_of::<MEMORYSTATUSEX>() as u32,
        ..Default::default()
    };

    // SAFETY: GlobalMemoryStatusEx is safe to call with a properly initialized struct.
    unsafe { GlobalMemoryStatusEx(&mut mem_status) }.ok()?;

    Some(MemoryStatus {
        total_physical: mem_status.ullTotalPhys,
        available_physical: mem_status.ullAvailPhys,
        total_page_file: mem_status.ullTotalPageFile,
        available_page_file: mem_status.ullAvailPageFile,
    })
}

/// Host name, processor description and logical core count.
pub fn read_host_info() -> HostInfo {
    let mut info = SYSTEM_INFO::default();
    // SAFETY: GetSystemInfo only writes into the provided struct.
    unsafe { GetSystemInfo(&mut info) };

    HostInfo {
        host_name: env::var("COMPUTERNAME").unwrap_or_else(|_| "localhost".to_string()),
        cpu_name: env::var("PROCESSOR_IDENTIFIER").unwrap_or_else(|_| "Unknown CPU".to_string()),
        core_count: info.dwNumberOfProcessors as usize,
    }
}

pub fn uptime_ms() -> u64 {
    // SAFETY: GetTickCount64 has no preconditions.
    unsafe { GetTickCount64() }
}
