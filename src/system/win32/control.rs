//! Process termination via TerminateProcess

use windows::Win32::Foundation::{ERROR_ACCESS_DENIED, ERROR_INVALID_PARAMETER};
use windows::Win32::System::Threading::{TerminateProcess, PROCESS_TERMINATE};

use crate::ffi::ProcessHandle;
use crate::system::{ProcessControl, ProcessError, ProcessResult};

/// Exit code handed to killed processes
const KILL_EXIT_CODE: u32 = 9;

fn map_error(api: &'static str, err: windows::core::Error) -> ProcessError {
    let code = err.code();
    if code == ERROR_ACCESS_DENIED.to_hresult() {
        ProcessError::AccessDenied
    } else if code == ERROR_INVALID_PARAMETER.to_hresult() {
        ProcessError::NotFound
    } else {
        ProcessError::Os { api, message: err.message() }
    }
}

/// Kills processes with TerminateProcess; launches through the shared helper.
pub struct WindowsControl;

impl ProcessControl for WindowsControl {
    fn terminate(&self, pid: u32) -> ProcessResult<()> {
        if pid == 0 {
            return Err(ProcessError::InvalidPid(pid));
        }
        let handle =
            ProcessHandle::open(pid, PROCESS_TERMINATE).map_err(|e| map_error("OpenProcess", e))?;

        // SAFETY: `handle` was opened with PROCESS_TERMINATE and is still live.
        unsafe { TerminateProcess(handle.as_raw(), KILL_EXIT_CODE) }
            .map_err(|e| map_error("TerminateProcess", e))
    }
}
