//! RAII wrappers for the Windows HANDLEs one sampling cycle opens
//!
//! Every handle is closed on drop, so nothing opened while sampling can
//! outlive the cycle that opened it.

use windows::Win32::Foundation::{CloseHandle, HANDLE};
use windows::Win32::Security::TOKEN_QUERY;
use windows::Win32::System::Diagnostics::ToolHelp::{
    CreateToolhelp32Snapshot, TH32CS_SNAPPROCESS,
};
use windows::Win32::System::Threading::{
    OpenProcess, OpenProcessToken, PROCESS_ACCESS_RIGHTS,
};

/// A process HANDLE, closed when dropped.
pub struct ProcessHandle(HANDLE);

impl ProcessHandle {
    /// Opens a process by PID with the specified access rights.
    ///
    /// # Arguments
    /// * `pid` - The process identifier
    /// * `access` - The access rights requested for the process
    ///
    /// # Returns
    /// * `Ok(ProcessHandle)` - A wrapped handle to the process
    /// * `Err` - If the process cannot be opened (access denied, process exited, etc.)
    pub fn open(pid: u32, access: PROCESS_ACCESS_RIGHTS) -> windows::core::Result<Self> {
        // SAFETY: OpenProcess has no pointer arguments; failure is reported
        // through the Result and yields no handle to close.
        let handle = unsafe { OpenProcess(access, false, pid)? };
        Ok(Self(handle))
    }

    /// Returns the raw HANDLE for use with Win32 APIs.
    ///
    /// The handle must not be used after this wrapper is dropped.
    pub fn as_raw(&self) -> HANDLE {
        self.0
    }
}

impl Drop for ProcessHandle {
    fn drop(&mut self) {
        // SAFETY: We own this handle (from OpenProcess) and close it exactly once.
        unsafe {
            let _ = CloseHandle(self.0);
        }
    }
}

/// A process access token opened for `TOKEN_QUERY`, closed when dropped.
pub struct TokenHandle(HANDLE);

impl TokenHandle {
    /// Opens the access token of an already opened process.
    pub fn open_query(process: &ProcessHandle) -> windows::core::Result<Self> {
        let mut token = HANDLE::default();
        // SAFETY: `process` is a live handle and `token` is a valid out-parameter.
        unsafe { OpenProcessToken(process.as_raw(), TOKEN_QUERY, &mut token)? };
        Ok(Self(token))
    }

    pub fn as_raw(&self) -> HANDLE {
        self.0
    }
}

impl Drop for TokenHandle {
    fn drop(&mut self) {
        // SAFETY: We own this handle (from OpenProcessToken).
        unsafe {
            let _ = CloseHandle(self.0);
        }
    }
}

/// A ToolHelp32 snapshot HANDLE, closed when dropped.
pub struct SnapshotHandle(HANDLE);

impl SnapshotHandle {
    /// Creates a snapshot of all processes in the system.
    ///
    /// # Returns
    /// * `Ok(SnapshotHandle)` - A wrapped handle to the snapshot
    /// * `Err` - If the snapshot cannot be created
    pub fn create_process_snapshot() -> windows::core::Result<Self> {
        // SAFETY: TH32CS_SNAPPROCESS captures all processes; the pid
        // argument is ignored for process snapshots.
        let handle = unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0)? };
        Ok(Self(handle))
    }

    /// Returns the raw HANDLE for use with Win32 APIs.
    pub fn as_raw(&self) -> HANDLE {
        self.0
    }
}

impl Drop for SnapshotHandle {
    fn drop(&mut self) {
        // SAFETY: We own this handle and it's valid.
        unsafe {
            let _ = CloseHandle(self.0);
        }
    }
}
