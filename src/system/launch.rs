//! Detached process launch shared by every platform

use std::process::{Command, Stdio};
use std::thread;

use super::error::{ProcessError, ProcessResult};

/// Spawns `command_line` with null stdio and returns the new pid.
///
/// The first whitespace-separated word is the program, the rest are its
/// arguments. The child is waited on from a background thread so it never
/// lingers as a zombie.
pub fn spawn_detached(command_line: &str) -> ProcessResult<u32> {
    let mut words = command_line.split_whitespace();
    let program = words.next().ok_or(ProcessError::EmptyCommand)?;

    let mut child = Command::new(program)
        .args(words)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| ProcessError::Launch(e.to_string()))?;

    let pid = child.id();
    let reaper = thread::Builder::new()
        .name(format!("reap-{}", pid))
        .spawn(move || {
            if let Err(e) = child.wait() {
                log::warn!("waiting on launched pid {} failed: {}", pid, e);
            }
        });
    if let Err(e) = reaper {
        log::warn!("could not start reaper for pid {}: {}", pid, e);
    }

    Ok(pid)
}
