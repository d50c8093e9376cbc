//! Process termination with SIGKILL via `nix`

use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;

use crate::system::{ProcessControl, ProcessError, ProcessResult};

pub struct LinuxControl;

impl ProcessControl for LinuxControl {
    fn terminate(&self, pid: u32) -> ProcessResult<()> {
        let raw = i32::try_from(pid).map_err(|_| ProcessError::InvalidPid(pid))?;
        if raw <= 0 {
            return Err(ProcessError::InvalidPid(pid));
        }
        kill(Pid::from_raw(raw), Signal::SIGKILL).map_err(|errno| match errno {
            Errno::EPERM => ProcessError::AccessDenied,
            Errno::ESRCH => ProcessError::NotFound,
            other => ProcessError::Os { api: "kill", message: other.desc().to_string() },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_pids_that_would_signal_groups() {
        assert_eq!(LinuxControl.terminate(0), Err(ProcessError::InvalidPid(0)));
        assert_eq!(
            LinuxControl.terminate(u32::MAX),
            Err(ProcessError::InvalidPid(u32::MAX))
        );
    }

    #[test]
    fn test_kills_spawned_child() {
        let mut child = std::process::Command::new("sleep")
            .arg("30")
            .spawn()
            .expect("spawn sleep");
        LinuxControl.terminate(child.id()).expect("kill child");
        let status = child.wait().expect("wait child");
        assert!(!status.success());
    }
}
