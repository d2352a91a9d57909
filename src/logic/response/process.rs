//! Process Actions Module
//!
//! Resolves and terminates processes through `sysinfo`.

use sysinfo::{Pid, System};

use super::types::ActionError;

/// Privileged process surface used by the executor
pub trait ProcessControl: Send + Sync {
    /// Name of the live process, `None` when the pid does not resolve
    fn resolve(&self, pid: u32) -> Option<String>;

    /// Send the terminate signal
    fn terminate(&self, pid: u32) -> Result<(), ActionError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SysinfoProcessControl;

impl ProcessControl for SysinfoProcessControl {
    fn resolve(&self, pid: u32) -> Option<String> {
        let pid = Pid::from_u32(pid);
        let mut sys = System::new();
        sys.refresh_process(pid);
        sys.process(pid).map(|p| p.name().to_string())
    }

    fn terminate(&self, pid: u32) -> Result<(), ActionError> {
        let target = Pid::from_u32(pid);
        let mut sys = System::new();
        sys.refresh_process(target);

        let process = sys.process(target).ok_or(ActionError::ProcessNotFound { pid })?;
        if process.kill() {
            Ok(())
        } else {
            Err(ActionError::TerminateFailed {
                pid,
                reason: "signal could not be delivered".to_string(),
            })
        }
    }
}
