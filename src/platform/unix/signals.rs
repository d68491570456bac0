//! Unix signal operations

use crate::error::{Error, Result};
use crate::platform::traits::SignalOps;
use nix::sys::signal::{kill, Signal as NixSignal};
use nix::unistd::Pid;

pub struct UnixSignals;

impl UnixSignals {
    pub fn new() -> Self {
        Self
    }
}

fn to_pid(pid: u32) -> Result<Pid> {
    // Values past i32::MAX would wrap into process-group targets
    i32::try_from(pid)
        .ok()
        .filter(|raw| *raw > 0)
        .map(Pid::from_raw)
        .ok_or_else(|| Error::SignalSendFailed {
            pid,
            signal: "SIGTERM".to_string(),
            reason: "not a process id".to_string(),
        })
}

#[async_trait::async_trait]
impl SignalOps for UnixSignals {
    async fn send_terminate(&self, pid: u32) -> Result<()> {
        kill(to_pid(pid)?, NixSignal::SIGTERM).map_err(|e| Error::SignalSendFailed {
            pid,
            signal: "SIGTERM".to_string(),
            reason: e.to_string(),
        })
    }
}
