//! Child process supervision
//!
//! Foreground children are awaited and never tracked. Background children
//! are tracked by pid and handed to a reaper task that owns the child handle
//! and collects its exit status, so finished children never linger as
//! zombies. The reaper never touches the tracked set; only `dalek` and
//! `dalekall` remove pids.

use std::process::{ExitStatus, Stdio};

use tokio::process::{Child, Command};

use crate::error::{Error, Result};
use crate::platform::{Platform, SignalOps};

/// Outcome of terminating a single pid
#[derive(Debug)]
pub struct Termination {
    pub pid: u32,
    /// Whether the pid was in the tracked set
    pub was_tracked: bool,
    /// Result of the signal attempt itself
    pub signal: Result<()>,
}

/// Owns the set of tracked background pids
pub struct ProcessSupervisor {
    /// Background pids in launch order
    tracked_pids: Vec<u32>,
    signals: Box<dyn SignalOps>,
}

impl ProcessSupervisor {
    pub fn new() -> Self {
        Self::with_signals(Platform::signals())
    }

    /// Create a supervisor with custom signal delivery
    pub fn with_signals(signals: Box<dyn SignalOps>) -> Self {
        Self {
            tracked_pids: Vec::new(),
            signals,
        }
    }

    /// Run `program` with `argv` and wait for it to exit
    pub async fn run_foreground(&self, program: &str, argv: &[String]) -> Result<ExitStatus> {
        let mut child = spawn(program, argv)?;
        let pid = child.id().unwrap_or_default();
        debug!("Started foreground process {} ({})", pid, program);

        let status = child.wait().await.map_err(|e| Error::WaitFailed {
            program: program.to_string(),
            reason: e.to_string(),
        })?;
        debug!("Foreground process {} exited with {}", pid, status);
        Ok(status)
    }

    /// Launch `program` without waiting, track its pid and hand the child to
    /// a reaper task. Must be called from within a tokio runtime.
    pub fn spawn_background(&mut self, program: &str, argv: &[String]) -> Result<u32> {
        let child = spawn(program, argv)?;
        let pid = child.id().ok_or_else(|| Error::SpawnFailed {
            program: program.to_string(),
            reason: "process exited before its pid was read".to_string(),
        })?;

        if !self.tracked_pids.contains(&pid) {
            self.tracked_pids.push(pid);
        }
        reap(pid, child);

        info!("Started background process {} ({})", pid, program);
        Ok(pid)
    }

    /// Send SIGTERM to `pid` and forget it. The signal is attempted whether
    /// or not the pid was launched by this supervisor.
    pub async fn terminate(&mut self, pid: u32) -> Termination {
        let signal = self.signals.send_terminate(pid).await;
        if let Err(e) = &signal {
            warn!("{}", e);
        }

        let position = self.tracked_pids.iter().position(|tracked| *tracked == pid);
        if let Some(position) = position {
            self.tracked_pids.remove(position);
        }

        Termination {
            pid,
            was_tracked: position.is_some(),
            signal,
        }
    }

    /// Send SIGTERM to every tracked pid and clear the set. Returns the
    /// pids that were signaled, in launch order.
    pub async fn terminate_all(&mut self) -> Vec<u32> {
        let pids = std::mem::take(&mut self.tracked_pids);
        for pid in &pids {
            if let Err(e) = self.signals.send_terminate(*pid).await {
                warn!("{}", e);
            }
        }

        info!("Terminated {} background processes", pids.len());
        pids
    }

    /// Background pids believed to be running, in launch order
    pub fn tracked_pids(&self) -> &[u32] {
        &self.tracked_pids
    }
}

impl Default for ProcessSupervisor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ProcessSupervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessSupervisor")
            .field("tracked_pids", &self.tracked_pids)
            .finish_non_exhaustive()
    }
}

fn spawn(program: &str, argv: &[String]) -> Result<Child> {
    let mut command = Command::new(program);
    if let Some((arg0, args)) = argv.split_first() {
        command.arg0(arg0).args(args);
    }

    command
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(false)
        .spawn()
        .map_err(|e| {
            debug!("Failed to launch {}: {}", program, e);
            Error::SpawnFailed {
                program: program.to_string(),
                reason: e.to_string(),
            }
        })
}

fn reap(pid: u32, mut child: Child) {
    tokio::spawn(async move {
        match child.wait().await {
            Ok(status) => debug!("Background process {} exited with {}", pid, status),
            Err(e) => warn!("Failed to reap background process {}: {}", pid, e),
        }
    });
}
