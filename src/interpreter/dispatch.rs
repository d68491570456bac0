//! Per-verb execution

use std::io::Write;

use super::{Outcome, Session};
use crate::commands::Action;
use crate::error::{Error, Result};
use crate::history::ReplayTarget;

impl<W: Write> Session<W> {
    /// Perform the single side effect of `action`
    pub(super) async fn dispatch(&mut self, action: Action) -> Result<Outcome> {
        match action {
            Action::MoveToDir { target } => {
                self.workdir.move_to(&target)?;
            }
            Action::WhereAmI => {
                writeln!(self.out, "{}", self.workdir)?;
            }
            Action::ListHistory => {
                for line in self.history.list() {
                    writeln!(self.out, "{}", line)?;
                }
            }
            Action::ClearHistory => {
                self.history.clear()?;
                writeln!(self.out, "History cleared")?;
            }
            Action::ByeBye => return Ok(Outcome::Exit),
            Action::Replay { index } => return self.replay(index),
            Action::Start { argv } => {
                let program = self.workdir.resolve_program(&argv);
                let status = self.supervisor.run_foreground(&program, &argv).await?;
                if !status.success() {
                    debug!("{} finished with {}", program, status);
                }
            }
            Action::Background { argv } => {
                self.launch_background(&argv)?;
            }
            Action::Dalek { pid } => {
                let termination = self.supervisor.terminate(pid).await;
                if !termination.was_tracked {
                    writeln!(self.out, "Could not terminate PID: {}", pid)?;
                }
            }
            Action::Repeat { count, argv } => self.repeat(count, &argv)?,
            Action::DalekAll => {
                let pids = self.supervisor.terminate_all().await;
                let listed: String = pids.iter().map(|pid| format!(" {}", pid)).collect();
                writeln!(self.out, "Exterminating {} processes:{}", pids.len(), listed)?;
            }
        }

        Ok(Outcome::Completed)
    }

    fn replay(&mut self, index: usize) -> Result<Outcome> {
        match self.history.resolve_replay(index) {
            ReplayTarget::NotFound => {
                debug!("No history entry at index {}, nothing to replay", index);
                Ok(Outcome::Completed)
            }
            ReplayTarget::Nested(stored) => Err(Error::ReplayOfReplay {
                command: stored.raw_text,
            }),
            ReplayTarget::Found(command) => Ok(Outcome::Replay(command)),
        }
    }

    /// Launch one background child and print its pid
    fn launch_background(&mut self, argv: &[String]) -> Result<u32> {
        let program = self.workdir.resolve_program(argv);
        let pid = self.supervisor.spawn_background(&program, argv)?;
        writeln!(self.out, "PID: {}", pid)?;
        Ok(pid)
    }

    /// Launch `count` background copies. A copy that fails to launch is
    /// reported on its own and does not stop the rest.
    fn repeat(&mut self, count: usize, argv: &[String]) -> Result<()> {
        let mut pids = Vec::new();
        for _ in 0..count {
            match self.launch_background(argv) {
                Ok(pid) => pids.push(pid),
                Err(err) if err.is_command_failure() => {
                    warn!("{}", err);
                    writeln!(self.out, "{}", err)?;
                }
                Err(err) => return Err(err),
            }
        }

        debug!("Repeat launched {} of {} copies: {:?}", pids.len(), count, pids);
        Ok(())
    }
}
