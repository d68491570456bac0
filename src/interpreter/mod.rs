//! The interpreter loop
//!
//! [`Session`] bundles all mutable shell state (current directory, running
//! flag, tracked processes, history, output sink) and is passed by `&mut`
//! to every operation. [`Interpreter`] is the thin front end that prints the
//! banner and prompt and feeds input lines into the session.
//!
//! Per line: parse, validate, dispatch exactly one side effect, then record
//! the command to history if it succeeded and the recording policy allows.

mod dispatch;

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::commands::{Command, Verb};
use crate::config::ShellConfig;
use crate::error::{Error, Result};
use crate::history::HistoryStore;
use crate::supervisor::ProcessSupervisor;
use crate::workdir::WorkingDirectory;

/// Line that prints the verb list instead of being dispatched
pub const HELP_KEYWORD: &str = "help";

/// How many replays may be chained before the chain is refused. Replaying a
/// stored replay is already rejected, so one level is all that can occur.
pub const MAX_REPLAY_DEPTH: usize = 1;

/// What a dispatched command asks of the loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The side effect happened; record the command
    Completed,
    /// Leave the loop; never recorded
    Exit,
    /// Run this command next as if freshly entered
    Replay(Command),
}

/// All state of one shell session
pub struct Session<W: Write> {
    workdir: WorkingDirectory,
    history: HistoryStore,
    supervisor: ProcessSupervisor,
    running: bool,
    out: W,
}

impl<W: Write> Session<W> {
    pub fn new(
        workdir: WorkingDirectory,
        history: HistoryStore,
        supervisor: ProcessSupervisor,
        out: W,
    ) -> Self {
        Self {
            workdir,
            history,
            supervisor,
            running: true,
            out,
        }
    }

    /// Handle one raw input line. Blank lines are ignored and `help` prints
    /// the verb list; neither is dispatched or recorded.
    pub async fn handle_line(&mut self, line: &str) -> Result<()> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return Ok(());
        }
        if line.trim() == HELP_KEYWORD {
            return self.print_help();
        }

        self.execute(Command::parse(line)).await
    }

    /// Validate, dispatch and record a command. Command-level failures are
    /// reported to the output and do not surface as errors; only a broken
    /// output sink does.
    pub async fn execute(&mut self, command: Command) -> Result<()> {
        // Replays waiting for their target to finish, outermost first
        let mut replays: Vec<Command> = Vec::new();
        let mut current = command;

        loop {
            let action = match current.validate() {
                Ok(action) => action,
                Err(reason) => {
                    self.report(Error::InvalidCommand {
                        command: current.raw_text.clone(),
                        reason: reason.to_string(),
                    })?;
                    break;
                }
            };

            match self.dispatch(action).await {
                Ok(Outcome::Completed) => {
                    self.record(current);
                    break;
                }
                Ok(Outcome::Exit) => {
                    info!("Leaving the shell");
                    self.running = false;
                    break;
                }
                Ok(Outcome::Replay(target)) => {
                    if replays.len() >= MAX_REPLAY_DEPTH {
                        self.report(Error::ReplayDepthExceeded {
                            depth: MAX_REPLAY_DEPTH,
                        })?;
                        break;
                    }
                    debug!("Replaying '{}'", target.raw_text);
                    replays.push(current);
                    current = target;
                }
                Err(err) if err.is_command_failure() => {
                    self.report(err)?;
                    break;
                }
                Err(err) => return Err(err),
            }
        }

        // A replay that found its target counts as executed, whatever the
        // target did; record them after it, innermost first.
        while let Some(replay) = replays.pop() {
            self.record(replay);
        }
        Ok(())
    }

    /// Push `command` to history unless the recording policy excludes it
    fn record(&mut self, command: Command) {
        if command.is_recordable() {
            self.history.push(command);
        } else {
            debug!("Not recording '{}'", command.raw_text);
        }
    }

    fn report(&mut self, err: Error) -> Result<()> {
        match &err {
            Error::InvalidCommand { command, reason } => {
                debug!("Rejected '{}': {}", command, reason)
            }
            _ => warn!("{}", err),
        }
        writeln!(self.out, "{}", err)?;
        Ok(())
    }

    /// Print the recognized verbs
    pub fn print_help(&mut self) -> Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "The following are valid commands:")?;
        for verb in Verb::ALL {
            writeln!(self.out, "  {}", verb.summary())?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    /// False once `byebye` ran or input ended
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn workdir(&self) -> &WorkingDirectory {
        &self.workdir
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn supervisor(&self) -> &ProcessSupervisor {
        &self.supervisor
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Persist history, logging instead of failing
    pub fn save_history(&self) {
        if let Err(e) = self.history.save() {
            warn!("History not saved: {}", e);
        }
    }
}

/// Console front end around a [`Session`]
pub struct Interpreter<W: Write> {
    session: Session<W>,
    config: ShellConfig,
}

impl<W: Write> Interpreter<W> {
    pub fn new(session: Session<W>, config: ShellConfig) -> Self {
        Self { session, config }
    }

    /// Read lines from `input` until `byebye` or end of input. Bytes that
    /// are not UTF-8 are replaced rather than ending the session.
    pub async fn run<R>(&mut self, mut input: R) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        if self.config.show_banner {
            self.print_banner()?;
        }

        let mut buf = Vec::new();
        while self.session.is_running() {
            write!(self.session.out, "{}", self.config.prompt)?;
            self.session.out.flush()?;

            buf.clear();
            if input.read_until(b'\n', &mut buf).await? == 0 {
                debug!("End of input");
                writeln!(self.session.out)?;
                self.session.stop();
                break;
            }

            let line = String::from_utf8_lossy(&buf);
            self.session.handle_line(&line).await?;
            self.session.out.flush()?;
        }

        Ok(())
    }

    fn print_banner(&mut self) -> Result<()> {
        writeln!(self.session.out, "\t\t===== Welcome to my shell =====")?;
        writeln!(self.session.out, "Type \"{}\" to list valid commands", HELP_KEYWORD)?;
        writeln!(self.session.out)?;
        Ok(())
    }

    pub fn session(&self) -> &Session<W> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session<W> {
        &mut self.session
    }

    pub fn into_session(self) -> Session<W> {
        self.session
    }
}
