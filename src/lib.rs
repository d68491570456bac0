//! mysh - a small interactive shell with process supervision
//!
//! mysh understands a fixed set of verbs, starts programs in the foreground
//! or background, keeps track of the background ones so they can be
//! terminated later, and remembers what was typed in a replayable history
//! that survives restarts.
//!
//! ## Verbs
//!
//! | Verb | Arguments | Effect |
//! |---|---|---|
//! | `movetodir` | `<dir>` | change the shell's own current directory |
//! | `whereami` | | print that directory |
//! | `history` | `[-c]` | list (or clear) the history |
//! | `byebye` | | leave the shell |
//! | `replay` | `<n>` | run the entry listed as `<n>` again |
//! | `start` | `<prog> [args]` | run a program and wait for it |
//! | `background` | `<prog> [args]` | run a program without waiting |
//! | `dalek` | `<pid>` | terminate a process |
//! | `repeat` | `<n> <prog> [args]` | start `<n>` background copies |
//! | `dalekall` | | terminate every background process |
//!
//! ## Module Organization
//!
//! - [`commands`] - Line parsing and per-verb validation
//! - [`history`] - Newest-first history and its file format
//! - [`supervisor`] - Foreground/background children and termination
//! - [`workdir`] - The shell's own current directory
//! - [`interpreter`] - Session state, dispatch and the read loop
//! - [`config`] - Configuration loading
//! - [`platform`] - Signal delivery and well-known directories
//! - [`mod@error`] - Error types and Result aliases
//!
//! ## Quick Start
//!
//! ```no_run
//! use mysh::{init, Interpreter};
//!
//! # async fn run() -> mysh::Result<()> {
//! let (config, session) = init()?;
//! let mut interpreter = Interpreter::new(session, config.shell.clone());
//! let stdin = tokio::io::BufReader::new(tokio::io::stdin());
//! interpreter.run(stdin).await?;
//! interpreter.session().save_history();
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency
//!
//! The interpreter is a single task. `start` is the only place it waits on a
//! child; background children are reaped by their own tokio tasks, which
//! never touch the tracked pid set.

#[macro_use]
extern crate tracing;

pub mod commands;
pub mod config;
pub mod error;
pub mod history;
pub mod interpreter;
pub mod platform;
pub mod supervisor;
pub mod workdir;

// Re-exports for core functionality
pub use commands::{Action, Command, InvalidReason, Verb};
pub use config::Config;
pub use error::{Error, Result};
pub use history::HistoryStore;
pub use interpreter::{Interpreter, Outcome, Session};
pub use supervisor::ProcessSupervisor;
pub use workdir::WorkingDirectory;

use config::loader::ConfigLoader;

/// The current version of mysh from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The application name from Cargo.toml
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Load the configuration from the default locations and build a session
/// writing to stdout.
///
/// The history file is read here; a file that cannot be read is logged and
/// the session starts with an empty history.
pub fn init() -> Result<(Config, Session<std::io::Stdout>)> {
    let config = ConfigLoader::load()?;
    let session = build_session(&config, std::io::stdout())?;
    Ok((config, session))
}

/// Build a session from `config` that writes to `out`
pub fn build_session<W: std::io::Write>(config: &Config, out: W) -> Result<Session<W>> {
    let workdir = WorkingDirectory::from_process()?;
    let history = load_history(config);
    Ok(Session::new(workdir, history, ProcessSupervisor::new(), out))
}

fn load_history(config: &Config) -> HistoryStore {
    let path = config.history.file.clone();
    match HistoryStore::load(&path) {
        Ok(store) => store.with_max_size(config.history.max_entries),
        Err(e) => {
            warn!("Starting with empty history: {}", e);
            HistoryStore::with_path(path).with_max_size(config.history.max_entries)
        }
    }
}
