//! Replayable command history
//!
//! The store keeps commands newest-first: index 0 is always the most recent
//! push. Listing the store stamps each entry with its display index, and
//! that stamp is what `replay <n>` addresses, so indices only mean something
//! until the next listing.
//!
//! Persistence is a single flat file written once per session through
//! [`codec`].

use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::commands::{Command, Verb};
use crate::error::{Error, Result};

/// Default history file name, relative to the process working directory
pub const DEFAULT_HISTORY_FILE: &str = "mysh_history.txt";

/// Maximum number of history entries to keep
pub const MAX_HISTORY_ENTRIES: usize = 10000;

/// Result of looking up a display index for `replay`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayTarget {
    /// No entry carries that index; replay does nothing
    NotFound,
    /// The entry is itself a replay and must not run
    Nested(Command),
    /// A freshly parsed copy of the entry, ready to dispatch
    Found(Command),
}

/// Newest-first command history backed by a file
#[derive(Debug)]
pub struct HistoryStore {
    /// Path to the history file
    history_file: PathBuf,
    /// Entries, most recent at the front
    entries: VecDeque<Command>,
    /// Maximum history size
    max_size: usize,
}

impl HistoryStore {
    /// Create an empty store that persists to `path`
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            history_file: path.into(),
            entries: VecDeque::new(),
            max_size: MAX_HISTORY_ENTRIES,
        }
    }

    /// Create a store and fill it from `path`. A missing file is an empty
    /// history.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let mut store = Self::with_path(path);
        store.reload()?;
        Ok(store)
    }

    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size.max(1);
        self.truncate();
        self
    }

    /// Replace the in-memory entries with the persisted ones
    pub fn reload(&mut self) -> Result<()> {
        let content = match fs::read_to_string(&self.history_file) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No history file at {}", self.history_file.display());
                self.entries.clear();
                return Ok(());
            }
            Err(e) => {
                return Err(Error::HistoryLoadFailed {
                    path: self.history_file.clone(),
                    reason: e.to_string(),
                })
            }
        };

        self.entries.clear();
        for raw in codec::decode(&content) {
            let command = Command::parse(&raw);
            if command.is_recordable() {
                self.entries.push_back(command);
            } else {
                warn!("Skipping unusable history entry '{}'", raw);
            }
        }
        self.truncate();

        debug!(
            "Loaded {} history entries from {}",
            self.entries.len(),
            self.history_file.display()
        );
        Ok(())
    }

    /// Overwrite the history file with the whole store. An empty store
    /// writes nothing.
    pub fn save(&self) -> Result<()> {
        if self.entries.is_empty() {
            debug!("History is empty, nothing to save");
            return Ok(());
        }

        let content = codec::encode(self.entries.iter().map(|cmd| cmd.raw_text.as_str()));
        fs::write(&self.history_file, content).map_err(|e| Error::HistorySaveFailed {
            path: self.history_file.clone(),
            reason: e.to_string(),
        })?;

        debug!(
            "Saved {} history entries to {}",
            self.entries.len(),
            self.history_file.display()
        );
        Ok(())
    }

    /// Add a command as the most recent entry
    pub fn push(&mut self, mut command: Command) {
        command.replay_index = None;
        self.entries.push_front(command);
        self.truncate();
    }

    /// Stamp every entry with its display index and return the listing
    /// lines, newest first. Empty history lists nothing.
    pub fn list(&mut self) -> Vec<String> {
        self.entries
            .iter_mut()
            .enumerate()
            .map(|(index, command)| {
                command.replay_index = Some(index);
                format!("{}: {}", index, command.raw_text)
            })
            .collect()
    }

    /// Find the entry stamped with `index` by the last listing
    pub fn find_by_display_index(&self, index: usize) -> Option<&Command> {
        self.entries
            .iter()
            .find(|command| command.replay_index == Some(index))
    }

    /// Resolve the target of `replay <index>`
    pub fn resolve_replay(&self, index: usize) -> ReplayTarget {
        match self.find_by_display_index(index) {
            None => ReplayTarget::NotFound,
            Some(command) if command.verb == Verb::Replay => {
                ReplayTarget::Nested(command.clone())
            }
            Some(command) => ReplayTarget::Found(Command::parse(&command.raw_text)),
        }
    }

    /// Drop every entry and delete the history file
    pub fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        match fs::remove_file(&self.history_file) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::HistoryClearFailed {
                path: self.history_file.clone(),
                reason: e.to_string(),
            }),
        }
    }

    /// Entries, most recent first
    pub fn entries(&self) -> impl Iterator<Item = &Command> {
        self.entries.iter()
    }

    pub fn get(&self, position: usize) -> Option<&Command> {
        self.entries.get(position)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get history file path
    pub fn history_file(&self) -> &Path {
        &self.history_file
    }

    fn truncate(&mut self) {
        self.entries.truncate(self.max_size);
    }
}

/// On-disk format of the history file
///
/// One line holding every raw command text joined with `,`, newest first.
/// Commas inside a command are not escaped, so such a command comes back as
/// several entries after a reload.
pub mod codec {
    /// Entry separator
    pub const SEPARATOR: char = ',';

    /// Join raw command texts into the file content
    pub fn encode<'a, I>(entries: I) -> String
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut content = entries
            .into_iter()
            .collect::<Vec<_>>()
            .join(&SEPARATOR.to_string());
        content.push('\n');
        content
    }

    /// Split file content back into raw command texts. Every line is split
    /// on the separator; blank tokens are dropped.
    pub fn decode(content: &str) -> Vec<String> {
        content
            .lines()
            .flat_map(|line| line.split(SEPARATOR))
            .filter(|token| !token.trim().is_empty())
            .map(str::to_string)
            .collect()
    }
}
