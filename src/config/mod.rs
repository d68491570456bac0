//! Configuration management for mysh
//!
//! Configuration is optional: every field has a default and a file only
//! needs to name what it changes. See [`loader`] for where files are looked
//! up and how they are validated.

pub mod loader;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::history::{DEFAULT_HISTORY_FILE, MAX_HISTORY_ENTRIES};

/// Main configuration structure for mysh
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Console configuration
    pub shell: ShellConfig,

    /// History persistence configuration
    pub history: HistoryConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Console-related configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Text printed before each read
    pub prompt: String,

    /// Print the welcome banner at startup
    pub show_banner: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: "# ".to_string(),
            show_banner: true,
        }
    }
}

/// History persistence configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// History file; relative paths are taken from the process working
    /// directory
    pub file: PathBuf,

    /// Maximum number of entries kept
    pub max_entries: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from(DEFAULT_HISTORY_FILE),
            max_entries: MAX_HISTORY_ENTRIES,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `tracing` filter when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}
