//! Error types and Result aliases for mysh

use std::fmt;
use std::path::PathBuf;

/// Result type alias for mysh operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for mysh
///
/// The `Display` text of the command-level variants is what the interpreter
/// prints to the console, so it is kept short and user facing.
#[derive(Debug)]
pub enum Error {
    // === Command errors ===
    /// Unknown verb, wrong arity or malformed argument
    InvalidCommand {
        command: String,
        reason: String,
    },

    /// Target of `movetodir` is not an existing directory
    DirectoryNotFound {
        target: String,
    },

    /// Program image could not be launched
    SpawnFailed {
        program: String,
        reason: String,
    },

    /// Foreground child could not be waited on
    WaitFailed {
        program: String,
        reason: String,
    },

    /// Replay targeted a stored replay command
    ReplayOfReplay {
        command: String,
    },

    /// Replay chain went deeper than allowed
    ReplayDepthExceeded {
        depth: usize,
    },

    // === Process errors ===
    /// Failed to send signal to process
    SignalSendFailed {
        pid: u32,
        signal: String,
        reason: String,
    },

    // === History errors ===
    /// Failed to read the persisted history file
    HistoryLoadFailed {
        path: PathBuf,
        reason: String,
    },

    /// Failed to write the persisted history file
    HistorySaveFailed {
        path: PathBuf,
        reason: String,
    },

    /// Failed to delete the persisted history file
    HistoryClearFailed {
        path: PathBuf,
        reason: String,
    },

    // === Configuration errors ===
    /// Configuration file not found
    ConfigNotFound,

    /// Failed to load configuration file
    ConfigLoadFailed {
        path: PathBuf,
        reason: String,
    },

    /// Failed to parse configuration
    ConfigParseFailed {
        format: String,
        reason: String,
    },

    /// Failed to serialize configuration
    ConfigSerializationFailed {
        format: String,
        reason: String,
    },

    /// Configuration validation failed
    ConfigValidationFailed {
        field: String,
        reason: String,
    },

    // === I/O and serialization errors ===
    /// I/O errors
    Io(std::io::Error),

    /// Serialization errors
    Serde(serde_json::Error),

    /// TOML parsing errors
    Toml(toml::de::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Command errors
            Error::InvalidCommand { command, .. } => {
                write!(f, "Invalid command: {}", command)
            }
            Error::DirectoryNotFound { target } => {
                write!(f, "Directory {}: not found", target)
            }
            Error::SpawnFailed { program, .. } => {
                write!(f, "Could not open: {}", program)
            }
            Error::WaitFailed { program, reason } => {
                write!(f, "Lost track of '{}': {}", program, reason)
            }
            Error::ReplayOfReplay { command } => {
                write!(f, "Invalid command: replay of replay ({})", command)
            }
            Error::ReplayDepthExceeded { depth } => {
                write!(f, "Invalid command: replay nested deeper than {}", depth)
            }

            // Process errors
            Error::SignalSendFailed { pid, signal, reason } => {
                write!(f, "Failed to send {} to PID {}: {}", signal, pid, reason)
            }

            // History errors
            Error::HistoryLoadFailed { path, reason } => {
                write!(f, "Failed to load history from '{}': {}", path.display(), reason)
            }
            Error::HistorySaveFailed { path, reason } => {
                write!(f, "Failed to save history to '{}': {}", path.display(), reason)
            }
            Error::HistoryClearFailed { path, reason } => {
                write!(f, "Failed to remove history file '{}': {}", path.display(), reason)
            }

            // Configuration errors
            Error::ConfigNotFound => {
                write!(f, "Configuration file not found")
            }
            Error::ConfigLoadFailed { path, reason } => {
                write!(f, "Failed to load config from '{}': {}", path.display(), reason)
            }
            Error::ConfigParseFailed { format, reason } => {
                write!(f, "Failed to parse {} config: {}", format, reason)
            }
            Error::ConfigSerializationFailed { format, reason } => {
                write!(f, "Failed to serialize config as {}: {}", format, reason)
            }
            Error::ConfigValidationFailed { field, reason } => {
                write!(f, "Configuration validation failed for '{}': {}", field, reason)
            }

            // I/O and serialization errors
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::Serde(err) => write!(f, "Serialization error: {}", err),
            Error::Toml(err) => write!(f, "TOML parsing error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Serde(err) => Some(err),
            Error::Toml(err) => Some(err),
            _ => None,
        }
    }
}

impl Error {
    /// Whether this error belongs to a single command and the loop may go on
    pub fn is_command_failure(&self) -> bool {
        matches!(
            self,
            Error::InvalidCommand { .. }
                | Error::DirectoryNotFound { .. }
                | Error::SpawnFailed { .. }
                | Error::WaitFailed { .. }
                | Error::ReplayOfReplay { .. }
                | Error::ReplayDepthExceeded { .. }
                | Error::SignalSendFailed { .. }
                | Error::HistoryClearFailed { .. }
        )
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serde(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Toml(err)
    }
}
