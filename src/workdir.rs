//! The interpreter's own notion of the current directory
//!
//! `movetodir` never touches the process working directory; it only moves
//! this tracker, which `whereami` prints and single-token programs are
//! resolved against.

use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};

/// Current directory as the shell believes it, always ending in `/`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingDirectory {
    current: String,
}

impl WorkingDirectory {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            current: with_separator(path.into()),
        }
    }

    /// Start from the process working directory
    pub fn from_process() -> Result<Self> {
        let cwd = std::env::current_dir()?;
        Ok(Self::new(cwd.to_string_lossy().into_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.current
    }

    /// Resolve a `movetodir` target. Absolute (`/`) and explicitly relative
    /// (`.`) targets are taken literally, anything else is appended to the
    /// current directory.
    pub fn resolve(&self, target: &str) -> String {
        if target.starts_with('/') || target.starts_with('.') {
            target.to_string()
        } else {
            format!("{}{}", self.current, target)
        }
    }

    /// Move to `target` if it names an existing directory. On failure the
    /// current value is left alone.
    pub fn move_to(&mut self, target: &str) -> Result<&str> {
        let resolved = self.resolve(target);
        if !Path::new(&resolved).is_dir() {
            return Err(Error::DirectoryNotFound {
                target: target.to_string(),
            });
        }

        self.current = with_separator(resolved);
        debug!("Working directory is now {}", self.current);
        Ok(&self.current)
    }

    /// Program path for `start`/`background`. A lone program name runs from
    /// the current directory; with arguments the name is used verbatim and
    /// left to the search path.
    pub fn resolve_program(&self, argv: &[String]) -> String {
        match argv {
            [program] if program.starts_with('/') => program.clone(),
            [program] => format!("{}{}", self.current, program),
            [program, ..] => program.clone(),
            [] => String::new(),
        }
    }
}

impl fmt::Display for WorkingDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.current)
    }
}

fn with_separator(mut path: String) -> String {
    if !path.ends_with('/') {
        path.push('/');
    }
    path
}
