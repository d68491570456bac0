//! Unix path operations

use crate::error::{Error, Result};
use crate::platform::traits::PathOps;
use std::path::PathBuf;

pub struct UnixPaths;

impl UnixPaths {
    pub fn new() -> Self {
        Self
    }
}

impl PathOps for UnixPaths {
    fn config_dir(&self) -> Result<PathBuf> {
        // Use XDG_CONFIG_HOME if set, otherwise ~/.config
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            Ok(PathBuf::from(xdg_config))
        } else if let Some(config_dir) = dirs::config_dir() {
            Ok(config_dir)
        } else if let Some(home) = dirs::home_dir() {
            Ok(home.join(".config"))
        } else {
            Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config directory",
            )))
        }
    }

    fn home_dir(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }
}
