//! Platform-specific operation traits

use crate::error::Result;
use std::path::PathBuf;

/// Platform-specific signal operations
#[async_trait::async_trait]
pub trait SignalOps: Send + Sync {
    /// Send a termination signal (graceful shutdown)
    async fn send_terminate(&self, pid: u32) -> Result<()>;
}

/// Platform-specific path operations
pub trait PathOps: Send + Sync {
    /// Get configuration directory
    fn config_dir(&self) -> Result<PathBuf>;

    /// Get the user's home directory
    fn home_dir(&self) -> Option<PathBuf>;
}
