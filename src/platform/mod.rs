//! Platform abstraction layer
//!
//! Signal delivery and well-known directories sit behind small traits so the
//! supervisor and the config loader can be exercised with fakes in tests.

mod traits;
#[cfg(unix)]
mod unix;

pub use traits::*;

/// Platform implementation factory
pub struct Platform;

impl Platform {
    /// Get the platform-specific signal operations
    pub fn signals() -> Box<dyn SignalOps> {
        #[cfg(unix)]
        {
            Box::new(unix::UnixSignals::new())
        }

        #[cfg(not(unix))]
        {
            compile_error!("Unsupported platform");
        }
    }

    /// Get the platform-specific path operations
    pub fn paths() -> Box<dyn PathOps> {
        #[cfg(unix)]
        {
            Box::new(unix::UnixPaths::new())
        }

        #[cfg(not(unix))]
        {
            compile_error!("Unsupported platform");
        }
    }
}
