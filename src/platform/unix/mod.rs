//! Unix-specific platform implementations

mod paths;
mod signals;

pub use paths::UnixPaths;
pub use signals::UnixSignals;
