//! Background tasks module
//!
//! This module contains the session driver and the timer tasks it owns.

pub mod commit_timer;
pub mod driver;
pub mod sampler;

// Re-export main types
pub use driver::{Command, DriverHandle, SessionDriver};

/// Current instant on the runtime clock, which tests can pause and advance
pub(crate) fn now() -> std::time::Instant {
    tokio::time::Instant::now().into_std()
}
