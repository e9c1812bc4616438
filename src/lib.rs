//! Breath Coach - a guided breathing timer
//!
//! This library provides the session timer core that turns elapsed time into
//! breathing phases, countdowns and progress, together with the event loop
//! that samples it and a small terminal front end.

pub mod catalog;
pub mod config;
pub mod state;
pub mod tasks;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use catalog::{Catalog, PatternKey, SessionKey};
pub use config::Config;
pub use state::{Coach, CoachView, SessionState};
pub use tasks::{Command, DriverHandle, SessionDriver};
pub use utils::signals::shutdown_signal;
