//! Static catalog module
//!
//! Predefined breathing patterns and session lengths used to populate the
//! selectors. Everything in here is immutable.

pub mod pattern;
pub mod session_option;

use serde::Serialize;

pub use pattern::{Pattern, PatternKey, Phase, Step};
pub use session_option::{SessionKey, SessionOption};

/// Every selectable pattern and session length
#[derive(Debug, Serialize)]
pub struct Catalog {
    pub patterns: &'static [Pattern],
    pub sessions: &'static [SessionOption],
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            patterns: Pattern::all(),
            sessions: SessionOption::all(),
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}
