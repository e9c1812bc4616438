//! State management module
//!
//! This module contains the session timer core: the runtime session, the
//! countdown/progress math and the derived view.

pub mod coach;
pub mod session;
pub mod timing;
pub mod view;

// Re-export main types
pub use coach::{Coach, CommitOutcome, TickOutcome};
pub use session::{PendingStep, Session, SessionState};
pub use view::CoachView;
