//! Runtime session structure

use std::{fmt, time::Instant};

use serde::{Deserialize, Serialize};

use crate::catalog::{Pattern, SessionOption, Step};

/// Whether a session is in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Running,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => f.write_str("idle"),
            SessionState::Running => f.write_str("running"),
        }
    }
}

/// The step a crossfade is heading towards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingStep {
    pub index: usize,
    /// Becomes the next phase's start instant on commit
    pub started_at: Instant,
}

/// A running breathing session
///
/// Pattern and session option are snapshotted at start; changing the
/// selection afterwards only affects the next session.
#[derive(Debug, Clone)]
pub struct Session {
    pattern: &'static Pattern,
    option: &'static SessionOption,
    step_index: usize,
    pending: Option<PendingStep>,
    stop_at_cycle_end: bool,
    started_at: Instant,
    phase_started_at: Instant,
}

impl Session {
    /// Create a session at step 0 with both clocks stamped to `now`
    pub fn new(pattern: &'static Pattern, option: &'static SessionOption, now: Instant) -> Self {
        Self {
            pattern,
            option,
            step_index: 0,
            pending: None,
            stop_at_cycle_end: false,
            started_at: now,
            phase_started_at: now,
        }
    }

    pub fn pattern(&self) -> &'static Pattern {
        self.pattern
    }

    pub fn option(&self) -> &'static SessionOption {
        self.option
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn step(&self) -> &'static Step {
        self.pattern.step(self.step_index)
    }

    pub fn pending(&self) -> Option<PendingStep> {
        self.pending
    }

    pub fn is_transitioning(&self) -> bool {
        self.pending.is_some()
    }

    pub fn stop_at_cycle_end(&self) -> bool {
        self.stop_at_cycle_end
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    pub fn phase_started_at(&self) -> Instant {
        self.phase_started_at
    }

    pub(crate) fn flag_stop_at_cycle_end(&mut self) {
        self.stop_at_cycle_end = true;
    }

    /// Record the crossfade towards the following step
    pub(crate) fn set_pending(&mut self, started_at: Instant) -> PendingStep {
        let pending = PendingStep {
            index: self.pattern.next_index(self.step_index),
            started_at,
        };
        self.pending = Some(pending);
        pending
    }

    /// Make the pending step current; its start instant is the crossfade start
    pub(crate) fn advance(&mut self, pending: PendingStep) {
        self.step_index = pending.index;
        self.phase_started_at = pending.started_at;
        self.pending = None;
    }
}
