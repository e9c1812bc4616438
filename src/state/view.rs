//! Derived display state handed to the presentation layer

use serde::Serialize;

use super::SessionState;
use crate::catalog::{PatternKey, Phase, SessionKey};

/// Caption shown in place of a phase label while idle
pub const IDLE_CAPTION: &str = "Take a breath";

/// Snapshot of everything the presentation layer renders
///
/// Produced by [`Coach::view`](super::Coach::view); never stored by the core.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoachView {
    pub state: SessionState,
    /// Pattern being displayed: the active one while running, the selected one while idle
    pub pattern: PatternKey,
    pub session: SessionKey,
    pub selected_pattern: PatternKey,
    pub selected_session: SessionKey,
    pub is_continuous: bool,
    pub step_index: usize,
    pub phase: Phase,
    pub phase_label: &'static str,
    pub countdown: u32,
    pub is_transitioning: bool,
    pub next_phase: Phase,
    pub next_phase_label: &'static str,
    pub next_countdown: u32,
    pub phase_progress: f64,
    pub ring_progress: f64,
    pub session_remaining_secs: Option<u64>,
    pub stop_at_cycle_end: bool,
}

impl CoachView {
    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    /// Label for the single start/stop control
    pub fn primary_action_label(&self) -> &'static str {
        if self.is_running() {
            "Stop"
        } else {
            "Start"
        }
    }

    pub fn caption(&self) -> &'static str {
        if self.is_running() {
            self.phase_label
        } else {
            IDLE_CAPTION
        }
    }

    pub fn next_caption(&self) -> &'static str {
        if self.is_running() {
            self.next_phase_label
        } else {
            IDLE_CAPTION
        }
    }
}
