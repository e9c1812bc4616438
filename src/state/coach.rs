//! Session timer core
//!
//! Owns the selector state and the running session. All mutation goes through
//! [`Coach::start`], [`Coach::stop`], [`Coach::tick`] and
//! [`Coach::commit_transition`]; everything displayed is recomputed by
//! [`Coach::view`] from stored instants and the current instant.

use std::time::Instant;

use tracing::{debug, info};

use super::{
    timing::{self, RingInputs},
    CoachView, PendingStep, Session, SessionState,
};
use crate::catalog::{PatternKey, SessionKey};

/// What a tick changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickOutcome {
    /// The session ran out of time and will end at the next cycle boundary
    pub flagged_stop: bool,
    /// A crossfade began; its commit must be scheduled [`timing::FADE`] from now
    pub transition: Option<PendingStep>,
}

/// Result of committing a crossfade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The pending step became current
    Advanced { step_index: usize },
    /// The cycle wrapped after the session ran out of time; the session is over
    Completed,
    /// Nothing was pending
    Ignored,
}

#[derive(Debug, Clone)]
pub struct Coach {
    selected_pattern: PatternKey,
    selected_session: SessionKey,
    session: Option<Session>,
}

impl Coach {
    pub fn new(pattern: PatternKey, session: SessionKey) -> Self {
        Self {
            selected_pattern: pattern,
            selected_session: session,
            session: None,
        }
    }

    /// Select the pattern for the next session
    pub fn set_selected_pattern(&mut self, key: PatternKey) {
        debug!("Selected pattern: {}", key);
        self.selected_pattern = key;
    }

    /// Select the session length for the next session
    pub fn set_selected_session(&mut self, key: SessionKey) {
        debug!("Selected session length: {}", key);
        self.selected_session = key;
    }

    pub fn state(&self) -> SessionState {
        if self.session.is_some() {
            SessionState::Running
        } else {
            SessionState::Idle
        }
    }

    pub fn is_running(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Start a fresh session from the current selection, replacing any running one
    pub fn start(&mut self, now: Instant) -> &Session {
        let pattern = self.selected_pattern.pattern();
        let option = self.selected_session.option();
        info!("Starting session: pattern={}, length={}", pattern.label, option.label);

        self.session.insert(Session::new(pattern, option, now))
    }

    /// Return to idle. Returns whether a session was running.
    pub fn stop(&mut self) -> bool {
        let was_running = self.session.take().is_some();
        if was_running {
            info!("Session stopped");
        }
        was_running
    }

    /// Start if idle, stop if running; returns the resulting state
    pub fn primary_action(&mut self, now: Instant) -> SessionState {
        if self.is_running() {
            self.stop();
        } else {
            self.start(now);
        }
        self.state()
    }

    /// Apply the time-driven rules: stop flagging and crossfade triggering
    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        let Some(session) = self.session.as_mut() else {
            return outcome;
        };

        if let Some(total) = session.option().total() {
            let remaining = timing::session_remaining(total, Some(session.started_at()), now);
            if remaining.is_zero() && !session.stop_at_cycle_end() {
                session.flag_stop_at_cycle_end();
                outcome.flagged_stop = true;
            }
        }

        if !session.is_transitioning() {
            let lead = timing::transition_lead(session.step().duration());
            let elapsed = timing::elapsed_since(Some(session.phase_started_at()), now);
            if elapsed >= lead {
                outcome.transition = Some(Self::begin_transition(session));
            }
        }

        outcome
    }

    /// Begin the crossfade into the following step
    ///
    /// The transition start is the phase's nominal fade point rather than the
    /// sample instant, so sampling jitter never accumulates across phases.
    fn begin_transition(session: &mut Session) -> PendingStep {
        let lead = timing::transition_lead(session.step().duration());
        let pending = session.set_pending(session.phase_started_at() + lead);
        debug!(
            "Crossfade {} -> {} (step {} -> {})",
            session.step().phase,
            session.pattern().step(pending.index).phase,
            session.step_index(),
            pending.index
        );
        pending
    }

    /// Finish the crossfade started by the last tick
    pub fn commit_transition(&mut self) -> CommitOutcome {
        let Some(session) = self.session.as_mut() else {
            return CommitOutcome::Ignored;
        };
        let Some(pending) = session.pending() else {
            return CommitOutcome::Ignored;
        };

        if pending.index == 0 && session.stop_at_cycle_end() {
            self.session = None;
            info!("Session complete");
            return CommitOutcome::Completed;
        }

        session.advance(pending);
        debug!("Advanced to step {} ({})", pending.index, session.step().phase);
        CommitOutcome::Advanced {
            step_index: pending.index,
        }
    }

    /// Project the stored state onto display values at `now`
    pub fn view(&self, now: Instant) -> CoachView {
        let session = self.session.as_ref();
        let (pattern, option) = match session {
            Some(session) => (session.pattern(), session.option()),
            None => (self.selected_pattern.pattern(), self.selected_session.option()),
        };

        let step_index = session.map_or(0, Session::step_index);
        let step = pattern.step(step_index);
        let phase_start = session.map(Session::phase_started_at);
        let countdown = timing::countdown(step.duration_secs, phase_start, now);

        let pending = session.and_then(Session::pending);
        let (next_phase, next_countdown) = match pending {
            Some(pending) => {
                let next = pattern.step(pending.index);
                let next_countdown =
                    timing::countdown(next.duration_secs, Some(pending.started_at), now);
                (next.phase, next_countdown)
            }
            None => (step.phase, countdown),
        };

        let session_start = session.map(Session::started_at);
        let phase_progress = timing::phase_progress(step.duration(), phase_start, now);
        let session_progress = timing::session_progress(option.total(), session_start, now);
        let session_remaining_secs = option
            .total()
            .map(|total| timing::session_remaining(total, session_start, now))
            .map(timing::remaining_secs_ceil);
        let stop_at_cycle_end = session.is_some_and(Session::stop_at_cycle_end);

        let ring_progress = timing::ring_progress(RingInputs {
            running: session.is_some(),
            continuous: option.is_continuous(),
            stop_at_cycle_end,
            phase_progress,
            session_progress,
        });

        CoachView {
            state: self.state(),
            pattern: pattern.key,
            session: option.key,
            selected_pattern: self.selected_pattern,
            selected_session: self.selected_session,
            is_continuous: option.is_continuous(),
            step_index,
            phase: step.phase,
            phase_label: step.phase.label(),
            countdown,
            is_transitioning: pending.is_some(),
            next_phase,
            next_phase_label: next_phase.label(),
            next_countdown,
            phase_progress,
            ring_progress,
            session_remaining_secs,
            stop_at_cycle_end,
        }
    }
}
