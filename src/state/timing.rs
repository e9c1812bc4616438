//! Countdown and progress math
//!
//! Every value here is derived from a start instant and the current instant,
//! never accumulated, so repeated sampling cannot drift.

use std::time::{Duration, Instant};

/// Length of the crossfade between two phases
pub const FADE: Duration = Duration::from_millis(500);

/// Cadence of the periodic sampler while a session runs
pub const SAMPLE_PERIOD: Duration = Duration::from_millis(50);

/// Time since `started_at`, zero if unset or in the future
pub fn elapsed_since(started_at: Option<Instant>, now: Instant) -> Duration {
    started_at
        .map(|start| now.saturating_duration_since(start))
        .unwrap_or(Duration::ZERO)
}

/// Whole seconds left in a phase, counting down from `duration_secs` to 1
pub fn countdown(duration_secs: u32, started_at: Option<Instant>, now: Instant) -> u32 {
    let Some(start) = started_at else {
        return duration_secs;
    };

    let elapsed_ms = now.saturating_duration_since(start).as_millis();
    let remaining_ms = (u128::from(duration_secs) * 1000).saturating_sub(elapsed_ms);
    let whole = (remaining_ms / 1000 + 1).min(u128::from(duration_secs)) as u32;

    whole.max(1)
}

/// Fraction of the phase that has elapsed, in `[0, 1]`
pub fn phase_progress(duration: Duration, started_at: Option<Instant>, now: Instant) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }

    let elapsed = elapsed_since(started_at, now);
    (elapsed.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0)
}

/// Session time left before the total is used up
pub fn session_remaining(total: Duration, started_at: Option<Instant>, now: Instant) -> Duration {
    total.saturating_sub(elapsed_since(started_at, now))
}

/// Fraction of the session still remaining, `None` for continuous sessions
pub fn session_progress(
    total: Option<Duration>,
    started_at: Option<Instant>,
    now: Instant,
) -> Option<f64> {
    let total = total?;
    if total.is_zero() {
        return Some(0.0);
    }

    let remaining = session_remaining(total, started_at, now);
    Some((remaining.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0))
}

/// Whole seconds left in the session, rounded up
pub fn remaining_secs_ceil(remaining: Duration) -> u64 {
    let ms = remaining.as_millis() as u64;
    ms.div_ceil(1000)
}

/// How far into a phase the crossfade to the next one begins
pub fn transition_lead(duration: Duration) -> Duration {
    duration.saturating_sub(FADE)
}

/// Inputs for [`ring_progress`]
#[derive(Debug, Clone, Copy)]
pub struct RingInputs {
    pub running: bool,
    pub continuous: bool,
    pub stop_at_cycle_end: bool,
    pub phase_progress: f64,
    pub session_progress: Option<f64>,
}

/// Fill fraction of the progress ring
///
/// Idle shows a full ring. Continuous sessions deplete the ring once per
/// phase, timed sessions deplete it across the whole session and hold it
/// empty while the last cycle finishes.
pub fn ring_progress(inputs: RingInputs) -> f64 {
    if !inputs.running {
        1.0
    } else if inputs.continuous {
        inputs.phase_progress
    } else if inputs.stop_at_cycle_end {
        0.0
    } else {
        inputs.session_progress.unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Pattern;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn countdown_starts_at_duration() {
        let start = Instant::now();

        assert_eq!(countdown(4, Some(start), start), 4);
        assert_eq!(countdown(4, None, start + ms(2500)), 4);
    }

    #[test]
    fn countdown_ticks_on_whole_seconds() {
        let start = Instant::now();

        assert_eq!(countdown(4, Some(start), start + ms(999)), 4);
        assert_eq!(countdown(4, Some(start), start + ms(1000)), 4);
        assert_eq!(countdown(4, Some(start), start + ms(1001)), 3);
        assert_eq!(countdown(4, Some(start), start + ms(3500)), 1);
    }

    #[test]
    fn countdown_never_reaches_zero() {
        let start = Instant::now();

        assert_eq!(countdown(4, Some(start), start + ms(4000)), 1);
        assert_eq!(countdown(4, Some(start), start + ms(60_000)), 1);
    }

    #[test]
    fn countdown_ignores_future_start() {
        let now = Instant::now();

        assert_eq!(countdown(7, Some(now + ms(300)), now), 7);
    }

    #[test]
    fn countdown_bounded_and_monotonic_for_all_steps() {
        let start = Instant::now();

        for pattern in Pattern::all() {
            for step in pattern.steps {
                let mut previous = step.duration_secs;
                for offset in (0..(step.duration_secs as u64 * 1000 + 2000)).step_by(50) {
                    let value = countdown(step.duration_secs, Some(start), start + ms(offset));
                    assert!((1..=step.duration_secs).contains(&value));
                    assert!(value <= previous);
                    previous = value;
                }
            }
        }
    }

    #[test]
    fn phase_progress_is_clamped() {
        let start = Instant::now();
        let duration = Duration::from_secs(4);

        assert_eq!(phase_progress(duration, None, start), 0.0);
        assert_eq!(phase_progress(duration, Some(start), start + ms(1000)), 0.25);
        assert_eq!(phase_progress(duration, Some(start), start + ms(9000)), 1.0);
    }

    #[test]
    fn session_progress_depletes() {
        let start = Instant::now();
        let total = Some(Duration::from_secs(60));

        assert_eq!(session_progress(None, Some(start), start), None);
        assert_eq!(session_progress(total, Some(start), start), Some(1.0));
        assert_eq!(session_progress(total, Some(start), start + ms(15_000)), Some(0.75));
        assert_eq!(session_progress(total, Some(start), start + ms(75_000)), Some(0.0));
        assert_eq!(session_progress(Some(Duration::ZERO), Some(start), start), Some(0.0));
    }

    #[test]
    fn remaining_secs_round_up() {
        assert_eq!(remaining_secs_ceil(ms(0)), 0);
        assert_eq!(remaining_secs_ceil(ms(1)), 1);
        assert_eq!(remaining_secs_ceil(ms(59_001)), 60);
    }

    #[test]
    fn transition_lead_saturates() {
        assert_eq!(transition_lead(Duration::from_secs(4)), ms(3500));
        assert_eq!(transition_lead(ms(300)), Duration::ZERO);
    }

    #[test]
    fn ring_follows_session_kind() {
        let base = RingInputs {
            running: true,
            continuous: false,
            stop_at_cycle_end: false,
            phase_progress: 0.3,
            session_progress: Some(0.6),
        };

        assert_eq!(ring_progress(RingInputs { running: false, ..base }), 1.0);
        let continuous = RingInputs {
            continuous: true,
            session_progress: None,
            ..base
        };
        assert_eq!(ring_progress(continuous), 0.3);
        assert_eq!(ring_progress(RingInputs { stop_at_cycle_end: true, ..base }), 0.0);
        assert_eq!(ring_progress(base), 0.6);
    }
}
