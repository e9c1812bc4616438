//! Breathing patterns and the phase steps they are made of

use std::{fmt, time::Duration};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// A single breathing phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Inhale,
    Hold,
    Exhale,
}

impl Phase {
    /// Label shown to the user for this phase
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Inhale => "Inhale",
            Phase::Hold => "Hold",
            Phase::Exhale => "Exhale",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One timed phase inside a pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Step {
    pub phase: Phase,
    pub duration_secs: u32,
}

impl Step {
    /// Build a step. Zero-length steps are rejected at compile time for static data.
    pub const fn new(phase: Phase, duration_secs: u32) -> Self {
        assert!(duration_secs > 0, "step duration must be positive");
        Self {
            phase,
            duration_secs,
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.duration_secs))
    }
}

/// Identifier of a predefined pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum PatternKey {
    #[serde(rename = "box")]
    #[value(name = "box")]
    Box,
    #[serde(rename = "478")]
    #[value(name = "478")]
    FourSevenEight,
    #[serde(rename = "calm")]
    #[value(name = "calm")]
    Calm,
}

impl PatternKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternKey::Box => "box",
            PatternKey::FourSevenEight => "478",
            PatternKey::Calm => "calm",
        }
    }

    /// The static pattern this key names
    pub fn pattern(&self) -> &'static Pattern {
        Pattern::get(*self)
    }
}

impl fmt::Display for PatternKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ordered, non-empty cycle of breathing steps
#[derive(Debug, Serialize)]
pub struct Pattern {
    pub key: PatternKey,
    pub label: &'static str,
    pub steps: &'static [Step],
}

const BOX_STEPS: &[Step] = &[
    Step::new(Phase::Inhale, 4),
    Step::new(Phase::Hold, 4),
    Step::new(Phase::Exhale, 4),
    Step::new(Phase::Hold, 4),
];

const FOUR_SEVEN_EIGHT_STEPS: &[Step] = &[
    Step::new(Phase::Inhale, 4),
    Step::new(Phase::Hold, 7),
    Step::new(Phase::Exhale, 8),
];

const CALM_STEPS: &[Step] = &[Step::new(Phase::Inhale, 5), Step::new(Phase::Exhale, 5)];

static PATTERNS: [Pattern; 3] = [
    Pattern::new(PatternKey::Box, "Box (4-4-4-4)", BOX_STEPS),
    Pattern::new(PatternKey::FourSevenEight, "4-7-8", FOUR_SEVEN_EIGHT_STEPS),
    Pattern::new(PatternKey::Calm, "Calm (5 in, 5 out)", CALM_STEPS),
];

impl Pattern {
    const fn new(key: PatternKey, label: &'static str, steps: &'static [Step]) -> Self {
        assert!(!steps.is_empty(), "pattern must have at least one step");
        Self { key, label, steps }
    }

    /// Look up a predefined pattern
    pub fn get(key: PatternKey) -> &'static Pattern {
        match key {
            PatternKey::Box => &PATTERNS[0],
            PatternKey::FourSevenEight => &PATTERNS[1],
            PatternKey::Calm => &PATTERNS[2],
        }
    }

    /// Every predefined pattern, in selector order
    pub fn all() -> &'static [Pattern] {
        &PATTERNS
    }

    /// Step at `index`, clamped to the last step
    pub fn step(&self, index: usize) -> &Step {
        &self.steps[index.min(self.steps.len() - 1)]
    }

    /// Index following `index`, wrapping to 0 after the last step
    pub fn next_index(&self, index: usize) -> usize {
        let next = index + 1;
        if next >= self.steps.len() {
            0
        } else {
            next
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_matches_key() {
        for pattern in Pattern::all() {
            assert_eq!(Pattern::get(pattern.key).key, pattern.key);
            assert_eq!(pattern.key.pattern().label, pattern.label);
        }
    }

    #[test]
    fn patterns_have_positive_steps() {
        for pattern in Pattern::all() {
            assert!(!pattern.steps.is_empty());
            assert!(pattern.steps.iter().all(|s| s.duration_secs > 0));
        }
    }

    #[test]
    fn box_pattern_shape() {
        let pattern = Pattern::get(PatternKey::Box);
        let phases: Vec<Phase> = pattern.steps.iter().map(|s| s.phase).collect();

        assert_eq!(phases, vec![Phase::Inhale, Phase::Hold, Phase::Exhale, Phase::Hold]);
        assert!(pattern.steps.iter().all(|s| s.duration() == Duration::from_secs(4)));
    }

    #[test]
    fn next_index_wraps() {
        let pattern = Pattern::get(PatternKey::FourSevenEight);

        assert_eq!(pattern.next_index(0), 1);
        assert_eq!(pattern.next_index(1), 2);
        assert_eq!(pattern.next_index(2), 0);
    }

    #[test]
    fn step_is_clamped() {
        let pattern = Pattern::get(PatternKey::Calm);

        assert_eq!(pattern.step(7).phase, Phase::Exhale);
    }

    #[test]
    fn key_serializes_as_identifier() {
        assert_eq!(serde_json::to_string(&PatternKey::FourSevenEight).unwrap(), "\"478\"");
        assert_eq!(PatternKey::from_str("CALM", true).unwrap(), PatternKey::Calm);
    }
}
