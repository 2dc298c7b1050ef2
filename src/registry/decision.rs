//! Decision source for the method-selection step
//!
//! The registry flips delivery methods at random to exercise client-side
//! handling of method-change notifications. The draw sits behind
//! [`DecisionSource`] so tests and demos can script it deterministically.

use rand::Rng;

/// Source of boolean draws for the method-selection step
pub trait DecisionSource {
    /// Draw a boolean that is `true` with the given probability
    fn decide(&mut self, probability: f64) -> bool;
}

/// Default source backed by the thread-local RNG
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngDecision;

impl DecisionSource for ThreadRngDecision {
    fn decide(&mut self, probability: f64) -> bool {
        rand::thread_rng().gen_bool(probability.clamp(0.0, 1.0))
    }
}

/// Replays a fixed sequence of decisions
///
/// Once the script runs out the last decision repeats; an empty script
/// always decides `false`.
#[derive(Debug, Clone)]
pub struct SequenceDecision {
    script: Vec<bool>,
    next: usize,
}

impl SequenceDecision {
    /// Create a source that replays `script` in order
    pub fn new(script: impl Into<Vec<bool>>) -> Self {
        Self {
            script: script.into(),
            next: 0,
        }
    }
}

impl DecisionSource for SequenceDecision {
    fn decide(&mut self, _probability: f64) -> bool {
        let decision = self
            .script
            .get(self.next)
            .or_else(|| self.script.last())
            .copied()
            .unwrap_or(false);
        if self.next < self.script.len() {
            self.next += 1;
        }
        decision
    }
}
