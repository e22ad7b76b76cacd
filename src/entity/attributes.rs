//! Trainable numeric attributes
//!
//! Every attribute stores a long-lived `base` value and a `current` value
//! that temporary effects may push away from it. Training slowly raises the
//! base through accumulated experience with diminishing returns: the cost of
//! the next point grows with the base.
//!
//! Out-of-range values are never errors; every setter clamps. This keeps the
//! per-tick hot path allocation- and error-free.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::ecs::component::Component;

pub const ATTRIBUTE_MIN: i32 = 0;
pub const ATTRIBUTE_MAX: i32 = 5000;

/// Base value assigned when training touches an unknown attribute
pub const ATTRIBUTE_DEFAULT: i32 = 1000;

/// Flat experience cost of the first training increment
const TRAIN_BASE_COST: u32 = 500;

/// Extra cost per 200 points of base, making high attributes slow to raise
const TRAIN_COST_STEP: u32 = 100;

fn clamp(value: i32) -> i32 {
    value.clamp(ATTRIBUTE_MIN, ATTRIBUTE_MAX)
}

/// One attribute's stored state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeScore {
    base: i32,
    current: i32,
    experience: u32,
}

impl AttributeScore {
    fn with_base(base: i32) -> Self {
        let base = clamp(base);
        Self {
            base,
            current: base,
            experience: 0,
        }
    }

    pub fn base(&self) -> i32 {
        self.base
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn experience(&self) -> u32 {
        self.experience
    }
}

/// An entity's attribute map, keyed by attribute name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Attributes {
    scores: AHashMap<String, AttributeScore>,
}

impl Component for Attributes {}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of the named attribute; 0 if unknown
    pub fn get(&self, name: &str) -> i32 {
        self.scores.get(name).map(|s| s.current).unwrap_or(0)
    }

    /// Set the current value (clamped), representing a temporary effect
    ///
    /// An unknown attribute is created with its base at the clamped value, so
    /// the first `set` establishes the baseline rather than recording drift.
    pub fn set(&mut self, name: &str, value: i32) {
        let value = clamp(value);
        match self.scores.get_mut(name) {
            Some(score) => score.current = value,
            None => {
                self.scores
                    .insert(name.to_string(), AttributeScore::with_base(value));
            }
        }
    }

    /// Base value of the named attribute; 0 if unknown
    pub fn base(&self, name: &str) -> i32 {
        self.scores.get(name).map(|s| s.base).unwrap_or(0)
    }

    /// Set the base value directly; the current value is forced to match
    ///
    /// Drift between current and base only ever comes from `set`.
    pub fn set_base(&mut self, name: &str, value: i32) {
        let value = clamp(value);
        match self.scores.get_mut(name) {
            Some(score) => {
                score.base = value;
                score.current = value;
            }
            None => {
                self.scores
                    .insert(name.to_string(), AttributeScore::with_base(value));
            }
        }
    }

    /// Adjust the current value by a delta (clamped)
    pub fn modify(&mut self, name: &str, delta: i32) {
        self.set(name, self.get(name).saturating_add(delta));
    }

    /// Experience cost of the next +1 to base at the given base value
    pub fn training_cost(base: i32) -> u32 {
        TRAIN_BASE_COST + (base / 200).max(0) as u32 * TRAIN_COST_STEP
    }

    /// Feed training experience into an attribute
    ///
    /// An unknown attribute is lazily created at the default base. Experience
    /// accumulates within the attribute only; once it reaches the training
    /// cost, base (and current, to preserve any temporary delta) gain +1 and
    /// the accumulator resets to 0. At most one increment per call.
    ///
    /// Returns true iff an increment occurred.
    pub fn train(&mut self, name: &str, exp: u32) -> bool {
        let score = self
            .scores
            .entry(name.to_string())
            .or_insert_with(|| AttributeScore::with_base(ATTRIBUTE_DEFAULT));

        score.experience = score.experience.saturating_add(exp);
        let cost = Self::training_cost(score.base);
        if score.experience >= cost && score.base < ATTRIBUTE_MAX {
            score.base += 1;
            score.current = clamp(score.current + 1);
            score.experience = 0;
            true
        } else {
            false
        }
    }

    /// Snap every current value back to its base
    ///
    /// Invoked once per tick (or on demand) to clear transient modifiers
    /// before re-applying them.
    pub fn reset_temporary_effects(&mut self) {
        for score in self.scores.values_mut() {
            score.current = score.base;
        }
    }

    /// Textual tier for the named attribute's current value
    ///
    /// Unknown names degrade to the neutral tier rather than failing.
    pub fn describe(&self, name: &str) -> &'static str {
        let value = match self.scores.get(name) {
            Some(score) => score.current,
            None => return "average",
        };
        match value {
            v if v >= 2500 => "superior",
            v if v >= 2000 => "very high",
            v if v >= 1500 => "high",
            v if v >= 1250 => "above average",
            v if v >= 750 => "average",
            v if v >= 500 => "low",
            v if v >= 250 => "very low",
            _ => "abysmal",
        }
    }

    pub fn score(&self, name: &str) -> Option<&AttributeScore> {
        self.scores.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeScore)> {
        self.scores.iter().map(|(n, s)| (n.as_str(), s))
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}
