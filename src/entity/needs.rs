//! Decaying needs that drive entity behavior
//!
//! Each need is a scalar that drifts downward over time and is snapped back
//! to its maximum when satisfied. The whole set of needs aggregates into a
//! single "focus" score used as a global performance modifier.
//!
//! The seven value breakpoints below are the semantic backbone of the model:
//! the focus contribution and the textual classification MUST use identical
//! thresholds, since they encode the same scale.

use serde::{Deserialize, Serialize};

use crate::core::types::Tick;
use crate::ecs::component::Component;

/// Lowest representable need value; decay clamps here
pub const NEED_VALUE_FLOOR: f64 = -100_000.0;

/// Focus score of an entity with no needs at all (neutral by convention)
pub const NEUTRAL_FOCUS: i64 = 100;

/// Broad grouping of needs, used by inspection layers to display them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NeedCategory {
    Physiological,
    Safety,
    Social,
    Esteem,
    Growth,
}

/// A single decaying need
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Need {
    /// Current level, roughly -100000..400; never exceeds `max_value`
    pub value: f64,
    pub max_value: f64,
    /// Points lost per tick (before the global decay multiplier)
    pub decay_rate: f64,
    /// Weight in the focus aggregate, 1..=10
    pub priority: u8,
    pub category: NeedCategory,
    /// Tick at which this need was last satisfied, if ever
    pub last_fulfilled: Option<Tick>,
}

impl Need {
    pub fn new(
        value: f64,
        max_value: f64,
        decay_rate: f64,
        priority: u8,
        category: NeedCategory,
    ) -> Self {
        Self {
            value: value.min(max_value),
            max_value,
            decay_rate,
            priority: priority.clamp(1, 10),
            category,
            last_fulfilled: None,
        }
    }
}

/// Seven ordered distraction states, worst first
///
/// The derived `Ord` follows declaration order, so a "better" state compares
/// greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NeedState {
    BadlyDistracted,
    Distracted,
    Unfocused,
    NotDistracted,
    Untroubled,
    LevelHeaded,
    Unfettered,
}

impl NeedState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unfettered => "Unfettered",
            Self::LevelHeaded => "Level-headed",
            Self::Untroubled => "Untroubled",
            Self::NotDistracted => "Not distracted",
            Self::Unfocused => "Unfocused",
            Self::Distracted => "Distracted",
            Self::BadlyDistracted => "Badly distracted",
        }
    }
}

/// Classify a need value into its state and its focus point contribution
///
/// Single source of truth for the seven breakpoints.
fn classify(value: f64) -> (NeedState, f64) {
    if value >= 300.0 {
        (NeedState::Unfettered, 6.0)
    } else if value >= 200.0 {
        (NeedState::LevelHeaded, 5.33)
    } else if value >= 100.0 {
        (NeedState::Untroubled, 4.67)
    } else if value >= -999.0 {
        (NeedState::NotDistracted, 4.0)
    } else if value >= -9999.0 {
        (NeedState::Unfocused, 3.33)
    } else if value >= -99_999.0 {
        (NeedState::Distracted, 2.67)
    } else {
        (NeedState::BadlyDistracted, 2.0)
    }
}

/// Classify a need value into one of the seven ordered states
pub fn need_state(value: f64) -> NeedState {
    classify(value).0
}

/// An entity's set of needs, keyed by name, insertion-ordered
///
/// Need names are uppercase by convention ("FOOD", "WATER", "REST") so that
/// `satisfy_<need>` goal ids map onto them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Needs {
    needs: Vec<(String, Need)>,
}

impl Component for Needs {}

impl Needs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a need by name, preserving insertion order
    pub fn insert(&mut self, name: impl Into<String>, need: Need) {
        let name = name.into();
        match self.needs.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = need,
            None => self.needs.push((name, need)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Need> {
        self.needs.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Need)> {
        self.needs.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.needs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.needs.is_empty()
    }

    /// Aggregate all needs into a 0..~150 focus score
    ///
    /// Each need contributes its breakpoint points weighted by priority; the
    /// sum is normalized against the all-neutral baseline (4 points per
    /// priority unit), scaled to a percentage and floored. No needs at all
    /// means nothing distracts: exactly 100.
    pub fn calculate_focus(&self) -> i64 {
        if self.needs.is_empty() {
            return NEUTRAL_FOCUS;
        }

        let mut weighted = 0.0;
        let mut baseline = 0.0;
        for (_, need) in &self.needs {
            let (_, points) = classify(need.value);
            weighted += points * need.priority as f64;
            baseline += 4.0 * need.priority as f64;
        }
        (weighted / baseline * 100.0).floor() as i64
    }

    /// All needs in the given category, insertion order
    pub fn by_category(&self, category: NeedCategory) -> Vec<(&str, &Need)> {
        self.iter().filter(|(_, n)| n.category == category).collect()
    }

    /// The `n` lowest-value needs, ascending by value
    pub fn critical(&self, n: usize) -> Vec<(&str, &Need)> {
        let mut sorted: Vec<(&str, &Need)> = self.iter().collect();
        sorted.sort_by(|a, b| a.1.value.total_cmp(&b.1.value));
        sorted.truncate(n);
        sorted
    }

    /// Snap a need back to its maximum and record when
    ///
    /// Returns false if no need with that name exists; satisfaction never
    /// implicitly creates a need.
    pub fn satisfy(&mut self, name: &str, tick: Tick) -> bool {
        match self.needs.iter_mut().find(|(n, _)| n == name) {
            Some((_, need)) => {
                need.value = need.max_value;
                need.last_fulfilled = Some(tick);
                true
            }
            None => false,
        }
    }

    /// Apply one step of decay to every need
    ///
    /// `dt` is the global decay multiplier; values clamp to the floor rather
    /// than erroring.
    pub fn decay(&mut self, dt: f64) {
        for (_, need) in &mut self.needs {
            need.value = (need.value - need.decay_rate * dt)
                .clamp(NEED_VALUE_FLOOR, need.max_value);
        }
    }
}

/// Human-readable description of a focus score
pub fn focus_description(focus: i64) -> &'static str {
    if focus >= 140 {
        "unfettered"
    } else if focus >= 125 {
        "level-headed"
    } else if focus >= 110 {
        "untroubled"
    } else if focus >= 90 {
        "not distracted"
    } else if focus >= 70 {
        "unfocused"
    } else if focus >= 50 {
        "distracted"
    } else {
        "badly distracted"
    }
}

/// Map a focus score to a skill performance modifier
///
/// Pure staircase with no side effects; consumed by skill-performance
/// computations outside this module.
pub fn skill_modifier(focus: i64) -> f64 {
    if focus >= 140 {
        0.5
    } else if focus >= 125 {
        0.25
    } else if focus >= 110 {
        0.1
    } else if focus >= 90 {
        0.0
    } else if focus >= 70 {
        -0.1
    } else if focus >= 50 {
        -0.25
    } else {
        -0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn need(value: f64, priority: u8) -> Need {
        Need::new(value, 400.0, 1.0, priority, NeedCategory::Physiological)
    }

    #[test]
    fn test_focus_with_zero_needs_is_neutral() {
        assert_eq!(Needs::new().calculate_focus(), 100);
    }

    #[test]
    fn test_focus_all_neutral_needs_is_100() {
        let mut needs = Needs::new();
        needs.insert("FOOD", need(0.0, 5));
        needs.insert("REST", need(-500.0, 3));
        // Both land in the 4-point band
        assert_eq!(needs.calculate_focus(), 100);
    }

    #[test]
    fn test_focus_breakpoints() {
        let mut needs = Needs::new();
        needs.insert("FOOD", need(350.0, 1));
        // 6 / 4 * 100 = 150
        assert_eq!(needs.calculate_focus(), 150);

        needs.insert("FOOD", need(NEED_VALUE_FLOOR, 1));
        // 2 / 4 * 100 = 50
        assert_eq!(needs.calculate_focus(), 50);
    }

    #[test]
    fn test_focus_weights_by_priority() {
        let mut needs = Needs::new();
        needs.insert("FOOD", need(350.0, 10));
        needs.insert("REST", need(0.0, 1));
        // (6*10 + 4*1) / (4*11) * 100 = 145.45... -> 145
        assert_eq!(needs.calculate_focus(), 145);
    }

    #[test]
    fn test_state_classification() {
        assert_eq!(need_state(300.0), NeedState::Unfettered);
        assert_eq!(need_state(250.0), NeedState::LevelHeaded);
        assert_eq!(need_state(150.0), NeedState::Untroubled);
        assert_eq!(need_state(0.0), NeedState::NotDistracted);
        assert_eq!(need_state(-5000.0), NeedState::Unfocused);
        assert_eq!(need_state(-50_000.0), NeedState::Distracted);
        assert_eq!(need_state(-100_000.0), NeedState::BadlyDistracted);
    }

    #[test]
    fn test_satisfy_sets_max_and_tick() {
        let mut needs = Needs::new();
        needs.insert("WATER", need(-2000.0, 5));
        assert!(needs.satisfy("WATER", 42));

        let water = needs.get("WATER").unwrap();
        assert_eq!(water.value, 400.0);
        assert_eq!(water.last_fulfilled, Some(42));
    }

    #[test]
    fn test_satisfy_unknown_need_is_false() {
        let mut needs = Needs::new();
        assert!(!needs.satisfy("MISSING", 1));
        assert!(needs.is_empty());
    }

    #[test]
    fn test_critical_returns_lowest_ascending() {
        let mut needs = Needs::new();
        needs.insert("FOOD", need(-500.0, 5));
        needs.insert("WATER", need(-9000.0, 5));
        needs.insert("REST", need(100.0, 5));

        let critical = needs.critical(2);
        assert_eq!(critical[0].0, "WATER");
        assert_eq!(critical[1].0, "FOOD");
    }

    #[test]
    fn test_decay_respects_floor_and_max() {
        let mut needs = Needs::new();
        needs.insert("FOOD", need(NEED_VALUE_FLOOR + 0.5, 5));
        needs.decay(10.0);
        assert_eq!(needs.get("FOOD").unwrap().value, NEED_VALUE_FLOOR);
    }

    #[test]
    fn test_value_clamped_to_max_on_construction() {
        let n = Need::new(1000.0, 400.0, 1.0, 5, NeedCategory::Growth);
        assert_eq!(n.value, 400.0);
    }

    #[test]
    fn test_by_category() {
        let mut needs = Needs::new();
        needs.insert("FOOD", need(0.0, 5));
        needs.insert(
            "FRIENDSHIP",
            Need::new(0.0, 400.0, 1.0, 3, NeedCategory::Social),
        );

        let social = needs.by_category(NeedCategory::Social);
        assert_eq!(social.len(), 1);
        assert_eq!(social[0].0, "FRIENDSHIP");
    }

    #[test]
    fn test_skill_modifier_staircase_endpoints() {
        assert_eq!(skill_modifier(150), 0.5);
        assert_eq!(skill_modifier(100), 0.0);
        assert_eq!(skill_modifier(49), -0.5);
    }

    proptest! {
        /// A lower value never classifies into a better state
        #[test]
        fn prop_classification_monotone(a in -120_000.0f64..500.0, b in -120_000.0f64..500.0) {
            let (lo, hi) = if a < b { (a, b) } else { (b, a) };
            prop_assert!(need_state(lo) <= need_state(hi));
        }

        /// Focus points and state come from the same thresholds: equal states
        /// imply equal contributions
        #[test]
        fn prop_state_and_points_agree(a in -120_000.0f64..500.0, b in -120_000.0f64..500.0) {
            let (sa, pa) = super::classify(a);
            let (sb, pb) = super::classify(b);
            prop_assert_eq!(sa == sb, pa == pb);
        }

        /// Skill modifier never leaves its documented range
        #[test]
        fn prop_skill_modifier_bounded(focus in -100i64..300) {
            let m = skill_modifier(focus);
            prop_assert!((-0.5..=0.5).contains(&m));
        }
    }
}
