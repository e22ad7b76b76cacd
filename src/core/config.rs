//! Simulation configuration with documented constants
//!
//! All tunable magic numbers are collected here with explanations of their
//! purpose and how they interact with each other. Semantic thresholds
//! (need breakpoints, attribute bounds, training costs) are NOT here: those
//! are fixed constants next to the code that owns them, because changing
//! them changes the meaning of stored data, not just pacing.

use crate::core::error::{Result, SimError};
use crate::core::types::Vec2;

/// Configuration for the simulation systems
///
/// These values affect pacing and movement, not semantics.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    // === NEED SYSTEM ===
    /// Global multiplier applied to every need's decay_rate per tick
    ///
    /// At 1.0 a need with decay_rate 10 loses 10 points per tick.
    /// Raise to speed up the whole hunger/thirst/rest treadmill.
    pub decay_multiplier: f64,

    // === BEHAVIOR SYSTEM ===
    /// Distance moved per tick while seeking a resource in survival mode
    pub seek_speed: f32,

    /// Fraction of seek_speed used for urgent (non-life-threatening) needs
    ///
    /// Urgent seeking is deliberately slower than survival seeking so that
    /// a life-threatening need visibly changes behavior.
    pub urgent_seek_factor: f32,

    /// Radius within which a seeking entity counts as having reached a site
    pub site_arrival_radius: f32,

    /// Priority assigned to goals adopted by the weighted new-goal choice
    ///
    /// The "idle" fallback goal always gets priority 1 regardless.
    pub new_goal_priority: i32,

    // === WORLD LAYOUT ===
    /// Hard-coded resource sites that survival/urgent seeking moves toward
    pub food_site: Vec2,
    pub water_site: Vec2,
    pub shelter_site: Vec2,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            decay_multiplier: 1.0,

            seek_speed: 2.0,
            urgent_seek_factor: 0.5,
            site_arrival_radius: 1.5,
            new_goal_priority: 5,

            food_site: Vec2::new(50.0, 0.0),
            water_site: Vec2::new(-50.0, 0.0),
            shelter_site: Vec2::new(0.0, 50.0),
        }
    }
}

impl SimulationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.decay_multiplier <= 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "decay_multiplier ({}) must be positive",
                self.decay_multiplier
            )));
        }
        if self.seek_speed <= 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "seek_speed ({}) must be positive",
                self.seek_speed
            )));
        }
        if !(0.0..=1.0).contains(&self.urgent_seek_factor) || self.urgent_seek_factor == 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "urgent_seek_factor ({}) must be in (0, 1]",
                self.urgent_seek_factor
            )));
        }
        if self.site_arrival_radius <= 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "site_arrival_radius ({}) must be positive",
                self.site_arrival_radius
            )));
        }
        Ok(())
    }
}

// === GLOBAL CONFIG ACCESS ===

use std::sync::OnceLock;

static CONFIG: OnceLock<SimulationConfig> = OnceLock::new();

/// Get the global simulation config (initializes with defaults if not set)
pub fn config() -> &'static SimulationConfig {
    CONFIG.get_or_init(SimulationConfig::default)
}

/// Set the global simulation config (can only be called once)
///
/// Returns Err if config was already set.
pub fn set_config(config: SimulationConfig) -> std::result::Result<(), SimulationConfig> {
    CONFIG.set(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_decay_rejected() {
        let cfg = SimulationConfig {
            decay_multiplier: 0.0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_urgent_factor_bounds() {
        let cfg = SimulationConfig {
            urgent_seek_factor: 1.5,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }
}
