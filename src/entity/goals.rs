//! Prioritized, progress-tracked goals
//!
//! Goals are pure data: the behavior decision system is solely responsible
//! for advancing progress and removing a goal once it completes.

use serde::{Deserialize, Serialize};

use crate::ecs::component::Component;

/// Progress level at which a goal counts as complete
pub const GOAL_COMPLETE: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub priority: i32,
    /// 0..100; the behavior system removes the goal once this reaches 100
    pub progress: f64,
}

/// An entity's pursued objectives, in adoption order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Goals {
    goals: Vec<Goal>,
}

impl Component for Goals {}

impl Goals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt a goal; idempotent per id
    ///
    /// Returns false (and changes nothing) if a goal with this id is already
    /// present.
    pub fn add(&mut self, id: impl Into<String>, priority: i32) -> bool {
        let id = id.into();
        if self.has(&id) {
            return false;
        }
        self.goals.push(Goal {
            id,
            priority,
            progress: 0.0,
        });
        true
    }

    pub fn has(&self, id: &str) -> bool {
        self.goals.iter().any(|g| g.id == id)
    }

    /// Drop a goal by id; returns whether it was present
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.goals.len();
        self.goals.retain(|g| g.id != id);
        self.goals.len() < before
    }

    pub fn get(&self, id: &str) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Goal> {
        self.goals.iter_mut().find(|g| g.id == id)
    }

    /// The goal with the highest priority; ties go to the earliest adopted
    pub fn highest_priority(&self) -> Option<&Goal> {
        let mut best: Option<&Goal> = None;
        for goal in &self.goals {
            match best {
                Some(b) if goal.priority <= b.priority => {}
                _ => best = Some(goal),
            }
        }
        best
    }

    pub fn iter(&self) -> impl Iterator<Item = &Goal> {
        self.goals.iter()
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }
}
