//! Component data models attached to entities
//!
//! All component state here derives serde traits, so an entity is
//! checkpointable by serializing its components; the behavior system keeps
//! no hidden state beyond them.

pub mod attributes;
pub mod goals;
pub mod needs;

use serde::{Deserialize, Serialize};

use crate::core::types::Vec2;
use crate::ecs::component::Component;

/// World-space position of an entity
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position(pub Vec2);

impl Component for Position {}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }
}
