//! Entity-component-system runtime
//!
//! The scheduler owns the world and the event bus and is the kernel's public
//! surface; component storage is kind-tagged rather than TypeId-hashed.

pub mod component;
pub mod event;
pub mod scheduler;
pub mod world;
