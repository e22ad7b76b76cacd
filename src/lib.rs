//! Vivarium - a single-threaded, tick-based creature simulation kernel
//!
//! The kernel is split into four layers:
//!
//! - [`core`] - shared primitives: ids, math types, errors, global config
//! - [`ecs`] - the entity/component registry, event bus and system scheduler
//! - [`entity`] - component data models: needs, attributes, goals, position
//! - [`simulation`] - the tick systems (need decay, behavior decisions)
//!
//! Everything runs on one thread. A tick is the only unit of time: the
//! [`ecs::scheduler::Scheduler`] drives every registered system once per
//! tick in registration order, then flushes deferred entity destruction and
//! advances the counter. Determinism comes from seeded rngs plus the fixed
//! execution order; the same seed and the same call sequence reproduce the
//! same run.

pub mod core;
pub mod ecs;
pub mod entity;
pub mod simulation;
