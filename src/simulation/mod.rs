//! Tick systems driving the simulation
//!
//! Registration order is execution order: decay first, then behavior, so a
//! creature reacts to the values the tick just produced.

pub mod behavior;
pub mod decay;
