//! Exact arithmetic used throughout the engine.
mod delta_rational;
mod rational;

pub use delta_rational::DeltaRational;
pub use rational::*;
