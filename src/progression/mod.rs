//! Progression math
//!
//! Level curves and the transition calculations built on them.

pub mod curve;
pub mod progress;

pub use curve::{Curve, GrowthConfig, GrowthMode, DEFAULT_GAP, DEFAULT_MULTIPLIER, MAX_XP, MIN_PARAMETER};
pub use progress::{Change, Direction, NextLevel, ProgressCalculator, Transition, TransitionDetails};
