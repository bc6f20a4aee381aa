//! # Utilities Module
//!
//! Deterministic randomness and grid pathfinding shared by the generators.

pub mod random;
pub mod routing;

pub use random::*;
pub use routing::*;
