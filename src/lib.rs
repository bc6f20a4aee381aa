//! # Cairn
//!
//! Seed-driven dungeon map generation and incremental map editing for
//! tabletop campaign tools.
//!
//! ## Architecture Overview
//!
//! Everything in Cairn is a pure transform over [`Map`] values:
//!
//! - **Random Source**: [`SeededRandom`], a 32-bit xorshift stream seeded from a
//!   string and able to derive independent sub-streams per generation pass
//! - **Layout**: [`LayoutGenerator`] places rooms, builds a connectivity graph and
//!   routes corridors with grid pathfinding
//! - **Content Passes**: doors, traps, encounters, treasure and dressing, each on
//!   its own derived stream
//! - **Regeneration**: [`regenerate`] rebuilds the whole map or a single category,
//!   keeping locked items when asked to
//! - **Editing**: [`apply_patch`] folds discrete [`PatchAction`]s over a map while
//!   cascading removals so references never dangle
//! - **Projection**: [`to_player_safe_map`] strips secret content
//!
//! No operation holds global state. Callers are responsible for serialising
//! calls against the same map and persisting each result before the next call.

pub mod editing;
pub mod generation;
pub mod map;
pub mod projection;
pub mod regeneration;
pub mod utils;

pub use editing::*;
pub use generation::*;
pub use map::*;
pub use projection::*;
pub use regeneration::*;
pub use utils::*;

/// Core error type for the Cairn engine.
#[derive(thiserror::Error, Debug)]
pub enum CairnError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Generator configuration is invalid
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Patch action is structurally malformed
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// Generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// A reference between map entities points at nothing
    #[error("Integrity violation: {0}")]
    IntegrityViolation(String),
}

/// Result type used throughout the Cairn codebase.
pub type CairnResult<T> = Result<T, CairnError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine-wide constants.
pub mod config {
    /// Version tag written into every generated map's metadata
    pub const ALGORITHM_VERSION: &str = "cairn-gen-1";

    /// Number of pass history entries a map retains
    pub const PASS_HISTORY_LIMIT: usize = 60;

    /// Maximum number of actions accepted by a single patch call
    pub const MAX_PATCH_ACTIONS: usize = 100;

    /// Placement attempts allowed per targeted room
    pub const PLACEMENT_ATTEMPTS_PER_ROOM: usize = 40;

    /// Lower clamp for the targeted room count
    pub const MIN_TARGET_ROOMS: usize = 8;

    /// Upper clamp for the targeted room count
    pub const MAX_TARGET_ROOMS: usize = 220;

    /// Side length of the rooms forced when placement fails
    pub const FALLBACK_ROOM_SIZE: i32 = 6;
}
