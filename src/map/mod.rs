//! # Map Module
//!
//! The dungeon map aggregate and every entity it owns.
//!
//! This module contains the data model shared by the generator, the
//! regeneration orchestrator, the patch engine and the player-safe projector:
//! - Grid coordinates and entity identifiers
//! - Rooms, corridors, doors, wall segments and zones
//! - Room-scoped content (traps, encounters, treasure, dressing)
//! - Map metadata and pass history

pub mod document;
pub mod entities;

pub use document::*;
pub use entities::*;

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Represents an integer coordinate on the map grid.
///
/// # Examples
///
/// ```
/// use cairn::Position;
///
/// let pos = Position::new(10, 5);
/// assert_eq!(pos.x, 10);
/// assert_eq!(pos.y, 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Creates a new position with the given coordinates.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Calculates the Manhattan distance to another position.
    ///
    /// # Examples
    ///
    /// ```
    /// use cairn::Position;
    ///
    /// let pos1 = Position::new(0, 0);
    /// let pos2 = Position::new(3, 4);
    /// assert_eq!(pos1.manhattan_distance(pos2), 7);
    /// ```
    pub fn manhattan_distance(self, other: Position) -> u32 {
        (self.x - other.x).unsigned_abs() + (self.y - other.y).unsigned_abs()
    }

    /// Returns the 4 cardinal neighbours in East, West, South, North order.
    pub fn cardinal_adjacent_positions(self) -> [Position; 4] {
        [
            Position::new(self.x + 1, self.y), // E
            Position::new(self.x - 1, self.y), // W
            Position::new(self.x, self.y + 1), // S
            Position::new(self.x, self.y - 1), // N
        ]
    }
}

/// Cell layout of the map grid. Geometry is always computed on integer cells;
/// the grid type only tells renderers how to draw them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GridType {
    #[default]
    #[serde(alias = "square")]
    Square,
    #[serde(alias = "hex")]
    Hex,
}

/// Unique identifier for map entities.
pub type EntityId = Uuid;

/// Namespace under which generated entity ids are derived.
const ENTITY_NAMESPACE: Uuid = Uuid::from_u128(0x6a1f_3c2e_9b47_4d0a_8e15_c0de_ca12_7e00);

/// Creates a new random entity ID for entities added by hand.
pub fn new_entity_id() -> EntityId {
    Uuid::new_v4()
}

/// Derives a stable entity ID from a name.
///
/// Generation uses this so that the same seed and configuration always yield
/// the same ids.
///
/// # Examples
///
/// ```
/// use cairn::stable_entity_id;
///
/// assert_eq!(stable_entity_id("trap:a"), stable_entity_id("trap:a"));
/// assert_ne!(stable_entity_id("trap:a"), stable_entity_id("trap:b"));
/// ```
pub fn stable_entity_id(name: &str) -> EntityId {
    Uuid::new_v5(&ENTITY_NAMESPACE, name.as_bytes())
}

/// Current wall-clock time in Unix epoch milliseconds.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}
