//! # Map Entities
//!
//! Rooms, corridors, doors and the room-scoped content that generation and
//! editing produce.

use crate::{EntityId, Position};
use serde::{Deserialize, Serialize};

/// A rectangular, numbered dungeon space.
///
/// The rectangle covers cells `x..x + width` and `y..y + height`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    /// Unique identifier for this room
    pub id: EntityId,
    /// Sequential room number shown on the map key
    pub number: u32,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    /// Secret rooms are hidden from the player view
    #[serde(default)]
    pub is_secret: bool,
}

impl Room {
    /// Creates a new, non-secret room.
    ///
    /// # Examples
    ///
    /// ```
    /// use cairn::{Room, stable_entity_id};
    ///
    /// let room = Room::new(stable_entity_id("r"), 1, 5, 5, 7, 5);
    /// assert_eq!(room.number, 1);
    /// assert_eq!(room.right(), 11);
    /// assert_eq!(room.bottom(), 9);
    /// ```
    pub fn new(id: EntityId, number: u32, x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            id,
            number,
            x,
            y,
            width,
            height,
            is_secret: false,
        }
    }

    /// Rightmost column occupied by the room.
    pub fn right(&self) -> i32 {
        self.x + self.width - 1
    }

    /// Bottom row occupied by the room.
    pub fn bottom(&self) -> i32 {
        self.y + self.height - 1
    }

    /// Gets the center position of the room.
    pub fn center(&self) -> Position {
        Position::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Checks if a position is inside this room.
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.x && pos.y >= self.y && pos.x <= self.right() && pos.y <= self.bottom()
    }

    /// Checks whether this room, grown by `padding` cells on every side,
    /// intersects another room.
    ///
    /// A padding of 0 lets rooms touch; a padding of 1 demands at least one
    /// empty cell between them.
    pub fn overlaps_with_padding(&self, other: &Room, padding: i32) -> bool {
        self.x - padding <= other.right()
            && self.right() + padding >= other.x
            && self.y - padding <= other.bottom()
            && self.bottom() + padding >= other.y
    }
}

/// An orthogonal polyline connecting two rooms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Corridor {
    pub id: EntityId,
    pub from_room_id: EntityId,
    pub to_room_id: EntityId,
    /// At least two grid points
    pub points: Vec<Position>,
}

impl Corridor {
    /// Whether either end of the corridor is attached to `room_id`.
    pub fn touches(&self, room_id: EntityId) -> bool {
        self.from_room_id == room_id || self.to_room_id == room_id
    }
}

/// A point entity bound to a corridor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Door {
    pub id: EntityId,
    pub position: Position,
    pub corridor_id: EntityId,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default)]
    pub is_secret: bool,
    #[serde(default)]
    pub is_special: bool,
}

/// A free-floating wall drawn by hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WallSegment {
    pub id: EntityId,
    pub from: Position,
    pub to: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrapSeverity {
    Low,
    Medium,
    High,
}

impl TrapSeverity {
    /// Base difficulty class before the random offset is added.
    pub fn base_dc(self) -> u32 {
        match self {
            TrapSeverity::High => 16,
            TrapSeverity::Medium => 13,
            TrapSeverity::Low => 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trap {
    pub id: EntityId,
    pub room_id: EntityId,
    pub position: Position,
    pub name: String,
    pub severity: TrapSeverity,
    pub detect_dc: u32,
    pub disarm_dc: u32,
    #[serde(default)]
    pub is_locked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EncounterDifficulty {
    Easy,
    Medium,
    Hard,
    Deadly,
}

impl EncounterDifficulty {
    /// Largest group size rolled for this difficulty.
    pub fn max_group(self) -> u32 {
        match self {
            EncounterDifficulty::Easy => 2,
            EncounterDifficulty::Medium => 4,
            EncounterDifficulty::Hard => 6,
            EncounterDifficulty::Deadly => 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Encounter {
    pub id: EntityId,
    pub room_id: EntityId,
    pub position: Position,
    pub creature: String,
    pub count: u32,
    pub difficulty: EncounterDifficulty,
    #[serde(default)]
    pub is_locked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TreasureRarity {
    Common,
    Uncommon,
    Rare,
    Legendary,
}

impl TreasureRarity {
    /// Value in gold pieces of a single share at this rarity.
    pub fn base_value(self) -> u32 {
        match self {
            TreasureRarity::Common => 10,
            TreasureRarity::Uncommon => 50,
            TreasureRarity::Rare => 250,
            TreasureRarity::Legendary => 2_500,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TreasureCategory {
    Coin,
    Gem,
    Art,
    MagicItem,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Treasure {
    pub id: EntityId,
    pub room_id: EntityId,
    pub position: Position,
    pub rarity: TreasureRarity,
    pub category: TreasureCategory,
    pub value_gp: u32,
    pub description: String,
    #[serde(default)]
    pub is_locked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DressingCategory {
    Furniture,
    Debris,
    Light,
    Feature,
}

/// Set dressing: flavour objects with no mechanical weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dressing {
    pub id: EntityId,
    pub room_id: EntityId,
    pub position: Position,
    pub category: DressingCategory,
    pub description: String,
    #[serde(default)]
    pub is_locked: bool,
}

/// A labeled, typed set of grid cells independent of room geometry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub id: EntityId,
    pub zone_type: String,
    pub label: String,
    pub cells: Vec<Position>,
}

/// Items that carry a user lock and can survive scoped regeneration.
pub trait Lockable {
    /// What makes a regenerated item "the same" as a previous one.
    type Identity: Eq + std::hash::Hash;

    fn id(&self) -> EntityId;
    fn identity(&self) -> Self::Identity;
    fn is_locked(&self) -> bool;
    fn set_locked(&mut self, locked: bool);
}

impl Lockable for Door {
    type Identity = (EntityId, Position);

    fn id(&self) -> EntityId {
        self.id
    }

    fn identity(&self) -> Self::Identity {
        (self.corridor_id, self.position)
    }

    fn is_locked(&self) -> bool {
        self.is_locked
    }

    fn set_locked(&mut self, locked: bool) {
        self.is_locked = locked;
    }
}

macro_rules! lockable_by_id {
    ($($item:ty),+ $(,)?) => {
        $(
            impl Lockable for $item {
                type Identity = EntityId;

                fn id(&self) -> EntityId {
                    self.id
                }

                fn identity(&self) -> Self::Identity {
                    self.id
                }

                fn is_locked(&self) -> bool {
                    self.is_locked
                }

                fn set_locked(&mut self, locked: bool) {
                    self.is_locked = locked;
                }
            }
        )+
    };
}

lockable_by_id!(Trap, Encounter, Treasure, Dressing);

/// Room-scoped content, removed together with its room.
pub trait RoomScoped {
    fn room_id(&self) -> EntityId;
}

macro_rules! room_scoped {
    ($($item:ty),+ $(,)?) => {
        $(
            impl RoomScoped for $item {
                fn room_id(&self) -> EntityId {
                    self.room_id
                }
            }
        )+
    };
}

room_scoped!(Trap, Encounter, Treasure, Dressing);
