//! # Map Document
//!
//! The aggregate root owned by the engine and persisted by callers as an
//! opaque document.

use crate::{
    config, CairnError, CairnResult, Corridor, Door, Dressing, Encounter, EntityId, GridType,
    PassKind, RegenerationScope, Room, Trap, Treasure, WallSegment, Zone,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Content categories addressable by lock toggling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentCategory {
    Doors,
    Traps,
    Encounters,
    Treasure,
    Dressing,
}

/// Number of items a pass produced, per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChangeCounts {
    pub rooms: usize,
    pub corridors: usize,
    pub doors: usize,
    pub traps: usize,
    pub encounters: usize,
    pub treasures: usize,
    pub dressing: usize,
}

/// One regeneration run, as recorded in the map's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassHistoryEntry {
    pub pass: PassKind,
    pub scope: RegenerationScope,
    pub started_at: u64,
    pub finished_at: u64,
    pub seed: String,
    pub config_hash: String,
    pub changed: ChangeCounts,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub algorithm_version: String,
    /// Fingerprint of seed + generator configuration
    pub config_hash: String,
    /// Unix epoch milliseconds of the last generation or edit
    pub generated_at: u64,
    pub seed: String,
    #[serde(default)]
    pub pass_history: Vec<PassHistoryEntry>,
}

/// A complete dungeon map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Map {
    pub width: i32,
    pub height: i32,
    pub cell_size: u32,
    #[serde(default)]
    pub grid_type: GridType,
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub corridors: Vec<Corridor>,
    #[serde(default)]
    pub doors: Vec<Door>,
    #[serde(default)]
    pub walls: Vec<WallSegment>,
    #[serde(default)]
    pub traps: Vec<Trap>,
    #[serde(default)]
    pub encounters: Vec<Encounter>,
    #[serde(default)]
    pub treasures: Vec<Treasure>,
    #[serde(default)]
    pub dressing: Vec<Dressing>,
    #[serde(default)]
    pub zones: Vec<Zone>,
    pub metadata: Metadata,
}

impl Map {
    /// Creates a map with no entities.
    ///
    /// # Examples
    ///
    /// ```
    /// use cairn::{GridType, Map};
    ///
    /// let map = Map::empty(40, 30, 5, GridType::Square, "seed");
    /// assert!(map.rooms.is_empty());
    /// assert_eq!(map.metadata.seed, "seed");
    /// ```
    pub fn empty(width: i32, height: i32, cell_size: u32, grid_type: GridType, seed: &str) -> Self {
        Self {
            width,
            height,
            cell_size,
            grid_type,
            rooms: Vec::new(),
            corridors: Vec::new(),
            doors: Vec::new(),
            walls: Vec::new(),
            traps: Vec::new(),
            encounters: Vec::new(),
            treasures: Vec::new(),
            dressing: Vec::new(),
            zones: Vec::new(),
            metadata: Metadata {
                algorithm_version: config::ALGORITHM_VERSION.to_string(),
                config_hash: String::new(),
                generated_at: crate::now_millis(),
                seed: seed.to_string(),
                pass_history: Vec::new(),
            },
        }
    }

    pub fn room_by_id(&self, id: EntityId) -> Option<&Room> {
        self.rooms.iter().find(|room| room.id == id)
    }

    pub fn corridor_by_id(&self, id: EntityId) -> Option<&Corridor> {
        self.corridors.iter().find(|corridor| corridor.id == id)
    }

    pub fn door_by_id(&self, id: EntityId) -> Option<&Door> {
        self.doors.iter().find(|door| door.id == id)
    }

    pub fn has_room(&self, id: EntityId) -> bool {
        self.room_by_id(id).is_some()
    }

    pub fn has_corridor(&self, id: EntityId) -> bool {
        self.corridor_by_id(id).is_some()
    }

    /// Item counts for every category, as recorded in pass history.
    pub fn change_counts(&self) -> ChangeCounts {
        ChangeCounts {
            rooms: self.rooms.len(),
            corridors: self.corridors.len(),
            doors: self.doors.len(),
            traps: self.traps.len(),
            encounters: self.encounters.len(),
            treasures: self.treasures.len(),
            dressing: self.dressing.len(),
        }
    }

    /// Appends a history entry, keeping only the most recent ones.
    pub fn record_pass(&mut self, entry: PassHistoryEntry) {
        let history = &mut self.metadata.pass_history;
        history.push(entry);
        if history.len() > config::PASS_HISTORY_LIMIT {
            let excess = history.len() - config::PASS_HISTORY_LIMIT;
            history.drain(..excess);
        }
    }

    /// Verifies that every reference between entities resolves.
    ///
    /// Corridors must point at existing rooms, doors at existing corridors,
    /// and room-scoped content at existing rooms.
    pub fn check_integrity(&self) -> CairnResult<()> {
        let room_ids: HashSet<EntityId> = self.rooms.iter().map(|room| room.id).collect();
        let corridor_ids: HashSet<EntityId> =
            self.corridors.iter().map(|corridor| corridor.id).collect();

        for corridor in &self.corridors {
            for room_id in [corridor.from_room_id, corridor.to_room_id] {
                if !room_ids.contains(&room_id) {
                    return Err(CairnError::IntegrityViolation(format!(
                        "corridor {} references missing room {}",
                        corridor.id, room_id
                    )));
                }
            }
            if corridor.points.len() < 2 {
                return Err(CairnError::IntegrityViolation(format!(
                    "corridor {} has fewer than two points",
                    corridor.id
                )));
            }
        }

        for door in &self.doors {
            if !corridor_ids.contains(&door.corridor_id) {
                return Err(CairnError::IntegrityViolation(format!(
                    "door {} references missing corridor {}",
                    door.id, door.corridor_id
                )));
            }
        }

        let scoped = self
            .traps
            .iter()
            .map(|trap| ("trap", trap.id, trap.room_id))
            .chain(self.encounters.iter().map(|item| ("encounter", item.id, item.room_id)))
            .chain(self.treasures.iter().map(|item| ("treasure", item.id, item.room_id)))
            .chain(self.dressing.iter().map(|item| ("dressing", item.id, item.room_id)));

        for (kind, id, room_id) in scoped {
            if !room_ids.contains(&room_id) {
                return Err(CairnError::IntegrityViolation(format!(
                    "{kind} {id} references missing room {room_id}"
                )));
            }
        }

        Ok(())
    }
}
