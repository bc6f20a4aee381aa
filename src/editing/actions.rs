//! # Patch Actions
//!
//! The discrete edit operations accepted by the patch engine.
//!
//! Actions are plain serde documents tagged by `type`, for example:
//!
//! ```json
//! { "type": "MOVE_ROOM", "roomId": "…", "x": 4, "y": 9 }
//! ```
//!
//! Ids omitted from `ADD_*`, `DRAW_*` and `PAINT_*` actions are filled in
//! with fresh random ids when the action is applied.

use crate::{CairnError, CairnResult, ContentCategory, EntityId, Position};
use serde::{Deserialize, Serialize};

/// How `RENUMBER_ROOMS` assigns numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RenumberMode {
    /// Reading order: top to bottom, then left to right
    Auto,
    /// Caller-supplied order, remaining rooms appended
    Explicit,
}

/// A single edit to a map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatchAction {
    #[serde(rename_all = "camelCase")]
    AddRoom {
        #[serde(default)]
        id: Option<EntityId>,
        #[serde(default)]
        number: Option<u32>,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        #[serde(default)]
        is_secret: bool,
    },
    #[serde(rename_all = "camelCase")]
    MoveRoom { room_id: EntityId, x: i32, y: i32 },
    #[serde(rename_all = "camelCase")]
    ResizeRoom {
        room_id: EntityId,
        width: i32,
        height: i32,
    },
    #[serde(rename_all = "camelCase")]
    RemoveRoom { room_id: EntityId },
    #[serde(rename_all = "camelCase")]
    AddCorridor {
        #[serde(default)]
        id: Option<EntityId>,
        from_room_id: EntityId,
        to_room_id: EntityId,
        points: Vec<Position>,
    },
    #[serde(rename_all = "camelCase")]
    RemoveCorridor { corridor_id: EntityId },
    #[serde(rename_all = "camelCase")]
    AddDoor {
        #[serde(default)]
        id: Option<EntityId>,
        corridor_id: EntityId,
        position: Position,
        #[serde(default)]
        is_locked: bool,
        #[serde(default)]
        is_secret: bool,
        #[serde(default)]
        is_special: bool,
    },
    #[serde(rename_all = "camelCase")]
    MoveDoor {
        door_id: EntityId,
        position: Position,
    },
    #[serde(rename_all = "camelCase")]
    RemoveDoor { door_id: EntityId },
    #[serde(rename_all = "camelCase")]
    ToggleDoorSecret { door_id: EntityId },
    #[serde(rename_all = "camelCase")]
    ToggleDoorLock { door_id: EntityId },
    #[serde(rename_all = "camelCase")]
    DrawWallSegment {
        #[serde(default)]
        id: Option<EntityId>,
        from: Position,
        to: Position,
    },
    #[serde(rename_all = "camelCase")]
    EraseWallSegment { wall_id: EntityId },
    #[serde(rename_all = "camelCase")]
    RenumberRooms {
        mode: RenumberMode,
        /// Room ids in their new order; only read in `EXPLICIT` mode
        #[serde(default)]
        order: Vec<EntityId>,
    },
    #[serde(rename_all = "camelCase")]
    PaintZone {
        #[serde(default)]
        id: Option<EntityId>,
        zone_type: String,
        #[serde(default)]
        label: String,
        cells: Vec<Position>,
    },
    #[serde(rename_all = "camelCase")]
    ClearZone { zone_id: EntityId },
    #[serde(rename_all = "camelCase")]
    ToggleLock {
        category: ContentCategory,
        entity_id: EntityId,
    },
}

impl PatchAction {
    /// Wire name of the action, as it appears in the `type` tag.
    pub fn name(&self) -> &'static str {
        match self {
            PatchAction::AddRoom { .. } => "ADD_ROOM",
            PatchAction::MoveRoom { .. } => "MOVE_ROOM",
            PatchAction::ResizeRoom { .. } => "RESIZE_ROOM",
            PatchAction::RemoveRoom { .. } => "REMOVE_ROOM",
            PatchAction::AddCorridor { .. } => "ADD_CORRIDOR",
            PatchAction::RemoveCorridor { .. } => "REMOVE_CORRIDOR",
            PatchAction::AddDoor { .. } => "ADD_DOOR",
            PatchAction::MoveDoor { .. } => "MOVE_DOOR",
            PatchAction::RemoveDoor { .. } => "REMOVE_DOOR",
            PatchAction::ToggleDoorSecret { .. } => "TOGGLE_DOOR_SECRET",
            PatchAction::ToggleDoorLock { .. } => "TOGGLE_DOOR_LOCK",
            PatchAction::DrawWallSegment { .. } => "DRAW_WALL_SEGMENT",
            PatchAction::EraseWallSegment { .. } => "ERASE_WALL_SEGMENT",
            PatchAction::RenumberRooms { .. } => "RENUMBER_ROOMS",
            PatchAction::PaintZone { .. } => "PAINT_ZONE",
            PatchAction::ClearZone { .. } => "CLEAR_ZONE",
            PatchAction::ToggleLock { .. } => "TOGGLE_LOCK",
        }
    }

    /// Checks the action's shape without looking at any map.
    ///
    /// Stale ids are not a shape problem; they are handled when the action
    /// is applied.
    pub fn validate(&self) -> CairnResult<()> {
        match self {
            PatchAction::AddRoom { width, height, .. }
            | PatchAction::ResizeRoom { width, height, .. } => {
                if *width <= 0 || *height <= 0 {
                    return Err(CairnError::InvalidAction(format!(
                        "{} needs a positive size, got {}x{}",
                        self.name(),
                        width,
                        height
                    )));
                }
            }
            PatchAction::AddCorridor { points, .. } => {
                if points.len() < 2 {
                    return Err(CairnError::InvalidAction(format!(
                        "ADD_CORRIDOR needs at least two points, got {}",
                        points.len()
                    )));
                }
            }
            PatchAction::PaintZone { cells, zone_type, .. } => {
                if cells.is_empty() {
                    return Err(CairnError::InvalidAction(
                        "PAINT_ZONE needs at least one cell".to_string(),
                    ));
                }
                if zone_type.trim().is_empty() {
                    return Err(CairnError::InvalidAction(
                        "PAINT_ZONE needs a zone type".to_string(),
                    ));
                }
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stable_entity_id;
    use serde_json::json;

    #[test]
    fn test_action_wire_format() {
        let room_id = stable_entity_id("room");
        let action: PatchAction = serde_json::from_value(json!({
            "type": "MOVE_ROOM",
            "roomId": room_id,
            "x": 4,
            "y": 9
        }))
        .unwrap();
        assert_eq!(action, PatchAction::MoveRoom { room_id, x: 4, y: 9 });
        assert_eq!(action.name(), "MOVE_ROOM");

        let value = serde_json::to_value(&action).unwrap();
        assert_eq!(value["type"], "MOVE_ROOM");
        assert_eq!(value["roomId"], json!(room_id));
    }

    #[test]
    fn test_optional_fields_default() {
        let action: PatchAction = serde_json::from_value(json!({
            "type": "ADD_ROOM",
            "x": 1, "y": 2, "width": 5, "height": 3
        }))
        .unwrap();
        match action {
            PatchAction::AddRoom { id, number, is_secret, .. } => {
                assert!(id.is_none());
                assert!(number.is_none());
                assert!(!is_secret);
            }
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[test]
    fn test_toggle_lock_category() {
        let action: PatchAction = serde_json::from_value(json!({
            "type": "TOGGLE_LOCK",
            "category": "TREASURE",
            "entityId": stable_entity_id("t")
        }))
        .unwrap();
        assert!(matches!(
            action,
            PatchAction::ToggleLock { category: ContentCategory::Treasure, .. }
        ));
    }

    #[test]
    fn test_validate_rejects_malformed_actions() {
        let room_id = stable_entity_id("room");
        let degenerate = PatchAction::AddCorridor {
            id: None,
            from_room_id: room_id,
            to_room_id: room_id,
            points: vec![Position::new(0, 0)],
        };
        assert!(matches!(degenerate.validate(), Err(CairnError::InvalidAction(_))));

        let flat = PatchAction::ResizeRoom { room_id, width: 0, height: 4 };
        assert!(flat.validate().is_err());

        let empty_zone = PatchAction::PaintZone {
            id: None,
            zone_type: "water".to_string(),
            label: String::new(),
            cells: Vec::new(),
        };
        assert!(empty_zone.validate().is_err());

        assert!(PatchAction::RemoveRoom { room_id }.validate().is_ok());
    }
}
