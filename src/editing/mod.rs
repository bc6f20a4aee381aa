//! # Editing Module
//!
//! The map patch engine: folds an ordered list of [`PatchAction`]s over a
//! map snapshot.
//!
//! Editing is deliberately permissive. An action that names an entity which
//! no longer exists leaves the map unchanged and reports
//! [`ActionOutcome::NoOp`] instead of failing the whole patch. Removals
//! cascade so that no corridor, door or room-scoped item is ever left
//! pointing at something that is gone.

pub mod actions;

pub use actions::*;

use crate::{
    config, new_entity_id, now_millis, CairnError, CairnResult, ContentCategory, Corridor, Door,
    EntityId, Lockable, Map, Position, Room, RoomScoped, WallSegment, Zone,
};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// What happened to a single action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionOutcome {
    Applied,
    NoOp { reason: String },
}

impl ActionOutcome {
    fn no_op(reason: impl Into<String>) -> Self {
        ActionOutcome::NoOp {
            reason: reason.into(),
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, ActionOutcome::Applied)
    }
}

/// The patched map plus one outcome per submitted action, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchResult {
    pub map: Map,
    pub outcomes: Vec<ActionOutcome>,
}

impl PatchResult {
    pub fn applied_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_applied()).count()
    }
}

/// Applies `actions` in order to a copy of `map`.
///
/// Fails only when the list is empty, longer than
/// [`config::MAX_PATCH_ACTIONS`], or contains a malformed action. In that
/// case nothing is applied.
///
/// `metadata.generatedAt` is refreshed once per call; pass history is left
/// alone.
///
/// # Examples
///
/// ```
/// use cairn::{apply_patch, GridType, Map, PatchAction};
///
/// let map = Map::empty(40, 40, 5, GridType::Square, "doc");
/// let add = PatchAction::AddRoom {
///     id: None,
///     number: None,
///     x: 2,
///     y: 2,
///     width: 5,
///     height: 5,
///     is_secret: false,
/// };
/// let result = apply_patch(&map, &[add]).unwrap();
/// assert_eq!(result.map.rooms.len(), 1);
/// assert_eq!(result.map.rooms[0].number, 1);
/// ```
pub fn apply_patch(map: &Map, actions: &[PatchAction]) -> CairnResult<PatchResult> {
    if actions.is_empty() || actions.len() > config::MAX_PATCH_ACTIONS {
        return Err(CairnError::InvalidAction(format!(
            "a patch takes between 1 and {} actions, got {}",
            config::MAX_PATCH_ACTIONS,
            actions.len()
        )));
    }
    for (index, action) in actions.iter().enumerate() {
        action.validate().map_err(|err| match err {
            CairnError::InvalidAction(message) => {
                CairnError::InvalidAction(format!("action {index}: {message}"))
            }
            other => other,
        })?;
    }

    let mut patched = map.clone();
    let outcomes: Vec<ActionOutcome> = actions
        .iter()
        .map(|action| apply_action(&mut patched, action))
        .collect();
    patched.metadata.generated_at = now_millis();

    let result = PatchResult {
        map: patched,
        outcomes,
    };
    info!(
        "Applied patch: {} of {} actions changed the map",
        result.applied_count(),
        actions.len()
    );
    Ok(result)
}

/// Applies one action in place.
///
/// The action is assumed to be well formed; see [`PatchAction::validate`].
pub fn apply_action(map: &mut Map, action: &PatchAction) -> ActionOutcome {
    let outcome = match action {
        PatchAction::AddRoom {
            id,
            number,
            x,
            y,
            width,
            height,
            is_secret,
        } => add_room(map, *id, *number, *x, *y, *width, *height, *is_secret),
        PatchAction::MoveRoom { room_id, x, y } => match room_mut(map, *room_id) {
            Some(room) => {
                room.x = *x;
                room.y = *y;
                ActionOutcome::Applied
            }
            None => missing("room", *room_id),
        },
        PatchAction::ResizeRoom {
            room_id,
            width,
            height,
        } => match room_mut(map, *room_id) {
            Some(room) => {
                room.width = *width;
                room.height = *height;
                ActionOutcome::Applied
            }
            None => missing("room", *room_id),
        },
        PatchAction::RemoveRoom { room_id } => remove_room(map, *room_id),
        PatchAction::AddCorridor {
            id,
            from_room_id,
            to_room_id,
            points,
        } => add_corridor(map, *id, *from_room_id, *to_room_id, points),
        PatchAction::RemoveCorridor { corridor_id } => remove_corridor(map, *corridor_id),
        PatchAction::AddDoor {
            id,
            corridor_id,
            position,
            is_locked,
            is_secret,
            is_special,
        } => add_door(
            map,
            Door {
                id: id.unwrap_or_else(new_entity_id),
                position: *position,
                corridor_id: *corridor_id,
                is_locked: *is_locked,
                is_secret: *is_secret,
                is_special: *is_special,
            },
        ),
        PatchAction::MoveDoor { door_id, position } => {
            update_door(map, *door_id, |door| door.position = *position)
        }
        PatchAction::RemoveDoor { door_id } => {
            if remove_by_id(&mut map.doors, *door_id, |door| door.id) {
                ActionOutcome::Applied
            } else {
                missing("door", *door_id)
            }
        }
        PatchAction::ToggleDoorSecret { door_id } => {
            update_door(map, *door_id, |door| door.is_secret = !door.is_secret)
        }
        PatchAction::ToggleDoorLock { door_id } => {
            update_door(map, *door_id, |door| door.is_locked = !door.is_locked)
        }
        PatchAction::DrawWallSegment { id, from, to } => {
            map.walls.push(WallSegment {
                id: id.unwrap_or_else(new_entity_id),
                from: *from,
                to: *to,
            });
            ActionOutcome::Applied
        }
        PatchAction::EraseWallSegment { wall_id } => {
            if remove_by_id(&mut map.walls, *wall_id, |wall| wall.id) {
                ActionOutcome::Applied
            } else {
                missing("wall segment", *wall_id)
            }
        }
        PatchAction::RenumberRooms { mode, order } => {
            match mode {
                RenumberMode::Auto => renumber_auto(&mut map.rooms),
                RenumberMode::Explicit => renumber_explicit(&mut map.rooms, order),
            }
            ActionOutcome::Applied
        }
        PatchAction::PaintZone {
            id,
            zone_type,
            label,
            cells,
        } => {
            map.zones.push(Zone {
                id: id.unwrap_or_else(new_entity_id),
                zone_type: zone_type.clone(),
                label: label.clone(),
                cells: cells.clone(),
            });
            ActionOutcome::Applied
        }
        PatchAction::ClearZone { zone_id } => {
            if remove_by_id(&mut map.zones, *zone_id, |zone| zone.id) {
                ActionOutcome::Applied
            } else {
                missing("zone", *zone_id)
            }
        }
        PatchAction::ToggleLock {
            category,
            entity_id,
        } => {
            let toggled = match category {
                ContentCategory::Doors => toggle_lock(&mut map.doors, *entity_id),
                ContentCategory::Traps => toggle_lock(&mut map.traps, *entity_id),
                ContentCategory::Encounters => toggle_lock(&mut map.encounters, *entity_id),
                ContentCategory::Treasure => toggle_lock(&mut map.treasures, *entity_id),
                ContentCategory::Dressing => toggle_lock(&mut map.dressing, *entity_id),
            };
            if toggled {
                ActionOutcome::Applied
            } else {
                ActionOutcome::no_op(format!("no {category:?} item {entity_id}"))
            }
        }
    };
    log_outcome(action, outcome)
}

fn log_outcome(action: &PatchAction, outcome: ActionOutcome) -> ActionOutcome {
    match &outcome {
        ActionOutcome::Applied => debug!("{} applied", action.name()),
        ActionOutcome::NoOp { reason } => warn!("{} skipped: {}", action.name(), reason),
    }
    outcome
}

fn missing(kind: &str, id: EntityId) -> ActionOutcome {
    ActionOutcome::no_op(format!("{kind} {id} does not exist"))
}

fn room_mut(map: &mut Map, id: EntityId) -> Option<&mut Room> {
    map.rooms.iter_mut().find(|room| room.id == id)
}

fn update_door(map: &mut Map, id: EntityId, update: impl FnOnce(&mut Door)) -> ActionOutcome {
    match map.doors.iter_mut().find(|door| door.id == id) {
        Some(door) => {
            update(door);
            ActionOutcome::Applied
        }
        None => missing("door", id),
    }
}

/// Removes the item with `id`, reporting whether there was one.
fn remove_by_id<T>(items: &mut Vec<T>, id: EntityId, key: impl Fn(&T) -> EntityId) -> bool {
    let before = items.len();
    items.retain(|item| key(item) != id);
    items.len() != before
}

fn toggle_lock<T: Lockable>(items: &mut [T], id: EntityId) -> bool {
    match items.iter_mut().find(|item| item.id() == id) {
        Some(item) => {
            let locked = item.is_locked();
            item.set_locked(!locked);
            true
        }
        None => false,
    }
}

fn drop_room_content<T: RoomScoped>(items: &mut Vec<T>, room_id: EntityId) -> usize {
    let before = items.len();
    items.retain(|item| item.room_id() != room_id);
    before - items.len()
}

#[allow(clippy::too_many_arguments)]
fn add_room(
    map: &mut Map,
    id: Option<EntityId>,
    number: Option<u32>,
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    is_secret: bool,
) -> ActionOutcome {
    let id = id.unwrap_or_else(new_entity_id);
    if map.has_room(id) {
        return ActionOutcome::no_op(format!("room {id} already exists"));
    }
    let number = number.unwrap_or_else(|| {
        map.rooms.iter().map(|room| room.number).max().unwrap_or(0) + 1
    });

    let mut room = Room::new(id, number, x, y, width, height);
    room.is_secret = is_secret;
    map.rooms.push(room);
    map.rooms.sort_by_key(|room| room.number);
    ActionOutcome::Applied
}

fn remove_room(map: &mut Map, room_id: EntityId) -> ActionOutcome {
    if !remove_by_id(&mut map.rooms, room_id, |room| room.id) {
        return missing("room", room_id);
    }

    let dropped_corridors: HashSet<EntityId> = map
        .corridors
        .iter()
        .filter(|corridor| corridor.touches(room_id))
        .map(|corridor| corridor.id)
        .collect();
    map.corridors
        .retain(|corridor| !dropped_corridors.contains(&corridor.id));
    let doors_before = map.doors.len();
    map.doors
        .retain(|door| !dropped_corridors.contains(&door.corridor_id));

    let content = drop_room_content(&mut map.traps, room_id)
        + drop_room_content(&mut map.encounters, room_id)
        + drop_room_content(&mut map.treasures, room_id)
        + drop_room_content(&mut map.dressing, room_id);

    debug!(
        "Removed room {}: {} corridors, {} doors, {} content items",
        room_id,
        dropped_corridors.len(),
        doors_before - map.doors.len(),
        content
    );
    ActionOutcome::Applied
}

fn add_corridor(
    map: &mut Map,
    id: Option<EntityId>,
    from_room_id: EntityId,
    to_room_id: EntityId,
    points: &[Position],
) -> ActionOutcome {
    for room_id in [from_room_id, to_room_id] {
        if !map.has_room(room_id) {
            return missing("room", room_id);
        }
    }
    let id = id.unwrap_or_else(new_entity_id);
    if map.has_corridor(id) {
        return ActionOutcome::no_op(format!("corridor {id} already exists"));
    }
    map.corridors.push(Corridor {
        id,
        from_room_id,
        to_room_id,
        points: points.to_vec(),
    });
    ActionOutcome::Applied
}

fn add_door(map: &mut Map, door: Door) -> ActionOutcome {
    if !map.has_corridor(door.corridor_id) {
        return missing("corridor", door.corridor_id);
    }
    if map.door_by_id(door.id).is_some() {
        return ActionOutcome::no_op(format!("door {} already exists", door.id));
    }
    map.doors.push(door);
    ActionOutcome::Applied
}

fn remove_corridor(map: &mut Map, corridor_id: EntityId) -> ActionOutcome {
    if !remove_by_id(&mut map.corridors, corridor_id, |corridor| corridor.id) {
        return missing("corridor", corridor_id);
    }
    map.doors.retain(|door| door.corridor_id != corridor_id);
    ActionOutcome::Applied
}

/// Numbers rooms 1..N in reading order.
fn renumber_auto(rooms: &mut [Room]) {
    rooms.sort_by_key(|room| (room.y, room.x));
    for (index, room) in rooms.iter_mut().enumerate() {
        room.number = index as u32 + 1;
    }
    debug!("Renumbered {} rooms in reading order", rooms.len());
}

/// Numbers the rooms named in `order` first, then the rest by their old
/// number.
fn renumber_explicit(rooms: &mut [Room], order: &[EntityId]) {
    let mut ranked: Vec<EntityId> = Vec::with_capacity(rooms.len());
    let mut seen = HashSet::new();
    for id in order {
        if rooms.iter().any(|room| room.id == *id) && seen.insert(*id) {
            ranked.push(*id);
        }
    }

    let mut rest: Vec<(u32, EntityId)> = rooms
        .iter()
        .filter(|room| !seen.contains(&room.id))
        .map(|room| (room.number, room.id))
        .collect();
    rest.sort();
    ranked.extend(rest.into_iter().map(|(_, id)| id));

    for (index, id) in ranked.iter().enumerate() {
        if let Some(room) = rooms.iter_mut().find(|room| room.id == *id) {
            room.number = index as u32 + 1;
        }
    }
    rooms.sort_by_key(|room| room.number);
    debug!(
        "Renumbered {} rooms, {} from explicit order",
        rooms.len(),
        seen.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{stable_entity_id, GridType, Trap, TrapSeverity};

    fn add_room_action(name: &str, x: i32, y: i32) -> PatchAction {
        PatchAction::AddRoom {
            id: Some(stable_entity_id(name)),
            number: None,
            x,
            y,
            width: 5,
            height: 5,
            is_secret: false,
        }
    }

    fn two_rooms_and_corridor() -> Map {
        let map = Map::empty(40, 40, 5, GridType::Square, "edit");
        let a = stable_entity_id("a");
        let b = stable_entity_id("b");
        let corridor = stable_entity_id("a-b");
        let actions = vec![
            add_room_action("a", 2, 2),
            add_room_action("b", 20, 2),
            PatchAction::AddCorridor {
                id: Some(corridor),
                from_room_id: a,
                to_room_id: b,
                points: vec![Position::new(7, 4), Position::new(19, 4)],
            },
            PatchAction::AddDoor {
                id: Some(stable_entity_id("door")),
                corridor_id: corridor,
                position: Position::new(7, 4),
                is_locked: false,
                is_secret: false,
                is_special: false,
            },
        ];
        apply_patch(&map, &actions).unwrap().map
    }

    #[test]
    fn test_add_room_numbers_sequentially() {
        let map = Map::empty(40, 40, 5, GridType::Square, "edit");
        let result = apply_patch(
            &map,
            &[add_room_action("a", 1, 1), add_room_action("b", 10, 1)],
        )
        .unwrap();
        let numbers: Vec<u32> = result.map.rooms.iter().map(|r| r.number).collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn test_add_room_with_explicit_number_is_sorted() {
        let map = two_rooms_and_corridor();
        let action = PatchAction::AddRoom {
            id: None,
            number: Some(0),
            x: 30,
            y: 30,
            width: 3,
            height: 3,
            is_secret: true,
        };
        let result = apply_patch(&map, &[action]).unwrap();
        assert_eq!(result.map.rooms[0].number, 0);
        assert!(result.map.rooms[0].is_secret);
    }

    #[test]
    fn test_remove_room_cascades() {
        let mut map = two_rooms_and_corridor();
        let a = stable_entity_id("a");
        map.traps.push(Trap {
            id: stable_entity_id("trap"),
            room_id: a,
            position: Position::new(3, 3),
            name: "pit".to_string(),
            severity: TrapSeverity::Low,
            detect_dc: 10,
            disarm_dc: 10,
            is_locked: false,
        });

        let result = apply_patch(&map, &[PatchAction::RemoveRoom { room_id: a }]).unwrap();
        assert!(result.map.corridors.is_empty());
        assert!(result.map.doors.is_empty());
        assert!(result.map.traps.is_empty());
        assert_eq!(result.map.rooms.len(), 1);
        assert!(result.map.check_integrity().is_ok());
    }

    #[test]
    fn test_remove_corridor_cascades_to_doors() {
        let map = two_rooms_and_corridor();
        let action = PatchAction::RemoveCorridor {
            corridor_id: stable_entity_id("a-b"),
        };
        let result = apply_patch(&map, &[action]).unwrap();
        assert!(result.map.doors.is_empty());
        assert_eq!(result.map.rooms.len(), 2);
    }

    #[test]
    fn test_unknown_ids_are_no_ops() {
        let map = two_rooms_and_corridor();
        let ghost = stable_entity_id("ghost");
        let actions = vec![
            PatchAction::MoveRoom { room_id: ghost, x: 1, y: 1 },
            PatchAction::AddCorridor {
                id: None,
                from_room_id: stable_entity_id("a"),
                to_room_id: ghost,
                points: vec![Position::new(0, 0), Position::new(1, 0)],
            },
            PatchAction::AddDoor {
                id: None,
                corridor_id: ghost,
                position: Position::new(0, 0),
                is_locked: false,
                is_secret: false,
                is_special: false,
            },
            PatchAction::ToggleDoorLock { door_id: ghost },
            PatchAction::ClearZone { zone_id: ghost },
            PatchAction::ToggleLock {
                category: ContentCategory::Traps,
                entity_id: ghost,
            },
        ];
        let result = apply_patch(&map, &actions).unwrap();

        assert_eq!(result.applied_count(), 0);
        assert!(result
            .outcomes
            .iter()
            .all(|outcome| matches!(outcome, ActionOutcome::NoOp { .. })));
        assert_eq!(result.map.rooms, map.rooms);
        assert_eq!(result.map.corridors, map.corridors);
        assert_eq!(result.map.doors, map.doors);
    }

    #[test]
    fn test_door_toggles() {
        let map = two_rooms_and_corridor();
        let door_id = stable_entity_id("door");
        let actions = vec![
            PatchAction::ToggleDoorSecret { door_id },
            PatchAction::ToggleDoorLock { door_id },
            PatchAction::MoveDoor {
                door_id,
                position: Position::new(10, 4),
            },
        ];
        let result = apply_patch(&map, &actions).unwrap();
        let door = result.map.door_by_id(door_id).unwrap();
        assert!(door.is_secret);
        assert!(door.is_locked);
        assert_eq!(door.position, Position::new(10, 4));
    }

    #[test]
    fn test_toggle_lock_on_doors() {
        let map = two_rooms_and_corridor();
        let door_id = stable_entity_id("door");
        let toggle = PatchAction::ToggleLock {
            category: ContentCategory::Doors,
            entity_id: door_id,
        };
        let once = apply_patch(&map, &[toggle.clone()]).unwrap().map;
        assert!(once.door_by_id(door_id).unwrap().is_locked);
        let twice = apply_patch(&once, &[toggle]).unwrap().map;
        assert!(!twice.door_by_id(door_id).unwrap().is_locked);
    }

    #[test]
    fn test_walls_and_zones() {
        let map = Map::empty(20, 20, 5, GridType::Square, "edit");
        let wall = stable_entity_id("wall");
        let zone = stable_entity_id("zone");
        let drawn = apply_patch(
            &map,
            &[
                PatchAction::DrawWallSegment {
                    id: Some(wall),
                    from: Position::new(0, 0),
                    to: Position::new(0, 5),
                },
                PatchAction::PaintZone {
                    id: Some(zone),
                    zone_type: "water".to_string(),
                    label: "Pool".to_string(),
                    cells: vec![Position::new(3, 3), Position::new(3, 4)],
                },
            ],
        )
        .unwrap()
        .map;
        assert_eq!(drawn.walls.len(), 1);
        assert_eq!(drawn.zones.len(), 1);

        let cleared = apply_patch(
            &drawn,
            &[
                PatchAction::EraseWallSegment { wall_id: wall },
                PatchAction::ClearZone { zone_id: zone },
            ],
        )
        .unwrap()
        .map;
        assert!(cleared.walls.is_empty());
        assert!(cleared.zones.is_empty());
    }

    #[test]
    fn test_renumber_explicit() {
        let map = Map::empty(40, 40, 5, GridType::Square, "edit");
        let map = apply_patch(
            &map,
            &[
                add_room_action("a", 1, 1),
                add_room_action("b", 10, 1),
                add_room_action("c", 20, 1),
            ],
        )
        .unwrap()
        .map;
        let c = stable_entity_id("c");
        let action = PatchAction::RenumberRooms {
            mode: RenumberMode::Explicit,
            order: vec![c, stable_entity_id("ghost"), c],
        };
        let result = apply_patch(&map, &[action]).unwrap().map;
        let numbered: Vec<(EntityId, u32)> =
            result.rooms.iter().map(|room| (room.id, room.number)).collect();
        assert_eq!(
            numbered,
            vec![
                (c, 1),
                (stable_entity_id("a"), 2),
                (stable_entity_id("b"), 3)
            ]
        );
    }

    #[test]
    fn test_patch_size_limits() {
        let map = Map::empty(20, 20, 5, GridType::Square, "edit");
        assert!(matches!(
            apply_patch(&map, &[]),
            Err(CairnError::InvalidAction(_))
        ));

        let ghost = stable_entity_id("ghost");
        let too_many = vec![PatchAction::RemoveRoom { room_id: ghost }; config::MAX_PATCH_ACTIONS + 1];
        assert!(apply_patch(&map, &too_many).is_err());

        let at_limit = vec![PatchAction::RemoveRoom { room_id: ghost }; config::MAX_PATCH_ACTIONS];
        assert_eq!(apply_patch(&map, &at_limit).unwrap().outcomes.len(), 100);
    }

    #[test]
    fn test_malformed_action_rejects_whole_patch() {
        let map = Map::empty(20, 20, 5, GridType::Square, "edit");
        let actions = vec![
            add_room_action("a", 1, 1),
            PatchAction::ResizeRoom {
                room_id: stable_entity_id("a"),
                width: -1,
                height: 3,
            },
        ];
        let err = apply_patch(&map, &actions).unwrap_err();
        assert!(err.to_string().contains("action 1"));
    }

    #[test]
    fn test_patch_keeps_history_and_refreshes_timestamp() {
        let mut map = Map::empty(20, 20, 5, GridType::Square, "edit");
        map.metadata.generated_at = 0;
        let result = apply_patch(&map, &[add_room_action("a", 1, 1)]).unwrap();
        assert!(result.map.metadata.generated_at > 0);
        assert_eq!(result.map.metadata.pass_history, map.metadata.pass_history);
        assert!(map.rooms.is_empty());
    }
}
