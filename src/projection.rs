//! # Player-Safe Projection
//!
//! Derives the view of a map that can be shown to players: secret rooms,
//! secret doors and everything hanging off them are removed.

use crate::{EntityId, Map, RoomScoped};
use log::debug;
use std::collections::HashSet;

/// Returns a copy of `map` with all secret content stripped.
///
/// The projection is idempotent. Zones and wall segments pass through
/// unfiltered.
///
/// # Examples
///
/// ```
/// use cairn::{generate_base_map, to_player_safe_map, GeneratorConfig};
///
/// let map = generate_base_map("doc", &GeneratorConfig::for_testing()).unwrap();
/// let view = to_player_safe_map(&map);
/// assert!(view.rooms.iter().all(|room| !room.is_secret));
/// assert!(view.doors.iter().all(|door| !door.is_secret));
/// ```
pub fn to_player_safe_map(map: &Map) -> Map {
    let visible_rooms: HashSet<EntityId> = map
        .rooms
        .iter()
        .filter(|room| !room.is_secret)
        .map(|room| room.id)
        .collect();

    let corridors: Vec<_> = map
        .corridors
        .iter()
        .filter(|corridor| {
            visible_rooms.contains(&corridor.from_room_id)
                && visible_rooms.contains(&corridor.to_room_id)
        })
        .cloned()
        .collect();
    let visible_corridors: HashSet<EntityId> =
        corridors.iter().map(|corridor| corridor.id).collect();

    let view = Map {
        rooms: map
            .rooms
            .iter()
            .filter(|room| visible_rooms.contains(&room.id))
            .cloned()
            .collect(),
        doors: map
            .doors
            .iter()
            .filter(|door| !door.is_secret && visible_corridors.contains(&door.corridor_id))
            .cloned()
            .collect(),
        corridors,
        traps: visible_content(&map.traps, &visible_rooms),
        encounters: visible_content(&map.encounters, &visible_rooms),
        treasures: visible_content(&map.treasures, &visible_rooms),
        dressing: visible_content(&map.dressing, &visible_rooms),
        ..map.clone()
    };

    debug!(
        "Player view hides {} rooms and {} doors",
        map.rooms.len() - view.rooms.len(),
        map.doors.len() - view.doors.len()
    );
    view
}

fn visible_content<T: RoomScoped + Clone>(items: &[T], visible_rooms: &HashSet<EntityId>) -> Vec<T> {
    items
        .iter()
        .filter(|item| visible_rooms.contains(&item.room_id()))
        .cloned()
        .collect()
}
