//! # Regeneration
//!
//! Full and category-scoped regeneration of an existing map.
//!
//! A full (or layout) regeneration throws the old geometry away and runs the
//! whole pipeline. A scoped regeneration keeps rooms and corridors and reruns
//! a single content pass over them, optionally keeping every item the user
//! locked. Either way one pass history entry is appended.

use crate::{
    config, config_hash, generate_base_map, now_millis, run_pass, CairnResult, ChangeCounts,
    DoorGenerator, DressingGenerator, EncounterGenerator, GenerationContext, GeneratorConfig,
    Lockable, Map, PassHistoryEntry, PassKind, TrapGenerator, TreasureGenerator,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What a regeneration call rebuilds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegenerationScope {
    Full,
    Layout,
    Doors,
    Traps,
    Encounters,
    Treasure,
    Dressing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegenerateOptions {
    /// Keep locked items from the existing map instead of their fresh replacements
    pub preserve_locks: bool,
}

impl Default for RegenerateOptions {
    fn default() -> Self {
        Self {
            preserve_locks: true,
        }
    }
}

/// Regenerates `existing` according to `scope`, returning a new map.
///
/// # Examples
///
/// ```
/// use cairn::{
///     generate_base_map, regenerate, GeneratorConfig, RegenerateOptions, RegenerationScope,
/// };
///
/// let config = GeneratorConfig::for_testing();
/// let map = generate_base_map("doc", &config).unwrap();
/// let options = RegenerateOptions::default();
/// let regenerated = regenerate(RegenerationScope::Traps, "doc", &config, &map, options).unwrap();
/// assert_eq!(regenerated.rooms, map.rooms);
/// assert_eq!(regenerated.metadata.pass_history.len(), 1);
/// ```
pub fn regenerate(
    scope: RegenerationScope,
    seed: &str,
    config: &GeneratorConfig,
    existing: &Map,
    options: RegenerateOptions,
) -> CairnResult<Map> {
    let started_at = now_millis();
    info!("Regenerating {:?} with seed {:?}", scope, seed);

    config.validate()?;
    let hash = config_hash(seed, config)?;
    let context = GenerationContext {
        seed,
        config,
        config_hash: &hash,
        rooms: &existing.rooms,
        corridors: &existing.corridors,
    };

    let mut map = existing.clone();
    let preserve = options.preserve_locks;
    let mut changed = ChangeCounts::default();
    let pass = match scope {
        RegenerationScope::Full | RegenerationScope::Layout => {
            return rebuild(scope, seed, config, existing, started_at);
        }
        RegenerationScope::Doors => {
            let fresh = run_pass(&DoorGenerator, &context)?;
            map.doors = merge_locked(fresh, &existing.doors, preserve);
            changed.doors = map.doors.len();
            PassKind::Doors
        }
        RegenerationScope::Traps => {
            let fresh = run_pass(&TrapGenerator, &context)?;
            map.traps = merge_locked(fresh, &existing.traps, preserve);
            changed.traps = map.traps.len();
            PassKind::Traps
        }
        RegenerationScope::Encounters => {
            let fresh = run_pass(&EncounterGenerator, &context)?;
            map.encounters = merge_locked(fresh, &existing.encounters, preserve);
            changed.encounters = map.encounters.len();
            PassKind::Encounters
        }
        RegenerationScope::Treasure => {
            let fresh = run_pass(&TreasureGenerator, &context)?;
            map.treasures = merge_locked(fresh, &existing.treasures, preserve);
            changed.treasures = map.treasures.len();
            PassKind::Treasure
        }
        RegenerationScope::Dressing => {
            let fresh = run_pass(&DressingGenerator, &context)?;
            map.dressing = merge_locked(fresh, &existing.dressing, preserve);
            changed.dressing = map.dressing.len();
            PassKind::Dressing
        }
    };

    map.metadata.algorithm_version = config::ALGORITHM_VERSION.to_string();
    map.metadata.config_hash = hash;
    map.metadata.seed = seed.to_string();
    map.metadata.generated_at = now_millis();
    let entry = history_entry(pass, scope, started_at, &map, changed);
    map.record_pass(entry);

    info!("Regenerated {:?}: {:?}", scope, changed);
    Ok(map)
}

/// Discards the existing geometry and runs the whole pipeline, carrying the
/// pass history over.
fn rebuild(
    scope: RegenerationScope,
    seed: &str,
    config: &GeneratorConfig,
    existing: &Map,
    started_at: u64,
) -> CairnResult<Map> {
    let mut map = generate_base_map(seed, config)?;
    map.metadata.pass_history = existing.metadata.pass_history.clone();
    let entry = history_entry(PassKind::Layout, scope, started_at, &map, map.change_counts());
    map.record_pass(entry);
    info!("Rebuilt map: {} rooms, {} corridors", map.rooms.len(), map.corridors.len());
    Ok(map)
}

/// Replaces each fresh item with its locked predecessor, if there is one.
///
/// Previous items without a fresh counterpart are dropped, locked or not.
pub fn merge_locked<T: Lockable + Clone>(
    fresh: Vec<T>,
    previous: &[T],
    preserve_locks: bool,
) -> Vec<T> {
    if !preserve_locks {
        return fresh;
    }

    let locked: HashMap<T::Identity, &T> = previous
        .iter()
        .filter(|item| item.is_locked())
        .map(|item| (item.identity(), item))
        .collect();

    let mut kept = 0;
    let merged: Vec<T> = fresh
        .into_iter()
        .map(|item| match locked.get(&item.identity()) {
            Some(prior) => {
                kept += 1;
                (*prior).clone()
            }
            None => item,
        })
        .collect();
    debug!("Kept {} locked items", kept);
    merged
}

fn history_entry(
    pass: PassKind,
    scope: RegenerationScope,
    started_at: u64,
    map: &Map,
    changed: ChangeCounts,
) -> PassHistoryEntry {
    PassHistoryEntry {
        pass,
        scope,
        started_at,
        finished_at: now_millis(),
        seed: map.metadata.seed.clone(),
        config_hash: map.metadata.config_hash.clone(),
        changed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{stable_entity_id, Position, Trap, TrapSeverity};

    fn trap(name: &str, locked: bool) -> Trap {
        Trap {
            id: stable_entity_id("trap:room"),
            room_id: stable_entity_id("room"),
            position: Position::new(1, 1),
            name: name.to_string(),
            severity: TrapSeverity::Low,
            detect_dc: 10,
            disarm_dc: 10,
            is_locked: locked,
        }
    }

    #[test]
    fn test_merge_keeps_locked_predecessor() {
        let merged = merge_locked(vec![trap("fresh", false)], &[trap("old", true)], true);
        assert_eq!(merged[0].name, "old");
        assert!(merged[0].is_locked);
    }

    #[test]
    fn test_merge_ignores_unlocked_predecessor() {
        let merged = merge_locked(vec![trap("fresh", false)], &[trap("old", false)], true);
        assert_eq!(merged[0].name, "fresh");
    }

    #[test]
    fn test_merge_without_preserve_takes_fresh() {
        let merged = merge_locked(vec![trap("fresh", false)], &[trap("old", true)], false);
        assert_eq!(merged[0].name, "fresh");
    }

    #[test]
    fn test_merge_drops_locked_item_without_counterpart() {
        let merged: Vec<Trap> = merge_locked(Vec::new(), &[trap("old", true)], true);
        assert!(merged.is_empty());
    }

    #[test]
    fn test_full_regeneration_appends_history() {
        let config = GeneratorConfig::for_testing();
        let map = generate_base_map("history", &config).unwrap();
        let options = RegenerateOptions::default();
        let once = regenerate(RegenerationScope::Full, "history", &config, &map, options).unwrap();
        let twice = regenerate(RegenerationScope::Layout, "other", &config, &once, options).unwrap();

        let history = &twice.metadata.pass_history;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].scope, RegenerationScope::Full);
        assert_eq!(history[1].scope, RegenerationScope::Layout);
        assert!(history.iter().all(|entry| entry.pass == PassKind::Layout));
        assert_eq!(history[1].changed.rooms, twice.rooms.len());
        assert_eq!(history[1].seed, "other");
    }

    #[test]
    fn test_scoped_regeneration_only_touches_its_category() {
        let config = GeneratorConfig::for_testing();
        let map = generate_base_map("scoped", &config).unwrap();
        let mut other = config.clone();
        other.encounter_density = 1.0;

        let regenerated = regenerate(
            RegenerationScope::Encounters,
            "scoped",
            &other,
            &map,
            RegenerateOptions::default(),
        )
        .unwrap();
        assert_eq!(regenerated.rooms, map.rooms);
        assert_eq!(regenerated.corridors, map.corridors);
        assert_eq!(regenerated.doors, map.doors);
        assert_eq!(regenerated.traps, map.traps);
        assert_eq!(regenerated.encounters.len(), map.rooms.len());
        assert_ne!(regenerated.metadata.config_hash, map.metadata.config_hash);

        let entry = &regenerated.metadata.pass_history[0];
        assert_eq!(entry.pass, PassKind::Encounters);
        assert_eq!(entry.changed.encounters, map.rooms.len());
        assert_eq!(entry.changed.doors, 0);
    }
}
