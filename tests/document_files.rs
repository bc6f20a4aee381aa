//! Map documents written to and read back from disk

use cairn::{apply_patch, generate_base_map, CairnResult, GeneratorConfig, Map, PatchAction};
use serde_json::json;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_map_document_file_round_trip() -> CairnResult<()> {
    let dir = tempdir()?;
    let path = dir.path().join("map.json");

    let map = generate_base_map("files", &GeneratorConfig::for_testing())?;
    fs::write(&path, serde_json::to_string_pretty(&map)?)?;

    let restored: Map = serde_json::from_str(&fs::read_to_string(&path)?)?;
    assert_eq!(restored, map);
    restored.check_integrity()?;
    Ok(())
}

#[test]
fn test_actions_document_drives_a_patch() -> CairnResult<()> {
    let dir = tempdir()?;
    let map = generate_base_map("files", &GeneratorConfig::for_testing())?;
    let first = map.rooms[0].id;

    let actions_path = dir.path().join("actions.json");
    let actions = json!([
        { "type": "TOGGLE_LOCK", "category": "ENCOUNTERS", "entityId": first },
        { "type": "PAINT_ZONE", "zoneType": "fog", "cells": [{ "x": 1, "y": 1 }] },
        { "type": "REMOVE_ROOM", "roomId": first },
        { "type": "MOVE_ROOM", "roomId": first, "x": 3, "y": 3 }
    ]);
    fs::write(&actions_path, actions.to_string())?;

    let parsed: Vec<PatchAction> = serde_json::from_str(&fs::read_to_string(&actions_path)?)?;
    let result = apply_patch(&map, &parsed)?;

    // The lock toggle names a room id, not an encounter; the move comes after the removal.
    assert!(!result.outcomes[0].is_applied());
    assert!(result.outcomes[1].is_applied());
    assert!(result.outcomes[2].is_applied());
    assert!(!result.outcomes[3].is_applied());
    assert_eq!(result.map.zones.len(), 1);
    assert!(!result.map.has_room(first));
    result.map.check_integrity()?;
    Ok(())
}

#[test]
fn test_partial_config_document() -> CairnResult<()> {
    let dir = tempdir()?;
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{ "width": 64, "corridorStyle": "WINDING", "theme": "ruins" }"#)?;

    let config: GeneratorConfig = serde_json::from_str(&fs::read_to_string(&path)?)?;
    assert_eq!(config.width, 64);
    assert_eq!(config.height, GeneratorConfig::default().height);
    config.validate()?;
    Ok(())
}
