//! # Generation Module
//!
//! Seed-driven procedural generation of complete dungeon maps.
//!
//! Generation runs as a pipeline of passes. The layout pass places rooms and
//! routes corridors; the content passes (doors, traps, encounters, treasure,
//! dressing) then decorate that layout. Every pass draws from its own random
//! stream derived from `seed:pass:configHash`, so passes never perturb each
//! other and any single pass can be replayed on its own.

pub mod doors;
pub mod dressing;
pub mod encounters;
pub mod layout;
pub mod themes;
pub mod traps;
pub mod treasure;

pub use doors::*;
pub use dressing::*;
pub use encounters::*;
pub use layout::*;
pub use themes::*;
pub use traps::*;
pub use treasure::*;

use crate::{
    config, fnv1a_32, CairnError, CairnResult, Corridor, GridType, Map, Room, SeededRandom,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// How corridors bend on their way between rooms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CorridorStyle {
    /// Greedy: always try the step that gets closest to the target first
    #[serde(alias = "straight")]
    Straight,
    /// Shuffle the step order on every expansion
    #[serde(alias = "winding")]
    Winding,
    /// Shuffle on some expansions, greedy on the rest
    #[default]
    #[serde(alias = "mixed")]
    Mixed,
}

/// Configuration for procedural generation.
///
/// Every field has a default, so partial documents deserialize.
///
/// # Examples
///
/// ```
/// use cairn::{GeneratorConfig, Theme};
///
/// let config: GeneratorConfig =
///     serde_json::from_str(r#"{"width":60,"height":60,"theme":"crypt"}"#).unwrap();
/// assert_eq!(config.width, 60);
/// assert_eq!(config.theme, Theme::Crypt);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorConfig {
    /// Grid width in cells
    pub width: i32,
    /// Grid height in cells
    pub height: i32,
    /// Size of one cell in feet, carried through for renderers
    pub cell_size: u32,
    pub grid_type: GridType,
    /// Share of the grid rooms should cover (0.0 to 1.0)
    pub room_density: f64,
    pub min_room_size: i32,
    pub max_room_size: i32,
    pub corridor_style: CorridorStyle,
    /// How many loops to add on top of the spanning corridors (0.0 to 1.0)
    pub connectivity_strictness: f64,
    pub secret_room_chance: f64,
    /// Chance of a door at each corridor end
    pub door_frequency: f64,
    pub locked_door_chance: f64,
    pub secret_door_chance: f64,
    pub special_door_chance: f64,
    /// Chance per room of holding a trap
    pub trap_density: f64,
    /// Chance per room of holding an encounter
    pub encounter_density: f64,
    /// Chance per room of holding treasure
    pub treasure_density: f64,
    /// Chance per room of holding dressing
    pub dressing_density: f64,
    pub theme: Theme,
}

impl GeneratorConfig {
    /// Creates a default configuration for a grid of the given size.
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            cell_size: 5,
            grid_type: GridType::Square,
            room_density: 0.35,
            min_room_size: 5,
            max_room_size: 11,
            corridor_style: CorridorStyle::Mixed,
            connectivity_strictness: 0.5,
            secret_room_chance: 0.05,
            door_frequency: 0.6,
            locked_door_chance: 0.2,
            secret_door_chance: 0.08,
            special_door_chance: 0.05,
            trap_density: 0.2,
            encounter_density: 0.35,
            treasure_density: 0.25,
            dressing_density: 0.5,
            theme: Theme::Dungeon,
        }
    }

    /// Default settings for an existing map's grid: size, cell size and grid type.
    pub fn for_map(map: &Map) -> Self {
        Self {
            cell_size: map.cell_size,
            grid_type: map.grid_type,
            ..Self::new(map.width, map.height)
        }
    }

    /// Creates a configuration for testing with small, fast maps.
    pub fn for_testing() -> Self {
        Self {
            room_density: 0.3,
            min_room_size: 3,
            max_room_size: 7,
            ..Self::new(48, 36)
        }
    }

    /// Rejects configurations the generator cannot honour.
    pub fn validate(&self) -> CairnResult<()> {
        if self.width < 16 || self.height < 16 {
            return Err(CairnError::InvalidConfig(format!(
                "grid must be at least 16x16, got {}x{}",
                self.width, self.height
            )));
        }
        if self.min_room_size < 3 {
            return Err(CairnError::InvalidConfig(format!(
                "minRoomSize must be at least 3, got {}",
                self.min_room_size
            )));
        }
        if self.max_room_size <= self.min_room_size {
            return Err(CairnError::InvalidConfig(format!(
                "maxRoomSize ({}) must exceed minRoomSize ({})",
                self.max_room_size, self.min_room_size
            )));
        }
        if self.max_room_size > self.width.min(self.height) - 2 {
            return Err(CairnError::InvalidConfig(format!(
                "maxRoomSize ({}) does not fit a {}x{} grid",
                self.max_room_size, self.width, self.height
            )));
        }
        if !(self.room_density > 0.0 && self.room_density <= 1.0) {
            return Err(CairnError::InvalidConfig(format!(
                "roomDensity must be in (0, 1], got {}",
                self.room_density
            )));
        }

        let probabilities = [
            ("connectivityStrictness", self.connectivity_strictness),
            ("secretRoomChance", self.secret_room_chance),
            ("doorFrequency", self.door_frequency),
            ("lockedDoorChance", self.locked_door_chance),
            ("secretDoorChance", self.secret_door_chance),
            ("specialDoorChance", self.special_door_chance),
            ("trapDensity", self.trap_density),
            ("encounterDensity", self.encounter_density),
            ("treasureDensity", self.treasure_density),
            ("dressingDensity", self.dressing_density),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(CairnError::InvalidConfig(format!(
                    "{name} must be in [0, 1], got {value}"
                )));
            }
        }

        Ok(())
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::new(80, 60)
    }
}

/// Fingerprint of a seed and configuration: FNV-1a over the seed followed by
/// the JSON form of the config, as 8 hex digits.
///
/// Changes exactly when the seed or any config field changes.
pub fn config_hash(seed: &str, config: &GeneratorConfig) -> CairnResult<String> {
    let serialized = serde_json::to_string(config)?;
    Ok(format!("{:08x}", fnv1a_32(&format!("{seed}{serialized}"))))
}

/// The generation steps, each with its own random stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PassKind {
    Layout,
    Doors,
    Traps,
    Encounters,
    Treasure,
    Dressing,
}

impl PassKind {
    /// Label mixed into the pass's random stream.
    pub fn label(self) -> &'static str {
        match self {
            PassKind::Layout => "layout",
            PassKind::Doors => "doors",
            PassKind::Traps => "traps",
            PassKind::Encounters => "encounters",
            PassKind::Treasure => "treasure",
            PassKind::Dressing => "dressing",
        }
    }
}

/// Everything a pass may read while generating.
#[derive(Debug, Clone, Copy)]
pub struct GenerationContext<'a> {
    pub seed: &'a str,
    pub config: &'a GeneratorConfig,
    pub config_hash: &'a str,
    /// Rooms of the layout being decorated (empty for the layout pass)
    pub rooms: &'a [Room],
    /// Corridors of the layout being decorated (empty for the layout pass)
    pub corridors: &'a [Corridor],
}

/// Trait for procedural generation passes.
///
/// All passes implement this trait so the pipeline and the regeneration
/// orchestrator can drive them uniformly.
pub trait Generator<T> {
    /// Generates content from the context, drawing only from `rng`.
    fn generate(&self, context: &GenerationContext<'_>, rng: &mut SeededRandom) -> CairnResult<T>;

    /// Validates that the generated content references only what exists in the context.
    fn validate(&self, content: &T, context: &GenerationContext<'_>) -> CairnResult<()>;

    /// Which pass this generator implements.
    fn pass(&self) -> PassKind;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Runs one pass on its derived stream and validates the result.
pub fn run_pass<T, G: Generator<T>>(
    generator: &G,
    context: &GenerationContext<'_>,
) -> CairnResult<T> {
    let mut rng =
        SeededRandom::for_pass(context.seed, generator.pass().label(), context.config_hash);
    let content = generator.generate(context, &mut rng)?;
    generator.validate(&content, context)?;
    debug!("{} finished", generator.generator_type());
    Ok(content)
}

/// Checks that every item's room exists in the context.
pub(crate) fn validate_room_refs<I>(
    kind: &str,
    items: I,
    context: &GenerationContext<'_>,
) -> CairnResult<()>
where
    I: IntoIterator<Item = (crate::EntityId, crate::EntityId)>,
{
    for (id, room_id) in items {
        if !context.rooms.iter().any(|room| room.id == room_id) {
            return Err(CairnError::IntegrityViolation(format!(
                "{kind} {id} generated for missing room {room_id}"
            )));
        }
    }
    Ok(())
}

/// A uniformly chosen cell inside `room`.
pub(crate) fn random_cell(room: &Room, rng: &mut SeededRandom) -> crate::Position {
    crate::Position::new(
        rng.int_in(room.x, room.right()),
        rng.int_in(room.y, room.bottom()),
    )
}

/// Generates a complete map from a seed and configuration.
///
/// Identical arguments always produce identical rooms, corridors, content and
/// config hash; only `metadata.generatedAt` differs between calls.
pub fn generate_base_map(seed: &str, config: &GeneratorConfig) -> CairnResult<Map> {
    config.validate()?;
    let hash = config_hash(seed, config)?;
    info!(
        "Generating {}x{} map with seed {:?} (config {})",
        config.width, config.height, seed, hash
    );

    let base = GenerationContext {
        seed,
        config,
        config_hash: &hash,
        rooms: &[],
        corridors: &[],
    };
    let layout = run_pass(&LayoutGenerator, &base)?;

    let context = GenerationContext {
        rooms: &layout.rooms,
        corridors: &layout.corridors,
        ..base
    };
    let doors = run_pass(&DoorGenerator, &context)?;
    let traps = run_pass(&TrapGenerator, &context)?;
    let encounters = run_pass(&EncounterGenerator, &context)?;
    let treasures = run_pass(&TreasureGenerator, &context)?;
    let dressing = run_pass(&DressingGenerator, &context)?;

    let mut map = Map::empty(config.width, config.height, config.cell_size, config.grid_type, seed);
    map.metadata.algorithm_version = config::ALGORITHM_VERSION.to_string();
    map.metadata.config_hash = hash;
    map.rooms = layout.rooms;
    map.corridors = layout.corridors;
    map.doors = doors;
    map.traps = traps;
    map.encounters = encounters;
    map.treasures = treasures;
    map.dressing = dressing;

    info!(
        "Generated {} rooms, {} corridors, {} doors",
        map.rooms.len(),
        map.corridors.len(),
        map.doors.len()
    );
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_generator_config_creation() {
        let config = GeneratorConfig::new(60, 40);
        assert_eq!(config.width, 60);
        assert_eq!(config.height, 40);
        assert!(config.min_room_size >= 3);
        assert!(config.max_room_size > config.min_room_size);
        assert!(config.validate().is_ok());
        assert!(GeneratorConfig::for_testing().validate().is_ok());
    }

    #[test]
    fn test_config_for_map_keeps_grid_settings() {
        let config = GeneratorConfig {
            cell_size: 10,
            grid_type: GridType::Hex,
            ..GeneratorConfig::for_testing()
        };
        let map = generate_base_map("for-map", &config).unwrap();

        let derived = GeneratorConfig::for_map(&map);
        assert_eq!(derived.width, config.width);
        assert_eq!(derived.height, config.height);
        assert_eq!(derived.cell_size, 10);
        assert_eq!(derived.grid_type, GridType::Hex);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: GeneratorConfig =
            serde_json::from_value(json!({"width": 60, "height": 60, "theme": "crypt"})).unwrap();
        assert_eq!(config.theme, Theme::Crypt);
        assert_eq!(config.corridor_style, CorridorStyle::Mixed);
        assert_eq!(config.min_room_size, GeneratorConfig::default().min_room_size);
    }

    #[test]
    fn test_config_validation_rejects_bad_sizes() {
        let mut config = GeneratorConfig::new(60, 60);
        config.max_room_size = config.min_room_size;
        assert!(matches!(config.validate(), Err(CairnError::InvalidConfig(_))));

        let mut config = GeneratorConfig::new(60, 60);
        config.door_frequency = 1.5;
        assert!(config.validate().is_err());

        assert!(GeneratorConfig::new(8, 60).validate().is_err());
    }

    #[test]
    fn test_config_hash_tracks_inputs() {
        let config = GeneratorConfig::new(60, 60);
        let hash = config_hash("seed", &config).unwrap();
        assert_eq!(hash.len(), 8);
        assert_eq!(hash, config_hash("seed", &config).unwrap());
        assert_ne!(hash, config_hash("other", &config).unwrap());

        let mut changed = config.clone();
        changed.trap_density = 0.9;
        assert_ne!(hash, config_hash("seed", &changed).unwrap());
    }

    #[test]
    fn test_generate_base_map_is_valid() {
        let map = generate_base_map("unit", &GeneratorConfig::for_testing()).unwrap();
        assert!(map.rooms.len() >= 2);
        assert!(!map.corridors.is_empty());
        assert!(map.check_integrity().is_ok());
        assert!(map.metadata.pass_history.is_empty());
        assert_eq!(map.metadata.seed, "unit");
    }

    #[test]
    fn test_generate_rejects_invalid_config() {
        let mut config = GeneratorConfig::for_testing();
        config.min_room_size = 9;
        config.max_room_size = 4;
        assert!(generate_base_map("unit", &config).is_err());
    }
}
