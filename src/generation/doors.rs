//! # Door Generation
//!
//! Places doors at corridor ends.

use crate::{
    stable_entity_id, CairnError, CairnResult, Corridor, Door, GenerationContext, Generator,
    PassKind, Position, SeededRandom,
};

/// Considers both ends of every corridor independently for a door.
#[derive(Debug, Clone, Copy, Default)]
pub struct DoorGenerator;

impl DoorGenerator {
    fn corridor_ends(corridor: &Corridor) -> Vec<Position> {
        match (corridor.points.first(), corridor.points.last()) {
            (Some(first), Some(last)) => vec![*first, *last],
            _ => Vec::new(),
        }
    }
}

impl Generator<Vec<Door>> for DoorGenerator {
    fn generate(&self, context: &GenerationContext<'_>, rng: &mut SeededRandom) -> CairnResult<Vec<Door>> {
        let config = context.config;
        let mut doors = Vec::new();

        for corridor in context.corridors {
            for position in Self::corridor_ends(corridor) {
                if !rng.chance(config.door_frequency) {
                    continue;
                }
                let is_locked = rng.chance(config.locked_door_chance);
                let is_secret = rng.chance(config.secret_door_chance);
                let is_special = rng.chance(config.special_door_chance);
                doors.push(Door {
                    id: stable_entity_id(&format!(
                        "door:{}:{},{}",
                        corridor.id, position.x, position.y
                    )),
                    position,
                    corridor_id: corridor.id,
                    is_locked,
                    is_secret,
                    is_special,
                });
            }
        }

        Ok(doors)
    }

    fn validate(&self, doors: &Vec<Door>, context: &GenerationContext<'_>) -> CairnResult<()> {
        for door in doors {
            if !context.corridors.iter().any(|c| c.id == door.corridor_id) {
                return Err(CairnError::IntegrityViolation(format!(
                    "door {} generated for missing corridor {}",
                    door.id, door.corridor_id
                )));
            }
        }
        Ok(())
    }

    fn pass(&self) -> PassKind {
        PassKind::Doors
    }

    fn generator_type(&self) -> &'static str {
        "DoorGenerator"
    }
}
