//! # Encounter Generation
//!
//! Procedural encounter placement: at most one creature group per room.

use crate::{
    stable_entity_id, CairnResult, Encounter, EncounterDifficulty, GenerationContext, Generator,
    PassKind, SeededRandom,
};

use super::{random_cell, validate_room_refs};

#[derive(Debug, Clone, Copy, Default)]
pub struct EncounterGenerator;

/// Difficulty ladder: 20% deadly, 25% hard, 30% medium, 25% easy.
pub fn roll_encounter_difficulty(roll: f64) -> EncounterDifficulty {
    if roll < 0.2 {
        EncounterDifficulty::Deadly
    } else if roll < 0.45 {
        EncounterDifficulty::Hard
    } else if roll < 0.75 {
        EncounterDifficulty::Medium
    } else {
        EncounterDifficulty::Easy
    }
}

impl Generator<Vec<Encounter>> for EncounterGenerator {
    fn generate(
        &self,
        context: &GenerationContext<'_>,
        rng: &mut SeededRandom,
    ) -> CairnResult<Vec<Encounter>> {
        let config = context.config;
        let mut encounters = Vec::new();

        for room in context.rooms {
            if !rng.chance(config.encounter_density) {
                continue;
            }
            let difficulty = roll_encounter_difficulty(rng.next_float());
            let count = rng.int_in(1, difficulty.max_group() as i32) as u32;
            let creature = rng
                .pick(config.theme.creatures())
                .copied()
                .unwrap_or("wandering monster")
                .to_string();
            let position = random_cell(room, rng);

            encounters.push(Encounter {
                id: stable_entity_id(&format!("encounter:{}", room.id)),
                room_id: room.id,
                position,
                creature,
                count,
                difficulty,
                is_locked: false,
            });
        }

        Ok(encounters)
    }

    fn validate(&self, encounters: &Vec<Encounter>, context: &GenerationContext<'_>) -> CairnResult<()> {
        validate_room_refs(
            "encounter",
            encounters.iter().map(|e| (e.id, e.room_id)),
            context,
        )
    }

    fn pass(&self) -> PassKind {
        PassKind::Encounters
    }

    fn generator_type(&self) -> &'static str {
        "EncounterGenerator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_ladder() {
        assert_eq!(roll_encounter_difficulty(0.1), EncounterDifficulty::Deadly);
        assert_eq!(roll_encounter_difficulty(0.2), EncounterDifficulty::Hard);
        assert_eq!(roll_encounter_difficulty(0.44), EncounterDifficulty::Hard);
        assert_eq!(roll_encounter_difficulty(0.45), EncounterDifficulty::Medium);
        assert_eq!(roll_encounter_difficulty(0.75), EncounterDifficulty::Easy);
        assert_eq!(roll_encounter_difficulty(0.99), EncounterDifficulty::Easy);
    }

    #[test]
    fn test_group_size_within_difficulty_cap() {
        use crate::{GeneratorConfig, Room};

        let mut config = GeneratorConfig::for_testing();
        config.encounter_density = 1.0;
        let rooms: Vec<Room> = (0..10)
            .map(|i| Room::new(stable_entity_id(&format!("e{i}")), i + 1, 1, 1, 3, 3))
            .collect();
        let context = GenerationContext {
            seed: "encounters",
            config: &config,
            config_hash: "00000000",
            rooms: &rooms,
            corridors: &[],
        };
        let mut rng = SeededRandom::new("encounters");
        let encounters = EncounterGenerator.generate(&context, &mut rng).unwrap();

        assert_eq!(encounters.len(), 10);
        for encounter in &encounters {
            assert!(encounter.count >= 1);
            assert!(encounter.count <= encounter.difficulty.max_group());
            assert!(config.theme.creatures().contains(&encounter.creature.as_str()));
        }
    }
}
