//! # Dressing Generation
//!
//! Flavour objects that make rooms feel lived in.

use crate::{
    stable_entity_id, CairnResult, Dressing, DressingCategory, GenerationContext, Generator,
    PassKind, SeededRandom,
};

use super::{random_cell, validate_room_refs};

#[derive(Debug, Clone, Copy, Default)]
pub struct DressingGenerator;

pub fn roll_dressing_category(roll: f64) -> DressingCategory {
    if roll < 0.35 {
        DressingCategory::Furniture
    } else if roll < 0.6 {
        DressingCategory::Debris
    } else if roll < 0.8 {
        DressingCategory::Light
    } else {
        DressingCategory::Feature
    }
}

impl Generator<Vec<Dressing>> for DressingGenerator {
    fn generate(
        &self,
        context: &GenerationContext<'_>,
        rng: &mut SeededRandom,
    ) -> CairnResult<Vec<Dressing>> {
        let config = context.config;
        let mut dressing = Vec::new();

        for room in context.rooms {
            if !rng.chance(config.dressing_density) {
                continue;
            }
            let category = roll_dressing_category(rng.next_float());
            let description = rng
                .pick(config.theme.dressing(category))
                .copied()
                .unwrap_or("nothing of note")
                .to_string();
            let position = random_cell(room, rng);

            dressing.push(Dressing {
                id: stable_entity_id(&format!("dressing:{}", room.id)),
                room_id: room.id,
                position,
                category,
                description,
                is_locked: false,
            });
        }

        Ok(dressing)
    }

    fn validate(&self, dressing: &Vec<Dressing>, context: &GenerationContext<'_>) -> CairnResult<()> {
        validate_room_refs(
            "dressing",
            dressing.iter().map(|d| (d.id, d.room_id)),
            context,
        )
    }

    fn pass(&self) -> PassKind {
        PassKind::Dressing
    }

    fn generator_type(&self) -> &'static str {
        "DressingGenerator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_ladder() {
        assert_eq!(roll_dressing_category(0.1), DressingCategory::Furniture);
        assert_eq!(roll_dressing_category(0.4), DressingCategory::Debris);
        assert_eq!(roll_dressing_category(0.7), DressingCategory::Light);
        assert_eq!(roll_dressing_category(0.95), DressingCategory::Feature);
    }
}
