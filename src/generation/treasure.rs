//! # Treasure Generation
//!
//! Treasure hoards with independently rolled rarity and category.

use crate::{
    stable_entity_id, CairnResult, GenerationContext, Generator, PassKind, SeededRandom, Treasure,
    TreasureCategory, TreasureRarity,
};

use super::{random_cell, validate_room_refs};

#[derive(Debug, Clone, Copy, Default)]
pub struct TreasureGenerator;

pub fn roll_treasure_rarity(roll: f64) -> TreasureRarity {
    if roll < 0.05 {
        TreasureRarity::Legendary
    } else if roll < 0.2 {
        TreasureRarity::Rare
    } else if roll < 0.5 {
        TreasureRarity::Uncommon
    } else {
        TreasureRarity::Common
    }
}

pub fn roll_treasure_category(roll: f64) -> TreasureCategory {
    if roll < 0.4 {
        TreasureCategory::Coin
    } else if roll < 0.65 {
        TreasureCategory::Gem
    } else if roll < 0.85 {
        TreasureCategory::Art
    } else {
        TreasureCategory::MagicItem
    }
}

fn describe(rarity: TreasureRarity, category: TreasureCategory) -> String {
    let quality = match rarity {
        TreasureRarity::Common => "a modest",
        TreasureRarity::Uncommon => "a fine",
        TreasureRarity::Rare => "a rare",
        TreasureRarity::Legendary => "a legendary",
    };
    let object = match category {
        TreasureCategory::Coin => "purse of coins",
        TreasureCategory::Gem => "cache of gemstones",
        TreasureCategory::Art => "art object",
        TreasureCategory::MagicItem => "magic item",
    };
    format!("{quality} {object}")
}

impl Generator<Vec<Treasure>> for TreasureGenerator {
    fn generate(
        &self,
        context: &GenerationContext<'_>,
        rng: &mut SeededRandom,
    ) -> CairnResult<Vec<Treasure>> {
        let config = context.config;
        let mut treasures = Vec::new();

        for room in context.rooms {
            if !rng.chance(config.treasure_density) {
                continue;
            }
            let rarity = roll_treasure_rarity(rng.next_float());
            let category = roll_treasure_category(rng.next_float());
            let value_gp = rarity.base_value() * rng.int_in(1, 6) as u32;
            let position = random_cell(room, rng);

            treasures.push(Treasure {
                id: stable_entity_id(&format!("treasure:{}", room.id)),
                room_id: room.id,
                position,
                rarity,
                category,
                value_gp,
                description: describe(rarity, category),
                is_locked: false,
            });
        }

        Ok(treasures)
    }

    fn validate(&self, treasures: &Vec<Treasure>, context: &GenerationContext<'_>) -> CairnResult<()> {
        validate_room_refs(
            "treasure",
            treasures.iter().map(|t| (t.id, t.room_id)),
            context,
        )
    }

    fn pass(&self) -> PassKind {
        PassKind::Treasure
    }

    fn generator_type(&self) -> &'static str {
        "TreasureGenerator"
    }
}
