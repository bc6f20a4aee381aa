//! # Trap Generation
//!
//! Rolls at most one trap per room, with severity-scaled difficulty classes.

use crate::{
    stable_entity_id, CairnResult, GenerationContext, Generator, PassKind, SeededRandom, Trap,
    TrapSeverity,
};

use super::{random_cell, validate_room_refs};

#[derive(Debug, Clone, Copy, Default)]
pub struct TrapGenerator;

/// Severity ladder: 20% high, 40% medium, 40% low.
pub fn roll_trap_severity(roll: f64) -> TrapSeverity {
    if roll < 0.2 {
        TrapSeverity::High
    } else if roll < 0.6 {
        TrapSeverity::Medium
    } else {
        TrapSeverity::Low
    }
}

impl Generator<Vec<Trap>> for TrapGenerator {
    fn generate(&self, context: &GenerationContext<'_>, rng: &mut SeededRandom) -> CairnResult<Vec<Trap>> {
        let config = context.config;
        let mut traps = Vec::new();

        for room in context.rooms {
            if !rng.chance(config.trap_density) {
                continue;
            }
            let severity = roll_trap_severity(rng.next_float());
            let detect_dc = severity.base_dc() + rng.int_in(0, 3) as u32;
            let disarm_dc = severity.base_dc() + rng.int_in(0, 3) as u32;
            let name = rng
                .pick(config.theme.trap_names())
                .copied()
                .unwrap_or("hidden trap")
                .to_string();
            let position = random_cell(room, rng);

            traps.push(Trap {
                id: stable_entity_id(&format!("trap:{}", room.id)),
                room_id: room.id,
                position,
                name,
                severity,
                detect_dc,
                disarm_dc,
                is_locked: false,
            });
        }

        Ok(traps)
    }

    fn validate(&self, traps: &Vec<Trap>, context: &GenerationContext<'_>) -> CairnResult<()> {
        validate_room_refs("trap", traps.iter().map(|t| (t.id, t.room_id)), context)
    }

    fn pass(&self) -> PassKind {
        PassKind::Traps
    }

    fn generator_type(&self) -> &'static str {
        "TrapGenerator"
    }
}
