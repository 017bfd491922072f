//! Combat resolution
//!
//! Hit/miss determination and damage rolls for a single exchange. The same
//! arithmetic serves a monster attacking a player; the receiving side of an
//! exchange is handled by whoever owns the defender's vitals
//! (see [`crate::monster::Monster::get_attacked`] for monsters).

mod damage_kind;

use serde::{Deserialize, Serialize};

use crate::consts::GRAZE_CHANCE;
use crate::magic::SpellId;
use crate::rng::GameRng;

pub use damage_kind::DamageKind;

/// Offensive side of an exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AttackProfile {
    /// Hit rating compared against the defender's defense rate
    pub success: i32,
    pub damage_min: i32,
    pub damage_max: i32,
    /// Innate spell cast with every attack, if any
    pub spell: Option<SpellId>,
    /// Damage range of `spell`, added on top of the weapon range
    pub spell_damage: Option<(i32, i32)>,
}

/// Defensive side of an exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DefenseProfile {
    pub defense: i32,
    pub defense_rate: i32,
}

/// Result of one resolved attack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackOutcome {
    pub damage: i32,
    pub kind: DamageKind,
    /// Spell the attack was delivered with, reported to the defender
    pub spell: Option<SpellId>,
}

impl AttackOutcome {
    pub fn is_miss(&self) -> bool {
        self.kind.is_miss()
    }
}

/// Returns true when the attack lands.
///
/// An attacker whose accuracy is below the defense rate still lands 5% of
/// the time; otherwise a roll in `0..accuracy` below the defense rate misses.
pub fn miss_check(rng: &mut GameRng, accuracy: i32, defense_rate: i32) -> bool {
    if accuracy < defense_rate {
        rng.rn2(100) < GRAZE_CHANCE
    } else {
        (rng.rn2(accuracy.max(0) as u32) as i32) >= defense_rate
    }
}

/// Raw damage before the defender's defense is subtracted
pub fn roll_damage(rng: &mut GameRng, attacker: &AttackProfile) -> i32 {
    match attacker.spell_damage {
        Some((spell_min, spell_max)) => rng.between(
            spell_min + attacker.damage_min,
            spell_max + attacker.damage_max,
        ),
        None => rng.between(attacker.damage_min, attacker.damage_max),
    }
}

/// Resolve one attack: miss check, damage roll, defense, clamp at zero
pub fn resolve_attack(
    rng: &mut GameRng,
    attacker: &AttackProfile,
    defender: &DefenseProfile,
) -> AttackOutcome {
    if !miss_check(rng, attacker.success, defender.defense_rate) {
        return AttackOutcome {
            damage: 0,
            kind: DamageKind::Miss,
            spell: attacker.spell,
        };
    }

    let damage = (roll_damage(rng, attacker) - defender.defense).max(0);
    AttackOutcome {
        damage,
        kind: DamageKind::Regular,
        spell: attacker.spell,
    }
}
