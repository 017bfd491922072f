//! Simulation constants

/// Highest valid coordinate on either map axis (maps are 256×256 cells).
pub const MAP_MAX_COORD: u8 = u8::MAX;

/// Largest template hit points a monster's `f32` life tracks exactly.
pub const MAX_MONSTER_HP: i32 = 1 << 24;

/// Number of entries a monster's loot pool holds once materialized.
pub const LOOT_POOL_SIZE: usize = 1000;

/// Upper bound on samples drawn while materializing a loot pool.
pub const LOOT_SAMPLE_CAP: usize = 64_000;

/// Attempts made to find an unblocked wander cell before staying put.
pub const WANDER_RETRIES: u32 = 10;

/// Delay applied to attack results sent through the delayed channel, in ms.
pub const DELAYED_ATTACK_RESULT_MS: i64 = 100;

/// Death cause reported when a player lands the killing blow.
pub const DEATH_CAUSE_PLAYER: u8 = 1;

/// Chance (percent) that an attack still lands when accuracy is below the
/// defender's defense rate.
pub const GRAZE_CHANCE: u32 = 5;
