//! Damage classification reported with every attack result

use serde::{Deserialize, Serialize};
use strum::Display;

/// How an attack landed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display)]
#[repr(u8)]
pub enum DamageKind {
    #[default]
    Regular = 0,
    IgnoreDefense = 1,
    Excellent = 2,
    Critical = 3,
    Combo = 4,
    Miss = 5,
    Reflect = 6,
    Poison = 7,
}

impl DamageKind {
    pub const fn is_miss(self) -> bool {
        matches!(self, DamageKind::Miss)
    }
}
