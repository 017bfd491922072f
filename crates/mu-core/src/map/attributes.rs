//! Terrain attribute flags

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Per-cell terrain attributes
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct MapAttributes: u8 {
        const SAFE = 0x01;
        const STAND = 0x02;
        const NO_WALK = 0x04;
        const HIDE = 0x08;
        const VOID = 0x10;
    }
}

impl MapAttributes {
    /// Terrain a monster may never path through or wander onto
    pub const IMPASSABLE: Self = Self::HIDE.union(Self::NO_WALK).union(Self::SAFE);
}

// Manual serde impl for MapAttributes
impl Serialize for MapAttributes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MapAttributes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        Ok(MapAttributes::from_bits_truncate(bits))
    }
}
