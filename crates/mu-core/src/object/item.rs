//! Item identity and ground drops

use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, FromRepr};

/// Item categories, in catalog order
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumCount,
    FromRepr,
)]
#[repr(u8)]
pub enum ItemKind {
    Sword = 0,
    Axe = 1,
    Mace = 2,
    Spear = 3,
    BowOrCrossbow = 4,
    Staff = 5,
    Shield = 6,
    Helm = 7,
    Armor = 8,
    Pants = 9,
    Gloves = 10,
    Boots = 11,
    WingOrbSeed = 12,
    Miscellaneous = 13,
    Potion = 14,
    Scroll = 15,
}

/// Catalog key: category plus index within the category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemNumber {
    pub kind: ItemKind,
    pub index: u16,
}

impl ItemNumber {
    pub const fn new(kind: ItemKind, index: u16) -> Self {
        Self { kind, index }
    }
}

/// A concrete item with its enhancement level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub number: ItemNumber,
    pub plus: u8,
}

impl Item {
    pub const fn new(number: ItemNumber) -> Self {
        Self { number, plus: 0 }
    }

    pub const fn with_plus(number: ItemNumber, plus: u8) -> Self {
        Self { number, plus }
    }
}

/// A pickup placed on the map when a monster dies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GroundDrop {
    Item(Item),
    Zen(u32),
}
