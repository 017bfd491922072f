//! Item catalog
//!
//! Loaded once at start-up and shared read-only. The per-category item count
//! table is computed at construction, never lazily.

use std::path::Path;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use strum::EnumCount;

use super::{ItemKind, ItemNumber};
use crate::world::ConfigError;

/// Levels between successive quality tiers of the default tier table
const TIER_STEP: u16 = 3;
/// Highest quality reachable through the default tier table
const DEFAULT_MAX_TIER: u16 = 6;

/// Catalog entry for one item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDef {
    pub number: ItemNumber,
    pub name: String,
    /// Lowest monster level that drops this item; 0 means it never drops
    pub drop_level: u16,
    /// Required monster level per quality tier, ascending. When empty the
    /// tiers are `drop_level + 3·t` for `t` in `0..=6`.
    #[serde(default)]
    pub tier_levels: Vec<u16>,
}

impl ItemDef {
    pub fn new(number: ItemNumber, name: impl Into<String>, drop_level: u16) -> Self {
        Self {
            number,
            name: name.into(),
            drop_level,
            tier_levels: Vec::new(),
        }
    }

    /// Quality tier this item takes when dropped by a monster of `level`:
    /// the highest tier whose required level does not exceed `level`.
    pub fn quality_for_level(&self, level: u16) -> Option<u8> {
        if self.drop_level == 0 {
            return None;
        }
        if !self.tier_levels.is_empty() {
            return self
                .tier_levels
                .iter()
                .rposition(|&req| req <= level)
                .map(|tier| tier as u8);
        }
        if level < self.drop_level || level - self.drop_level > TIER_STEP * DEFAULT_MAX_TIER {
            return None;
        }
        Some(((level - self.drop_level) / TIER_STEP) as u8)
    }
}

/// Item definitions keyed by item number
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    items: HashMap<ItemNumber, ItemDef>,
    counts: [u16; ItemKind::COUNT],
}

impl ItemCatalog {
    pub fn new(defs: impl IntoIterator<Item = ItemDef>) -> Self {
        let items: HashMap<ItemNumber, ItemDef> =
            defs.into_iter().map(|def| (def.number, def)).collect();
        let mut counts = [0u16; ItemKind::COUNT];
        for number in items.keys() {
            counts[number.kind as usize] += 1;
        }
        Self { items, counts }
    }

    /// Load a JSON array of item definitions
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let defs: Vec<ItemDef> = serde_json::from_str(contents)?;
        for def in &defs {
            if def.tier_levels.windows(2).any(|w| w[0] > w[1]) {
                return Err(ConfigError::invalid(
                    format!("items.{}.tier_levels", def.name),
                    "tier levels must be ascending",
                ));
            }
        }
        Ok(Self::new(defs))
    }

    pub fn get(&self, number: ItemNumber) -> Option<&ItemDef> {
        self.items.get(&number)
    }

    /// Number of catalog entries in `kind`
    pub fn count(&self, kind: ItemKind) -> u16 {
        self.counts[kind as usize]
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
