//! Loot pool generation
//!
//! A monster materializes its pool once, on first death, by sampling
//! (category, index) pairs until the pool is full. Each sample goes through
//! the exclusion list, the restricted-item gates or the catalog's level
//! check. Sampling is capped so a catalog that admits nothing for a given
//! level still terminates.

use serde::{Deserialize, Serialize};
use strum::EnumCount;
use tracing::{debug, warn};

use super::{Item, ItemCatalog, ItemKind, ItemNumber};
use crate::consts::{LOOT_POOL_SIZE, LOOT_SAMPLE_CAP};
use crate::rng::GameRng;

/// Wing/Orb/Seed indices offered by the bonus branch
const BONUS_ORB_TABLE: [u16; 17] = [7, 8, 9, 10, 11, 12, 13, 14, 16, 17, 18, 19, 21, 22, 23, 24, 35];

/// Jewel of Chaos
const JEWEL_OF_CHAOS: ItemNumber = ItemNumber::new(ItemKind::WingOrbSeed, 15);
/// Transformation ring, keeps its full quality tier
const TRANSFORMATION_RING: ItemNumber = ItemNumber::new(ItemKind::Miscellaneous, 10);
/// Summoning orb, keeps its full quality tier
const SUMMON_ORB: ItemNumber = ItemNumber::new(ItemKind::WingOrbSeed, 11);

/// Items a monster's pool may draw from, fixed for the monster's lifetime
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LootPool {
    items: Vec<Item>,
}

impl LootPool {
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// A uniformly chosen entry, `None` for an empty pool
    pub fn pick(&self, rng: &mut GameRng) -> Option<Item> {
        rng.choose(&self.items).copied()
    }
}

/// Build the loot pool for a monster of `level`
pub fn generate_loot(level: u16, catalog: &ItemCatalog, rng: &mut GameRng) -> LootPool {
    let mut items = Vec::with_capacity(LOOT_POOL_SIZE);
    let mut samples = 0;

    while items.len() < LOOT_POOL_SIZE {
        if samples == LOOT_SAMPLE_CAP {
            warn!(level, admitted = items.len(), samples, "loot_sample_cap_reached");
            break;
        }
        samples += 1;

        let Some(number) = sample(catalog, rng) else {
            continue;
        };
        if is_excluded(number) {
            continue;
        }
        let admitted = if is_restricted(number) {
            admit_restricted(number, level, catalog, rng)
        } else {
            admit_standard(number, level, catalog)
        };
        if let Some(item) = admitted {
            items.push(item);
        }
    }

    debug!(level, size = items.len(), samples, "loot_pool_materialized");
    LootPool { items }
}

/// Draw one candidate. `None` means the draw was discarded.
fn sample(catalog: &ItemCatalog, rng: &mut GameRng) -> Option<ItemNumber> {
    if rng.one_in(20) {
        if rng.one_in(2) {
            let index = rng.rn2(catalog.count(ItemKind::Scroll) as u32 + 1) as u16;
            Some(ItemNumber::new(ItemKind::Scroll, index))
        } else {
            let index = *rng.choose(&BONUS_ORB_TABLE)?;
            Some(ItemNumber::new(ItemKind::WingOrbSeed, index))
        }
    } else {
        let kind = ItemKind::from_repr(rng.rn2(ItemKind::COUNT as u32) as u8)?;
        let index = rng.rn2(catalog.count(kind) as u32 + 1) as u16;
        let number = ItemNumber::new(kind, index);
        if kind == ItemKind::Scroll || number == JEWEL_OF_CHAOS {
            return None;
        }
        Some(number)
    }
}

/// Mounts, Fenrir materials and shield potions never drop from monsters
fn is_excluded(number: ItemNumber) -> bool {
    match number.kind {
        ItemKind::Miscellaneous => number.index == 3 || (32..=37).contains(&number.index),
        ItemKind::Potion => (35..=40).contains(&number.index),
        _ => false,
    }
}

/// Items admitted only through [`admit_restricted`]
fn is_restricted(number: ItemNumber) -> bool {
    match number.kind {
        // pets, Loch's Feather
        ItemKind::Miscellaneous => number.index < 8 || number.index == 14,
        ItemKind::Potion => matches!(number.index, 9 | 10 | 13 | 14 | 16 | 17 | 18 | 22 | 31),
        ItemKind::WingOrbSeed => number.index == 15,
        _ => false,
    }
}

fn admit_restricted(
    number: ItemNumber,
    level: u16,
    catalog: &ItemCatalog,
    rng: &mut GameRng,
) -> Option<Item> {
    if number == JEWEL_OF_CHAOS {
        if !(13..=66).contains(&level) || rng.rn2(7) >= 3 {
            return None;
        }
    }

    // Devil Eye / Devil Key carry a plus tied to the monster level
    if number.kind == ItemKind::Potion && matches!(number.index, 17 | 18) {
        return Some(Item::with_plus(number, devil_square_plus(level)));
    }

    let def = catalog.get(number)?;
    (def.drop_level < level).then(|| Item::new(number))
}

fn admit_standard(number: ItemNumber, level: u16, catalog: &ItemCatalog) -> Option<Item> {
    let def = catalog.get(number)?;
    let plus = def.quality_for_level(level)?;

    if number == TRANSFORMATION_RING || number == SUMMON_ORB {
        return Some(Item::with_plus(number, plus));
    }
    if plus as u16 > level {
        return None;
    }

    let plus = match number.kind {
        ItemKind::WingOrbSeed => 0,
        // arrows and bolts
        ItemKind::BowOrCrossbow if matches!(number.index, 7 | 15) => 0,
        _ => plus,
    };
    Some(Item::with_plus(number, plus))
}

fn devil_square_plus(level: u16) -> u8 {
    match level {
        0..=2 => 0,
        3..=35 => 1,
        36..=46 => 2,
        47..=59 => 3,
        60..=69 => 4,
        70..=79 => 5,
        _ => 6,
    }
}
