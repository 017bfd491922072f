//! Items: categories, catalog entries, ground drops and the loot generator

mod catalog;
mod item;
pub mod loot;

pub use catalog::{ItemCatalog, ItemDef};
pub use item::{GroundDrop, Item, ItemKind, ItemNumber};
pub use loot::{LootPool, generate_loot};
