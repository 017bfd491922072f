//! Map query surface and a plain in-memory grid implementing it

use serde::{Deserialize, Serialize};

use super::{Cell, MapAttributes, MapId};
use crate::monster::MonsterIndex;
use crate::object::GroundDrop;

const MAP_SIDE: usize = 256;

/// What a monster needs from the map it lives on
pub trait MapGrid {
    /// True if the cell carries any of `flags`
    fn contains_any(&self, cell: Cell, flags: MapAttributes) -> bool;

    /// Place a pickup on the ground
    fn add_item(&mut self, cell: Cell, drop: GroundDrop);

    /// Register a monster in the map's monster collection
    fn add_monster(&mut self, index: MonsterIndex);
}

/// A ground drop placed on a grid map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedDrop {
    pub cell: Cell,
    pub drop: GroundDrop,
}

/// 256×256 attribute grid with ground drops and a monster roster
#[derive(Debug, Clone)]
pub struct GridMap {
    id: MapId,
    cells: Vec<MapAttributes>,
    drops: Vec<PlacedDrop>,
    monsters: Vec<MonsterIndex>,
}

impl GridMap {
    /// Create an open map with no terrain attributes
    pub fn new(id: MapId) -> Self {
        Self {
            id,
            cells: vec![MapAttributes::empty(); MAP_SIDE * MAP_SIDE],
            drops: Vec::new(),
            monsters: Vec::new(),
        }
    }

    pub fn id(&self) -> MapId {
        self.id
    }

    fn idx(cell: Cell) -> usize {
        cell.y as usize * MAP_SIDE + cell.x as usize
    }

    pub fn attributes(&self, cell: Cell) -> MapAttributes {
        self.cells[Self::idx(cell)]
    }

    pub fn set_attributes(&mut self, cell: Cell, attrs: MapAttributes) {
        self.cells[Self::idx(cell)] = attrs;
    }

    /// Add `attrs` to every cell of the inclusive rectangle `from..=to`
    pub fn mark_rect(&mut self, from: Cell, to: Cell, attrs: MapAttributes) {
        for y in from.y.min(to.y)..=from.y.max(to.y) {
            for x in from.x.min(to.x)..=from.x.max(to.x) {
                let i = Self::idx(Cell::new(x, y));
                self.cells[i] |= attrs;
            }
        }
    }

    pub fn drops(&self) -> &[PlacedDrop] {
        &self.drops
    }

    /// Remove and return every ground drop
    pub fn take_drops(&mut self) -> Vec<PlacedDrop> {
        std::mem::take(&mut self.drops)
    }

    pub fn monsters(&self) -> &[MonsterIndex] {
        &self.monsters
    }
}

impl MapGrid for GridMap {
    fn contains_any(&self, cell: Cell, flags: MapAttributes) -> bool {
        self.attributes(cell).intersects(flags)
    }

    fn add_item(&mut self, cell: Cell, drop: GroundDrop) {
        self.drops.push(PlacedDrop { cell, drop });
    }

    fn add_monster(&mut self, index: MonsterIndex) {
        if !self.monsters.contains(&index) {
            self.monsters.push(index);
        }
    }
}
