//! Grid coordinates

use serde::{Deserialize, Serialize};

use crate::consts::MAP_MAX_COORD;

/// Facing codes indexed by `[dy + 1][dx + 1]`.
const WALK_DIRS: [[u8; 3]; 3] = [[0, 1, 2], [7, 0, 3], [6, 5, 4]];

/// A cell on a 256×256 map grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Cell {
    pub x: u8,
    pub y: u8,
}

impl Cell {
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Euclidean distance truncated to whole cells
    pub fn distance(self, other: Cell) -> i32 {
        let dx = self.x as i32 - other.x as i32;
        let dy = self.y as i32 - other.y as i32;
        ((dx * dx + dy * dy) as f64).sqrt() as i32
    }

    /// This cell moved by (dx, dy), clamped to the map bounds
    pub fn offset_clamped(self, dx: i32, dy: i32) -> Cell {
        let max = MAP_MAX_COORD as i32;
        Cell {
            x: (self.x as i32 + dx).clamp(0, max) as u8,
            y: (self.y as i32 + dy).clamp(0, max) as u8,
        }
    }
}

impl From<(u8, u8)> for Cell {
    fn from((x, y): (u8, u8)) -> Self {
        Cell { x, y }
    }
}

/// Facing code for a walk whose requested end was `from` and whose actual
/// end is `to`. Only the sign of the delta on each axis matters.
pub fn facing(from: Cell, to: Cell) -> u8 {
    let dx = (from.x as i32 - to.x as i32).signum();
    let dy = (from.y as i32 - to.y as i32).signum();
    WALK_DIRS[(dy + 1) as usize][(dx + 1) as usize]
}
