//! Map-side collaborators: cells, terrain flags, the map query surface and
//! pathfinding.

mod attributes;
mod cell;
mod grid;
mod pathfinding;

use serde::{Deserialize, Serialize};

pub use attributes::MapAttributes;
pub use cell::{Cell, facing};
pub use grid::{GridMap, MapGrid, PlacedDrop};
pub use pathfinding::{GridPathfinder, Pathfinder};

/// Identifier of a world map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MapId(pub u16);
