//! Path requests
//!
//! Monsters only consume the [`Pathfinder`] trait. [`GridPathfinder`] is a
//! bounded A* over any [`MapGrid`], enough for tests and the arena driver.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use hashbrown::HashMap;

use super::{Cell, MapAttributes, MapGrid};

/// Turns a start/goal pair into a walkable cell sequence
pub trait Pathfinder {
    /// Returns the path including `start` as its first cell, or `None` when
    /// the goal cannot be reached.
    fn find_path(
        &mut self,
        start: Cell,
        goal: Cell,
        map: &dyn MapGrid,
        impassable: MapAttributes,
    ) -> Option<Vec<Cell>>;
}

const STRAIGHT_COST: i32 = 10;
const DIAGONAL_COST: i32 = 14;

#[derive(Clone, Copy, PartialEq, Eq)]
struct ScoredCell {
    cell: Cell,
    f_score: i32,
}

// BinaryHeap is a max-heap, so we reverse the ordering for min-heap behavior
impl Ord for ScoredCell {
    fn cmp(&self, other: &Self) -> Ordering {
        other.f_score.cmp(&self.f_score)
    }
}

impl PartialOrd for ScoredCell {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// 8-neighbour A* with a cap on expanded cells
#[derive(Debug, Clone, Copy)]
pub struct GridPathfinder {
    pub max_expansions: usize,
}

impl Default for GridPathfinder {
    fn default() -> Self {
        Self {
            max_expansions: 4096,
        }
    }
}

impl Pathfinder for GridPathfinder {
    fn find_path(
        &mut self,
        start: Cell,
        goal: Cell,
        map: &dyn MapGrid,
        impassable: MapAttributes,
    ) -> Option<Vec<Cell>> {
        if map.contains_any(goal, impassable) {
            return None;
        }

        let mut open_set = BinaryHeap::new();
        let mut came_from: HashMap<Cell, Cell> = HashMap::new();
        let mut g_score: HashMap<Cell, i32> = HashMap::new();

        g_score.insert(start, 0);
        open_set.push(ScoredCell {
            cell: start,
            f_score: heuristic(start, goal),
        });

        let mut expansions = 0;
        while let Some(current) = open_set.pop() {
            if current.cell == goal {
                return Some(reconstruct_path(&came_from, current.cell));
            }
            expansions += 1;
            if expansions > self.max_expansions {
                return None;
            }

            let current_g = *g_score.get(&current.cell).unwrap_or(&i32::MAX);

            for dy in -1i32..=1 {
                for dx in -1i32..=1 {
                    if dx == 0 && dy == 0 {
                        continue;
                    }
                    let nx = current.cell.x as i32 + dx;
                    let ny = current.cell.y as i32 + dy;
                    if !(0..=255).contains(&nx) || !(0..=255).contains(&ny) {
                        continue;
                    }
                    let neighbor = Cell::new(nx as u8, ny as u8);
                    if map.contains_any(neighbor, impassable) {
                        continue;
                    }

                    let step = if dx != 0 && dy != 0 { DIAGONAL_COST } else { STRAIGHT_COST };
                    let tentative_g = current_g + step;
                    let neighbor_g = *g_score.get(&neighbor).unwrap_or(&i32::MAX);
                    if tentative_g < neighbor_g {
                        came_from.insert(neighbor, current.cell);
                        g_score.insert(neighbor, tentative_g);
                        open_set.push(ScoredCell {
                            cell: neighbor,
                            f_score: tentative_g + heuristic(neighbor, goal),
                        });
                    }
                }
            }
        }

        None
    }
}

/// Octile distance
fn heuristic(from: Cell, to: Cell) -> i32 {
    let dx = (from.x as i32 - to.x as i32).abs();
    let dy = (from.y as i32 - to.y as i32).abs();
    STRAIGHT_COST * dx.max(dy) + (DIAGONAL_COST - STRAIGHT_COST) * dx.min(dy)
}

fn reconstruct_path(came_from: &HashMap<Cell, Cell>, mut current: Cell) -> Vec<Cell> {
    let mut path = vec![current];
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}
