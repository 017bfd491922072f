//! mu-core: monster simulation for a MU-style world server
//!
//! Lifecycle, per-tick AI, combat resolution, death rewards and loot tables
//! for hostile actors. Everything outside the monster (map, pathfinding,
//! players, sessions) is reached through the traits in [`map`], [`player`]
//! and [`session`]; in-memory implementations of each ship alongside them.

pub mod combat;
pub mod magic;
pub mod map;
pub mod monster;
pub mod object;
pub mod player;
pub mod session;
pub mod world;

mod consts;
mod rng;

#[cfg(test)]
mod testing;

pub use consts::*;
pub use rng::GameRng;
