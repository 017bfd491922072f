//! Collaborators a monster operation may touch

use crate::map::{MapGrid, Pathfinder};
use crate::magic::SkillCatalog;
use crate::object::ItemCatalog;
use crate::player::Players;
use crate::rng::GameRng;
use crate::session::Notifier;
use crate::world::{ServerRates, Timestamp};

/// Everything one monster operation reads or mutates outside the monster
/// itself. Built per call by whoever drives the simulation; the fields are
/// disjoint so an operation can borrow several at once.
pub struct TickContext<'a> {
    /// Wall-clock time of this tick
    pub now: Timestamp,
    /// Generator owned by the worker running this tick
    pub rng: &'a mut GameRng,
    /// Map the monster lives on
    pub map: &'a mut dyn MapGrid,
    pub pathfinder: &'a mut dyn Pathfinder,
    pub players: &'a mut dyn Players,
    pub notifier: &'a mut dyn Notifier,
    pub items: &'a ItemCatalog,
    pub skills: &'a SkillCatalog,
    pub rates: &'a ServerRates,
}
