//! Player-side collaborator
//!
//! Monsters never own players. They hold a [`PlayerId`] and go through the
//! [`Players`] trait for everything they read or mutate on the other side.
//! [`Roster`] is an in-memory implementation for tests and the arena driver.

mod vitals;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::combat::{AttackOutcome, DefenseProfile};
use crate::map::{Cell, MapId};
use crate::monster::MonsterIndex;

pub use vitals::Vitals;

/// Session-level identifier of a connected player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u16);

/// What a monster may ask of, or do to, a player
pub trait Players {
    fn position(&self, id: PlayerId) -> Option<Cell>;

    fn level(&self, id: PlayerId) -> Option<u16>;

    fn defense(&self, id: PlayerId) -> Option<DefenseProfile>;

    /// Apply a monster's attack to the player's vitals
    fn receive_attack(&mut self, id: PlayerId, from: MonsterIndex, outcome: AttackOutcome);

    /// Add experience to the player's persistent ledger
    fn credit_experience(&mut self, id: PlayerId, amount: u64);

    /// Register `watcher` for this player's died / changed-map events
    fn subscribe(&mut self, id: PlayerId, watcher: MonsterIndex);

    fn unsubscribe(&mut self, id: PlayerId, watcher: MonsterIndex);
}

/// One player as tracked by [`Roster`]
#[derive(Debug)]
pub struct PlayerState {
    pub id: PlayerId,
    pub map: MapId,
    pub position: Cell,
    pub level: u16,
    pub defense: DefenseProfile,
    pub vitals: Vitals,
    pub experience: u64,
    watchers: Vec<MonsterIndex>,
}

impl PlayerState {
    pub fn new(id: PlayerId, map: MapId, position: Cell, level: u16, max_hp: i32) -> Self {
        Self {
            id,
            map,
            position,
            level,
            defense: DefenseProfile::default(),
            vitals: Vitals::new(max_hp),
            experience: 0,
            watchers: Vec::new(),
        }
    }

    pub fn watchers(&self) -> &[MonsterIndex] {
        &self.watchers
    }
}

/// In-memory player registry
#[derive(Debug, Default)]
pub struct Roster {
    players: HashMap<PlayerId, PlayerState>,
    deaths: Vec<(PlayerId, MonsterIndex)>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, player: PlayerState) {
        self.players.insert(player.id, player);
    }

    pub fn get(&self, id: PlayerId) -> Option<&PlayerState> {
        self.players.get(&id)
    }

    pub fn get_mut(&mut self, id: PlayerId) -> Option<&mut PlayerState> {
        self.players.get_mut(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.players.keys().copied()
    }

    /// Move a player within its current map
    pub fn move_to(&mut self, id: PlayerId, cell: Cell) {
        if let Some(player) = self.players.get_mut(&id) {
            player.position = cell;
        }
    }

    /// Move a player to another map. Returns the monsters that were
    /// watching it; the caller clears their targets.
    pub fn change_map(&mut self, id: PlayerId, map: MapId, cell: Cell) -> Vec<MonsterIndex> {
        let Some(player) = self.players.get_mut(&id) else {
            return Vec::new();
        };
        player.map = map;
        player.position = cell;
        player.watchers.clone()
    }

    /// Deaths recorded since the last call, with the monster that landed the blow
    pub fn take_deaths(&mut self) -> Vec<(PlayerId, MonsterIndex)> {
        std::mem::take(&mut self.deaths)
    }

    /// Monsters watching `id`
    pub fn watchers(&self, id: PlayerId) -> Vec<MonsterIndex> {
        self.players
            .get(&id)
            .map(|p| p.watchers.clone())
            .unwrap_or_default()
    }
}

impl Players for Roster {
    fn position(&self, id: PlayerId) -> Option<Cell> {
        self.players.get(&id).map(|p| p.position)
    }

    fn level(&self, id: PlayerId) -> Option<u16> {
        self.players.get(&id).map(|p| p.level)
    }

    fn defense(&self, id: PlayerId) -> Option<DefenseProfile> {
        self.players.get(&id).map(|p| p.defense)
    }

    fn receive_attack(&mut self, id: PlayerId, from: MonsterIndex, outcome: AttackOutcome) {
        let Some(player) = self.players.get(&id) else {
            return;
        };
        if player.vitals.take(outcome.damage) {
            self.deaths.push((id, from));
        }
    }

    fn credit_experience(&mut self, id: PlayerId, amount: u64) {
        if let Some(player) = self.players.get_mut(&id) {
            player.experience = player.experience.saturating_add(amount);
        }
    }

    fn subscribe(&mut self, id: PlayerId, watcher: MonsterIndex) {
        if let Some(player) = self.players.get_mut(&id) {
            if !player.watchers.contains(&watcher) {
                player.watchers.push(watcher);
            }
        }
    }

    fn unsubscribe(&mut self, id: PlayerId, watcher: MonsterIndex) {
        if let Some(player) = self.players.get_mut(&id) {
            player.watchers.retain(|w| *w != watcher);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::DamageKind;

    fn hit(damage: i32) -> AttackOutcome {
        AttackOutcome {
            damage,
            kind: DamageKind::Regular,
            spell: None,
        }
    }

    fn roster_with(id: u16, hp: i32) -> Roster {
        let mut roster = Roster::new();
        roster.insert(PlayerState::new(PlayerId(id), MapId(0), Cell::new(10, 10), 20, hp));
        roster
    }

    #[test]
    fn test_lethal_attack_records_one_death() {
        let mut roster = roster_with(1, 30);
        roster.receive_attack(PlayerId(1), MonsterIndex(4), hit(20));
        roster.receive_attack(PlayerId(1), MonsterIndex(5), hit(20));
        roster.receive_attack(PlayerId(1), MonsterIndex(6), hit(20));
        assert_eq!(roster.take_deaths(), vec![(PlayerId(1), MonsterIndex(5))]);
        assert_eq!(roster.get(PlayerId(1)).unwrap().vitals.hp(), 0);
    }

    #[test]
    fn test_subscriptions_are_unique_and_removable() {
        let mut roster = roster_with(1, 30);
        roster.subscribe(PlayerId(1), MonsterIndex(2));
        roster.subscribe(PlayerId(1), MonsterIndex(2));
        roster.subscribe(PlayerId(1), MonsterIndex(3));
        assert_eq!(roster.watchers(PlayerId(1)), vec![MonsterIndex(2), MonsterIndex(3)]);
        roster.unsubscribe(PlayerId(1), MonsterIndex(2));
        assert_eq!(roster.watchers(PlayerId(1)), vec![MonsterIndex(3)]);
    }

    #[test]
    fn test_change_map_reports_watchers() {
        let mut roster = roster_with(1, 30);
        roster.subscribe(PlayerId(1), MonsterIndex(9));
        let watchers = roster.change_map(PlayerId(1), MapId(3), Cell::new(1, 1));
        assert_eq!(watchers, vec![MonsterIndex(9)]);
        assert_eq!(roster.position(PlayerId(1)), Some(Cell::new(1, 1)));
    }

    #[test]
    fn test_experience_saturates() {
        let mut roster = roster_with(1, 30);
        roster.credit_experience(PlayerId(1), u64::MAX - 1);
        roster.credit_experience(PlayerId(1), 10);
        assert_eq!(roster.get(PlayerId(1)).unwrap().experience, u64::MAX);
    }
}
