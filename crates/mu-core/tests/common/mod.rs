#![allow(dead_code)]

use chrono::DateTime;

use mu_core::GameRng;
use mu_core::magic::SkillCatalog;
use mu_core::map::{Cell, GridMap, GridPathfinder, MapAttributes, MapGrid, MapId, Pathfinder};
use mu_core::monster::{
    LifeState, Monster, MonsterIndex, MonsterTemplate, ObjectType, SpeciesId, TickContext,
};
use mu_core::object::{ItemCatalog, ItemDef, ItemKind, ItemNumber};
use mu_core::player::{PlayerId, PlayerState, Roster};
use mu_core::session::Outbox;
use mu_core::world::{ServerRates, Timestamp};

#[derive(Debug, Default)]
pub struct CountingPathfinder {
    pub calls: usize,
    inner: GridPathfinder,
}

impl Pathfinder for CountingPathfinder {
    fn find_path(
        &mut self,
        start: Cell,
        goal: Cell,
        map: &dyn MapGrid,
        impassable: MapAttributes,
    ) -> Option<Vec<Cell>> {
        self.calls += 1;
        self.inner.find_path(start, goal, map, impassable)
    }
}

pub fn goblin() -> MonsterTemplate {
    MonsterTemplate {
        id: SpeciesId(7),
        name: "Goblin".to_string(),
        level: 12,
        hp: 100,
        mp: 0,
        attack_range: 1,
        view_range: 6,
        move_range: 3,
        move_speed: 400,
        attack_speed: 1500,
        attack: 20,
        damage_min: 8,
        damage_max: 14,
        success: 40,
        defense: 4,
        defense_rate: 6,
        regen_secs: 5,
        spell: None,
    }
}

pub struct World {
    pub now: Timestamp,
    pub rng: GameRng,
    pub map: GridMap,
    pub pathfinder: CountingPathfinder,
    pub roster: Roster,
    pub outbox: Outbox,
    pub items: ItemCatalog,
    pub skills: SkillCatalog,
    pub rates: ServerRates,
}

impl World {
    pub fn new(seed: u64) -> Self {
        let items = ItemCatalog::new((0..6u16).flat_map(|i| {
            [ItemKind::Sword, ItemKind::Armor, ItemKind::Boots]
                .into_iter()
                .map(move |kind| ItemDef::new(ItemNumber::new(kind, i), format!("{kind} {i}"), 2 + 2 * i))
        }));
        Self {
            now: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            rng: GameRng::new(seed),
            map: GridMap::new(MapId(1)),
            pathfinder: CountingPathfinder::default(),
            roster: Roster::new(),
            outbox: Outbox::new(),
            items,
            skills: SkillCatalog::default(),
            rates: ServerRates::default(),
        }
    }

    pub fn ctx(&mut self) -> TickContext<'_> {
        TickContext {
            now: self.now,
            rng: &mut self.rng,
            map: &mut self.map,
            pathfinder: &mut self.pathfinder,
            players: &mut self.roster,
            notifier: &mut self.outbox,
            items: &self.items,
            skills: &self.skills,
            rates: &self.rates,
        }
    }

    /// Spawn and activate a monster
    pub fn spawn_live(&mut self, index: u16, template: MonsterTemplate, at: Cell) -> Monster {
        let map_id = self.map.id();
        let mut monster = Monster::new(
            MonsterIndex(index),
            template.into(),
            ObjectType::Monster,
            map_id,
            at,
            0,
            &mut self.ctx(),
        );
        monster.set_state(LifeState::Live, self.now);
        monster
    }

    pub fn add_player(&mut self, id: u16, level: u16, at: Cell) -> PlayerId {
        let id = PlayerId(id);
        let map_id = self.map.id();
        self.roster.insert(PlayerState::new(id, map_id, at, level, 200));
        id
    }

    /// Jump to the monster's next action time and tick it
    pub fn step(&mut self, monster: &mut Monster) {
        if monster.next_action() > self.now {
            self.now = monster.next_action();
        }
        monster.update(&mut self.ctx());
    }
}
