//! Shared fixtures for unit tests

use chrono::DateTime;

use crate::magic::{SkillCatalog, SkillDef, SpellId};
use crate::map::{Cell, GridMap, GridPathfinder, MapAttributes, MapGrid, MapId, Pathfinder};
use crate::monster::{Monster, MonsterIndex, MonsterTemplate, ObjectType, SpeciesId, TickContext};
use crate::object::{ItemCatalog, ItemDef, ItemKind, ItemNumber};
use crate::player::{PlayerId, PlayerState, Roster};
use crate::rng::GameRng;
use crate::session::Outbox;
use crate::world::{ServerRates, Timestamp};

/// Grid pathfinder that counts requests
#[derive(Debug, Default)]
pub(crate) struct CountingPathfinder {
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

/// Plain level-10 melee species
pub(crate) fn template() -> MonsterTemplate {
    MonsterTemplate {
        id: SpeciesId(1),
        name: "Goblin".to_string(),
        level: 10,
        hp: 100,
        mp: 20,
        attack_range: 1,
        view_range: 5,
        move_range: 3,
        move_speed: 400,
        attack_speed: 1600,
        attack: 15,
        damage_min: 20,
        damage_max: 30,
        success: 100,
        defense: 5,
        defense_rate: 10,
        regen_secs: 10,
        spell: None,
    }
}

/// A few items per equipment kind at drop levels 1, 4, 7 and 10
pub(crate) fn item_catalog() -> ItemCatalog {
    let kinds = [
        ItemKind::Sword,
        ItemKind::Axe,
        ItemKind::Mace,
        ItemKind::Shield,
        ItemKind::Helm,
        ItemKind::Armor,
        ItemKind::Pants,
        ItemKind::Gloves,
        ItemKind::Boots,
    ];
    ItemCatalog::new(kinds.into_iter().flat_map(|kind| {
        (0..4u16).map(move |i| {
            ItemDef::new(ItemNumber::new(kind, i), format!("{kind} {i}"), 1 + 3 * i)
        })
    }))
}

pub(crate) struct Fixture {
    pub now: Timestamp,
    pub rng: GameRng,
    pub map: GridMap,
    pub pathfinder: CountingPathfinder,
    pub roster: Roster,
    pub outbox: Outbox,
    pub items: ItemCatalog,
    pub skills: SkillCatalog,
    pub rates: ServerRates,
    next_index: u16,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            now: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            rng: GameRng::new(42),
            map: GridMap::new(MapId(0)),
            pathfinder: CountingPathfinder::default(),
            roster: Roster::new(),
            outbox: Outbox::new(),
            items: item_catalog(),
            skills: SkillCatalog::new([SkillDef {
                id: SpellId(1),
                name: "Poison".to_string(),
                damage_min: 10,
                damage_max: 20,
            }]),
            rates: ServerRates::default(),
            next_index: 0,
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

    pub fn spawn(&mut self, template: MonsterTemplate, at: Cell) -> Monster {
        self.spawn_kind(template, at, ObjectType::Monster)
    }

    pub fn spawn_kind(&mut self, template: MonsterTemplate, at: Cell, kind: ObjectType) -> Monster {
        let index = MonsterIndex(self.next_index);
        self.next_index += 1;
        let map_id = self.map.id();
        Monster::new(index, template.into(), kind, map_id, at, 0, &mut self.ctx())
    }

    /// Level-20 player with 100 hp
    pub fn add_player(&mut self, id: u16, at: Cell) -> PlayerId {
        let id = PlayerId(id);
        self.roster
            .insert(PlayerState::new(id, self.map.id(), at, 20, 100));
        id
    }
}
