//! Headless arena
//!
//! A single map with a safe zone, a handful of monsters and scripted
//! fighters that hunt them. The driver owns everything the library treats
//! as a collaborator and steps the world one frame at a time.

use hashbrown::HashMap;
use tracing::{debug, info, trace};

use mu_core::GameRng;
use mu_core::combat::{AttackProfile, DefenseProfile, resolve_attack};
use mu_core::magic::SkillCatalog;
use mu_core::map::{Cell, GridMap, GridPathfinder, MapAttributes, MapGrid, MapId, Pathfinder};
use mu_core::monster::{
    LifeState, Monster, MonsterCatalog, MonsterIndex, ObjectType, SpeciesId, TickContext,
};
use mu_core::object::{GroundDrop, ItemCatalog};
use mu_core::player::{PlayerId, PlayerState, Players, Roster};
use mu_core::session::{Notification, Outbox};
use mu_core::world::{ServerRates, TimeDelta, Timestamp, millis};

const ARENA_MAP: MapId = MapId(0);
const SAFE_ZONE: (Cell, Cell) = (Cell::new(60, 60), Cell::new(64, 64));
const SPAWN_AREA: (u8, u8) = (70, 110);
/// Players within this many cells see a monster
const VIEW_RADIUS: i32 = 12;
const FIGHTER_REACH: i32 = 2;
const FIGHTER_COOLDOWN_MS: u32 = 800;

/// Collaborators handed to monster operations
pub struct Shared {
    pub now: Timestamp,
    pub rng: GameRng,
    pub map: GridMap,
    pub pathfinder: GridPathfinder,
    pub roster: Roster,
    pub outbox: Outbox,
    pub items: ItemCatalog,
    pub skills: SkillCatalog,
    pub rates: ServerRates,
}

impl Shared {
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
}

/// A scripted player that walks to the nearest monster and hits it
struct Fighter {
    id: PlayerId,
    attack: AttackProfile,
    next_attack: Timestamp,
    /// Ranged fighters report through the delayed channel
    ranged: bool,
}

/// Running totals reported at the end of a run
#[derive(Debug, Default)]
pub struct Stats {
    pub moves: usize,
    pub attack_results: usize,
    pub deaths: usize,
    pub kills: usize,
    pub player_deaths: usize,
    pub item_drops: usize,
    pub zen_dropped: u64,
}

pub struct Arena {
    shared: Shared,
    monsters: Vec<Monster>,
    fighters: Vec<Fighter>,
    frame: TimeDelta,
    stats: Stats,
}

impl Arena {
    pub fn new(
        now: Timestamp,
        rng: GameRng,
        items: ItemCatalog,
        skills: SkillCatalog,
        rates: ServerRates,
        frame: TimeDelta,
    ) -> Self {
        let mut map = GridMap::new(ARENA_MAP);
        map.mark_rect(SAFE_ZONE.0, SAFE_ZONE.1, MapAttributes::SAFE);
        // a wall splitting the hunting ground
        map.mark_rect(Cell::new(90, 72), Cell::new(90, 100), MapAttributes::NO_WALK);

        Self {
            shared: Shared {
                now,
                rng,
                map,
                pathfinder: GridPathfinder::default(),
                roster: Roster::new(),
                outbox: Outbox::new(),
                items,
                skills,
                rates,
            },
            monsters: Vec::new(),
            fighters: Vec::new(),
            frame,
            stats: Stats::default(),
        }
    }

    /// Spawn `count` monsters, cycling through the catalog's species
    pub fn populate(&mut self, catalog: &MonsterCatalog, count: usize) {
        let species = catalog.ids();
        if species.is_empty() {
            return;
        }
        for n in 0..count {
            let Some(template) = catalog.get(species[n % species.len()]) else {
                continue;
            };
            let spawn = self.free_cell();
            let index = MonsterIndex(self.monsters.len() as u16);
            let direction = self.shared.rng.rn2(8) as u8;
            let monster = Monster::new(
                index,
                template,
                ObjectType::Monster,
                ARENA_MAP,
                spawn,
                direction,
                &mut self.shared.ctx(),
            );
            self.monsters.push(monster);
        }
        info!(monsters = self.monsters.len(), "arena_populated");
    }

    /// Add an NPC that stands at `at` and never acts
    pub fn add_npc(&mut self, catalog: &MonsterCatalog, species: SpeciesId, at: Cell) {
        let Some(template) = catalog.get(species) else {
            return;
        };
        let index = MonsterIndex(self.monsters.len() as u16);
        let npc = Monster::new(
            index,
            template,
            ObjectType::Npc,
            ARENA_MAP,
            at,
            0,
            &mut self.shared.ctx(),
        );
        self.monsters.push(npc);
    }

    pub fn add_fighter(&mut self, level: u16, hp: i32, attack: AttackProfile, ranged: bool) {
        let id = PlayerId(self.fighters.len() as u16 + 1);
        let mut player = PlayerState::new(id, ARENA_MAP, SAFE_ZONE.0, level, hp);
        player.defense = DefenseProfile {
            defense: level as i32 / 2,
            defense_rate: level as i32 / 3,
        };
        self.shared.roster.insert(player);
        self.fighters.push(Fighter {
            id,
            attack,
            next_attack: self.shared.now,
            ranged,
        });
    }

    fn free_cell(&mut self) -> Cell {
        let (lo, hi) = SPAWN_AREA;
        loop {
            let x = lo + self.shared.rng.rn2((hi - lo) as u32) as u8;
            let y = lo + self.shared.rng.rn2((hi - lo) as u32) as u8;
            let cell = Cell::new(x, y);
            if !self.shared.map.contains_any(cell, MapAttributes::IMPASSABLE) {
                return cell;
            }
        }
    }

    /// Advance the world by one frame
    pub fn step(&mut self) {
        self.shared.now = self.shared.now + self.frame;

        self.advance_monsters();
        self.refresh_viewports();
        self.advance_fighters();
        self.settle_player_deaths();
        self.flush();
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn experience(&self) -> Vec<(PlayerId, u64)> {
        self.fighters
            .iter()
            .filter_map(|f| self.shared.roster.get(f.id).map(|p| (f.id, p.experience)))
            .collect()
    }

    /// Lifecycle policy of the arena: corpses clear on the next frame and
    /// regenerated monsters activate immediately.
    fn advance_monsters(&mut self) {
        for monster in &mut self.monsters {
            let mut ctx = self.shared.ctx();
            match monster.state() {
                LifeState::Dying => monster.set_state(LifeState::Dead, ctx.now),
                LifeState::Dead => monster.try_regen(&mut ctx),
                LifeState::Regen => monster.set_state(LifeState::Live, ctx.now),
                LifeState::Live => monster.update(&mut ctx),
            }
        }
    }

    fn refresh_viewports(&mut self) {
        let positions: HashMap<PlayerId, Cell> = self
            .fighters
            .iter()
            .filter_map(|f| self.shared.roster.position(f.id).map(|cell| (f.id, cell)))
            .collect();
        for monster in self.monsters.iter_mut().filter(|m| m.is_alive()) {
            for (&id, &cell) in &positions {
                if cell.distance(monster.position()) <= VIEW_RADIUS {
                    monster.add_viewer(id);
                } else {
                    monster.remove_viewer(id);
                }
            }
        }
    }

    fn advance_fighters(&mut self) {
        let now = self.shared.now;
        for fighter in &mut self.fighters {
            let Some(player) = self.shared.roster.get(fighter.id) else {
                continue;
            };
            if !player.vitals.is_alive() || fighter.next_attack > now {
                continue;
            }
            let position = player.position;

            let nearest = self
                .monsters
                .iter_mut()
                .filter(|m| m.is_alive() && m.kind() == ObjectType::Monster)
                .min_by_key(|m| m.position().distance(position));
            let Some(monster) = nearest else {
                continue;
            };

            if monster.position().distance(position) > FIGHTER_REACH {
                let step = self
                    .shared
                    .pathfinder
                    .find_path(position, monster.position(), &self.shared.map, MapAttributes::NO_WALK)
                    .and_then(|path| path.get(1).copied());
                if let Some(step) = step {
                    self.shared.roster.move_to(fighter.id, step);
                }
                continue;
            }

            fighter.next_attack = now + millis(FIGHTER_COOLDOWN_MS);
            let outcome = resolve_attack(
                &mut self.shared.rng,
                &fighter.attack,
                &monster.defense_profile(),
            );
            trace!(
                player = fighter.id.0,
                monster = monster.index().0,
                damage = outcome.damage,
                kind = %outcome.kind,
                "fighter_attack"
            );
            let mut ctx = self.shared.ctx();
            if fighter.ranged {
                monster.get_attacked_delayed(fighter.id, outcome.damage, outcome.kind, &mut ctx);
            } else {
                monster.get_attacked(fighter.id, outcome.damage, outcome.kind, &mut ctx);
            }
        }
    }

    /// Fan player deaths out to watching monsters, then revive the player
    /// in the safe zone.
    fn settle_player_deaths(&mut self) {
        for (player, slayer) in self.shared.roster.take_deaths() {
            self.stats.player_deaths += 1;
            info!(player = player.0, monster = slayer.0, "player_died");

            for watcher in self.shared.roster.watchers(player) {
                if let Some(monster) = self.monsters.get_mut(watcher.0 as usize) {
                    monster.on_target_lost(player, &mut self.shared.ctx());
                }
            }
            if let Some(state) = self.shared.roster.get_mut(player) {
                state.vitals.restore();
                state.position = SAFE_ZONE.0;
            }
        }
    }

    fn flush(&mut self) {
        for envelope in self.shared.outbox.drain() {
            match envelope.message {
                Notification::Move { .. } => self.stats.moves += 1,
                Notification::AttackResult { .. } => self.stats.attack_results += 1,
                Notification::Die { .. } => self.stats.deaths += 1,
                Notification::Kill { .. } => self.stats.kills += 1,
            }
            debug!(
                to = envelope.to.0,
                delayed_ms = envelope.delay.map(|d| d.num_milliseconds()),
                message = ?envelope.message,
                "notification"
            );
        }
        for placed in self.shared.map.take_drops() {
            match placed.drop {
                GroundDrop::Item(item) => {
                    self.stats.item_drops += 1;
                    info!(
                        kind = %item.number.kind,
                        index = item.number.index,
                        plus = item.plus,
                        x = placed.cell.x,
                        y = placed.cell.y,
                        "item_dropped"
                    );
                }
                GroundDrop::Zen(amount) => {
                    self.stats.zen_dropped += amount as u64;
                    debug!(amount, x = placed.cell.x, y = placed.cell.y, "zen_dropped");
                }
            }
        }
    }
}
