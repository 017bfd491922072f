//! Monster AI
//!
//! One synchronous step per server frame. A step does nothing until the
//! monster's next-action time has passed; after that it walks, fights, or
//! looks around depending on the behaviour state.

use tracing::{debug, warn};

use super::{BehaviorState, LifeState, Monster, ObjectType, TickContext};
use crate::combat::{AttackOutcome, AttackProfile, resolve_attack};
use crate::consts::WANDER_RETRIES;
use crate::map::{Cell, MapAttributes, facing};
use crate::player::PlayerId;
use crate::session::Notification;
use crate::world::millis;

impl Monster {
    /// Run one AI step. Only live, combat-capable monsters act.
    pub fn update(&mut self, ctx: &mut TickContext<'_>) {
        if self.state != LifeState::Live || self.kind == ObjectType::Npc {
            return;
        }
        if self.next_action > ctx.now {
            return;
        }

        if self.behavior == BehaviorState::Walking && self.walk_step(ctx) {
            return;
        }
        if self.behavior == BehaviorState::Engaging {
            match self.target {
                Some(target) => {
                    if self.engage_step(target, ctx) {
                        return;
                    }
                }
                None => self.behavior = BehaviorState::Idle,
            }
        }
        if self.behavior == BehaviorState::Idle {
            self.idle_step(ctx);
        }
    }

    /// Advance one cell. Returns true when the rest of the step is skipped.
    fn walk_step(&mut self, ctx: &mut TickContext<'_>) -> bool {
        self.next_action = ctx.now + millis(self.template.move_speed);

        let Some(next) = self.path.pop_front() else {
            self.behavior = if self.target.is_some() {
                BehaviorState::Engaging
            } else {
                BehaviorState::Idle
            };
            return false;
        };
        self.position = next;

        let Some(target) = self.target else {
            return false;
        };
        let Some(dist) = self.distance_to(target, ctx) else {
            self.lose_target(ctx);
            return true;
        };
        if dist <= self.template.attack_range as i32 {
            self.behavior = BehaviorState::Engaging;
            self.path.clear();
            self.destination = self.position;
            return true;
        }
        if dist > self.template.view_range as i32 {
            self.lose_target(ctx);
            return true;
        }
        false
    }

    /// Fight or chase `target`. Returns true when the rest of the step is skipped.
    fn engage_step(&mut self, target: PlayerId, ctx: &mut TickContext<'_>) -> bool {
        let Some(target_pos) = ctx.players.position(target) else {
            self.lose_target(ctx);
            self.next_action = ctx.now + millis(self.template.attack_speed);
            return true;
        };
        let dist = target_pos.distance(self.position);

        if dist <= self.template.attack_range as i32 {
            self.next_action = ctx.now + millis(self.template.attack_speed);
            let outcome = self.attack(target, ctx);
            ctx.players.receive_attack(target, self.index, outcome);
            self.path.clear();
            self.set_destination(self.position, ctx);
            return true;
        }
        if dist > self.template.view_range as i32 {
            self.lose_target(ctx);
            self.next_action = ctx.now + millis(self.template.attack_speed);
            return true;
        }

        self.set_destination(target_pos, ctx);
        false
    }

    fn idle_step(&mut self, ctx: &mut TickContext<'_>) {
        let nearest = self.nearest_viewer(ctx);
        let wander = self.wander_candidate(ctx);

        self.set_target(nearest.map(|(id, _)| id), ctx);
        let destination = nearest.map(|(_, cell)| cell).unwrap_or(wander);
        self.set_destination(destination, ctx);
    }

    /// Closest viewer strictly inside view range, first seen wins ties
    fn nearest_viewer(&self, ctx: &TickContext<'_>) -> Option<(PlayerId, Cell)> {
        let view = self.template.view_range as i32;
        self.viewport
            .iter()
            .filter_map(|&id| ctx.players.position(id).map(|cell| (id, cell)))
            .map(|(id, cell)| (id, cell, cell.distance(self.position)))
            .filter(|&(_, _, dist)| dist < view)
            .min_by_key(|&(_, _, dist)| dist)
            .map(|(id, cell, _)| (id, cell))
    }

    /// A random walkable cell within move range, or the current position
    /// when none turns up after the retries.
    pub(super) fn wander_candidate(&self, ctx: &mut TickContext<'_>) -> Cell {
        let range = self.template.move_range;
        let roll = |ctx: &mut TickContext<'_>| {
            let dx = ctx.rng.offset(range);
            let dy = ctx.rng.offset(range);
            self.position.offset_clamped(dx, dy)
        };

        let mut candidate = roll(ctx);
        let mut retries = 0;
        while ctx.map.contains_any(candidate, MapAttributes::IMPASSABLE) {
            if retries == WANDER_RETRIES {
                return self.position;
            }
            candidate = roll(ctx);
            retries += 1;
        }
        candidate
    }

    fn distance_to(&self, target: PlayerId, ctx: &TickContext<'_>) -> Option<i32> {
        ctx.players
            .position(target)
            .map(|cell| cell.distance(self.position))
    }

    fn lose_target(&mut self, ctx: &mut TickContext<'_>) {
        self.set_target(None, ctx);
        self.path.clear();
        self.destination = self.position;
        self.behavior = BehaviorState::Idle;
    }

    /// Request a path to the current destination and start walking it.
    pub(super) fn make_path(&mut self, ctx: &mut TickContext<'_>) {
        let requested = self.destination;
        let found = ctx.pathfinder.find_path(
            self.position,
            requested,
            &*ctx.map,
            MapAttributes::IMPASSABLE,
        );

        let Some(cells) = found else {
            debug!(
                monster = self.index.0,
                from_x = self.position.x,
                from_y = self.position.y,
                to_x = requested.x,
                to_y = requested.y,
                "path_not_found"
            );
            self.destination = self.position;
            self.behavior = BehaviorState::Idle;
            return;
        };

        self.path = cells.into_iter().skip(1).collect();

        if let Some(target_pos) = self.target.and_then(|t| ctx.players.position(t)) {
            let range = self.template.attack_range as i32;
            if let Some(stop) = self
                .path
                .iter()
                .position(|cell| target_pos.distance(*cell) <= range)
            {
                self.path.truncate(stop + 1);
                self.destination = self.path[stop];
            }
        }

        self.direction = facing(requested, self.destination);
        let message = Notification::Move {
            index: self.index,
            destination: self.destination,
            direction: self.direction,
        };
        for &viewer in &self.viewport {
            ctx.notifier.send(viewer, message);
        }

        self.next_action = ctx.now + millis(self.template.move_speed);
        self.behavior = BehaviorState::Walking;
    }

    /// Resolve one attack on `target` with the species' weapon and spell.
    fn attack(&self, target: PlayerId, ctx: &mut TickContext<'_>) -> AttackOutcome {
        let template = &self.template;
        let spell_damage = match template.spell {
            Some(spell) => match ctx.skills.get(spell) {
                Some(skill) => Some((skill.damage_min, skill.damage_max)),
                None => {
                    warn!(monster = self.index.0, spell = spell.0, "unknown_innate_spell");
                    None
                }
            },
            None => None,
        };
        let profile = AttackProfile {
            success: template.success,
            damage_min: template.damage_min,
            damage_max: template.damage_max,
            spell: spell_damage.and(template.spell),
            spell_damage,
        };
        let defense = ctx.players.defense(target).unwrap_or_default();
        resolve_attack(ctx.rng, &profile, &defense)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Fixture, template};

    fn live_monster(fx: &mut Fixture, at: Cell) -> Monster {
        let mut monster = fx.spawn(template(), at);
        monster.set_state(LifeState::Live, fx.now);
        monster
    }

    #[test]
    fn test_no_action_before_next_action_time() {
        let mut fx = Fixture::new();
        let mut monster = live_monster(&mut fx, Cell::new(50, 50));
        monster.next_action = fx.now + millis(500);
        let before = fx.rng.clone();
        monster.update(&mut fx.ctx());
        assert_eq!(monster.behavior(), BehaviorState::Idle);
        assert_eq!(fx.pathfinder.calls, 0);
        assert_eq!(fx.rng.rn2(1_000_000), before.clone().rn2(1_000_000));
    }

    #[test]
    fn test_npc_and_dead_monsters_never_act() {
        let mut fx = Fixture::new();
        let mut npc = fx.spawn_kind(template(), Cell::new(50, 50), ObjectType::Npc);
        npc.set_state(LifeState::Live, fx.now);
        npc.update(&mut fx.ctx());

        let mut waiting = fx.spawn(template(), Cell::new(60, 60));
        waiting.update(&mut fx.ctx());

        assert_eq!(fx.pathfinder.calls, 0);
        assert_eq!(npc.position(), Cell::new(50, 50));
        assert_eq!(waiting.behavior(), BehaviorState::Idle);
    }

    #[test]
    fn test_idle_acquires_nearest_viewer() {
        let mut fx = Fixture::new();
        let far = fx.add_player(1, Cell::new(54, 50));
        let near = fx.add_player(2, Cell::new(52, 50));
        let outside = fx.add_player(3, Cell::new(51, 80));
        let mut monster = live_monster(&mut fx, Cell::new(50, 50));
        for id in [far, near, outside] {
            monster.add_viewer(id);
        }

        monster.update(&mut fx.ctx());

        assert_eq!(monster.target(), Some(near));
        assert_eq!(fx.roster.watchers(near), vec![monster.index()]);
        assert_eq!(monster.behavior(), BehaviorState::Walking);
        // stops at the first cell within attack range of (52, 50)
        assert_eq!(monster.destination(), Cell::new(51, 50));
    }

    #[test]
    fn test_idle_ignores_viewer_at_exact_view_range() {
        let mut fx = Fixture::new();
        let id = fx.add_player(1, Cell::new(55, 50));
        let mut monster = live_monster(&mut fx, Cell::new(50, 50));
        monster.add_viewer(id);
        monster.update(&mut fx.ctx());
        assert_eq!(monster.target(), None);
    }

    #[test]
    fn test_move_broadcast_to_viewport() {
        let mut fx = Fixture::new();
        let a = fx.add_player(1, Cell::new(53, 50));
        let mut monster = live_monster(&mut fx, Cell::new(50, 50));
        monster.add_viewer(a);
        monster.update(&mut fx.ctx());

        let moves: Vec<_> = fx
            .outbox
            .to(a)
            .filter(|m| matches!(m, Notification::Move { .. }))
            .copied()
            .collect();
        assert_eq!(
            moves,
            vec![Notification::Move {
                index: monster.index(),
                destination: Cell::new(52, 50),
                direction: facing(Cell::new(53, 50), Cell::new(52, 50)),
            }]
        );
    }

    #[test]
    fn test_walking_consumes_one_cell_per_step() {
        let mut fx = Fixture::new();
        let mut tpl = template();
        tpl.move_range = 0;
        let mut monster = live_monster(&mut fx, Cell::new(50, 50));
        monster.template = std::sync::Arc::new(tpl);
        monster.set_destination(Cell::new(53, 50), &mut fx.ctx());
        assert_eq!(monster.path().count(), 3);

        fx.now = monster.next_action();
        monster.update(&mut fx.ctx());
        assert_eq!(monster.position(), Cell::new(51, 50));
        assert_eq!(monster.next_action(), fx.now + millis(400));

        fx.now = monster.next_action();
        monster.update(&mut fx.ctx());
        fx.now = monster.next_action();
        monster.update(&mut fx.ctx());
        assert_eq!(monster.position(), Cell::new(53, 50));
        assert_eq!(monster.behavior(), BehaviorState::Walking);

        // exhausted path with no target falls back to idle
        fx.now = monster.next_action();
        monster.update(&mut fx.ctx());
        assert_eq!(monster.position(), Cell::new(53, 50));
        assert_ne!(monster.behavior(), BehaviorState::Engaging);
    }

    #[test]
    fn test_walking_stops_when_target_in_range() {
        let mut fx = Fixture::new();
        let id = fx.add_player(1, Cell::new(54, 50));
        let mut monster = live_monster(&mut fx, Cell::new(50, 50));
        monster.set_target(Some(id), &mut fx.ctx());
        monster.set_destination(Cell::new(54, 50), &mut fx.ctx());
        // truncated to the first cell one step from the target
        assert_eq!(monster.destination(), Cell::new(53, 50));

        // the target steps closer while the monster walks
        fx.roster.move_to(id, Cell::new(52, 50));
        fx.now = monster.next_action();
        monster.update(&mut fx.ctx());
        assert_eq!(monster.position(), Cell::new(51, 50));
        assert_eq!(monster.behavior(), BehaviorState::Engaging);
        assert_eq!(monster.path().count(), 0);
    }

    #[test]
    fn test_walking_drops_target_out_of_view() {
        let mut fx = Fixture::new();
        let id = fx.add_player(1, Cell::new(54, 50));
        let mut monster = live_monster(&mut fx, Cell::new(50, 50));
        monster.set_target(Some(id), &mut fx.ctx());
        monster.set_destination(Cell::new(54, 50), &mut fx.ctx());

        fx.roster.move_to(id, Cell::new(120, 120));
        fx.now = monster.next_action();
        monster.update(&mut fx.ctx());

        assert_eq!(monster.target(), None);
        assert_eq!(monster.behavior(), BehaviorState::Idle);
        assert_eq!(monster.path().count(), 0);
        assert!(fx.roster.watchers(id).is_empty());
    }

    #[test]
    fn test_engaging_attacks_in_range() {
        let mut fx = Fixture::new();
        let id = fx.add_player(1, Cell::new(51, 50));
        let mut monster = live_monster(&mut fx, Cell::new(50, 50));
        monster.set_target(Some(id), &mut fx.ctx());
        monster.behavior = BehaviorState::Engaging;

        monster.update(&mut fx.ctx());

        assert_eq!(monster.next_action(), fx.now + millis(1600));
        assert_eq!(monster.destination(), monster.position());
        assert_eq!(fx.pathfinder.calls, 0);
        // template hits 20..=30 against zero defense with full accuracy
        let hp = fx.roster.get(id).unwrap().vitals.hp();
        assert!((70..=80).contains(&hp), "hp = {hp}");
    }

    #[test]
    fn test_engaging_drops_target_out_of_view() {
        let mut fx = Fixture::new();
        let id = fx.add_player(1, Cell::new(90, 90));
        let mut monster = live_monster(&mut fx, Cell::new(50, 50));
        monster.set_target(Some(id), &mut fx.ctx());
        monster.behavior = BehaviorState::Engaging;

        monster.update(&mut fx.ctx());

        assert_eq!(monster.target(), None);
        assert_eq!(monster.behavior(), BehaviorState::Idle);
        assert_eq!(monster.next_action(), fx.now + millis(1600));
    }

    #[test]
    fn test_engaging_chases_target_in_view() {
        let mut fx = Fixture::new();
        let id = fx.add_player(1, Cell::new(53, 50));
        let mut monster = live_monster(&mut fx, Cell::new(50, 50));
        monster.set_target(Some(id), &mut fx.ctx());
        monster.behavior = BehaviorState::Engaging;

        monster.update(&mut fx.ctx());

        assert_eq!(fx.pathfinder.calls, 1);
        assert_eq!(monster.behavior(), BehaviorState::Walking);
        assert_eq!(monster.destination(), Cell::new(52, 50));
    }

    #[test]
    fn test_failed_path_collapses_to_idle() {
        let mut fx = Fixture::new();
        fx.map
            .mark_rect(Cell::new(60, 60), Cell::new(60, 60), MapAttributes::NO_WALK);
        let mut monster = live_monster(&mut fx, Cell::new(50, 50));
        monster.set_destination(Cell::new(60, 60), &mut fx.ctx());
        assert_eq!(monster.destination(), monster.position());
        assert_eq!(monster.behavior(), BehaviorState::Idle);
        assert!(fx.outbox.sent().is_empty());
    }

    #[test]
    fn test_wander_stays_inside_move_range() {
        let mut fx = Fixture::new();
        let monster = live_monster(&mut fx, Cell::new(50, 50));
        for _ in 0..200 {
            let cell = monster.wander_candidate(&mut fx.ctx());
            assert!((47..53).contains(&cell.x) && (47..53).contains(&cell.y));
        }
    }

    #[test]
    fn test_wander_falls_back_when_surrounded() {
        let mut fx = Fixture::new();
        fx.map
            .mark_rect(Cell::new(40, 40), Cell::new(60, 60), MapAttributes::SAFE);
        let monster = live_monster(&mut fx, Cell::new(50, 50));
        assert_eq!(monster.wander_candidate(&mut fx.ctx()), Cell::new(50, 50));
    }

    #[test]
    fn test_wander_clamps_at_map_edge() {
        let mut fx = Fixture::new();
        let monster = live_monster(&mut fx, Cell::new(0, 255));
        for _ in 0..100 {
            let cell = monster.wander_candidate(&mut fx.ctx());
            assert!(cell.x <= 2 && cell.y >= 252);
        }
    }
}
