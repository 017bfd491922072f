//! Monster instances
//!
//! One [`Monster`] per spawned actor. Lifecycle operations live here; the
//! per-tick behaviour is in `ai` and the death payout in `lifecycle`.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::{debug, warn};

use super::{MonsterTemplate, TickContext};
use crate::combat::{DamageKind, DefenseProfile};
use crate::consts::DELAYED_ATTACK_RESULT_MS;
use crate::map::{Cell, MapId};
use crate::object::LootPool;
use crate::player::PlayerId;
use crate::rng::GameRng;
use crate::session::Notification;
use crate::world::{TimeDelta, Timestamp, seconds};

/// World index of a monster instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonsterIndex(pub u16);

/// Whether the actor fights at all
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display)]
pub enum ObjectType {
    #[default]
    Monster,
    /// Non-combatant; never ticks
    Npc,
}

/// Coarse alive/dead status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display)]
pub enum LifeState {
    /// Just (re)spawned, waiting for activation
    #[default]
    Regen,
    Live,
    Dying,
    Dead,
}

/// AI sub-state, meaningful only while [`LifeState::Live`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display)]
pub enum BehaviorState {
    #[default]
    Idle,
    Walking,
    Engaging,
}

/// A spawned monster
#[derive(Debug, Clone)]
pub struct Monster {
    pub(super) index: MonsterIndex,
    pub(super) template: Arc<MonsterTemplate>,
    pub(super) kind: ObjectType,
    pub(super) map_id: MapId,

    pub(super) spawn: Cell,
    pub(super) position: Cell,
    /// Requested destination
    pub(super) destination: Cell,
    pub(super) direction: u8,

    pub(super) life: f32,
    pub(super) mana: f32,

    pub(super) state: LifeState,
    pub(super) regen_at: Timestamp,
    pub(super) next_action: Timestamp,
    pub(super) behavior: BehaviorState,

    pub(super) target: Option<PlayerId>,
    /// Remaining cells to walk, current position excluded
    pub(super) path: VecDeque<Cell>,
    /// Players allowed to receive this monster's notifications
    pub(super) viewport: Vec<PlayerId>,

    /// Damage per attacker since the last death
    pub(super) damage: BTreeMap<PlayerId, u32>,
    pub(super) killer: Option<PlayerId>,
    pub(super) deadly_damage: u16,

    /// Materialized on first death, then kept for the instance's lifetime
    pub(super) loot: Option<LootPool>,
}

impl Monster {
    /// Spawn a monster at `spawn` and register it with the map.
    ///
    /// The instance starts in [`LifeState::Regen`] with its regen time set
    /// to now, so the first regen check succeeds.
    pub fn new(
        index: MonsterIndex,
        template: Arc<MonsterTemplate>,
        kind: ObjectType,
        map_id: MapId,
        spawn: Cell,
        direction: u8,
        ctx: &mut TickContext<'_>,
    ) -> Self {
        if let Some(spell) = template.spell {
            if ctx.skills.get(spell).is_none() {
                warn!(
                    monster = index.0,
                    species = %template.name,
                    spell = spell.0,
                    "unknown_innate_spell"
                );
            }
        }

        ctx.map.add_monster(index);

        Self {
            index,
            life: template.hp as f32,
            mana: template.mp as f32,
            template,
            kind,
            map_id,
            spawn,
            position: spawn,
            destination: spawn,
            direction,
            state: LifeState::Regen,
            regen_at: ctx.now,
            next_action: ctx.now,
            behavior: BehaviorState::Idle,
            target: None,
            path: VecDeque::new(),
            viewport: Vec::new(),
            damage: BTreeMap::new(),
            killer: None,
            deadly_damage: 0,
            loot: None,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn index(&self) -> MonsterIndex {
        self.index
    }

    pub fn template(&self) -> &MonsterTemplate {
        &self.template
    }

    pub fn kind(&self) -> ObjectType {
        self.kind
    }

    pub fn map_id(&self) -> MapId {
        self.map_id
    }

    pub fn level(&self) -> u16 {
        self.template.level
    }

    pub fn spawn(&self) -> Cell {
        self.spawn
    }

    pub fn position(&self) -> Cell {
        self.position
    }

    pub fn destination(&self) -> Cell {
        self.destination
    }

    pub fn direction(&self) -> u8 {
        self.direction
    }

    pub fn life(&self) -> f32 {
        self.life
    }

    pub fn max_life(&self) -> f32 {
        self.template.hp as f32
    }

    pub fn mana(&self) -> f32 {
        self.mana
    }

    pub fn max_mana(&self) -> f32 {
        self.template.mp as f32
    }

    pub fn state(&self) -> LifeState {
        self.state
    }

    pub fn regen_at(&self) -> Timestamp {
        self.regen_at
    }

    pub fn next_action(&self) -> Timestamp {
        self.next_action
    }

    pub fn behavior(&self) -> BehaviorState {
        self.behavior
    }

    pub fn target(&self) -> Option<PlayerId> {
        self.target
    }

    pub fn path(&self) -> impl Iterator<Item = Cell> + '_ {
        self.path.iter().copied()
    }

    pub fn viewport(&self) -> &[PlayerId] {
        &self.viewport
    }

    /// Cumulative damage dealt by `player` since the last death
    pub fn damage_by(&self, player: PlayerId) -> u32 {
        self.damage.get(&player).copied().unwrap_or(0)
    }

    /// The damage ledger in attacker order
    pub fn damage_ledger(&self) -> impl Iterator<Item = (PlayerId, u32)> + '_ {
        self.damage.iter().map(|(p, d)| (*p, *d))
    }

    pub fn killer(&self) -> Option<PlayerId> {
        self.killer
    }

    pub fn deadly_damage(&self) -> u16 {
        self.deadly_damage
    }

    pub fn loot(&self) -> Option<&LootPool> {
        self.loot.as_ref()
    }

    pub fn is_alive(&self) -> bool {
        self.state == LifeState::Live
    }

    /// Template attack plus a roll in the damage range
    pub fn attack_rating(&self, rng: &mut GameRng) -> i32 {
        self.template.attack + rng.between(self.template.damage_min, self.template.damage_max)
    }

    /// Defensive stats players roll their attacks against
    pub fn defense_profile(&self) -> DefenseProfile {
        DefenseProfile {
            defense: self.template.defense,
            defense_rate: self.template.defense_rate,
        }
    }

    // =========================================================================
    // Visibility set
    // =========================================================================

    pub fn add_viewer(&mut self, player: PlayerId) {
        if !self.viewport.contains(&player) {
            self.viewport.push(player);
        }
    }

    pub fn remove_viewer(&mut self, player: PlayerId) {
        self.viewport.retain(|p| *p != player);
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Change lifecycle state. Entering [`LifeState::Dead`] schedules the
    /// regen time; setting the current state again does nothing.
    pub fn set_state(&mut self, state: LifeState, now: Timestamp) {
        if self.state == state {
            return;
        }
        if state == LifeState::Dead {
            self.regen_at = now + seconds(self.template.regen_secs);
        }
        self.state = state;
    }

    /// Set hit points, clamped at zero. Crossing from positive to zero runs
    /// the death payout once and moves the monster to [`LifeState::Dying`].
    /// Returns true when this call killed the monster.
    ///
    /// A dying or dead monster keeps zero hit points; only
    /// [`Monster::try_regen`] restores them.
    pub fn set_life(&mut self, hp: f32, ctx: &mut TickContext<'_>) -> bool {
        if matches!(self.state, LifeState::Dying | LifeState::Dead) {
            return false;
        }
        let hp = hp.max(0.0);
        let was_alive = self.life > 0.0;
        self.life = hp;
        if was_alive && hp == 0.0 {
            self.on_death(ctx);
            self.set_state(LifeState::Dying, ctx.now);
            return true;
        }
        false
    }

    /// Reset a dead monster at its spawn once its regen time has come.
    pub fn try_regen(&mut self, ctx: &mut TickContext<'_>) {
        if self.regen_at > ctx.now {
            return;
        }

        self.life = self.max_life();
        self.mana = self.max_mana();
        self.position = self.spawn;
        self.destination = self.spawn;
        self.path.clear();
        self.viewport.clear();
        self.set_target(None, ctx);
        self.killer = None;
        self.deadly_damage = 0;
        self.behavior = BehaviorState::Idle;
        self.set_state(LifeState::Regen, ctx.now);

        debug!(monster = self.index.0, x = self.spawn.x, y = self.spawn.y, "monster_regenerated");
    }

    /// Set the requested destination. A destination other than the current
    /// position triggers a path request.
    pub fn set_destination(&mut self, cell: Cell, ctx: &mut TickContext<'_>) {
        self.destination = cell;
        if self.position != cell {
            self.make_path(ctx);
        }
    }

    /// Change target, moving the died/changed-map subscription with it.
    pub fn set_target(&mut self, target: Option<PlayerId>, ctx: &mut TickContext<'_>) {
        if self.target == target {
            return;
        }
        if let Some(old) = self.target {
            ctx.players.unsubscribe(old, self.index);
            debug!(monster = self.index.0, player = old.0, "target_dropped");
        }
        self.target = target;
        if let Some(new) = target {
            ctx.players.subscribe(new, self.index);
            debug!(monster = self.index.0, player = new.0, "target_acquired");
        }
    }

    /// Died/changed-map event from a player this monster subscribed to
    pub fn on_target_lost(&mut self, player: PlayerId, ctx: &mut TickContext<'_>) {
        if self.target != Some(player) {
            return;
        }
        self.set_target(None, ctx);
        self.path.clear();
        self.destination = self.position;
        self.behavior = BehaviorState::Idle;
    }

    // =========================================================================
    // Damage intake
    // =========================================================================

    /// Take a hit from `attacker` and report the result to it immediately.
    pub fn get_attacked(
        &mut self,
        attacker: PlayerId,
        damage: i32,
        kind: DamageKind,
        ctx: &mut TickContext<'_>,
    ) {
        if let Some(message) = self.take_hit(attacker, damage, kind, ctx) {
            ctx.notifier.send(attacker, message);
        }
    }

    /// As [`Monster::get_attacked`], but the result reaches the attacker after
    /// a short delay so it lands behind earlier movement notifications.
    pub fn get_attacked_delayed(
        &mut self,
        attacker: PlayerId,
        damage: i32,
        kind: DamageKind,
        ctx: &mut TickContext<'_>,
    ) {
        if let Some(message) = self.take_hit(attacker, damage, kind, ctx) {
            let delay = TimeDelta::milliseconds(DELAYED_ATTACK_RESULT_MS);
            ctx.notifier.send_delayed(attacker, delay, message);
        }
    }

    /// Shared bookkeeping of both intake paths. Returns the attack result to
    /// report, or `None` when the monster was not live or died from this hit.
    fn take_hit(
        &mut self,
        attacker: PlayerId,
        damage: i32,
        kind: DamageKind,
        ctx: &mut TickContext<'_>,
    ) -> Option<Notification> {
        if self.state != LifeState::Live {
            return None;
        }

        let damage = damage.max(0);
        let entry = self.damage.entry(attacker).or_insert(0);
        *entry = entry.saturating_add(damage as u32);

        let reported = damage.min(u16::MAX as i32) as u16;
        self.deadly_damage = reported;
        self.killer = Some(attacker);
        self.set_life(self.life - damage as f32, ctx);

        if self.state == LifeState::Dying {
            return None;
        }
        Some(Notification::AttackResult {
            index: self.index,
            damage: reported,
            kind,
            reserved: 0,
        })
    }
}
