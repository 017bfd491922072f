//! Monster death and reward distribution
//!
//! Runs once per life, when hit points cross to zero. Every contributor in
//! the damage ledger is paid on its own share of the monster's max HP; the
//! shares are not normalized against each other, so several contributors
//! can together earn more than the nominal experience.

use tracing::{info, trace};

use super::{Monster, TickContext};
use crate::consts::DEATH_CAUSE_PLAYER;
use crate::object::{GroundDrop, generate_loot};
use crate::player::PlayerId;
use crate::rng::GameRng;
use crate::session::Notification;

/// Experience and currency owed to one contributor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reward {
    /// Experience after the server multiplier
    pub experience: f32,
    /// Currency after the server multiplier
    pub zen: f32,
}

/// Experience before the random bonus for a monster of `level` killed by a
/// player of `player_level`
pub fn base_experience(level: u16, player_level: u16) -> f32 {
    let level = level as u32;
    let mut exp = ((level + 10) * level / 4) as f32;
    if level + 10 < player_level as u32 {
        exp = exp * (level + 10) as f32 / player_level as f32;
    }
    exp
}

/// Reward for a contributor who dealt `dealt` damage to a monster with
/// `max_life` hit points.
pub fn reward_for(
    rng: &mut GameRng,
    level: u16,
    player_level: u16,
    dealt: u32,
    max_life: f32,
    experience_rate: f32,
    zen_rate: f32,
) -> Reward {
    let mut exp = base_experience(level, player_level);
    if exp / 2.0 > 1.0 {
        exp += rng.rn2((exp / 2.0) as u32) as f32;
    }
    exp *= dealt as f32 / max_life;

    Reward {
        experience: exp * experience_rate,
        zen: exp * zen_rate,
    }
}

impl Monster {
    pub(super) fn on_death(&mut self, ctx: &mut TickContext<'_>) {
        if self.loot.is_none() {
            self.loot = Some(generate_loot(self.level(), ctx.items, ctx.rng));
        }

        let killer_id = self.killer.map_or(0, |p| p.0);
        let die = Notification::Die {
            index: self.index,
            cause: DEATH_CAUSE_PLAYER,
            killer: killer_id,
        };
        for &viewer in &self.viewport {
            ctx.notifier.send(viewer, die);
        }

        info!(
            monster = self.index.0,
            species = %self.template.name,
            killer = killer_id,
            contributors = self.damage.len(),
            "monster_died"
        );

        let ledger = std::mem::take(&mut self.damage);
        for (contributor, dealt) in ledger {
            self.pay(contributor, dealt, ctx);
        }
    }

    fn pay(&self, contributor: PlayerId, dealt: u32, ctx: &mut TickContext<'_>) {
        let Some(player_level) = ctx.players.level(contributor) else {
            trace!(monster = self.index.0, player = contributor.0, "contributor_gone");
            return;
        };

        let reward = reward_for(
            ctx.rng,
            self.level(),
            player_level,
            dealt,
            self.max_life(),
            ctx.rates.experience,
            ctx.rates.zen,
        );
        ctx.players
            .credit_experience(contributor, reward.experience as u64);

        let reported = reward.experience.min(u16::MAX as f32) as u16;
        let last_hit = if self.killer == Some(contributor) {
            self.deadly_damage
        } else {
            0
        };
        ctx.notifier.send(
            contributor,
            Notification::Kill {
                index: self.index,
                experience: reported,
                last_hit,
            },
        );

        trace!(
            monster = self.index.0,
            player = contributor.0,
            dealt,
            experience = reward.experience,
            zen = reward.zen,
            "reward_paid"
        );

        if ctx.rng.percent(ctx.rates.drop_rate) {
            let item = if ctx.rng.one_in(2) {
                self.loot.as_ref().and_then(|pool| pool.pick(ctx.rng))
            } else {
                None
            };
            let drop = match item {
                Some(item) => GroundDrop::Item(item),
                None => GroundDrop::Zen(reward.zen as u32),
            };
            ctx.map.add_item(self.position, drop);
        }
    }
}
