//! Monster system
//!
//! Species templates, spawned instances, the per-tick AI and the death
//! payout.

mod ai;
mod context;
mod lifecycle;
mod monst;
mod template;

pub use context::TickContext;
pub use lifecycle::{Reward, base_experience, reward_for};
pub use monst::{BehaviorState, LifeState, Monster, MonsterIndex, ObjectType};
pub use template::{MonsterCatalog, MonsterTemplate, SpeciesId};
