//! Outbound notifications
//!
//! Monsters talk to clients only through [`Notifier`]. Delivery is
//! fire-and-forget; there is no acknowledgment path back into the simulation.

use serde::{Deserialize, Serialize};

use crate::combat::DamageKind;
use crate::map::Cell;
use crate::monster::MonsterIndex;
use crate::player::PlayerId;
use crate::world::TimeDelta;

/// Messages a monster sends to player sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notification {
    /// The monster started walking towards `destination`
    Move {
        index: MonsterIndex,
        destination: Cell,
        direction: u8,
    },
    /// Result of the recipient's attack on the monster
    AttackResult {
        index: MonsterIndex,
        damage: u16,
        kind: DamageKind,
        reserved: u8,
    },
    /// The monster died
    Die {
        index: MonsterIndex,
        cause: u8,
        killer: u16,
    },
    /// Reward report for one contributor to the kill
    Kill {
        index: MonsterIndex,
        experience: u16,
        last_hit: u16,
    },
}

/// Session delivery channel
pub trait Notifier {
    fn send(&mut self, to: PlayerId, message: Notification);

    /// Deliver after `delay` instead of immediately
    fn send_delayed(&mut self, to: PlayerId, delay: TimeDelta, message: Notification);
}

/// One recorded delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub to: PlayerId,
    /// `None` for immediate delivery
    pub delay: Option<TimeDelta>,
    pub message: Notification,
}

/// Notifier that records every delivery in order
#[derive(Debug, Default)]
pub struct Outbox {
    sent: Vec<Envelope>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> &[Envelope] {
        &self.sent
    }

    /// Messages addressed to `player`, in delivery order
    pub fn to(&self, player: PlayerId) -> impl Iterator<Item = &Notification> + '_ {
        self.sent
            .iter()
            .filter(move |e| e.to == player)
            .map(|e| &e.message)
    }

    pub fn count(&self, pred: impl Fn(&Notification) -> bool) -> usize {
        self.sent.iter().filter(|e| pred(&e.message)).count()
    }

    pub fn drain(&mut self) -> Vec<Envelope> {
        std::mem::take(&mut self.sent)
    }

    pub fn clear(&mut self) {
        self.sent.clear();
    }
}

impl Notifier for Outbox {
    fn send(&mut self, to: PlayerId, message: Notification) {
        self.sent.push(Envelope {
            to,
            delay: None,
            message,
        });
    }

    fn send_delayed(&mut self, to: PlayerId, delay: TimeDelta, message: Notification) {
        self.sent.push(Envelope {
            to,
            delay: Some(delay),
            message,
        });
    }
}
