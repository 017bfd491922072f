//! Hit points that several attackers may reduce at once
//!
//! The reduction is a single compare-and-swap loop, so exactly one caller
//! observes the transition to zero no matter how many race across it.

use std::sync::atomic::{AtomicI32, Ordering};

#[derive(Debug)]
pub struct Vitals {
    hp: AtomicI32,
    max_hp: i32,
}

impl Vitals {
    pub fn new(max_hp: i32) -> Self {
        let max_hp = max_hp.max(0);
        Self {
            hp: AtomicI32::new(max_hp),
            max_hp,
        }
    }

    pub fn hp(&self) -> i32 {
        self.hp.load(Ordering::Acquire)
    }

    pub fn is_alive(&self) -> bool {
        self.hp() > 0
    }

    /// Subtract `damage` (negative treated as zero), never going below zero.
    /// Returns true only for the call that took hp from positive to zero.
    pub fn take(&self, damage: i32) -> bool {
        let damage = damage.max(0);
        let previous = self
            .hp
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |hp| {
                Some(hp.saturating_sub(damage).max(0))
            })
            .unwrap_or_else(|hp| hp);
        previous > 0 && previous <= damage
    }

    pub fn restore(&self) {
        self.hp.store(self.max_hp, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;
    use std::thread;

    #[test]
    fn test_take_clamps_and_reports_once() {
        let vitals = Vitals::new(10);
        assert!(!vitals.take(4));
        assert!(!vitals.take(-20));
        assert_eq!(vitals.hp(), 6);
        assert!(vitals.take(6));
        assert!(!vitals.take(6));
        assert_eq!(vitals.hp(), 0);
    }

    #[test]
    fn test_concurrent_reductions_report_one_death() {
        let vitals = Arc::new(Vitals::new(1_000));
        let deaths = Arc::new(AtomicUsize::new(0));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let vitals = Arc::clone(&vitals);
                let deaths = Arc::clone(&deaths);
                thread::spawn(move || {
                    for _ in 0..200 {
                        if vitals.take(3) {
                            deaths.fetch_add(1, Ordering::SeqCst);
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(vitals.hp(), 0);
        assert_eq!(deaths.load(Ordering::SeqCst), 1);
    }
}
