//! Per-actor cooldown bookkeeping

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Cooldown record for one ability on one actor
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CooldownState {
    /// When the ability was last invoked (hit or miss)
    pub last_used_at: Option<f64>,
    /// When the ability may next be invoked
    pub ready_at: Option<f64>,
}

impl CooldownState {
    /// Ready when never used or once `now` reaches `ready_at`
    pub fn is_ready(&self, now: f64) -> bool {
        self.ready_at.map_or(true, |ready_at| now >= ready_at)
    }

    /// Seconds until ready (0 when ready)
    pub fn remaining(&self, now: f64) -> f64 {
        self.ready_at.map_or(0.0, |ready_at| (ready_at - now).max(0.0))
    }

    /// Start the cooldown at `now`
    pub fn commit(&mut self, now: f64, duration: f64) {
        self.last_used_at = Some(now);
        self.ready_at = Some(now + duration);
    }
}

/// All cooldown records owned by one actor
///
/// Each ability gets its own lock, so checking and committing one ability's
/// cooldown never blocks another ability or another actor.
#[derive(Debug, Default)]
pub struct CooldownBook {
    slots: Mutex<HashMap<String, Arc<Mutex<CooldownState>>>>,
}

impl CooldownBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// The lockable record for an ability, created on first use
    pub fn slot(&self, ability: &str) -> Arc<Mutex<CooldownState>> {
        let mut slots = self.slots.lock();
        slots
            .entry(ability.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(CooldownState::default())))
            .clone()
    }

    /// Snapshot of an ability's record (default when never used)
    pub fn state(&self, ability: &str) -> CooldownState {
        let slot = self.slots.lock().get(ability).cloned();
        slot.map(|s| *s.lock()).unwrap_or_default()
    }

    /// Seconds until `ability` is ready at `now`
    pub fn remaining(&self, ability: &str, now: f64) -> f64 {
        self.state(ability).remaining(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unused_is_ready() {
        let state = CooldownState::default();
        assert!(state.is_ready(0.0));
        assert_eq!(state.remaining(0.0), 0.0);
    }

    #[test]
    fn test_commit_starts_cooldown() {
        let mut state = CooldownState::default();
        state.commit(10.0, 180.0);

        assert_eq!(state.last_used_at, Some(10.0));
        assert_eq!(state.ready_at, Some(190.0));
        assert!(!state.is_ready(189.9));
        assert!(state.is_ready(190.0));
        assert!((state.remaining(100.0) - 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_cooldown_is_immediately_ready() {
        let mut state = CooldownState::default();
        state.commit(5.0, 0.0);
        assert!(state.is_ready(5.0));
    }

    #[test]
    fn test_book_slots_are_shared() {
        let book = CooldownBook::new();
        book.slot("skullknock").lock().commit(0.0, 180.0);

        assert_eq!(book.state("skullknock").ready_at, Some(180.0));
        assert_eq!(book.state("kick"), CooldownState::default());
        assert!(Arc::ptr_eq(&book.slot("skullknock"), &book.slot("skullknock")));
    }
}
