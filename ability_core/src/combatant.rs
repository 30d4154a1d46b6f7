//! Combatant - the minimal entity an ability acts on

use crate::cooldown::CooldownBook;
use effect_core::{ActiveEffects, EffectInstance};
use parking_lot::{Mutex, MutexGuard};
use std::collections::HashMap;

/// The ability an actor used most recently
#[derive(Debug, Clone, PartialEq)]
pub struct LastAction {
    pub ability: String,
    pub at: f64,
}

#[derive(Debug, Clone, Copy)]
struct Vitals {
    life: f64,
    max_life: f64,
}

/// A participant in combat
///
/// Shared between threads by reference (usually inside an `Arc`); every
/// mutable part sits behind its own lock.
#[derive(Debug)]
pub struct Combatant {
    id: String,
    level: u32,
    vitals: Mutex<Vitals>,
    resources: Mutex<HashMap<String, f64>>,
    saving_throws: HashMap<String, f64>,
    cooldowns: CooldownBook,
    last_action: Mutex<Option<LastAction>>,
    effects: Mutex<ActiveEffects>,
}

impl Combatant {
    /// Create a combatant at full life (100)
    pub fn new(id: impl Into<String>, level: u32) -> Self {
        Combatant {
            id: id.into(),
            level,
            vitals: Mutex::new(Vitals {
                life: 100.0,
                max_life: 100.0,
            }),
            resources: Mutex::new(HashMap::new()),
            saving_throws: HashMap::new(),
            cooldowns: CooldownBook::new(),
            last_action: Mutex::new(None),
            effects: Mutex::new(ActiveEffects::new()),
        }
    }

    /// Set maximum and current life
    pub fn with_life(self, max_life: f64) -> Self {
        *self.vitals.lock() = Vitals {
            life: max_life,
            max_life,
        };
        self
    }

    /// Add a named resource pool (stamina, mana, ...)
    pub fn with_resource(self, resource: impl Into<String>, amount: f64) -> Self {
        self.resources.lock().insert(resource.into(), amount);
        self
    }

    /// Set the chance (0..=1) of passing a named saving throw
    pub fn with_saving_throw(mut self, save: impl Into<String>, chance: f64) -> Self {
        self.saving_throws.insert(save.into(), chance);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn life(&self) -> f64 {
        self.vitals.lock().life
    }

    pub fn max_life(&self) -> f64 {
        self.vitals.lock().max_life
    }

    pub fn is_alive(&self) -> bool {
        self.life() > 0.0
    }

    /// Subtract life, returning the amount actually lost
    pub fn take_damage(&self, amount: f64) -> f64 {
        let mut vitals = self.vitals.lock();
        let lost = amount.max(0.0).min(vitals.life.max(0.0));
        vitals.life -= lost;
        lost
    }

    /// Current amount of a resource (0 when the pool doesn't exist)
    pub fn resource(&self, resource: &str) -> f64 {
        self.resources.lock().get(resource).copied().unwrap_or(0.0)
    }

    pub(crate) fn resources(&self) -> MutexGuard<'_, HashMap<String, f64>> {
        self.resources.lock()
    }

    /// Chance of passing a saving throw (0 when the save is unknown)
    pub fn saving_throw(&self, save: &str) -> f64 {
        self.saving_throws.get(save).copied().unwrap_or(0.0)
    }

    pub fn cooldowns(&self) -> &CooldownBook {
        &self.cooldowns
    }

    pub fn last_action(&self) -> Option<LastAction> {
        self.last_action.lock().clone()
    }

    pub(crate) fn record_action(&self, ability: &str, at: f64) {
        *self.last_action.lock() = Some(LastAction {
            ability: ability.to_string(),
            at,
        });
    }

    /// Lock this combatant's active effects
    pub fn effects(&self) -> MutexGuard<'_, ActiveEffects> {
        self.effects.lock()
    }

    /// Whether an unexpired `effect` is active at `now`
    pub fn has_effect(&self, effect: &str, now: f64) -> bool {
        self.effects.lock().contains_active(effect, now)
    }

    /// The id of an active incapacitating effect at `now`, if any
    pub fn incapacitated_by(&self, now: f64) -> Option<String> {
        self.effects.lock().incapacitated_by(now).map(str::to_string)
    }

    /// Expire effects that have run out; called by the host's sweep schedule
    pub fn sweep_effects(&self, now: f64) -> Vec<EffectInstance> {
        self.effects.lock().sweep(&self.id, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use effect_core::StackingPolicy;

    #[test]
    fn test_damage_floors_at_zero() {
        let goblin = Combatant::new("goblin", 3).with_life(40.0);
        assert_eq!(goblin.take_damage(15.0), 15.0);
        assert_eq!(goblin.life(), 25.0);

        assert_eq!(goblin.take_damage(100.0), 25.0);
        assert_eq!(goblin.life(), 0.0);
        assert!(!goblin.is_alive());
        assert_eq!(goblin.max_life(), 40.0);
    }

    #[test]
    fn test_negative_damage_is_ignored() {
        let goblin = Combatant::new("goblin", 3);
        assert_eq!(goblin.take_damage(-10.0), 0.0);
        assert_eq!(goblin.life(), 100.0);
    }

    #[test]
    fn test_resources_and_saves() {
        let dwarf = Combatant::new("dwarf", 10)
            .with_resource("stamina", 50.0)
            .with_saving_throw("fortitude", 0.25);

        assert_eq!(dwarf.resource("stamina"), 50.0);
        assert_eq!(dwarf.resource("mana"), 0.0);
        assert_eq!(dwarf.saving_throw("fortitude"), 0.25);
        assert_eq!(dwarf.saving_throw("reflex"), 0.0);
    }

    #[test]
    fn test_effect_sweep_and_incapacitation() {
        let goblin = Combatant::new("goblin", 3);
        let mut stun = EffectInstance::new("stunned", 4.0).incapacitating(true);
        stun.stamp(0.0);
        goblin
            .effects()
            .attach(stun, &StackingPolicy::Refresh, goblin.id(), 0.0);

        assert!(goblin.has_effect("stunned", 1.0));
        assert_eq!(goblin.incapacitated_by(1.0).as_deref(), Some("stunned"));

        let expired = goblin.sweep_effects(4.0);
        assert_eq!(expired.len(), 1);
        assert!(goblin.incapacitated_by(4.0).is_none());
        assert!(goblin.effects().is_empty());
    }
}
