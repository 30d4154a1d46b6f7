//! Ability behaviors - how an ability decides whether it landed
//!
//! Behaviors are pure: they look at the actor, target and combat math and
//! report an outcome. The resolver applies damage and effects afterwards.

use crate::combat::{AttackRequest, CombatMath};
use crate::combatant::Combatant;
use crate::cooldown::CooldownState;
use crate::definition::AbilityDefinition;
use rand::RngCore;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Everything a behavior may read while resolving one invocation
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    pub actor: &'a Combatant,
    pub target: &'a Combatant,
    pub level: u32,
    /// Potency for this invocation (base or combo)
    pub potency: f64,
    pub ability: &'a AbilityDefinition,
    /// The actor's cooldown record, already committed for this invocation
    pub cooldown: &'a CooldownState,
}

impl<'a> ResolveContext<'a> {
    /// The attack this invocation asks combat math to roll
    pub fn attack(&self) -> AttackRequest<'a> {
        AttackRequest {
            actor: self.actor,
            target: self.target,
            level: self.level,
            potency: self.potency,
            saving_throw: self.ability.saving_throw.as_deref(),
        }
    }
}

/// What a behavior decided
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Resolution {
    pub hit: bool,
    /// Damage to deal to the target (0 on a miss)
    pub damage: f64,
}

impl Resolution {
    pub fn hit(damage: f64) -> Self {
        Resolution { hit: true, damage }
    }

    pub fn miss() -> Self {
        Resolution::default()
    }
}

/// Strategy deciding the outcome of an ability
pub trait AbilityBehavior: Send + Sync + fmt::Debug {
    fn resolve(
        &self,
        ctx: &ResolveContext<'_>,
        combat: &dyn CombatMath,
        rng: &mut dyn RngCore,
    ) -> Resolution;
}

/// Attack roll that deals potency-scaled damage on a hit
#[derive(Debug, Default, Clone, Copy)]
pub struct Strike;

impl AbilityBehavior for Strike {
    fn resolve(
        &self,
        ctx: &ResolveContext<'_>,
        combat: &dyn CombatMath,
        rng: &mut dyn RngCore,
    ) -> Resolution {
        let roll = combat.roll_attack(&ctx.attack(), rng);
        if roll.hit {
            Resolution::hit(roll.damage)
        } else {
            Resolution::miss()
        }
    }
}

/// Attack roll that only gates the follow-up effect; never deals damage
#[derive(Debug, Default, Clone, Copy)]
pub struct Hex;

impl AbilityBehavior for Hex {
    fn resolve(
        &self,
        ctx: &ResolveContext<'_>,
        combat: &dyn CombatMath,
        rng: &mut dyn RngCore,
    ) -> Resolution {
        let roll = combat.roll_attack(&ctx.attack(), rng);
        Resolution {
            hit: roll.hit,
            damage: 0.0,
        }
    }
}

/// Ability-specific rule on who may be targeted
///
/// Runs after the base checks (living target, self-targeting) and before the
/// cooldown check. A rejection is reported as `InvalidTarget` with the
/// returned reason and consumes nothing.
pub trait TargetCheck: Send + Sync + fmt::Debug {
    fn check(&self, actor: &Combatant, target: &Combatant, now: f64) -> Result<(), String>;
}

/// Target must be unhurt (openers, ambushes)
#[derive(Debug, Default, Clone, Copy)]
pub struct Unhurt;

impl TargetCheck for Unhurt {
    fn check(&self, _actor: &Combatant, target: &Combatant, _now: f64) -> Result<(), String> {
        if target.life() < target.max_life() {
            return Err("target is already wounded".to_string());
        }
        Ok(())
    }
}

/// Target must be held by an incapacitating effect (finishers)
#[derive(Debug, Default, Clone, Copy)]
pub struct Helpless;

impl TargetCheck for Helpless {
    fn check(&self, _actor: &Combatant, target: &Combatant, now: f64) -> Result<(), String> {
        match target.incapacitated_by(now) {
            Some(_) => Ok(()),
            None => Err("target is not helpless".to_string()),
        }
    }
}

/// Behaviors and target checks selectable by name when abilities are
/// registered
#[derive(Debug, Clone, Default)]
pub struct BehaviorCatalog {
    behaviors: HashMap<String, Arc<dyn AbilityBehavior>>,
    target_checks: HashMap<String, Arc<dyn TargetCheck>>,
}

impl BehaviorCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with the `strike` and `hex` behaviors and the `unhurt` and
    /// `helpless` target checks
    pub fn with_builtins() -> Self {
        let mut catalog = Self::new();
        catalog.register("strike", Arc::new(Strike));
        catalog.register("hex", Arc::new(Hex));
        catalog.register_target_check("unhurt", Arc::new(Unhurt));
        catalog.register_target_check("helpless", Arc::new(Helpless));
        catalog
    }

    /// Add or replace a behavior
    pub fn register(&mut self, name: impl Into<String>, behavior: Arc<dyn AbilityBehavior>) {
        self.behaviors.insert(name.into(), behavior);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn AbilityBehavior>> {
        self.behaviors.get(name).cloned()
    }

    /// Add or replace a target check
    pub fn register_target_check(&mut self, name: impl Into<String>, check: Arc<dyn TargetCheck>) {
        self.target_checks.insert(name.into(), check);
    }

    pub fn target_check(&self, name: &str) -> Option<Arc<dyn TargetCheck>> {
        self.target_checks.get(name).cloned()
    }
}
