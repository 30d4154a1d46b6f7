//! Ability resolution - executing one ability against one target
//!
//! `execute` runs these steps in order:
//! 1. Reject dead or disallowed targets, then run the ability's target check
//! 2. Reject actors held by an incapacitating effect
//! 3. Reject if the ability is still cooling down for this actor
//! 4. Reject if the actor can't pay the ability's resource costs
//! 5. Reserve the cooldown and resource costs
//! 6. Start combat with the target when the ability initiates combat,
//!    releasing the reservation if combat is refused
//! 7. Resolve hit/miss through the ability's behavior
//! 8. Apply damage, then the follow-up effect on a hit
//!
//! Steps 1-4 either pass or fail without changing anything. Steps 3-5 run
//! under the actor's cooldown record for the ability, so simultaneous
//! invocations of the same ability by the same actor reserve exactly once.
//! No combatant lock is held while `CombatState` or `CombatMath` run.

use crate::behavior::{Resolution, ResolveContext};
use crate::book::AbilityBook;
use crate::combat::{CombatMath, CombatState};
use crate::combatant::Combatant;
use crate::cooldown::CooldownState;
use crate::definition::{AbilityDefinition, FollowUp, ResourceCost};
use crate::AbilityError;
use effect_core::{Attachment, Clock};
use rand::RngCore;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Everything that happened during a successful invocation
#[derive(Debug, Clone, PartialEq)]
pub struct AbilityOutcome {
    pub ability: String,
    pub hit: bool,
    /// Potency handed to combat math
    pub potency: f64,
    /// Whether combo potency replaced the base potency
    pub combo: bool,
    /// Damage actually dealt to the target
    pub damage: f64,
    /// How the follow-up effect landed, if it was attempted
    pub effect: Option<Attachment>,
    /// When the ability is next usable by the actor
    pub ready_at: f64,
}

/// Executes abilities from an `AbilityBook`
pub struct AbilityResolver {
    abilities: Arc<AbilityBook>,
    combat: Arc<dyn CombatMath>,
    battles: Arc<dyn CombatState>,
    clock: Arc<dyn Clock>,
}

impl AbilityResolver {
    pub fn new(
        abilities: Arc<AbilityBook>,
        combat: Arc<dyn CombatMath>,
        battles: Arc<dyn CombatState>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        AbilityResolver {
            abilities,
            combat,
            battles,
            clock,
        }
    }

    pub fn abilities(&self) -> &AbilityBook {
        &self.abilities
    }

    /// Execute an ability, returning whether it hit
    pub fn execute(
        &self,
        actor: &Combatant,
        target: &Combatant,
        ability_id: &str,
        rng: &mut dyn RngCore,
    ) -> Result<bool, AbilityError> {
        self.execute_report(actor, target, ability_id, rng)
            .map(|outcome| outcome.hit)
    }

    /// Execute an ability, returning the full outcome
    pub fn execute_report(
        &self,
        actor: &Combatant,
        target: &Combatant,
        ability_id: &str,
        rng: &mut dyn RngCore,
    ) -> Result<AbilityOutcome, AbilityError> {
        let ability = self
            .abilities
            .get(ability_id)
            .ok_or_else(|| AbilityError::UnknownAbility(ability_id.to_string()))?;
        let now = self.clock.now();

        debug!(actor = %actor.id(), target = %target.id(), ability = %ability.id, now, "executing ability");

        check_target(actor, target, &ability, now)?;

        if let Some(effect) = actor.incapacitated_by(now) {
            warn!(actor = %actor.id(), ability = %ability.id, effect = %effect, "actor cannot act");
            return Err(AbilityError::Incapacitated {
                actor: actor.id().to_string(),
                effect,
            });
        }

        let reservation = reserve(actor, &ability, now)?;

        if let Err(e) = self.start_combat(actor, target, &ability) {
            reservation.release(actor, &ability);
            return Err(e);
        }

        let (potency, combo) = ability.potency_for(actor.last_action().as_ref(), now);
        actor.record_action(&ability.id, now);
        debug!(actor = %actor.id(), ability = %ability.id, ready_at = ?reservation.committed.ready_at, "cooldown committed");

        let ctx = ResolveContext {
            actor,
            target,
            level: actor.level(),
            potency,
            ability: &ability,
            cooldown: &reservation.committed,
        };
        let resolution = ability.behavior().resolve(&ctx, self.combat.as_ref(), rng);
        let ready_at = reservation.committed.ready_at.unwrap_or(now);

        self.apply(actor, target, &ability, resolution, potency, combo, ready_at, now)
    }

    fn start_combat(
        &self,
        actor: &Combatant,
        target: &Combatant,
        ability: &AbilityDefinition,
    ) -> Result<(), AbilityError> {
        if !ability.initiates_combat
            || actor.id() == target.id()
            || self.battles.in_combat(actor, target)
        {
            return Ok(());
        }

        self.battles.begin_combat(actor, target).map_err(|e| {
            warn!(actor = %actor.id(), target = %target.id(), error = %e, "combat initiation failed");
            e
        })?;
        info!(actor = %actor.id(), target = %target.id(), ability = %ability.id, "combat initiated");
        Ok(())
    }

    /// Apply a resolved outcome to the target
    #[allow(clippy::too_many_arguments)]
    fn apply(
        &self,
        actor: &Combatant,
        target: &Combatant,
        ability: &AbilityDefinition,
        resolution: Resolution,
        potency: f64,
        combo: bool,
        ready_at: f64,
        now: f64,
    ) -> Result<AbilityOutcome, AbilityError> {
        let damage = if resolution.hit && resolution.damage > 0.0 {
            self.combat.apply_damage(target, resolution.damage)
        } else {
            0.0
        };

        let effect = match (&ability.follow_up, resolution.hit) {
            (Some(follow_up), true) => Some(self.attach_follow_up(target, follow_up, now)?),
            _ => None,
        };

        info!(
            actor = %actor.id(),
            target = %target.id(),
            ability = %ability.id,
            hit = resolution.hit,
            potency,
            combo,
            damage,
            "ability resolved"
        );

        Ok(AbilityOutcome {
            ability: ability.id.clone(),
            hit: resolution.hit,
            potency,
            combo,
            damage,
            effect,
            ready_at,
        })
    }

    fn attach_follow_up(
        &self,
        target: &Combatant,
        follow_up: &FollowUp,
        now: f64,
    ) -> Result<Attachment, AbilityError> {
        let template = self.abilities.effects().template(&follow_up.effect)?;
        let instance = template.instantiate(follow_up.duration, now)?;
        let attachment = target
            .effects()
            .attach(instance, &template.stacking, target.id(), now);
        info!(target = %target.id(), effect = %follow_up.effect, ?attachment, "follow-up effect");
        Ok(attachment)
    }
}

fn check_target(
    actor: &Combatant,
    target: &Combatant,
    ability: &AbilityDefinition,
    now: f64,
) -> Result<(), AbilityError> {
    let invalid = |reason: &str| {
        warn!(actor = %actor.id(), target = %target.id(), ability = %ability.id, reason, "invalid target");
        AbilityError::InvalidTarget {
            target: target.id().to_string(),
            reason: reason.to_string(),
        }
    };

    if !target.is_alive() {
        return Err(invalid("target is dead"));
    }
    if actor.id() == target.id() && !ability.allow_self_target {
        return Err(invalid("cannot target yourself"));
    }
    if let Some(check) = ability.target_check() {
        check
            .check(actor, target, now)
            .map_err(|reason| invalid(&reason))?;
    }
    Ok(())
}

/// Cooldown and costs taken for one invocation
struct Reservation {
    previous: CooldownState,
    committed: CooldownState,
}

impl Reservation {
    /// Give back the cooldown and resources when the invocation is abandoned
    ///
    /// The cooldown record is only restored if nothing else has committed
    /// it in the meantime.
    fn release(&self, actor: &Combatant, ability: &AbilityDefinition) {
        let slot = actor.cooldowns().slot(&ability.id);
        let mut cooldown = slot.lock();
        if *cooldown == self.committed {
            *cooldown = self.previous;
        }
        refund(&ability.costs, &mut actor.resources());
        debug!(actor = %actor.id(), ability = %ability.id, "reservation released");
    }
}

/// Check the cooldown and costs, then commit both under the cooldown record
fn reserve(
    actor: &Combatant,
    ability: &AbilityDefinition,
    now: f64,
) -> Result<Reservation, AbilityError> {
    let slot = actor.cooldowns().slot(&ability.id);
    let mut cooldown = slot.lock();
    if !cooldown.is_ready(now) {
        let remaining = cooldown.remaining(now);
        warn!(actor = %actor.id(), ability = %ability.id, remaining, "ability on cooldown");
        return Err(AbilityError::OnCooldown {
            ability: ability.id.clone(),
            remaining,
        });
    }

    let mut resources = actor.resources();
    check_costs(&ability.costs, &resources)?;
    spend(&ability.costs, &mut resources);

    let previous = *cooldown;
    cooldown.commit(now, ability.cooldown_duration);
    Ok(Reservation {
        previous,
        committed: *cooldown,
    })
}

fn check_costs(costs: &[ResourceCost], pools: &HashMap<String, f64>) -> Result<(), AbilityError> {
    for cost in costs {
        let available = pools.get(&cost.resource).copied().unwrap_or(0.0);
        if available < cost.amount {
            return Err(AbilityError::InsufficientResources {
                resource: cost.resource.clone(),
                required: cost.amount,
                available,
            });
        }
    }
    Ok(())
}

fn spend(costs: &[ResourceCost], pools: &mut HashMap<String, f64>) {
    for cost in costs {
        if let Some(pool) = pools.get_mut(&cost.resource) {
            *pool -= cost.amount;
        }
    }
}

fn refund(costs: &[ResourceCost], pools: &mut HashMap<String, f64>) {
    for cost in costs {
        if let Some(pool) = pools.get_mut(&cost.resource) {
            *pool += cost.amount;
        }
    }
}
