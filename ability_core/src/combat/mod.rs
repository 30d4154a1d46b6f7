//! Combat collaborators - the host's combat math and battle tracking

mod potency;
mod roster;

pub use potency::PotencyCombatMath;
pub use roster::BattleRoster;

use crate::combatant::Combatant;
use rand::RngCore;
use thiserror::Error;

/// An attack for combat math to roll
#[derive(Debug, Clone, Copy)]
pub struct AttackRequest<'a> {
    pub actor: &'a Combatant,
    pub target: &'a Combatant,
    pub level: u32,
    pub potency: f64,
    pub saving_throw: Option<&'a str>,
}

/// Outcome of an attack roll
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AttackRoll {
    pub hit: bool,
    /// Damage the attack would deal if it hit
    pub damage: f64,
}

/// Rules turning potency into hits and damage
///
/// `roll_attack` must not change any combatant. Randomness comes only from
/// the `rng` handed in, so a seeded generator reproduces the same rolls.
///
/// The resolver calls both methods with no combatant locks held, so
/// implementations may read any state of the actor or target.
pub trait CombatMath: Send + Sync {
    fn roll_attack(&self, request: &AttackRequest<'_>, rng: &mut dyn RngCore) -> AttackRoll;

    /// Deal damage to a target, returning the amount actually dealt
    fn apply_damage(&self, target: &Combatant, amount: f64) -> f64 {
        target.take_damage(amount)
    }
}

/// Combat between two combatants could not be started
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Cannot begin combat between '{actor}' and '{target}': {reason}")]
pub struct CombatInitiationError {
    pub actor: String,
    pub target: String,
    pub reason: String,
}

/// Tracks which combatants are fighting each other
///
/// Called after the actor's cooldown and costs are reserved but with no
/// combatant locks held. A refused `begin_combat` gives the reservation back.
pub trait CombatState: Send + Sync {
    fn in_combat(&self, actor: &Combatant, target: &Combatant) -> bool;

    fn begin_combat(&self, actor: &Combatant, target: &Combatant)
        -> Result<(), CombatInitiationError>;
}
