//! ability_core - Cooldown-gated abilities for game entities
//!
//! This library provides:
//! - AbilityDefinition: Immutable ability descriptor (cooldown, potency, follow-up effect)
//! - AbilityBook: The registration surface, validated against an EffectRegistry
//! - AbilityResolver: Executes one ability by one actor against one target
//! - Combatant: The minimal entity model the resolver reads and writes
//! - CombatMath / CombatState: Seams for the host's combat rules and battle tracking
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use ability_core::prelude::*;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! let clock = Arc::new(ManualClock::new(0.0));
//! let effects = Arc::new(EffectRegistry::load(Path::new("config/effects.toml"))?);
//! let book = AbilityBook::load_dir(Path::new("config/abilities"), effects, &BehaviorCatalog::with_builtins())?;
//! let resolver = AbilityResolver::new(
//!     Arc::new(book),
//!     Arc::new(PotencyCombatMath::default()),
//!     Arc::new(BattleRoster::new()),
//!     clock,
//! );
//!
//! let dwarf = Combatant::new("dwarf", 10);
//! let goblin = Combatant::new("goblin", 8);
//! let hit = resolver.execute(&dwarf, &goblin, "skullknock", &mut rand::thread_rng())?;
//! ```

pub mod behavior;
mod book;
pub mod combat;
mod combatant;
pub mod config;
mod cooldown;
mod definition;
pub mod prelude;
mod resolver;

pub use behavior::{AbilityBehavior, BehaviorCatalog, Resolution, ResolveContext, TargetCheck};
pub use book::AbilityBook;
pub use combat::{
    AttackRequest, AttackRoll, BattleRoster, CombatInitiationError, CombatMath, CombatState,
    PotencyCombatMath,
};
pub use combatant::{Combatant, LastAction};
pub use config::{CombatConstants, ConfigError};
pub use cooldown::{CooldownBook, CooldownState};
pub use definition::{AbilityDefinition, Combo, FollowUp, ResourceCost};
pub use resolver::{AbilityOutcome, AbilityResolver};

// Re-export the effect types abilities are built on
pub use effect_core::{
    ActiveEffects, Attachment, Clock, EffectError, EffectInstance, EffectRegistry, ManualClock,
    StackingPolicy, SystemClock,
};

use thiserror::Error;

/// Error executing an ability
///
/// Every variant other than `Effect` leaves the actor and target unchanged.
#[derive(Debug, Error)]
pub enum AbilityError {
    #[error("Unknown ability: {0}")]
    UnknownAbility(String),
    #[error("Invalid target '{target}': {reason}")]
    InvalidTarget { target: String, reason: String },
    #[error("'{actor}' cannot act while '{effect}' is active")]
    Incapacitated { actor: String, effect: String },
    #[error("'{ability}' is on cooldown for another {remaining:.1}s")]
    OnCooldown { ability: String, remaining: f64 },
    #[error("Not enough {resource}: requires {required}, has {available}")]
    InsufficientResources {
        resource: String,
        required: f64,
        available: f64,
    },
    #[error(transparent)]
    CombatInitiation(#[from] CombatInitiationError),
    #[error(transparent)]
    Effect(#[from] EffectError),
}

/// Error registering an ability definition
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("Ability '{0}' is already registered")]
    Duplicate(String),
    #[error("Invalid ability '{ability}': {reason}")]
    InvalidDefinition { ability: String, reason: String },
    #[error("Ability '{ability}' uses unknown behavior '{behavior}'")]
    UnknownBehavior { ability: String, behavior: String },
    #[error("Ability '{ability}' uses unknown target check '{check}'")]
    UnknownTargetCheck { ability: String, check: String },
    #[error("Ability '{ability}' has a bad follow-up effect: {source}")]
    Effect {
        ability: String,
        #[source]
        source: EffectError,
    },
}
