//! Prelude module for convenient imports
//!
//! ```rust
//! use ability_core::prelude::*;
//! ```

// Abilities
pub use crate::behavior::{
    AbilityBehavior, BehaviorCatalog, Helpless, Hex, Resolution, ResolveContext, Strike,
    TargetCheck, Unhurt,
};
pub use crate::book::AbilityBook;
pub use crate::definition::{AbilityDefinition, Combo, FollowUp, ResourceCost};

// Resolution
pub use crate::resolver::{AbilityOutcome, AbilityResolver};
pub use crate::{AbilityError, RegistrationError};

// Entities
pub use crate::combatant::{Combatant, LastAction};
pub use crate::cooldown::{CooldownBook, CooldownState};

// Collaborators
pub use crate::combat::{
    AttackRequest, AttackRoll, BattleRoster, CombatInitiationError, CombatMath, CombatState,
    PotencyCombatMath,
};
pub use crate::config::CombatConstants;

// Re-exports from effect_core
pub use effect_core::prelude::*;
