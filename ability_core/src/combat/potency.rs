//! Reference combat math - level-based hit chance, potency-scaled damage

use super::{AttackRequest, AttackRoll, CombatMath};
use crate::config::{CombatConstants, ConfigError};
use rand::{Rng, RngCore};

/// Combat math driven by `CombatConstants`
///
/// 1. Hit chance starts at the base chance, shifts by the level difference
///    between attacker and target, and is clamped to the configured bounds
/// 2. A named saving throw gives the target a second chance to negate a hit
/// 3. Damage = potency * per_potency * (1 + per_level * (level - 1))
#[derive(Debug, Clone, Default)]
pub struct PotencyCombatMath {
    constants: CombatConstants,
}

impl PotencyCombatMath {
    /// Combat math over validated constants
    pub fn new(constants: CombatConstants) -> Result<Self, ConfigError> {
        constants.validate()?;
        Ok(PotencyCombatMath { constants })
    }

    pub fn constants(&self) -> &CombatConstants {
        &self.constants
    }

    /// Chance (0..=1) that the attack connects before saving throws
    pub fn hit_chance(&self, request: &AttackRequest<'_>) -> f64 {
        let hit = &self.constants.hit;
        let level_difference = request.level as f64 - request.target.level() as f64;
        (hit.base_chance + level_difference * hit.per_level_difference)
            .clamp(hit.min_chance, hit.max_chance)
    }

    /// Damage dealt by a hit
    pub fn damage(&self, request: &AttackRequest<'_>) -> f64 {
        let damage = &self.constants.damage;
        let level_bonus = 1.0 + damage.per_level * request.level.saturating_sub(1) as f64;
        request.potency * damage.per_potency * level_bonus
    }
}

impl CombatMath for PotencyCombatMath {
    fn roll_attack(&self, request: &AttackRequest<'_>, rng: &mut dyn RngCore) -> AttackRoll {
        if rng.gen::<f64>() >= self.hit_chance(request) {
            return AttackRoll::default();
        }

        if let Some(save) = request.saving_throw {
            let save_chance = request.target.saving_throw(save).clamp(0.0, 1.0);
            if save_chance > 0.0 && rng.gen::<f64>() < save_chance {
                return AttackRoll::default();
            }
        }

        AttackRoll {
            hit: true,
            damage: self.damage(request),
        }
    }
}
