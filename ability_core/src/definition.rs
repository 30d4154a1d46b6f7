//! AbilityDefinition - immutable ability descriptor

use crate::behavior::{AbilityBehavior, TargetCheck};
use crate::combatant::LastAction;
use crate::RegistrationError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Increased potency when used shortly after another ability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combo {
    /// The ability this one follows up
    pub with: String,
    /// Potency used instead of the base potency when the combo lands
    pub potency: f64,
    /// Seconds after `with` during which the combo is live
    #[serde(default = "default_combo_window")]
    pub window: f64,
}

fn default_combo_window() -> f64 {
    6.0
}

/// A resource spent on every invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceCost {
    pub resource: String,
    pub amount: f64,
}

/// Effect placed on the target when the ability hits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowUp {
    pub effect: String,
    pub duration: f64,
}

/// Immutable descriptor of an ability
///
/// Built once when the ability is registered and then shared read-only by
/// every invocation.
#[derive(Debug, Clone)]
pub struct AbilityDefinition {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Seconds between uses
    pub cooldown_duration: f64,
    /// Whether using the ability starts combat with the target
    pub initiates_combat: bool,
    /// Strength handed to combat math (0 for utility abilities)
    pub base_potency: f64,
    /// Named saving throw the target may use to negate a hit
    pub saving_throw: Option<String>,
    pub combo: Option<Combo>,
    pub costs: Vec<ResourceCost>,
    pub follow_up: Option<FollowUp>,
    /// Whether the actor may target itself
    pub allow_self_target: bool,
    behavior: Arc<dyn AbilityBehavior>,
    target_check: Option<Arc<dyn TargetCheck>>,
}

impl AbilityDefinition {
    /// Create an ability with no cooldown, potency or follow-up
    pub fn new(id: impl Into<String>, behavior: Arc<dyn AbilityBehavior>) -> Self {
        let id = id.into();
        AbilityDefinition {
            name: id.clone(),
            id,
            cooldown_duration: 0.0,
            initiates_combat: false,
            base_potency: 0.0,
            saving_throw: None,
            combo: None,
            costs: Vec::new(),
            follow_up: None,
            allow_self_target: false,
            behavior,
            target_check: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_cooldown(mut self, seconds: f64) -> Self {
        self.cooldown_duration = seconds;
        self
    }

    pub fn initiates_combat(mut self, initiates: bool) -> Self {
        self.initiates_combat = initiates;
        self
    }

    pub fn with_potency(mut self, potency: f64) -> Self {
        self.base_potency = potency;
        self
    }

    pub fn with_saving_throw(mut self, save: impl Into<String>) -> Self {
        self.saving_throw = Some(save.into());
        self
    }

    pub fn with_combo(mut self, with: impl Into<String>, potency: f64, window: f64) -> Self {
        self.combo = Some(Combo {
            with: with.into(),
            potency,
            window,
        });
        self
    }

    pub fn with_cost(mut self, resource: impl Into<String>, amount: f64) -> Self {
        self.costs.push(ResourceCost {
            resource: resource.into(),
            amount,
        });
        self
    }

    pub fn with_follow_up(mut self, effect: impl Into<String>, duration: f64) -> Self {
        self.follow_up = Some(FollowUp {
            effect: effect.into(),
            duration,
        });
        self
    }

    pub fn allow_self_target(mut self, allow: bool) -> Self {
        self.allow_self_target = allow;
        self
    }

    /// Extra rule the target must pass on top of the base target checks
    pub fn with_target_check(mut self, check: Arc<dyn TargetCheck>) -> Self {
        self.target_check = Some(check);
        self
    }

    pub fn behavior(&self) -> &dyn AbilityBehavior {
        self.behavior.as_ref()
    }

    pub fn target_check(&self) -> Option<&dyn TargetCheck> {
        self.target_check.as_deref()
    }

    /// Potency for an invocation at `now`, and whether the combo applied
    pub fn potency_for(&self, last: Option<&LastAction>, now: f64) -> (f64, bool) {
        match (&self.combo, last) {
            (Some(combo), Some(last))
                if last.ability == combo.with && now - last.at <= combo.window =>
            {
                (combo.potency, true)
            }
            _ => (self.base_potency, false),
        }
    }

    /// Check numeric fields are in range
    pub fn validate(&self) -> Result<(), RegistrationError> {
        let invalid = |reason: String| RegistrationError::InvalidDefinition {
            ability: self.id.clone(),
            reason,
        };

        if self.id.trim().is_empty() {
            return Err(invalid("id must not be empty".to_string()));
        }
        if !non_negative(self.cooldown_duration) {
            return Err(invalid(format!(
                "cooldown_duration must be non-negative, got {}",
                self.cooldown_duration
            )));
        }
        if !non_negative(self.base_potency) {
            return Err(invalid(format!(
                "base_potency must be non-negative, got {}",
                self.base_potency
            )));
        }
        if let Some(combo) = &self.combo {
            if !non_negative(combo.potency) || !(combo.window > 0.0) {
                return Err(invalid(format!(
                    "combo with '{}' needs non-negative potency and a positive window",
                    combo.with
                )));
            }
        }
        for cost in &self.costs {
            if !non_negative(cost.amount) {
                return Err(invalid(format!(
                    "cost of {} must be non-negative, got {}",
                    cost.resource, cost.amount
                )));
            }
        }
        Ok(())
    }
}

fn non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::Strike;

    fn skullknock() -> AbilityDefinition {
        AbilityDefinition::new("skullknock", Arc::new(Strike))
            .with_cooldown(180.0)
            .initiates_combat(true)
            .with_potency(150.0)
            .with_follow_up("stunned", 4.0)
    }

    #[test]
    fn test_builder() {
        let ability = skullknock();
        assert_eq!(ability.name, "skullknock");
        assert_eq!(ability.cooldown_duration, 180.0);
        assert!(ability.initiates_combat);
        assert_eq!(
            ability.follow_up,
            Some(FollowUp {
                effect: "stunned".to_string(),
                duration: 4.0
            })
        );
        assert!(ability.validate().is_ok());
    }

    #[test]
    fn test_zero_potency_is_valid() {
        let ability = skullknock().with_potency(0.0);
        assert!(ability.validate().is_ok());
    }

    #[test]
    fn test_negative_values_are_invalid() {
        assert!(skullknock().with_cooldown(-1.0).validate().is_err());
        assert!(skullknock().with_potency(-5.0).validate().is_err());
        assert!(skullknock().with_cost("stamina", -1.0).validate().is_err());
        assert!(skullknock()
            .with_combo("jab", 200.0, 0.0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_combo_potency() {
        let ability = skullknock().with_combo("jab", 250.0, 6.0);
        let jab = LastAction {
            ability: "jab".to_string(),
            at: 10.0,
        };
        let kick = LastAction {
            ability: "kick".to_string(),
            at: 10.0,
        };

        assert_eq!(ability.potency_for(None, 12.0), (150.0, false));
        assert_eq!(ability.potency_for(Some(&jab), 12.0), (250.0, true));
        assert_eq!(ability.potency_for(Some(&jab), 16.0), (250.0, true));
        assert_eq!(ability.potency_for(Some(&jab), 16.5), (150.0, false));
        assert_eq!(ability.potency_for(Some(&kick), 12.0), (150.0, false));
    }
}
