use crate::behavior::BehaviorCatalog;
use crate::definition::{AbilityDefinition, Combo, FollowUp, ResourceCost};
use crate::RegistrationError;
use serde::Deserialize;

/// TOML configuration for an abilities file
#[derive(Debug, Deserialize)]
pub struct AbilitiesConfig {
    #[serde(default)]
    pub abilities: Vec<AbilityConfig>,
}

/// Configuration for a single ability
#[derive(Debug, Clone, Deserialize)]
pub struct AbilityConfig {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_behavior")]
    pub behavior: String,
    #[serde(default)]
    pub cooldown_duration: f64,
    #[serde(default)]
    pub initiates_combat: bool,
    #[serde(default)]
    pub base_potency: f64,
    #[serde(default)]
    pub saving_throw: Option<String>,
    #[serde(default)]
    pub combo: Option<Combo>,
    #[serde(default)]
    pub costs: Vec<ResourceCost>,
    #[serde(default)]
    pub follow_up: Option<FollowUp>,
    #[serde(default)]
    pub allow_self_target: bool,
    /// Name of an extra target check from the behavior catalog
    #[serde(default)]
    pub target_check: Option<String>,
}

fn default_behavior() -> String {
    "strike".to_string()
}

impl AbilityConfig {
    /// Build the definition, picking the behavior from `catalog` by name
    pub fn into_definition(
        self,
        catalog: &BehaviorCatalog,
    ) -> Result<AbilityDefinition, RegistrationError> {
        let behavior =
            catalog
                .get(&self.behavior)
                .ok_or_else(|| RegistrationError::UnknownBehavior {
                    ability: self.id.clone(),
                    behavior: self.behavior.clone(),
                })?;

        let mut definition = AbilityDefinition::new(self.id, behavior)
            .with_cooldown(self.cooldown_duration)
            .initiates_combat(self.initiates_combat)
            .with_potency(self.base_potency)
            .allow_self_target(self.allow_self_target);

        if let Some(check) = self.target_check {
            let target_check = catalog.target_check(&check).ok_or_else(|| {
                RegistrationError::UnknownTargetCheck {
                    ability: definition.id.clone(),
                    check,
                }
            })?;
            definition = definition.with_target_check(target_check);
        }
        if let Some(name) = self.name {
            definition = definition.with_name(name);
        }
        if let Some(save) = self.saving_throw {
            definition = definition.with_saving_throw(save);
        }
        if let Some(combo) = self.combo {
            definition = definition.with_combo(combo.with, combo.potency, combo.window);
        }
        for cost in self.costs {
            definition = definition.with_cost(cost.resource, cost.amount);
        }
        if let Some(follow_up) = self.follow_up {
            definition = definition.with_follow_up(follow_up.effect, follow_up.duration);
        }

        Ok(definition)
    }
}
