//! Combat constants for the reference combat math

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::ConfigError;

/// Tunable combat constants
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CombatConstants {
    #[serde(default)]
    pub hit: HitConstants,
    #[serde(default)]
    pub damage: DamageConstants,
}

impl CombatConstants {
    /// Load constants from a TOML file
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let constants: CombatConstants = super::load_toml(path)?;
        constants.validate().map_err(|e| e.at(path))?;
        Ok(constants)
    }

    /// Parse constants from a TOML string
    pub fn parse(toml: &str) -> Result<Self, ConfigError> {
        let constants: CombatConstants = super::parse_toml(toml)?;
        constants.validate()?;
        Ok(constants)
    }

    /// Check hit chance bounds and damage scaling are in range
    pub fn validate(&self) -> Result<(), ConfigError> {
        let hit = &self.hit;
        if !(0.0..=1.0).contains(&hit.min_chance)
            || !(0.0..=1.0).contains(&hit.max_chance)
            || hit.min_chance > hit.max_chance
        {
            return Err(ConfigError::validation(format!(
                "hit chance bounds must satisfy 0 <= min ({}) <= max ({}) <= 1",
                hit.min_chance, hit.max_chance
            )));
        }
        if self.damage.per_potency < 0.0 || self.damage.per_level < 0.0 {
            return Err(ConfigError::validation(
                "damage scaling must be non-negative",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HitConstants {
    /// Chance to hit a target of equal level
    #[serde(default = "default_base_chance")]
    pub base_chance: f64,
    /// Hit chance gained per level the attacker has over the target
    #[serde(default = "default_per_level_difference")]
    pub per_level_difference: f64,
    /// Floor on the final hit chance
    #[serde(default = "default_min_chance")]
    pub min_chance: f64,
    /// Ceiling on the final hit chance
    #[serde(default = "default_max_chance")]
    pub max_chance: f64,
}

impl Default for HitConstants {
    fn default() -> Self {
        HitConstants {
            base_chance: 0.85,
            per_level_difference: 0.02,
            min_chance: 0.05,
            max_chance: 0.95,
        }
    }
}

fn default_base_chance() -> f64 {
    0.85
}
fn default_per_level_difference() -> f64 {
    0.02
}
fn default_min_chance() -> f64 {
    0.05
}
fn default_max_chance() -> f64 {
    0.95
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DamageConstants {
    /// Damage per point of potency at level 1
    #[serde(default = "default_per_potency")]
    pub per_potency: f64,
    /// Increased damage per attacker level above 1 (0.05 = 5%)
    #[serde(default = "default_per_level")]
    pub per_level: f64,
}

impl Default for DamageConstants {
    fn default() -> Self {
        DamageConstants {
            per_potency: 0.2,
            per_level: 0.05,
        }
    }
}

fn default_per_potency() -> f64 {
    0.2
}
fn default_per_level() -> f64 {
    0.05
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constants() {
        let constants = CombatConstants::default();
        assert!((constants.hit.base_chance - 0.85).abs() < f64::EPSILON);
        assert!((constants.damage.per_potency - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_partial_constants() {
        let toml = r#"
[hit]
base_chance = 0.9

[damage]
per_level = 0.1
"#;

        let constants = CombatConstants::parse(toml).unwrap();
        assert!((constants.hit.base_chance - 0.9).abs() < f64::EPSILON);
        assert!((constants.hit.max_chance - 0.95).abs() < f64::EPSILON);
        assert!((constants.damage.per_level - 0.1).abs() < f64::EPSILON);
        assert!((constants.damage.per_potency - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let toml = r#"
[hit]
min_chance = 0.9
max_chance = 0.1
"#;
        assert!(matches!(
            CombatConstants::parse(toml),
            Err(ConfigError::Validation { path: None, .. })
        ));
    }
}
