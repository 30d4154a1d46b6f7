use crate::template::StackingPolicy;
use serde::{Deserialize, Serialize};

/// TOML configuration for an effects file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectsConfig {
    #[serde(default)]
    pub effects: Vec<EffectConfig>,
}

/// Configuration for a single effect template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectConfig {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub stacking: StackingPolicy,
    #[serde(default)]
    pub incapacitates: bool,
}

impl EffectConfig {
    /// Check values the type system can't
    pub fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("effect id must not be empty".to_string());
        }
        if let StackingPolicy::Extend {
            max_duration: Some(max),
        } = self.stacking
        {
            if !(max > 0.0) {
                return Err(format!(
                    "effect '{}': max_duration must be positive, got {}",
                    self.id, max
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_effects() {
        let toml = r#"
[[effects]]
id = "stunned"
name = "Stunned"
incapacitates = true

[effects.stacking]
type = "refresh"

[[effects]]
id = "weakened"

[effects.stacking]
type = "extend"
max_duration = 30.0

[[effects]]
id = "marked"
stacking = { type = "reject" }
"#;

        let config: EffectsConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.effects.len(), 3);
        assert_eq!(config.effects[0].stacking, StackingPolicy::Refresh);
        assert!(config.effects[0].incapacitates);
        assert_eq!(
            config.effects[1].stacking,
            StackingPolicy::Extend {
                max_duration: Some(30.0)
            }
        );
        assert!(config.effects[1].name.is_none());
        assert_eq!(config.effects[2].stacking, StackingPolicy::Reject);
    }

    #[test]
    fn test_stacking_is_required() {
        let toml = r#"
[[effects]]
id = "stunned"
"#;
        assert!(toml::from_str::<EffectsConfig>(toml).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_cap() {
        let config = EffectConfig {
            id: "weakened".to_string(),
            name: None,
            stacking: StackingPolicy::Extend {
                max_duration: Some(0.0),
            },
            incapacitates: false,
        };
        assert!(config.validate().is_err());
    }
}
