use crate::behavior::BehaviorCatalog;
use crate::config::{AbilitiesConfig, ConfigError};
use crate::definition::AbilityDefinition;
use crate::RegistrationError;
use effect_core::EffectRegistry;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Registry of ability definitions
///
/// Follow-up effects are checked against the effect registry when an ability
/// is registered, so content mistakes surface at startup rather than
/// mid-fight.
#[derive(Debug)]
pub struct AbilityBook {
    abilities: HashMap<String, Arc<AbilityDefinition>>,
    effects: Arc<EffectRegistry>,
}

impl AbilityBook {
    /// Create an empty book backed by `effects`
    pub fn new(effects: Arc<EffectRegistry>) -> Self {
        AbilityBook {
            abilities: HashMap::new(),
            effects,
        }
    }

    /// Load all ability files from a directory (recursively)
    pub fn load_dir(
        dir: &Path,
        effects: Arc<EffectRegistry>,
        catalog: &BehaviorCatalog,
    ) -> Result<Self, ConfigError> {
        let mut book = Self::new(effects);
        book.load_path(dir, catalog)?;
        info!(abilities = book.len(), dir = %dir.display(), "loaded abilities");
        Ok(book)
    }

    fn load_path(&mut self, dir: &Path, catalog: &BehaviorCatalog) -> Result<(), ConfigError> {
        if !dir.exists() {
            return Ok(());
        }

        let io_error = |e: std::io::Error| ConfigError::Io {
            error: e,
            path: dir.to_path_buf(),
        };

        for entry in std::fs::read_dir(dir).map_err(io_error)? {
            let path = entry.map_err(io_error)?.path();
            if path.is_dir() {
                self.load_path(&path, catalog)?;
            } else if path.extension().is_some_and(|ext| ext == "toml") {
                self.load_file(&path, catalog)?;
            }
        }

        Ok(())
    }

    /// Load a single abilities file
    pub fn load_file(&mut self, path: &Path, catalog: &BehaviorCatalog) -> Result<(), ConfigError> {
        let config: AbilitiesConfig = crate::config::load_toml(path)?;
        self.register_config(config, catalog)
            .map_err(|e| ConfigError::Validation {
                message: e.to_string(),
                path: Some(path.to_path_buf()),
            })
    }

    /// Register abilities from a TOML string
    pub fn parse(&mut self, toml: &str, catalog: &BehaviorCatalog) -> Result<(), ConfigError> {
        let config: AbilitiesConfig = crate::config::parse_toml(toml)?;
        self.register_config(config, catalog)
            .map_err(|e| ConfigError::validation(e.to_string()))
    }

    fn register_config(
        &mut self,
        config: AbilitiesConfig,
        catalog: &BehaviorCatalog,
    ) -> Result<(), RegistrationError> {
        for ability in config.abilities {
            self.register(ability.into_definition(catalog)?)?;
        }
        Ok(())
    }

    /// Register an ability under its own identifier
    pub fn register(&mut self, definition: AbilityDefinition) -> Result<(), RegistrationError> {
        definition.validate()?;

        if self.abilities.contains_key(&definition.id) {
            return Err(RegistrationError::Duplicate(definition.id));
        }

        if let Some(follow_up) = &definition.follow_up {
            self.effects
                .template(&follow_up.effect)
                .and_then(|template| template.instantiate(follow_up.duration, 0.0))
                .map_err(|source| RegistrationError::Effect {
                    ability: definition.id.clone(),
                    source,
                })?;
        }

        debug!(ability = %definition.id, "registered ability");
        self.abilities
            .insert(definition.id.clone(), Arc::new(definition));
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<Arc<AbilityDefinition>> {
        self.abilities.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.abilities.contains_key(id)
    }

    /// List all ability IDs
    pub fn ability_ids(&self) -> impl Iterator<Item = &str> {
        self.abilities.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.abilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }

    pub fn effects(&self) -> &Arc<EffectRegistry> {
        &self.effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::Strike;
    use effect_core::{EffectError, EffectInstance, StackingPolicy};
    use std::io::Write;
    use tempfile::TempDir;

    fn effects() -> Arc<EffectRegistry> {
        let mut registry = EffectRegistry::new();
        registry
            .register("stunned", StackingPolicy::Refresh, |d| {
                EffectInstance::new("stunned", d).incapacitating(true)
            })
            .unwrap();
        Arc::new(registry)
    }

    fn skullknock() -> AbilityDefinition {
        AbilityDefinition::new("skullknock", Arc::new(Strike))
            .with_cooldown(180.0)
            .with_potency(150.0)
            .with_follow_up("stunned", 4.0)
    }

    fn create_ability_file(dir: &Path, name: &str, content: &str) {
        let path = dir.join(format!("{}.toml", name));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn test_register_and_get() {
        let mut book = AbilityBook::new(effects());
        book.register(skullknock()).unwrap();

        assert!(book.contains("skullknock"));
        assert_eq!(book.get("skullknock").unwrap().base_potency, 150.0);
        assert_eq!(book.ability_ids().collect::<Vec<_>>(), vec!["skullknock"]);
    }

    #[test]
    fn test_duplicate_ability() {
        let mut book = AbilityBook::new(effects());
        book.register(skullknock()).unwrap();
        assert!(matches!(
            book.register(skullknock()),
            Err(RegistrationError::Duplicate(id)) if id == "skullknock"
        ));
    }

    #[test]
    fn test_unknown_follow_up_effect() {
        let mut book = AbilityBook::new(effects());
        let result = book.register(skullknock().with_follow_up("rooted", 4.0));
        assert!(matches!(
            result,
            Err(RegistrationError::Effect {
                source: EffectError::Unknown(_),
                ..
            })
        ));
        assert!(book.is_empty());
    }

    #[test]
    fn test_invalid_follow_up_duration() {
        let mut book = AbilityBook::new(effects());
        let result = book.register(skullknock().with_follow_up("stunned", 0.0));
        assert!(matches!(
            result,
            Err(RegistrationError::Effect {
                source: EffectError::InvalidDuration { .. },
                ..
            })
        ));
    }

    #[test]
    fn test_load_dir_recursive() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("dwarf");
        std::fs::create_dir(&nested).unwrap();

        create_ability_file(
            &nested,
            "skullknock",
            r#"
[[abilities]]
id = "skullknock"
cooldown_duration = 180
initiates_combat = true
base_potency = 150
follow_up = { effect = "stunned", duration = 4 }
"#,
        );
        create_ability_file(
            dir.path(),
            "common",
            r#"
[[abilities]]
id = "jab"
cooldown_duration = 5
base_potency = 40

[[abilities]]
id = "glare"
behavior = "hex"
follow_up = { effect = "stunned", duration = 1 }
"#,
        );
        // Non-TOML files are skipped
        std::fs::write(dir.path().join("README.md"), "notes").unwrap();

        let book =
            AbilityBook::load_dir(dir.path(), effects(), &BehaviorCatalog::with_builtins()).unwrap();
        assert_eq!(book.len(), 3);
        assert!(book.get("skullknock").unwrap().initiates_combat);
        assert_eq!(book.get("glare").unwrap().base_potency, 0.0);
    }

    #[test]
    fn test_load_dir_reports_bad_file() {
        let dir = TempDir::new().unwrap();
        create_ability_file(
            dir.path(),
            "broken",
            r#"
[[abilities]]
id = "skullknock"
follow_up = { effect = "rooted", duration = 4 }
"#,
        );

        let result = AbilityBook::load_dir(dir.path(), effects(), &BehaviorCatalog::with_builtins());
        match result {
            Err(ConfigError::Validation { message, path }) => {
                assert_eq!(path, Some(dir.path().join("broken.toml")));
                assert!(message.contains("rooted"), "message was {}", message);
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_dir_reports_malformed_file() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("dwarf");
        std::fs::create_dir(&nested).unwrap();
        create_ability_file(&nested, "skullknock", "[[abilities]]\nid = \n");

        let result = AbilityBook::load_dir(dir.path(), effects(), &BehaviorCatalog::with_builtins());
        match result {
            Err(err @ ConfigError::Parse { .. }) => {
                let message = err.to_string();
                assert!(message.contains("skullknock.toml"), "message was {}", message);
                assert!(
                    matches!(err, ConfigError::Parse { path: Some(ref path), .. } if *path == nested.join("skullknock.toml"))
                );
            }
            other => panic!("Expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_dir_is_empty() {
        let dir = TempDir::new().unwrap();
        let book = AbilityBook::load_dir(
            &dir.path().join("nope"),
            effects(),
            &BehaviorCatalog::with_builtins(),
        )
        .unwrap();
        assert!(book.is_empty());
    }
}
