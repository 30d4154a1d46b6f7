use crate::clock::{Clock, SystemClock};
use crate::config::EffectsConfig;
use crate::template::{EffectTemplate, StackingPolicy};
use crate::{ConfigError, EffectError, EffectInstance};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Registry of effect templates keyed by identifier
///
/// Populated once at startup, then shared read-only (typically behind an
/// `Arc`) for the life of the process. Each registry is an independent
/// value, so tests can build as many as they like.
#[derive(Debug)]
pub struct EffectRegistry {
    templates: HashMap<String, EffectTemplate>,
    clock: Arc<dyn Clock>,
}

impl Default for EffectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectRegistry {
    /// Create an empty registry timed by the system clock
    pub fn new() -> Self {
        EffectRegistry {
            templates: HashMap::new(),
            clock: Arc::new(SystemClock::new()),
        }
    }

    /// Replace the clock used by `create`
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Load templates from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            error: e,
            path: path.to_path_buf(),
        })?;

        let config: EffectsConfig = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            error: e,
            path: Some(path.to_path_buf()),
        })?;

        Self::from_config(config).map_err(|e| match e {
            ConfigError::Validation { message, .. } => ConfigError::Validation {
                message,
                path: Some(path.to_path_buf()),
            },
            other => other,
        })
    }

    /// Parse templates from a TOML string
    pub fn parse(toml: &str) -> Result<Self, ConfigError> {
        let config: EffectsConfig =
            toml::from_str(toml).map_err(|e| ConfigError::Parse { error: e, path: None })?;
        Self::from_config(config)
    }

    fn from_config(config: EffectsConfig) -> Result<Self, ConfigError> {
        let mut registry = Self::new();
        for effect in config.effects {
            effect
                .validate()
                .map_err(|message| ConfigError::Validation { message, path: None })?;
            registry
                .register_template(EffectTemplate::from_config(effect))
                .map_err(|e| ConfigError::Validation {
                    message: e.to_string(),
                    path: None,
                })?;
        }
        Ok(registry)
    }

    /// Register a template built from a factory
    pub fn register(
        &mut self,
        id: impl Into<String>,
        stacking: StackingPolicy,
        factory: impl Fn(f64) -> EffectInstance + Send + Sync + 'static,
    ) -> Result<(), EffectError> {
        self.register_template(EffectTemplate::new(id, stacking, factory))
    }

    /// Register a prebuilt template
    pub fn register_template(&mut self, template: EffectTemplate) -> Result<(), EffectError> {
        if self.templates.contains_key(&template.id) {
            return Err(EffectError::Duplicate(template.id));
        }
        debug!(effect = %template.id, stacking = ?template.stacking, "registered effect template");
        self.templates.insert(template.id.clone(), template);
        Ok(())
    }

    /// Create an instance applied now
    pub fn create(&self, id: &str, duration: f64) -> Result<EffectInstance, EffectError> {
        self.create_at(id, duration, self.clock.now())
    }

    /// Create an instance applied at an explicit time
    pub fn create_at(
        &self,
        id: &str,
        duration: f64,
        now: f64,
    ) -> Result<EffectInstance, EffectError> {
        self.template(id)?.instantiate(duration, now)
    }

    /// Get a template by ID
    pub fn get(&self, id: &str) -> Option<&EffectTemplate> {
        self.templates.get(id)
    }

    /// Get a template by ID, failing for unknown identifiers
    pub fn template(&self, id: &str) -> Result<&EffectTemplate, EffectError> {
        self.get(id)
            .ok_or_else(|| EffectError::Unknown(id.to_string()))
    }

    /// Check if a template exists
    pub fn contains(&self, id: &str) -> bool {
        self.templates.contains_key(id)
    }

    /// List all template IDs
    pub fn effect_ids(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }
}
