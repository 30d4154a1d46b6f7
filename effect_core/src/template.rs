//! Effect templates: a stacking policy plus a factory for instances

use crate::config::EffectConfig;
use crate::{EffectError, EffectInstance};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// What happens when an effect lands on a target already holding it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StackingPolicy {
    /// The existing instance restarts with the new application's interval
    Refresh,
    /// The new duration is added to the existing expiry
    Extend {
        /// Upper bound on the remaining duration after extending
        #[serde(default)]
        max_duration: Option<f64>,
    },
    /// The existing instance is kept and the new one is discarded
    Reject,
}

type Factory = dyn Fn(f64) -> EffectInstance + Send + Sync;

/// Template for creating effect instances of one identifier
#[derive(Clone)]
pub struct EffectTemplate {
    pub id: String,
    pub stacking: StackingPolicy,
    factory: Arc<Factory>,
}

impl fmt::Debug for EffectTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectTemplate")
            .field("id", &self.id)
            .field("stacking", &self.stacking)
            .finish_non_exhaustive()
    }
}

impl EffectTemplate {
    pub fn new(
        id: impl Into<String>,
        stacking: StackingPolicy,
        factory: impl Fn(f64) -> EffectInstance + Send + Sync + 'static,
    ) -> Self {
        EffectTemplate {
            id: id.into(),
            stacking,
            factory: Arc::new(factory),
        }
    }

    /// Build a template from configuration
    pub fn from_config(config: EffectConfig) -> Self {
        let EffectConfig {
            id,
            name,
            stacking,
            incapacitates,
        } = config;
        let factory_id = id.clone();
        let name = name.unwrap_or_else(|| id.clone());

        EffectTemplate::new(id, stacking, move |duration| {
            EffectInstance::new(factory_id.clone(), duration)
                .with_name(name.clone())
                .incapacitating(incapacitates)
        })
    }

    /// Create an instance applied at `now`
    ///
    /// The instance always carries this template's id and the requested
    /// duration, whatever the factory filled in.
    pub fn instantiate(&self, duration: f64, now: f64) -> Result<EffectInstance, EffectError> {
        if !(duration > 0.0 && duration.is_finite()) {
            return Err(EffectError::InvalidDuration {
                id: self.id.clone(),
                duration,
            });
        }

        let mut instance = (self.factory)(duration);
        instance.id = self.id.clone();
        instance.duration = duration;
        instance.stamp(now);
        Ok(instance)
    }
}
