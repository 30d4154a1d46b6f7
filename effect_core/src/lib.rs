//! effect_core - Timed status effects for game entities
//!
//! This library provides:
//! - EffectRegistry: Effect templates keyed by identifier
//! - EffectTemplate: A stacking policy paired with an instance factory
//! - EffectInstance: A concrete, time-bounded effect on a target
//! - ActiveEffects: The per-target set of active effects (one per identifier)
//!
//! # Quick Start
//!
//! ```rust
//! use effect_core::prelude::*;
//! use std::sync::Arc;
//!
//! let clock = Arc::new(ManualClock::new(0.0));
//! let mut registry = EffectRegistry::new().with_clock(clock.clone());
//! registry
//!     .register("stunned", StackingPolicy::Refresh, |duration| {
//!         EffectInstance::new("stunned", duration).incapacitating(true)
//!     })
//!     .unwrap();
//!
//! let stun = registry.create("stunned", 4.0).unwrap();
//! assert_eq!(stun.expires_at, 4.0);
//!
//! let mut effects = ActiveEffects::new();
//! effects.attach(stun, &StackingPolicy::Refresh, "goblin", clock.now());
//! assert!(effects.contains_active("stunned", 1.0));
//! ```

mod active;
pub mod clock;
pub mod config;
mod instance;
pub mod prelude;
mod registry;
mod template;

pub use active::{ActiveEffects, Attachment};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{EffectConfig, EffectsConfig};
pub use instance::{EffectHooks, EffectInstance, NoHooks};
pub use registry::EffectRegistry;
pub use template::{EffectTemplate, StackingPolicy};

use std::path::PathBuf;
use thiserror::Error;

/// Error creating or registering an effect
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EffectError {
    #[error("Effect '{0}' is already registered")]
    Duplicate(String),
    #[error("Unknown effect: {0}")]
    Unknown(String),
    #[error("Invalid duration {duration} for effect '{id}': must be positive")]
    InvalidDuration { id: String, duration: f64 },
}

/// Error loading effect configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading '{path:?}': {error}")]
    Io {
        error: std::io::Error,
        path: PathBuf,
    },
    #[error("Parse error in '{path:?}': {error}")]
    Parse {
        error: toml::de::Error,
        path: Option<PathBuf>,
    },
    #[error("Validation error in '{path:?}': {message}")]
    Validation {
        message: String,
        path: Option<PathBuf>,
    },
}
