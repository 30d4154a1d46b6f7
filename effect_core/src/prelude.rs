//! Prelude module for convenient imports
//!
//! ```rust
//! use effect_core::prelude::*;
//! ```

pub use crate::active::{ActiveEffects, Attachment};
pub use crate::clock::{Clock, ManualClock, SystemClock};
pub use crate::instance::{EffectHooks, EffectInstance, NoHooks};
pub use crate::registry::EffectRegistry;
pub use crate::template::{EffectTemplate, StackingPolicy};
pub use crate::EffectError;
