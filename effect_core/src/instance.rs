//! Concrete effect instances attached to a target

use std::fmt;
use std::sync::Arc;

/// Behavior hooks fired when an effect lands on or leaves a target
///
/// Both hooks default to doing nothing. Implementations receive the id of
/// the target holding the effect.
pub trait EffectHooks: Send + Sync + fmt::Debug {
    fn on_apply(&self, _target: &str, _effect: &EffectInstance) {}

    fn on_expire(&self, _target: &str, _effect: &EffectInstance) {}
}

/// Hooks that do nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHooks;

impl EffectHooks for NoHooks {}

/// A time-bounded effect held by a target for `[applied_at, expires_at)`
#[derive(Debug, Clone)]
pub struct EffectInstance {
    /// Identifier of the template this instance came from
    pub id: String,
    /// Display name
    pub name: String,
    /// Length of the active interval in seconds
    pub duration: f64,
    /// Time the effect was applied
    pub applied_at: f64,
    /// Time the effect stops being active
    pub expires_at: f64,
    /// Whether the holder is prevented from acting while this is active
    pub incapacitates: bool,
    hooks: Arc<dyn EffectHooks>,
}

impl EffectInstance {
    /// Create an instance applied at time zero
    ///
    /// The registry re-stamps the instance with the real application time.
    pub fn new(id: impl Into<String>, duration: f64) -> Self {
        let id = id.into();
        EffectInstance {
            name: id.clone(),
            id,
            duration,
            applied_at: 0.0,
            expires_at: duration,
            incapacitates: false,
            hooks: Arc::new(NoHooks),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn incapacitating(mut self, incapacitates: bool) -> Self {
        self.incapacitates = incapacitates;
        self
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn EffectHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Set the application time and derive the expiry from the duration
    pub fn stamp(&mut self, applied_at: f64) {
        self.applied_at = applied_at;
        self.expires_at = applied_at + self.duration;
    }

    /// Whether the effect has run out at `now`
    pub fn is_expired(&self, now: f64) -> bool {
        now >= self.expires_at
    }

    /// Seconds left before expiry (0 once expired)
    pub fn remaining(&self, now: f64) -> f64 {
        (self.expires_at - now).max(0.0)
    }

    pub(crate) fn fire_apply(&self, target: &str) {
        self.hooks.on_apply(target, self);
    }

    pub(crate) fn fire_expire(&self, target: &str) {
        self.hooks.on_expire(target, self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stamp_sets_interval() {
        let mut stun = EffectInstance::new("stunned", 4.0);
        stun.stamp(10.0);
        assert_eq!(stun.applied_at, 10.0);
        assert_eq!(stun.expires_at, 14.0);
        assert!(!stun.is_expired(13.9));
        assert!(stun.is_expired(14.0));
        assert_eq!(stun.remaining(12.0), 2.0);
        assert_eq!(stun.remaining(20.0), 0.0);
    }

    #[test]
    fn test_name_defaults_to_id() {
        let stun = EffectInstance::new("stunned", 4.0);
        assert_eq!(stun.name, "stunned");
        let stun = stun.with_name("Stunned");
        assert_eq!(stun.name, "Stunned");
    }
}
