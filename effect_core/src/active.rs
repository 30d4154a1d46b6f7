//! The set of effects currently held by one target

use crate::template::StackingPolicy;
use crate::EffectInstance;
use std::collections::HashMap;
use tracing::{debug, trace};

/// How an attach request was resolved against the target's current effects
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Attachment {
    /// A new instance was attached and its apply hook fired
    Applied { expires_at: f64 },
    /// The existing instance restarted with the new interval
    Refreshed { expires_at: f64 },
    /// The existing instance's expiry was pushed back
    Extended { expires_at: f64 },
    /// The existing instance was kept as is
    Rejected { expires_at: f64 },
}

impl Attachment {
    /// Expiry of the instance the target holds after the attach
    pub fn expires_at(&self) -> f64 {
        match *self {
            Attachment::Applied { expires_at }
            | Attachment::Refreshed { expires_at }
            | Attachment::Extended { expires_at }
            | Attachment::Rejected { expires_at } => expires_at,
        }
    }
}

/// Active effects on a target, at most one instance per effect identifier
#[derive(Debug, Default)]
pub struct ActiveEffects {
    effects: HashMap<String, EffectInstance>,
}

impl ActiveEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an instance, resolving a collision with `policy`
    ///
    /// An instance that has already run out counts as absent and is
    /// replaced without firing its expire hook; the sweep owns expiry.
    pub fn attach(
        &mut self,
        instance: EffectInstance,
        policy: &StackingPolicy,
        target: &str,
        now: f64,
    ) -> Attachment {
        let attachment = match self.effects.get_mut(&instance.id) {
            Some(existing) if !existing.is_expired(now) => match policy {
                StackingPolicy::Refresh => {
                    existing.applied_at = instance.applied_at;
                    existing.expires_at = instance.expires_at;
                    existing.duration = instance.duration;
                    Attachment::Refreshed {
                        expires_at: existing.expires_at,
                    }
                }
                StackingPolicy::Extend { max_duration } => {
                    let mut expires_at = existing.expires_at + instance.duration;
                    if let Some(max) = max_duration {
                        expires_at = expires_at.min(now + max);
                    }
                    existing.expires_at = expires_at.max(existing.expires_at);
                    existing.duration = existing.expires_at - existing.applied_at;
                    Attachment::Extended {
                        expires_at: existing.expires_at,
                    }
                }
                StackingPolicy::Reject => Attachment::Rejected {
                    expires_at: existing.expires_at,
                },
            },
            _ => {
                let expires_at = instance.expires_at;
                instance.fire_apply(target);
                self.effects.insert(instance.id.clone(), instance);
                Attachment::Applied { expires_at }
            }
        };

        debug!(target = %target, ?attachment, "effect attach resolved");
        attachment
    }

    /// Remove every instance that has expired at `now`, firing expire hooks
    pub fn sweep(&mut self, target: &str, now: f64) -> Vec<EffectInstance> {
        let expired_ids: Vec<String> = self
            .effects
            .values()
            .filter(|e| e.is_expired(now))
            .map(|e| e.id.clone())
            .collect();

        let mut expired = Vec::with_capacity(expired_ids.len());
        for id in expired_ids {
            if let Some(effect) = self.effects.remove(&id) {
                trace!(target = %target, effect = %effect.id, "effect expired");
                effect.fire_expire(target);
                expired.push(effect);
            }
        }
        expired
    }

    pub fn get(&self, id: &str) -> Option<&EffectInstance> {
        self.effects.get(id)
    }

    /// Whether an unexpired instance of `id` is held at `now`
    pub fn contains_active(&self, id: &str, now: f64) -> bool {
        self.effects.get(id).is_some_and(|e| !e.is_expired(now))
    }

    /// The id of an active effect that prevents acting, if any
    pub fn incapacitated_by(&self, now: f64) -> Option<&str> {
        self.effects
            .values()
            .find(|e| e.incapacitates && !e.is_expired(now))
            .map(|e| e.id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &EffectInstance> {
        self.effects.values()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EffectHooks;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn stun_at(applied_at: f64, duration: f64) -> EffectInstance {
        let mut stun = EffectInstance::new("stunned", duration).incapacitating(true);
        stun.stamp(applied_at);
        stun
    }

    #[derive(Debug, Default)]
    struct HookLog {
        events: Mutex<Vec<String>>,
    }

    impl EffectHooks for HookLog {
        fn on_apply(&self, target: &str, effect: &EffectInstance) {
            self.events.lock().push(format!("apply {} {}", target, effect.id));
        }

        fn on_expire(&self, target: &str, effect: &EffectInstance) {
            self.events.lock().push(format!("expire {} {}", target, effect.id));
        }
    }

    #[test]
    fn test_first_attach_applies() {
        let mut effects = ActiveEffects::new();
        let result = effects.attach(stun_at(0.0, 4.0), &StackingPolicy::Refresh, "goblin", 0.0);

        assert_eq!(result, Attachment::Applied { expires_at: 4.0 });
        assert_eq!(effects.len(), 1);
        assert!(effects.contains_active("stunned", 3.9));
        assert!(!effects.contains_active("stunned", 4.0));
    }

    #[test]
    fn test_refresh_restarts_interval() {
        let mut effects = ActiveEffects::new();
        effects.attach(stun_at(0.0, 4.0), &StackingPolicy::Refresh, "goblin", 0.0);
        let result = effects.attach(stun_at(3.0, 4.0), &StackingPolicy::Refresh, "goblin", 3.0);

        assert_eq!(result, Attachment::Refreshed { expires_at: 7.0 });
        let stun = effects.get("stunned").unwrap();
        assert_eq!(stun.applied_at, 3.0);
        assert_eq!(effects.len(), 1);
    }

    #[test]
    fn test_extend_adds_duration() {
        let policy = StackingPolicy::Extend { max_duration: None };
        let mut effects = ActiveEffects::new();
        effects.attach(stun_at(0.0, 4.0), &policy, "goblin", 0.0);
        let result = effects.attach(stun_at(1.0, 4.0), &policy, "goblin", 1.0);

        assert_eq!(result, Attachment::Extended { expires_at: 8.0 });
        let stun = effects.get("stunned").unwrap();
        assert_eq!(stun.applied_at, 0.0);
        assert_eq!(stun.duration, 8.0);
    }

    #[test]
    fn test_extend_respects_cap() {
        let policy = StackingPolicy::Extend {
            max_duration: Some(6.0),
        };
        let mut effects = ActiveEffects::new();
        effects.attach(stun_at(0.0, 4.0), &policy, "goblin", 0.0);
        let result = effects.attach(stun_at(1.0, 4.0), &policy, "goblin", 1.0);

        // 1.0 + 6.0 cap instead of 4.0 + 4.0
        assert_eq!(result, Attachment::Extended { expires_at: 7.0 });
    }

    #[test]
    fn test_reject_keeps_existing() {
        let mut effects = ActiveEffects::new();
        effects.attach(stun_at(0.0, 4.0), &StackingPolicy::Reject, "goblin", 0.0);
        let result = effects.attach(stun_at(2.0, 10.0), &StackingPolicy::Reject, "goblin", 2.0);

        assert_eq!(result, Attachment::Rejected { expires_at: 4.0 });
        assert_eq!(effects.get("stunned").unwrap().applied_at, 0.0);
    }

    #[test]
    fn test_expired_instance_is_replaced() {
        let mut effects = ActiveEffects::new();
        effects.attach(stun_at(0.0, 4.0), &StackingPolicy::Reject, "goblin", 0.0);
        let result = effects.attach(stun_at(5.0, 4.0), &StackingPolicy::Reject, "goblin", 5.0);

        assert_eq!(result, Attachment::Applied { expires_at: 9.0 });
        assert_eq!(effects.len(), 1);
    }

    #[test]
    fn test_hooks_fire_on_apply_and_sweep() {
        let log = Arc::new(HookLog::default());
        let mut stun = EffectInstance::new("stunned", 4.0).with_hooks(log.clone());
        stun.stamp(0.0);

        let mut effects = ActiveEffects::new();
        effects.attach(stun, &StackingPolicy::Refresh, "goblin", 0.0);
        assert!(effects.sweep("goblin", 3.0).is_empty());

        let expired = effects.sweep("goblin", 4.0);
        assert_eq!(expired.len(), 1);
        assert!(effects.is_empty());
        assert_eq!(
            *log.events.lock(),
            vec!["apply goblin stunned".to_string(), "expire goblin stunned".to_string()]
        );
    }

    #[test]
    fn test_incapacitated_by() {
        let mut effects = ActiveEffects::new();
        assert!(effects.incapacitated_by(0.0).is_none());

        effects.attach(stun_at(0.0, 4.0), &StackingPolicy::Refresh, "goblin", 0.0);
        assert_eq!(effects.incapacitated_by(2.0), Some("stunned"));
        assert!(effects.incapacitated_by(4.0).is_none());
    }
}
