use super::{CombatInitiationError, CombatState};
use crate::combatant::Combatant;
use parking_lot::Mutex;
use std::collections::HashSet;
use tracing::info;

/// In-memory set of engaged pairs
#[derive(Debug, Default)]
pub struct BattleRoster {
    engaged: Mutex<HashSet<(String, String)>>,
}

fn pair(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

impl BattleRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// End the battle between two combatants, returning whether one existed
    pub fn end_combat(&self, a: &str, b: &str) -> bool {
        self.engaged.lock().remove(&pair(a, b))
    }

    /// Whether the combatant is in any battle
    pub fn is_fighting(&self, id: &str) -> bool {
        self.engaged
            .lock()
            .iter()
            .any(|(a, b)| a == id || b == id)
    }

    /// Number of engaged pairs
    pub fn battles(&self) -> usize {
        self.engaged.lock().len()
    }
}

impl CombatState for BattleRoster {
    fn in_combat(&self, actor: &Combatant, target: &Combatant) -> bool {
        self.engaged.lock().contains(&pair(actor.id(), target.id()))
    }

    fn begin_combat(
        &self,
        actor: &Combatant,
        target: &Combatant,
    ) -> Result<(), CombatInitiationError> {
        let refuse = |reason: &str| CombatInitiationError {
            actor: actor.id().to_string(),
            target: target.id().to_string(),
            reason: reason.to_string(),
        };

        if actor.id() == target.id() {
            return Err(refuse("a combatant cannot fight itself"));
        }
        if !actor.is_alive() {
            return Err(refuse("attacker is dead"));
        }
        if !target.is_alive() {
            return Err(refuse("target is dead"));
        }

        if self.engaged.lock().insert(pair(actor.id(), target.id())) {
            info!(actor = %actor.id(), target = %target.id(), "battle started");
        }
        Ok(())
    }
}
