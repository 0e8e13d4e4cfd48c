use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Idle,
    Walk,
    Run,
    Work,
    Rest,
    Sleep,
    Interact,
    Craft,
    Gather,
    Fight,
    Move,
}

impl ActionKind {
    pub fn energy_cost(self) -> f64 {
        match self {
            ActionKind::Idle | ActionKind::Rest | ActionKind::Sleep => 0.0,
            ActionKind::Walk | ActionKind::Interact => 1.0,
            ActionKind::Run | ActionKind::Fight => 3.0,
            ActionKind::Work | ActionKind::Gather | ActionKind::Craft => 2.0,
            ActionKind::Move => 1.0,
        }
    }

    pub fn default_duration(self) -> f64 {
        match self {
            ActionKind::Idle => 1.0,
            ActionKind::Walk | ActionKind::Move => 2.0,
            ActionKind::Run => 1.0,
            ActionKind::Work => 5.0,
            ActionKind::Rest => 10.0,
            ActionKind::Sleep => 480.0,
            ActionKind::Interact => 3.0,
            ActionKind::Craft => 8.0,
            ActionKind::Gather => 4.0,
            ActionKind::Fight => 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub ingredients: Vec<(String, u32)>,
    pub output: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub kind: ActionKind,
    pub priority: f64,
    pub target: Option<EntityId>,
    pub next_action: Option<Box<Action>>,
    pub recipe: Option<Recipe>,
    pub reason: Option<String>,
    pub duration: Option<f64>,
    pub remaining: f64,
}

impl Action {
    pub fn new(kind: ActionKind, priority: f64) -> Self {
        let duration = kind.default_duration();
        Action {
            kind,
            priority,
            target: None,
            next_action: None,
            recipe: None,
            reason: None,
            duration: Some(duration),
            remaining: duration,
        }
    }

    pub fn with_target(mut self, target: EntityId) -> Self {
        self.target = Some(target);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrereqError {
    OutOfBounds,
    TileNotWalkable,
    TargetOutOfRange,
    TargetDead,
    TargetMissing,
    TargetDepleted,
    MissingTool,
    RecipeUnsatisfied,
}

/// Per-agent action queue plus kind-level cooldowns. Queueing is
/// priority-ordered (highest at the head) and ignores a kind on cooldown.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionScheduler {
    pub queue: Vec<Action>,
    pub cooldowns: HashMap<ActionKind, f64>,
}

impl ActionScheduler {
    pub fn queue_action(&mut self, action: Action) {
        if self.cooldowns.get(&action.kind).copied().unwrap_or(0.0) > 0.0 {
            return;
        }
        let pos = self
            .queue
            .iter()
            .position(|a| a.priority < action.priority)
            .unwrap_or(self.queue.len());
        self.queue.insert(pos, action);
    }

    pub fn pop_next(&mut self) -> Option<Action> {
        if self.queue.is_empty() {
            None
        } else {
            Some(self.queue.remove(0))
        }
    }

    pub fn tick_cooldowns(&mut self, dt: f64) {
        for v in self.cooldowns.values_mut() {
            *v = (*v - dt).max(0.0);
        }
        self.cooldowns.retain(|_, v| *v > 0.0);
    }

    pub fn set_cooldown(&mut self, kind: ActionKind, seconds: f64) {
        self.cooldowns.insert(kind, seconds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_action_orders_by_priority_descending() {
        let mut sched = ActionScheduler::default();
        sched.queue_action(Action::new(ActionKind::Idle, 1.0));
        sched.queue_action(Action::new(ActionKind::Work, 5.0));
        sched.queue_action(Action::new(ActionKind::Rest, 3.0));
        let first = sched.pop_next().unwrap();
        assert_eq!(first.kind, ActionKind::Work);
        let second = sched.pop_next().unwrap();
        assert_eq!(second.kind, ActionKind::Rest);
    }

    #[test]
    fn cooldown_blocks_queueing_that_kind() {
        let mut sched = ActionScheduler::default();
        sched.set_cooldown(ActionKind::Gather, 5.0);
        sched.queue_action(Action::new(ActionKind::Gather, 10.0));
        assert!(sched.queue.is_empty());
    }

    #[test]
    fn cooldowns_tick_down_and_expire() {
        let mut sched = ActionScheduler::default();
        sched.set_cooldown(ActionKind::Craft, 2.0);
        sched.tick_cooldowns(1.0);
        assert_eq!(sched.cooldowns.get(&ActionKind::Craft), Some(&1.0));
        sched.tick_cooldowns(1.5);
        assert!(sched.cooldowns.get(&ActionKind::Craft).is_none());
    }

    #[test]
    fn empty_queue_pops_none() {
        let mut sched = ActionScheduler::default();
        assert!(sched.pop_next().is_none());
    }
}
