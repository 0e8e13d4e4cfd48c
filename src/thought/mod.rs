use crate::action::{Action, ActionKind};
use crate::entity::EntityId;
use crate::entity::human::{DaySegment, Human, Needs, Personality};
use crate::world::time::TimeState;
use crate::world::weather::WeatherKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThoughtKind {
    Need,
    Social,
    Environment,
    Explore,
    Work,
    Rest,
    Emotional,
    Memory,
    Random,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Complexity {
    Basic,
    Simple,
    Normal,
    Complex,
    Abstract,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Thought {
    pub kind: ThoughtKind,
    pub subtype: String,
    pub urgency: f64,
    pub complexity: Complexity,
    pub target: Option<EntityId>,
    pub content: String,
}

/// Everything the Thought System needs to evaluate one agent for one tick,
/// assembled by the orchestrator before calling [`generate_thought`].
pub struct ThoughtContext<'a> {
    pub time: &'a TimeState,
    pub weather: WeatherKind,
    pub needs: Needs,
    pub personality: Personality,
    pub distance_from_home: f64,
    pub peers_nearby: bool,
    pub resources_nearby: bool,
    /// Nearest other human in range, if any — threaded through to the
    /// generated social thought's `target` so `Interact` has someone to
    /// apply its effect to.
    pub nearest_peer: Option<EntityId>,
    /// Nearest non-depleted resource in range, if any — threaded through
    /// to the generated work/gather thought's `target`.
    pub nearest_resource: Option<EntityId>,
    pub stress: f64,
}

const CRITICAL_NEED_THRESHOLD: f64 = 70.0;
const FLOOR_PRIORITY: f64 = 0.05;

fn candidates(ctx: &ThoughtContext) -> Vec<Thought> {
    let mut out = Vec::new();

    for (name, value) in [
        ("hunger", ctx.needs.hunger),
        ("thirst", ctx.needs.thirst),
        ("energy", ctx.needs.energy),
        ("social", ctx.needs.social),
        ("comfort", ctx.needs.comfort),
        ("safety", ctx.needs.safety),
    ] {
        if value > CRITICAL_NEED_THRESHOLD {
            let target = if name == "hunger" || name == "thirst" {
                ctx.nearest_resource
            } else {
                None
            };
            out.push(Thought {
                kind: ThoughtKind::Need,
                subtype: name.to_string(),
                urgency: value / 100.0,
                complexity: Complexity::Basic,
                target,
                content: format!("{name} is critical"),
            });
        }
    }

    if matches!(ctx.weather, WeatherKind::Storm | WeatherKind::Rain) {
        out.push(Thought {
            kind: ThoughtKind::Environment,
            subtype: "seek_shelter".to_string(),
            urgency: 0.6,
            complexity: Complexity::Simple,
            target: None,
            content: "should find shelter".to_string(),
        });
    }

    let low_light = ctx.time.light_level() < 0.5;
    if low_light && ctx.distance_from_home > 100.0 {
        out.push(Thought {
            kind: ThoughtKind::Environment,
            subtype: "return_home".to_string(),
            urgency: 0.5,
            complexity: Complexity::Simple,
            target: None,
            content: "getting dark, should head home".to_string(),
        });
    }

    if ctx.needs.social > 50.0 && ctx.peers_nearby {
        // Agreeable agents lean toward a helping interaction; everyone else
        // just wants company.
        let subtype = if ctx.personality.agreeableness > 0.6 { "help" } else { "chat" };
        out.push(Thought {
            kind: ThoughtKind::Social,
            subtype: subtype.to_string(),
            urgency: ctx.needs.social / 100.0,
            complexity: Complexity::Normal,
            target: ctx.nearest_peer,
            content: if subtype == "help" {
                "wants to help someone".to_string()
            } else {
                "wants company".to_string()
            },
        });
    }

    if ctx.needs.energy < 50.0 && ctx.resources_nearby {
        out.push(Thought {
            kind: ThoughtKind::Work,
            subtype: "gather".to_string(),
            urgency: 0.4,
            complexity: Complexity::Normal,
            target: ctx.nearest_resource,
            content: "resources nearby, worth gathering".to_string(),
        });
    }

    if ctx.personality.openness > 0.7 {
        out.push(Thought {
            kind: ThoughtKind::Explore,
            subtype: "wander".to_string(),
            urgency: 0.3,
            complexity: Complexity::Complex,
            target: None,
            content: "curious about what's further out".to_string(),
        });
    }

    if ctx.personality.conscientiousness > 0.7 {
        out.push(Thought {
            kind: ThoughtKind::Work,
            subtype: "plan".to_string(),
            urgency: 0.3,
            complexity: Complexity::Abstract,
            target: None,
            content: "should plan tomorrow".to_string(),
        });
    }

    out
}

fn priority_weight(kind: ThoughtKind, personality: &Personality) -> f64 {
    match kind {
        ThoughtKind::Need => 1.5,
        ThoughtKind::Explore => personality.openness,
        ThoughtKind::Social => personality.extraversion,
        ThoughtKind::Work => personality.conscientiousness,
        _ => 1.0,
    }
}

/// Enumerate, prioritize, and return the highest-priority thought, or
/// `None` if every candidate falls below the floor priority.
pub fn generate_thought(ctx: &ThoughtContext) -> Option<Thought> {
    let mut scored: Vec<(f64, Thought)> = candidates(ctx)
        .into_iter()
        .map(|t| {
            let mut priority = t.urgency * priority_weight(t.kind, &ctx.personality);
            if ctx.stress > 50.0 && matches!(t.complexity, Complexity::Complex | Complexity::Abstract) {
                priority *= 0.5;
            }
            (priority, t)
        })
        .collect();

    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap());
    scored
        .into_iter()
        .find(|(priority, _)| *priority >= FLOOR_PRIORITY)
        .map(|(_, t)| t)
}

/// Derives stress from need deficits and neuroticism, matching the role
/// `ThoughtContext::stress` plays upstream in prioritization.
pub fn derive_stress(needs: &Needs, neuroticism: f64) -> f64 {
    let deficit = needs.average();
    (deficit * (0.5 + neuroticism)).min(100.0)
}

/// Maps a generated thought into a queued action, per the thought->action
/// table referenced by the orchestrator's tick sequence.
pub fn thought_to_action(thought: &Thought) -> Action {
    let kind = match thought.kind {
        ThoughtKind::Need if thought.subtype == "energy" => ActionKind::Rest,
        ThoughtKind::Need if thought.subtype == "hunger" || thought.subtype == "thirst" => ActionKind::Gather,
        // social/comfort/safety need thoughts have no dedicated action yet;
        // gathering is the closest fallback to acting on the deficit.
        ThoughtKind::Need => ActionKind::Gather,
        ThoughtKind::Social => ActionKind::Interact,
        ThoughtKind::Work if thought.subtype == "gather" => ActionKind::Gather,
        ThoughtKind::Work => ActionKind::Work,
        ThoughtKind::Environment if thought.subtype == "seek_shelter" => ActionKind::Move,
        ThoughtKind::Environment => ActionKind::Walk,
        ThoughtKind::Explore => ActionKind::Walk,
        ThoughtKind::Rest => ActionKind::Rest,
        ThoughtKind::Emotional | ThoughtKind::Memory | ThoughtKind::Random => ActionKind::Idle,
    };
    let mut action = Action::new(kind, thought.urgency);
    action.target = thought.target;
    if kind == ActionKind::Interact {
        action.reason = Some(thought.subtype.clone());
    }
    action
}

pub fn store_thought(human: &mut Human, thought: &Thought) {
    human.current_thought = Some(thought.content.clone());
}

pub fn current_day_segment(time: &TimeState) -> DaySegment {
    DaySegment::from_day_progress(time.day_progress)
}
