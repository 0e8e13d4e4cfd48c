use std::collections::HashMap;
use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::entity::{EntityHeader, EntityId};

pub const MEMORY_CAPACITY: usize = 100;
pub const RECENT_THOUGHT_CAPACITY: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Needs {
    pub hunger: f64,
    pub thirst: f64,
    pub energy: f64,
    pub social: f64,
    pub comfort: f64,
    pub safety: f64,
}

impl Needs {
    pub fn satisfied() -> Self {
        Needs {
            hunger: 0.0,
            thirst: 0.0,
            energy: 0.0,
            social: 0.0,
            comfort: 0.0,
            safety: 0.0,
        }
    }

    pub fn average(&self) -> f64 {
        (self.hunger + self.thirst + self.energy + self.social + self.comfort + self.safety) / 6.0
    }

    pub fn max(&self) -> f64 {
        [
            self.hunger,
            self.thirst,
            self.energy,
            self.social,
            self.comfort,
            self.safety,
        ]
        .into_iter()
        .fold(0.0, f64::max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Personality {
    pub openness: f64,
    pub conscientiousness: f64,
    pub extraversion: f64,
    pub agreeableness: f64,
    pub neuroticism: f64,
}

impl Personality {
    pub fn balanced() -> Self {
        Personality {
            openness: 0.5,
            conscientiousness: 0.5,
            extraversion: 0.5,
            agreeableness: 0.5,
            neuroticism: 0.5,
        }
    }
}

/// Ordered so `Tired` is an overriding state rather than strictly below
/// `Sad` — `mood_rank` is used only for display, never for comparisons
/// that assume a total order matches severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mood {
    Joyful,
    Content,
    Neutral,
    Sad,
    Tired,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Emotion {
    pub happiness: f64,
    pub sadness: f64,
    pub anger: f64,
    pub fear: f64,
    pub surprise: f64,
    pub disgust: f64,
    pub trust: f64,
    pub anticipation: f64,
}

impl Emotion {
    pub fn neutral() -> Self {
        Emotion {
            happiness: 0.5,
            sadness: 0.0,
            anger: 0.0,
            fear: 0.0,
            surprise: 0.0,
            disgust: 0.0,
            trust: 0.5,
            anticipation: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelationshipKind {
    Friend,
    Neutral,
    Dislike,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub value: f64,
    pub kind: RelationshipKind,
    pub last_interaction_time: f64,
    pub compatibility: f64,
}

impl Relationship {
    pub fn new(compatibility: f64, at_time: f64) -> Self {
        Relationship {
            value: 0.0,
            kind: RelationshipKind::Neutral,
            last_interaction_time: at_time,
            compatibility,
        }
    }

    /// `kind` is re-derived from `value` every tick rather than stored
    /// independently, so it can never drift out of sync.
    pub fn refresh_kind(&mut self) {
        self.kind = if self.value >= 0.5 {
            RelationshipKind::Friend
        } else if self.value <= -0.5 {
            RelationshipKind::Dislike
        } else {
            RelationshipKind::Neutral
        };
    }

    pub fn decay(&mut self, dt: f64) {
        let rate = 0.1 * dt;
        if self.value > 0.0 {
            self.value = (self.value - rate).max(0.0);
        } else if self.value < 0.0 {
            self.value = (self.value + rate).min(0.0);
        }
        self.refresh_kind();
    }

    pub fn apply_delta(&mut self, delta: f64, at_time: f64) {
        self.value = (self.value + delta).clamp(-100.0, 100.0);
        self.last_interaction_time = at_time;
        self.refresh_kind();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MemoryKind {
    Event,
    Interaction,
    Threat,
    Discovery,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemoryEntry {
    pub time: f64,
    pub duration: f64,
    pub kind: MemoryKind,
    pub emotion: Option<EmotionTag>,
    pub intensity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmotionTag {
    Happiness,
    Sadness,
    Anger,
    Fear,
    Surprise,
    Disgust,
    Trust,
    Anticipation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub remaining_duration: f64,
    pub parameters: HashMap<String, f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DaySegment {
    Night,
    Morning,
    Afternoon,
    Evening,
}

impl DaySegment {
    pub fn from_day_progress(progress: f64) -> Self {
        if progress < 0.25 {
            DaySegment::Night
        } else if progress < 0.5 {
            DaySegment::Morning
        } else if progress < 0.75 {
            DaySegment::Afternoon
        } else {
            DaySegment::Evening
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ScheduledActivity {
    Sleep,
    Work,
    Socialize,
    Eat,
    Free,
}

use crate::action::{Action, ActionKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Human {
    pub header: EntityHeader,
    pub home_location: (f64, f64),
    pub needs: Needs,
    pub personality: Personality,
    pub mood: Mood,
    pub emotion: Emotion,
    pub relationships: HashMap<EntityId, Relationship>,
    pub memory: VecDeque<MemoryEntry>,
    pub inventory: Vec<String>,
    pub daily_schedule: HashMap<DaySegment, ScheduledActivity>,
    pub skills: HashMap<String, u32>,
    pub current_thought: Option<String>,
    pub thought_timer: f64,
    pub action_queue: Vec<Action>,
    pub current_action: Option<Action>,
    pub action_timer: f64,
    pub status_effects: HashMap<String, StatusEffect>,
    pub level: u32,
    pub experience: f64,
}

impl Human {
    pub fn new(header: EntityHeader) -> Self {
        let mut daily_schedule = HashMap::new();
        daily_schedule.insert(DaySegment::Night, ScheduledActivity::Sleep);
        daily_schedule.insert(DaySegment::Morning, ScheduledActivity::Work);
        daily_schedule.insert(DaySegment::Afternoon, ScheduledActivity::Work);
        daily_schedule.insert(DaySegment::Evening, ScheduledActivity::Socialize);

        Human {
            home_location: header.pos,
            header,
            needs: Needs::satisfied(),
            personality: Personality::balanced(),
            mood: Mood::Neutral,
            emotion: Emotion::neutral(),
            relationships: HashMap::new(),
            memory: VecDeque::new(),
            inventory: Vec::new(),
            daily_schedule,
            skills: HashMap::new(),
            current_thought: None,
            thought_timer: 0.0,
            action_queue: Vec::new(),
            current_action: None,
            action_timer: 0.0,
            status_effects: HashMap::new(),
            level: 1,
            experience: 0.0,
        }
    }

    pub fn decay_needs(&mut self, dt: f64, peers_present: bool) {
        self.needs.hunger = (self.needs.hunger + 0.1 * dt).min(100.0);
        self.needs.thirst = (self.needs.thirst + 0.15 * dt).min(100.0);
        self.needs.energy = (self.needs.energy + 0.05 * dt).min(100.0);
        let social_rate = if peers_present { 0.03 * 0.4 } else { 0.03 };
        self.needs.social = (self.needs.social + social_rate * dt).min(100.0);
        self.needs.comfort = (self.needs.comfort + 0.02 * dt).min(100.0);
    }

    pub fn update_stats(&mut self, dt: f64) {
        if self.needs.max() > 80.0 {
            self.header.health = (self.header.health - 5.0 * dt).max(0.0);
        }
    }

    pub fn update_status_effects(&mut self, dt: f64) {
        self.status_effects.retain(|_, effect| {
            effect.remaining_duration -= dt;
            effect.remaining_duration > 0.0
        });
    }

    pub fn refresh_mood(&mut self) {
        self.mood = if self.header.energy < 30.0 {
            Mood::Tired
        } else {
            let avg = self.needs.average();
            if avg < 20.0 {
                Mood::Joyful
            } else if avg < 40.0 {
                Mood::Content
            } else if avg < 70.0 {
                Mood::Neutral
            } else {
                Mood::Sad
            }
        };
    }

    /// Integrates `header.velocity` into `header.pos`. Velocity is set by
    /// the action system at the start of a `Walk`/`Run`/`Move` and zeroed
    /// on completion, so this is a no-op while idle.
    pub fn apply_movement(&mut self, dt: f64) {
        self.header.pos.0 += self.header.velocity.0 * dt;
        self.header.pos.1 += self.header.velocity.1 * dt;
    }

    pub fn update_relationships(&mut self, dt: f64) {
        for rel in self.relationships.values_mut() {
            rel.decay(dt);
        }
    }

    pub fn check_level_up(&mut self) {
        if self.experience >= self.level as f64 * 100.0 {
            self.level += 1;
            self.header.max_health += 10.0;
            self.header.max_energy += 5.0;
            self.header.health = self.header.max_health;
            self.header.energy = self.header.max_energy;
            self.status_effects.insert(
                "Inspired".to_string(),
                StatusEffect {
                    remaining_duration: 300.0,
                    parameters: HashMap::new(),
                },
            );
        }
    }

    pub fn push_memory(&mut self, entry: MemoryEntry) {
        if self.memory.len() >= MEMORY_CAPACITY {
            self.memory.pop_front();
        }
        self.memory.push_back(entry);
    }

    pub fn prune_expired_memory(&mut self, now: f64) {
        self.memory.retain(|m| now - m.time < m.duration);
    }

    pub fn scheduled_activity(&self, day_progress: f64) -> ScheduledActivity {
        let segment = DaySegment::from_day_progress(day_progress);
        self.daily_schedule
            .get(&segment)
            .copied()
            .unwrap_or(ScheduledActivity::Free)
    }

    pub fn default_action_for(&self, activity: ScheduledActivity) -> Action {
        let kind = match activity {
            ScheduledActivity::Sleep => ActionKind::Sleep,
            ScheduledActivity::Work => ActionKind::Work,
            ScheduledActivity::Socialize => ActionKind::Interact,
            ScheduledActivity::Eat => ActionKind::Gather,
            ScheduledActivity::Free => ActionKind::Idle,
        };
        Action::new(kind, 0.1)
    }
}
