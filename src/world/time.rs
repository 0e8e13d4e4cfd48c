use serde::{Deserialize, Serialize};

use crate::world::constants::{DAY_LENGTH, SEASON_LENGTH_DAYS, TIME_SCALE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub fn from_index(index: u32) -> Self {
        match index % 4 {
            0 => Season::Spring,
            1 => Season::Summer,
            2 => Season::Autumn,
            _ => Season::Winter,
        }
    }
}

/// The five closed simulation speeds and their tick multipliers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeSpeed {
    Paused,
    Slow,
    Normal,
    Fast,
    Ultra,
}

impl TimeSpeed {
    pub fn multiplier(self) -> f64 {
        match self {
            TimeSpeed::Paused => 0.0,
            TimeSpeed::Slow => 0.5,
            TimeSpeed::Normal => 1.0,
            TimeSpeed::Fast => 2.0,
            TimeSpeed::Ultra => 5.0,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "paused" => Some(TimeSpeed::Paused),
            "slow" => Some(TimeSpeed::Slow),
            "normal" => Some(TimeSpeed::Normal),
            "fast" => Some(TimeSpeed::Fast),
            "ultra" => Some(TimeSpeed::Ultra),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeState {
    pub elapsed_seconds: f64,
    pub day: u64,
    pub hour: u32,
    pub minute: u32,
    pub day_progress: f64,
    pub season: Season,
    pub season_day: u32,
    pub speed: TimeSpeed,
    pub paused: bool,
}

impl Default for TimeState {
    fn default() -> Self {
        TimeState {
            elapsed_seconds: 0.0,
            day: 0,
            hour: 0,
            minute: 0,
            day_progress: 0.0,
            season: Season::Spring,
            season_day: 0,
            speed: TimeSpeed::Normal,
            paused: false,
        }
    }
}

impl TimeState {
    pub fn set_speed(&mut self, speed: TimeSpeed) {
        self.speed = speed;
        self.paused = matches!(speed, TimeSpeed::Paused);
    }

    pub fn update(&mut self, dt: f64) {
        if self.paused {
            return;
        }
        self.elapsed_seconds += dt * self.speed.multiplier() * TIME_SCALE;
        self.recompute_derived();
    }

    fn recompute_derived(&mut self) {
        let day_f = self.elapsed_seconds / DAY_LENGTH;
        self.day = day_f.floor() as u64;
        self.day_progress = day_f.fract();
        let seconds_into_day = self.day_progress * DAY_LENGTH;
        self.hour = (seconds_into_day / 3600.0).floor() as u32 % 24;
        self.minute = ((seconds_into_day / 60.0).floor() as u32) % 60;
        let season_index = (self.day / SEASON_LENGTH_DAYS as u64) % 4;
        self.season = Season::from_index(season_index as u32);
        self.season_day = (self.day % SEASON_LENGTH_DAYS as u64) as u32;
    }

    /// Piecewise light level: full daylight in the `(0.25, 0.75)` band,
    /// ramping `0.3 -> 1.0` across dawn/dusk windows of width `0.25`
    /// outside it.
    pub fn light_level(&self) -> f64 {
        let p = self.day_progress;
        if p > 0.25 && p < 0.75 {
            return 1.0;
        }
        if p <= 0.25 {
            // Dawn window: [0.0, 0.25], ramping 0.3 -> 1.0.
            let t = p / 0.25;
            0.3 + 0.7 * t
        } else {
            // Dusk window: [0.75, 1.0], ramping 1.0 -> 0.3.
            let t = (p - 0.75) / 0.25;
            1.0 - 0.7 * t
        }
    }
}
