use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::world::time::Season;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeatherKind {
    Clear,
    Cloudy,
    Rain,
    Storm,
    Snow,
    Blizzard,
}

pub const ALL_WEATHER_KINDS: [WeatherKind; 6] = [
    WeatherKind::Clear,
    WeatherKind::Cloudy,
    WeatherKind::Rain,
    WeatherKind::Storm,
    WeatherKind::Snow,
    WeatherKind::Blizzard,
];

/// Per-kind duration range, scalar effects, and season gating. Indexed by
/// `WeatherKind as usize` via [`weather_profile`] — this table is the
/// authoritative source for weather tuning.
#[derive(Debug, Clone, Copy)]
pub struct WeatherProfile {
    pub kind: WeatherKind,
    pub min_duration: f64,
    pub max_duration: f64,
    pub base_probability: f64,
    pub temperature_mod: f64,
    pub precipitation: f64,
    pub darkness: f64,
    pub fog: f64,
    pub max_wind: f64,
    pub possible_seasons: [bool; 4],
    pub season_probability_mod: [f64; 4],
    pub weather_resistance_relevant: bool,
}

const fn all_seasons() -> [bool; 4] {
    [true, true, true, true]
}

pub fn weather_profile(kind: WeatherKind) -> WeatherProfile {
    match kind {
        WeatherKind::Clear => WeatherProfile {
            kind,
            min_duration: 600.0,
            max_duration: 3600.0,
            base_probability: 0.4,
            temperature_mod: 1.0,
            precipitation: 0.0,
            darkness: 0.0,
            fog: 0.0,
            max_wind: 3.0,
            possible_seasons: all_seasons(),
            season_probability_mod: [1.0, 1.2, 1.0, 0.8],
            weather_resistance_relevant: false,
        },
        WeatherKind::Cloudy => WeatherProfile {
            kind,
            min_duration: 400.0,
            max_duration: 2400.0,
            base_probability: 0.25,
            temperature_mod: -0.5,
            precipitation: 0.0,
            darkness: 0.2,
            fog: 0.1,
            max_wind: 5.0,
            possible_seasons: all_seasons(),
            season_probability_mod: [1.0, 1.0, 1.2, 1.0],
            weather_resistance_relevant: false,
        },
        WeatherKind::Rain => WeatherProfile {
            kind,
            min_duration: 300.0,
            max_duration: 1800.0,
            base_probability: 0.15,
            temperature_mod: -1.5,
            precipitation: 0.6,
            darkness: 0.4,
            fog: 0.2,
            max_wind: 8.0,
            possible_seasons: [true, true, true, false],
            season_probability_mod: [1.2, 0.8, 1.3, 0.0],
            weather_resistance_relevant: true,
        },
        WeatherKind::Storm => WeatherProfile {
            kind,
            min_duration: 180.0,
            max_duration: 900.0,
            base_probability: 0.08,
            temperature_mod: -2.0,
            precipitation: 1.0,
            darkness: 0.7,
            fog: 0.3,
            max_wind: 18.0,
            possible_seasons: [true, true, true, false],
            season_probability_mod: [1.0, 1.3, 1.1, 0.0],
            weather_resistance_relevant: true,
        },
        WeatherKind::Snow => WeatherProfile {
            kind,
            min_duration: 600.0,
            max_duration: 3000.0,
            base_probability: 0.1,
            temperature_mod: -3.0,
            precipitation: 0.5,
            darkness: 0.3,
            fog: 0.15,
            max_wind: 6.0,
            possible_seasons: [false, false, false, true],
            season_probability_mod: [0.0, 0.0, 0.0, 1.3],
            weather_resistance_relevant: true,
        },
        WeatherKind::Blizzard => WeatherProfile {
            kind,
            min_duration: 300.0,
            max_duration: 1200.0,
            base_probability: 0.02,
            temperature_mod: -5.0,
            precipitation: 0.9,
            darkness: 0.8,
            fog: 0.5,
            max_wind: 22.0,
            possible_seasons: [false, false, false, true],
            season_probability_mod: [0.0, 0.0, 0.0, 1.0],
            weather_resistance_relevant: true,
        },
    }
}

fn season_index(season: Season) -> usize {
    match season {
        Season::Spring => 0,
        Season::Summer => 1,
        Season::Autumn => 2,
        Season::Winter => 3,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherState {
    pub current: WeatherKind,
    pub previous: WeatherKind,
    pub transition_progress: f64,
    pub remaining_duration: f64,
    pub wind_speed: f64,
    pub wind_direction: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub darkness: f64,
    pub fog: f64,
    pub rain_intensity: f64,
    pub snow_intensity: f64,
    pub thunder: f64,
    pub cloud_cover: f64,
    pub lightning_flash: f64,
}

impl WeatherState {
    /// Harvesting efficiency multiplier: rain, snow, and fog all slow
    /// gathering, clamped so weather never fully stalls it.
    pub fn gather_modifier(&self) -> f64 {
        (1.0 - 0.3 * self.rain_intensity - 0.4 * self.snow_intensity - 0.2 * self.fog).clamp(0.3, 1.0)
    }
}

impl Default for WeatherState {
    fn default() -> Self {
        WeatherState {
            current: WeatherKind::Clear,
            previous: WeatherKind::Clear,
            transition_progress: 1.0,
            remaining_duration: 1800.0,
            wind_speed: 1.0,
            wind_direction: 0.0,
            temperature: 15.0,
            humidity: 0.4,
            darkness: 0.0,
            fog: 0.0,
            rain_intensity: 0.0,
            snow_intensity: 0.0,
            thunder: 0.0,
            cloud_cover: 0.0,
            lightning_flash: 0.0,
        }
    }
}

const TRANSITION_WINDOW: f64 = 0.2;

/// Wraps the weather state with its own seeded RNG stream, independent of
/// any other subsystem's randomness.
#[derive(Debug, Clone)]
pub struct WeatherSystem {
    pub state: WeatherState,
    rng: ChaCha8Rng,
    wind_target: f64,
}

impl WeatherSystem {
    pub fn new(seed: u64) -> Self {
        WeatherSystem {
            state: WeatherState::default(),
            rng: ChaCha8Rng::seed_from_u64(seed ^ 0xA5A5_A5A5_A5A5_A5A5),
            wind_target: 1.0,
        }
    }

    pub fn update(&mut self, dt: f64, season: Season) {
        self.state.remaining_duration -= dt;
        if self.state.remaining_duration <= 0.0 {
            self.transition_to_next(season);
        }
        if self.state.transition_progress < 1.0 {
            self.state.transition_progress =
                (self.state.transition_progress + dt / TRANSITION_WINDOW.max(dt)).min(1.0);
        }

        self.update_wind(dt);
        self.update_temperature(dt, season);
        self.update_lightning(dt);

        let profile = weather_profile(self.state.current);
        self.state.humidity = (0.3 + profile.precipitation * 0.6).clamp(0.0, 1.0);
        self.state.darkness = profile.darkness;
        self.state.fog = profile.fog;
        self.state.cloud_cover = match self.state.current {
            WeatherKind::Clear => 0.1,
            WeatherKind::Cloudy => 0.6,
            _ => 0.9,
        };
        self.state.rain_intensity = if matches!(self.state.current, WeatherKind::Rain | WeatherKind::Storm) {
            profile.precipitation
        } else {
            0.0
        };
        self.state.snow_intensity = if matches!(self.state.current, WeatherKind::Snow | WeatherKind::Blizzard) {
            profile.precipitation
        } else {
            0.0
        };
    }

    fn transition_to_next(&mut self, season: Season) {
        let season_idx = season_index(season);
        let candidates: Vec<WeatherProfile> = ALL_WEATHER_KINDS
            .into_iter()
            .map(weather_profile)
            .filter(|p| p.possible_seasons[season_idx])
            .collect();

        let next_kind = if candidates.is_empty() {
            WeatherKind::Clear
        } else {
            let total: f64 = candidates
                .iter()
                .map(|p| p.base_probability * p.season_probability_mod[season_idx])
                .sum();
            if total <= 0.0 {
                WeatherKind::Clear
            } else {
                let mut roll = self.rng.gen_range(0.0..total);
                let mut chosen = candidates.last().unwrap().kind;
                for p in &candidates {
                    let weight = p.base_probability * p.season_probability_mod[season_idx];
                    if roll < weight {
                        chosen = p.kind;
                        break;
                    }
                    roll -= weight;
                }
                chosen
            }
        };

        let profile = weather_profile(next_kind);
        self.wind_target = self.rng.gen_range(0.0..profile.max_wind.max(0.1));
        self.state.previous = self.state.current;
        self.state.current = next_kind;
        self.state.transition_progress = 0.0;
        self.state.remaining_duration = self.rng.gen_range(profile.min_duration..=profile.max_duration);
    }

    fn update_wind(&mut self, dt: f64) {
        let delta = self.wind_target - self.state.wind_speed;
        self.state.wind_speed += delta * (dt * 0.1).min(1.0);
        let drift = self.rng.gen_range(-0.2..0.2) * dt;
        self.state.wind_direction = (self.state.wind_direction + drift).rem_euclid(std::f64::consts::TAU);
    }

    fn update_temperature(&mut self, dt: f64, season: Season) {
        let _ = dt;
        let seasonal_base = match season {
            Season::Spring => 14.0,
            Season::Summer => 25.0,
            Season::Autumn => 10.0,
            Season::Winter => -2.0,
        };
        // Coolest at 03:00, warmest at 15:00: a sinusoid referenced off the
        // current wall-clock hour isn't available here, so the caller
        // supplies a day-progress-derived phase via `apply_diurnal_phase`.
        let profile = weather_profile(self.state.current);
        self.state.temperature = seasonal_base + profile.temperature_mod;
    }

    /// Applies the time-of-day sinusoid on top of the seasonal+weather
    /// base already computed in `update_temperature`. Kept as a distinct
    /// step because the caller (the orchestrator) owns `day_progress`.
    pub fn apply_diurnal_phase(&mut self, day_progress: f64) {
        let hour = day_progress * 24.0;
        let phase = ((hour - 15.0) / 24.0) * std::f64::consts::TAU;
        self.state.temperature += 10.0 * (-phase.cos());
    }

    fn update_lightning(&mut self, dt: f64) {
        if self.state.current == WeatherKind::Storm {
            let probability = 0.3 * dt;
            if self.rng.gen_bool(probability.clamp(0.0, 1.0)) {
                self.state.lightning_flash = 1.0;
                return;
            }
        }
        self.state.lightning_flash = (self.state.lightning_flash - 5.0 * dt).max(0.0);
    }

    pub fn thunder_rumble(&mut self, dt: f64) {
        self.state.thunder = if self.state.current == WeatherKind::Storm {
            (self.state.thunder + dt).min(1.0)
        } else {
            (self.state.thunder - dt).max(0.0)
        };
    }
}
