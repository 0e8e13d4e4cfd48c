use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_tick_rate")]
    pub tick_rate_hz: f32,
    #[serde(default = "default_snapshot_interval")]
    pub snapshot_interval: u32,
    #[serde(default = "default_max_snapshots")]
    pub max_snapshots: u32,
    #[serde(default = "default_snapshot_directory")]
    pub snapshot_directory: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_initial_time_speed")]
    pub initial_time_speed: String,
    #[serde(default = "default_view_distance_chunks")]
    pub view_distance_chunks: u32,
}

fn default_tick_rate() -> f32 {
    10.0
}
fn default_snapshot_interval() -> u32 {
    1000
}
fn default_max_snapshots() -> u32 {
    10
}
fn default_snapshot_directory() -> String {
    "./snapshots".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_initial_time_speed() -> String {
    "normal".to_string()
}
fn default_view_distance_chunks() -> u32 {
    3
}

impl SimulationConfig {
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Cannot read {}: {}", path.display(), e))?;
        Self::from_toml_str(&content, path)
    }

    pub fn from_toml_str(content: &str, source_path: &Path) -> Result<Self, String> {
        let config: SimulationConfig =
            toml::from_str(content).map_err(|e| format!("{}: {}", source_path.display(), e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        let mut errors = Vec::new();

        if self.tick_rate_hz <= 0.0 {
            errors.push(format!(
                "tick_rate_hz must be > 0.0, got {}. Example: tick_rate_hz = 10.0",
                self.tick_rate_hz
            ));
        }
        if self.snapshot_interval == 0 {
            errors.push(format!(
                "snapshot_interval must be > 0, got {}. Example: snapshot_interval = 1000",
                self.snapshot_interval
            ));
        }
        if self.max_snapshots == 0 {
            errors.push(format!(
                "max_snapshots must be > 0, got {}. Example: max_snapshots = 10",
                self.max_snapshots
            ));
        }
        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            errors.push(format!(
                "log_level must be one of {:?}, got '{}'. Example: log_level = \"info\"",
                valid_levels, self.log_level
            ));
        }
        let valid_speeds = ["paused", "slow", "normal", "fast", "ultra"];
        if !valid_speeds.contains(&self.initial_time_speed.as_str()) {
            errors.push(format!(
                "initial_time_speed must be one of {:?}, got '{}'",
                valid_speeds, self.initial_time_speed
            ));
        }
        if self.view_distance_chunks == 0 {
            errors.push("view_distance_chunks must be > 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors.join("\n"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    fn test_path() -> PathBuf {
        PathBuf::from("test-config.toml")
    }

    #[test]
    fn valid_config_loads_all_fields() {
        let toml = r#"
            tick_rate_hz = 2.0
            snapshot_interval = 50
            max_snapshots = 5
            snapshot_directory = "./data/snapshots"
            log_level = "debug"
            initial_time_speed = "fast"
            view_distance_chunks = 5
        "#;
        let config = SimulationConfig::from_toml_str(toml, &test_path()).unwrap();
        assert_eq!(config.tick_rate_hz, 2.0);
        assert_eq!(config.snapshot_interval, 50);
        assert_eq!(config.max_snapshots, 5);
        assert_eq!(config.snapshot_directory, "./data/snapshots");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.initial_time_speed, "fast");
        assert_eq!(config.view_distance_chunks, 5);
    }

    #[test]
    fn defaults_applied_for_empty_config() {
        let config = SimulationConfig::from_toml_str("", &test_path()).unwrap();
        assert_eq!(config.tick_rate_hz, 10.0);
        assert_eq!(config.snapshot_interval, 1000);
        assert_eq!(config.max_snapshots, 10);
        assert_eq!(config.snapshot_directory, "./snapshots");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.initial_time_speed, "normal");
        assert_eq!(config.view_distance_chunks, 3);
    }

    #[test]
    fn invalid_tick_rate_rejected() {
        let err = SimulationConfig::from_toml_str("tick_rate_hz = -1.0", &test_path()).unwrap_err();
        assert!(err.contains("tick_rate_hz"));
    }

    #[test]
    fn invalid_log_level_rejected() {
        let err =
            SimulationConfig::from_toml_str(r#"log_level = "verbose""#, &test_path()).unwrap_err();
        assert!(err.contains("log_level"));
    }

    #[test]
    fn invalid_time_speed_rejected() {
        let err = SimulationConfig::from_toml_str(
            r#"initial_time_speed = "warp""#,
            &test_path(),
        )
        .unwrap_err();
        assert!(err.contains("initial_time_speed"));
    }

    #[test]
    fn multiple_errors_reported_together() {
        let toml = "tick_rate_hz = 0.0\nsnapshot_interval = 0\nmax_snapshots = 0";
        let err = SimulationConfig::from_toml_str(toml, &test_path()).unwrap_err();
        assert!(err.contains("tick_rate_hz"));
        assert!(err.contains("snapshot_interval"));
        assert!(err.contains("max_snapshots"));
    }

    #[test]
    fn from_file_loads_valid_config() {
        let mut tmp = NamedTempFile::new().unwrap();
        use std::io::Write;
        writeln!(tmp, "tick_rate_hz = 5.0").unwrap();
        let config = SimulationConfig::from_file(tmp.path()).unwrap();
        assert_eq!(config.tick_rate_hz, 5.0);
    }

    #[test]
    fn from_file_missing_file_error() {
        let err = SimulationConfig::from_file(Path::new("/nonexistent/config.toml")).unwrap_err();
        assert!(err.contains("Cannot read"));
    }
}
