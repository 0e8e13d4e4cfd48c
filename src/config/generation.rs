use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parameters used to procedurally generate a world. Stored with the world
/// so a snapshot can be regenerated tile-for-tile from just the seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub seed: u64,
    pub world_width_tiles: u32,
    pub world_height_tiles: u32,
    pub resource_density: f64,
    pub view_distance_chunks: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        GenerationParams {
            seed: 0,
            world_width_tiles: 1000,
            world_height_tiles: 1000,
            resource_density: 0.3,
            view_distance_chunks: 3,
        }
    }
}

impl GenerationParams {
    /// Load generation parameters from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Cannot read {}: {}", path.display(), e))?;
        let params: Self = toml::from_str(&content)
            .map_err(|e| format!("Invalid TOML in {}: {}", path.display(), e))?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.world_width_tiles < 32 {
            return Err(format!(
                "world_width_tiles must be >= 32, got {}",
                self.world_width_tiles
            ));
        }
        if self.world_height_tiles < 32 {
            return Err(format!(
                "world_height_tiles must be >= 32, got {}",
                self.world_height_tiles
            ));
        }
        if !(0.0..=1.0).contains(&self.resource_density) {
            return Err(format!(
                "resource_density must be 0.0-1.0, got {}",
                self.resource_density
            ));
        }
        if self.view_distance_chunks == 0 {
            return Err("view_distance_chunks must be > 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        assert!(GenerationParams::default().validate().is_ok());
    }

    #[test]
    fn invalid_width_rejected() {
        let mut p = GenerationParams::default();
        p.world_width_tiles = 4;
        let err = p.validate().unwrap_err();
        assert!(err.contains("world_width_tiles"));
    }

    #[test]
    fn invalid_density_rejected() {
        let mut p = GenerationParams::default();
        p.resource_density = 1.5;
        let err = p.validate().unwrap_err();
        assert!(err.contains("resource_density"));
    }

    #[test]
    fn from_toml_round_trip() {
        let toml_str = r#"
seed = 42
world_width_tiles = 2000
world_height_tiles = 2000
resource_density = 0.4
view_distance_chunks = 4
"#;
        let params: GenerationParams = toml::from_str(toml_str).unwrap();
        assert_eq!(params.seed, 42);
        params.validate().unwrap();
    }

    #[test]
    fn from_file_missing() {
        let err = GenerationParams::from_file(Path::new("/nonexistent/file.toml")).unwrap_err();
        assert!(err.contains("Cannot read"));
    }

    #[test]
    fn from_file_valid() {
        let mut tmpfile = tempfile::NamedTempFile::new().unwrap();
        write!(
            tmpfile,
            r#"
seed = 7
world_width_tiles = 500
world_height_tiles = 500
resource_density = 0.2
view_distance_chunks = 2
"#
        )
        .unwrap();
        let params = GenerationParams::from_file(tmpfile.path()).unwrap();
        assert_eq!(params.seed, 7);
    }
}
