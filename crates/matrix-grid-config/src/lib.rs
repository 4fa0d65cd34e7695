//! Configuration file handling for matrix grid.
//!
//! Settings live in `config.toml` under the platform's configuration
//! directory. A missing file means defaults; a partial file fills the gaps
//! with defaults.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use matrix_grid_core::{ConfigError, GridConfig};
use serde::{Deserialize, Serialize};

const CONFIG_FILE: &str = "config.toml";

/// Settings for the terminal preview host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Delay between rendered frames.
    pub frame_interval_ms: u64,
    /// Write tracing output here. Stdout belongs to the terminal UI.
    pub log_file: Option<PathBuf>,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: 16,
            log_file: None,
        }
    }
}

/// Contents of `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub grid: GridConfig,
    pub preview: PreviewConfig,
}

impl AppConfig {
    /// Location of the configuration file for this platform.
    pub fn path() -> Result<PathBuf, ConfigError> {
        ProjectDirs::from("com", "am2rican5", "matrix-grid")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load from the default location, falling back to defaults when no file exists.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Parse and validate TOML text.
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.grid.validate()?;
        Ok(config)
    }

    /// Write to the default location, creating the directory if needed.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|source| ConfigError::Write {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, contents).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("matrix-grid-config-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = AppConfig::load_from(&scratch_path("absent/config.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config = AppConfig::parse(
            r#"
            [grid]
            cell_size = 40.0
            characters = "01"

            [grid.mouse_effect]
            radius = 150.0

            [preview]
            frame_interval_ms = 33
            "#,
        )
        .unwrap();

        assert_eq!(config.grid.cell_size, 40.0);
        assert_eq!(config.grid.palette(), vec!['0', '1']);
        assert_eq!(config.grid.mouse_effect.radius, 150.0);
        assert_eq!(config.grid.mouse_effect.speed_multiplier, 0.5);
        assert_eq!(config.grid.base_speed.reverse, 25.0);
        assert_eq!(config.grid.mount_id, "matrixGrid");
        assert_eq!(config.preview.frame_interval_ms, 33);
        assert_eq!(config.preview.log_file, None);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = AppConfig::parse("[grid]\ncharacters = \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = AppConfig::parse("[grid.mouse_effect]\nradius = nan\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = AppConfig::parse("[grid]\ncell_size = \"big\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_save_then_load() {
        let path = scratch_path("roundtrip/config.toml");
        let mut config = AppConfig::default();
        config.grid.highlight_color = "#00ff41".to_string();
        config.preview.log_file = Some(PathBuf::from("/tmp/matrix-grid.log"));

        config.save_to(&path).unwrap();
        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);

        let _ = fs::remove_file(&path);
    }
}
