use std::path::Path;

use tracing::warn;

use crate::error::ConfigError;
use crate::game::animation::DropPhysics;
use crate::game::bomb::ExplosionConfig;
use crate::game::{RulesConfig, TimingConfig, DEFAULT_COLS, DEFAULT_ROWS};
use crate::ui::UiConfig;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub rows: usize,
    pub cols: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
        }
    }
}

/// Everything the game engine needs; no front-end settings.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub board: BoardConfig,
    pub timing: TimingConfig,
    pub rules: RulesConfig,
    pub physics: DropPhysics,
    pub explosion: ExplosionConfig,
}

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub game: GameConfig,
    pub ui: UiConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.game.validate()?;

        if self.ui.frame_ms == 0 {
            return Err(ConfigError::Validation("ui.frame_ms must be > 0".into()));
        }
        if self.ui.units_per_column <= 0.0 || self.ui.units_per_row <= 0.0 {
            return Err(ConfigError::Validation(
                "ui.units_per_column and ui.units_per_row must be > 0".into(),
            ));
        }

        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(&AppConfig::default())
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board.rows == 0 {
            return Err(ConfigError::Validation("board.rows must be >= 1".into()));
        }
        if self.board.cols == 0 {
            return Err(ConfigError::Validation("board.cols must be >= 1".into()));
        }

        // Timing
        if self.timing.bomb_resume_ms < self.timing.bomb_gravity_delay_ms {
            return Err(ConfigError::Validation(
                "timing.bomb_resume_ms must be >= timing.bomb_gravity_delay_ms".into(),
            ));
        }
        if self.timing.tracking_freshness_ms == 0 {
            return Err(ConfigError::Validation(
                "timing.tracking_freshness_ms must be > 0".into(),
            ));
        }

        // Physics
        if self.physics.gravity <= 0.0 {
            return Err(ConfigError::Validation("physics.gravity must be > 0".into()));
        }
        if self.physics.horizontal_ease <= 0.0 || self.physics.horizontal_ease > 1.0 {
            return Err(ConfigError::Validation(
                "physics.horizontal_ease must be in (0, 1]".into(),
            ));
        }
        if self.physics.spin_min < 0.0 || self.physics.spin_min > self.physics.spin_max {
            return Err(ConfigError::Validation(
                "physics.spin_min must be in [0, physics.spin_max]".into(),
            ));
        }
        if self.physics.rotation_blend < 0.0 || self.physics.rotation_blend > 1.0 {
            return Err(ConfigError::Validation(
                "physics.rotation_blend must be in [0, 1]".into(),
            ));
        }
        if self.physics.spin_decay < 0.0 || self.physics.spin_decay > 1.0 {
            return Err(ConfigError::Validation(
                "physics.spin_decay must be in [0, 1]".into(),
            ));
        }

        // Explosion
        if self.explosion.growth_per_ms <= 0.0 {
            return Err(ConfigError::Validation(
                "explosion.growth_per_ms must be > 0".into(),
            ));
        }
        if self.explosion.max_radius <= 0.0 {
            return Err(ConfigError::Validation(
                "explosion.max_radius must be > 0".into(),
            ));
        }

        if self.rules.grab_radius_factor <= 0.0 {
            return Err(ConfigError::Validation(
                "rules.grab_radius_factor must be > 0".into(),
            ));
        }

        Ok(())
    }
}
