//! Game settings: playfield geometry and tuning
//!
//! Persisted as JSON. Every field has a default so partial files load.

use std::path::Path;
use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::GridMapper;

/// Errors from loading or saving settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("settings file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Playfield and gameplay tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Playfield ===
    /// Side of one grid cell in pixels
    pub cell_size: u32,
    /// Playfield width in cells
    pub grid_width: i32,
    /// Playfield height in cells (the floor threshold sits at the bottom)
    pub grid_height: i32,
    /// Pixel offset of grid cell (0, 0)
    pub origin_x: f32,
    pub origin_y: f32,
    /// Rows between the floor threshold and the cannon mouth
    pub cannon_gap_rows: i32,
    /// Grid row new groups appear on
    pub spawn_row: i32,

    // === Cannon ===
    /// Upward projectile speed (pixels/second)
    pub projectile_speed: f32,
    pub fire_cooldown_ms: u64,
    pub overheat_max: u32,
    /// Overheat decrement per tick
    pub overheat_decay: u32,

    // === Difficulty ===
    pub spawn_delay_initial_ms: u64,
    pub spawn_delay_step_ms: u64,
    pub spawn_delay_floor_ms: u64,

    // === Scoring ===
    pub points_per_block: u64,
    pub level_threshold: u64,

    // === Effects ===
    pub disappear_duration_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cell_size: CELL_SIZE,
            grid_width: GRID_WIDTH,
            grid_height: GRID_HEIGHT,
            origin_x: GRID_ORIGIN_X,
            origin_y: GRID_ORIGIN_Y,
            cannon_gap_rows: CANNON_GAP_ROWS,
            spawn_row: SPAWN_ROW,

            projectile_speed: PROJECTILE_SPEED,
            fire_cooldown_ms: FIRE_COOLDOWN_MS,
            overheat_max: OVERHEAT_MAX,
            overheat_decay: OVERHEAT_DECAY,

            spawn_delay_initial_ms: SPAWN_DELAY_INITIAL_MS,
            spawn_delay_step_ms: SPAWN_DELAY_STEP_MS,
            spawn_delay_floor_ms: SPAWN_DELAY_FLOOR_MS,

            points_per_block: POINTS_PER_BLOCK,
            level_threshold: LEVEL_THRESHOLD,

            disappear_duration_ms: DISAPPEAR_DURATION_MS,
        }
    }
}

impl Settings {
    /// Coordinate mapper for this playfield
    pub fn grid(&self) -> GridMapper {
        GridMapper::new(self.cell_size as f32, Vec2::new(self.origin_x, self.origin_y))
    }

    /// Cell size in pixels as f32
    #[inline]
    pub fn cell(&self) -> f32 {
        self.cell_size as f32
    }

    /// Pixel y a group's bottom edge must not reach
    pub fn floor_y(&self) -> f32 {
        self.grid().grid_to_pixel_y(self.grid_height)
    }

    /// Pixel y of the cannon's top edge
    pub fn cannon_y(&self) -> f32 {
        self.floor_y() + self.cannon_gap_rows as f32 * self.cell()
    }

    /// Pixel y where a fired projectile appears (one cell above the cannon)
    pub fn projectile_spawn_y(&self) -> f32 {
        self.cannon_y() - self.cell()
    }

    /// Projectiles above this y have left the playfield: the top edge of
    /// the highest row a group can occupy (never below row -1)
    pub fn top_limit(&self) -> f32 {
        self.grid().grid_to_pixel_y(self.spawn_row.min(-1))
    }

    pub fn fire_cooldown(&self) -> Duration {
        Duration::from_millis(self.fire_cooldown_ms)
    }

    pub fn disappear_duration(&self) -> Duration {
        Duration::from_millis(self.disappear_duration_ms)
    }

    /// Reject settings the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.cell_size == 0 {
            return Err(SettingsError::Invalid("cell_size must be positive".into()));
        }
        if self.grid_width < 2 {
            return Err(SettingsError::Invalid(format!(
                "grid_width must be at least 2 (got {})",
                self.grid_width
            )));
        }
        if self.grid_height < 1 {
            return Err(SettingsError::Invalid(format!(
                "grid_height must be positive (got {})",
                self.grid_height
            )));
        }
        if self.level_threshold == 0 {
            return Err(SettingsError::Invalid("level_threshold must be positive".into()));
        }
        if self.projectile_speed <= 0.0 {
            return Err(SettingsError::Invalid("projectile_speed must be positive".into()));
        }
        if self.spawn_delay_floor_ms > self.spawn_delay_initial_ms {
            return Err(SettingsError::Invalid(
                "spawn_delay_floor_ms exceeds spawn_delay_initial_ms".into(),
            ));
        }
        Ok(())
    }

    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{} ({}), using default settings", e, path.as_ref().display());
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "cell_size": 40, "grid_width": 10 }"#).unwrap();
        assert_eq!(settings.cell_size, 40);
        assert_eq!(settings.grid_width, 10);
        assert_eq!(settings.overheat_max, OVERHEAT_MAX);
        assert_eq!(settings.level_threshold, LEVEL_THRESHOLD);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        assert!(matches!(
            Settings::from_json(r#"{ "cell_size": 0 }"#),
            Err(SettingsError::Invalid(_))
        ));
        assert!(matches!(
            Settings::from_json(r#"{ "grid_width": 1 }"#),
            Err(SettingsError::Invalid(_))
        ));
        assert!(matches!(Settings::from_json("not json"), Err(SettingsError::Parse(_))));
    }

    #[test]
    fn test_derived_geometry() {
        let settings = Settings::default();
        // 50 + 24 * 60
        assert_eq!(settings.floor_y(), 1490.0);
        assert_eq!(settings.cannon_y(), 1610.0);
        assert_eq!(settings.projectile_spawn_y(), 1550.0);
        assert!(settings.projectile_spawn_y() > settings.floor_y());
        // Top edge of the spawn row: 50 - 2 * 60
        assert_eq!(settings.top_limit(), -70.0);
    }

    #[test]
    fn test_top_limit_follows_grid_origin() {
        let shifted = Settings {
            origin_y: -300.0,
            ..Settings::default()
        };
        // Groups spawn at -420; shots must live long enough to reach them
        assert_eq!(shifted.top_limit(), -420.0);
        assert_eq!(shifted.top_limit(), shifted.grid().grid_to_pixel_y(shifted.spawn_row));

        let low_spawn = Settings {
            spawn_row: 0,
            ..Settings::default()
        };
        assert_eq!(low_spawn.top_limit(), low_spawn.grid().grid_to_pixel_y(-1));
    }

    #[test]
    fn test_json_roundtrip_file() {
        let path = std::env::temp_dir().join(format!("pulse_blocks_settings_{}.json", std::process::id()));
        let mut settings = Settings::default();
        settings.grid_width = 12;
        settings.save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded, settings);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let settings = Settings::load_or_default("/nonexistent/pulse_blocks.json");
        assert_eq!(settings, Settings::default());
    }
}
