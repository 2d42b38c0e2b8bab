//! Pulse Blocks - A falling-block cannon arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (groups, projectiles, merging, scoring)
//! - `snapshot`: Read-only view of the simulation for presentation
//! - `renderer`: Text frame renderer consuming snapshots
//! - `settings`: Playfield geometry and game tuning
//! - `highscores`: Top-10 leaderboard

pub mod highscores;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod snapshot;

pub use highscores::HighScores;
pub use settings::Settings;
pub use snapshot::GameSnapshot;

use std::time::Duration;

/// Game configuration constants
pub mod consts {
    use std::time::Duration;

    /// Fixed simulation timestep (~60 Hz)
    pub const SIM_DT: Duration = Duration::from_nanos(16_666_667);
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield defaults
    pub const CELL_SIZE: u32 = 60;
    pub const GRID_WIDTH: i32 = 17;
    pub const GRID_HEIGHT: i32 = 24;
    pub const GRID_ORIGIN_X: f32 = 0.0;
    pub const GRID_ORIGIN_Y: f32 = 50.0;
    /// Rows between the floor threshold and the cannon mouth
    pub const CANNON_GAP_ROWS: i32 = 2;
    /// Grid row new groups appear on (negative = above the visible field)
    pub const SPAWN_ROW: i32 = -2;

    /// Projectile speed in pixels/second (8 px per 60 Hz frame)
    pub const PROJECTILE_SPEED: f32 = 480.0;
    /// Minimum time between two shots
    pub const FIRE_COOLDOWN_MS: u64 = 250;
    /// Fire is refused at or above this overheat value
    pub const OVERHEAT_MAX: u32 = 220;
    /// Overheat decrement per tick
    pub const OVERHEAT_DECAY: u32 = 1;

    /// Spawn cadence
    pub const SPAWN_DELAY_INITIAL_MS: u64 = 12_000;
    pub const SPAWN_DELAY_STEP_MS: u64 = 50;
    pub const SPAWN_DELAY_FLOOR_MS: u64 = 1_000;

    /// Scoring
    pub const POINTS_PER_BLOCK: u64 = 10;
    pub const LEVEL_THRESHOLD: u64 = 500;

    /// Group fall cadence (move interval = max(MIN, BASE / fall_speed))
    pub const MOVE_INTERVAL_BASE_MS: f32 = 800.0;
    pub const MOVE_INTERVAL_MIN_MS: u64 = 200;
    pub const FALL_SPEED_BASE: f32 = 0.6;
    pub const FALL_SPEED_PER_LEVEL: f32 = 0.4;

    /// Length of the group disappearance animation
    pub const DISAPPEAR_DURATION_MS: u64 = 1_000;
}

/// Milliseconds in a duration as f32 (for progress ratios)
#[inline]
pub fn duration_ms(d: Duration) -> f32 {
    d.as_secs_f32() * 1000.0
}
