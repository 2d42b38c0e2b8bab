//! Scoring and difficulty policy

use std::time::Duration;

use crate::consts::{FALL_SPEED_BASE, FALL_SPEED_PER_LEVEL};
use crate::settings::Settings;

/// Points for clearing a group of `blocks` members
pub fn points_for(blocks: usize, settings: &Settings) -> u64 {
    blocks as u64 * settings.points_per_block
}

/// Level reached at `score` (starts at 1)
pub fn level_for(score: u64, settings: &Settings) -> u32 {
    (score / settings.level_threshold) as u32 + 1
}

/// Side length (cells) of shapes spawned at `level`
pub fn shape_size(level: u32) -> usize {
    level as usize + 1
}

/// Group fall speed at `level`
pub fn fall_speed(level: u32) -> f32 {
    FALL_SPEED_BASE + level.saturating_sub(1) as f32 * FALL_SPEED_PER_LEVEL
}

/// Spawn delay after one more spawn: shrinks by a step, never below the floor
pub fn next_spawn_delay(current: Duration, settings: &Settings) -> Duration {
    let floor = Duration::from_millis(settings.spawn_delay_floor_ms);
    let step = Duration::from_millis(settings.spawn_delay_step_ms);
    if current > floor {
        current.saturating_sub(step).max(floor)
    } else {
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_and_levels() {
        let settings = Settings::default();
        assert_eq!(points_for(4, &settings), 40);
        assert_eq!(level_for(0, &settings), 1);
        assert_eq!(level_for(499, &settings), 1);
        assert_eq!(level_for(500, &settings), 2);
        assert_eq!(level_for(1730, &settings), 4);
    }

    #[test]
    fn test_difficulty_ramp() {
        assert_eq!(shape_size(1), 2);
        assert_eq!(shape_size(3), 4);
        assert!((fall_speed(1) - 0.6).abs() < 1e-6);
        assert!((fall_speed(3) - 1.4).abs() < 1e-6);
    }

    #[test]
    fn test_spawn_delay_clamps_at_floor() {
        let settings = Settings::default();
        let mut delay = Duration::from_millis(settings.spawn_delay_initial_ms);
        delay = next_spawn_delay(delay, &settings);
        assert_eq!(delay, Duration::from_millis(11_950));

        for _ in 0..1000 {
            delay = next_spawn_delay(delay, &settings);
        }
        assert_eq!(delay, Duration::from_millis(1_000));

        let odd = next_spawn_delay(Duration::from_millis(1_020), &settings);
        assert_eq!(odd, Duration::from_millis(1_000));
    }
}
