//! Game state and core simulation types
//!
//! All session state lives here and is passed explicitly to `tick`, so a
//! session can be replayed from its seed and inputs.

use std::time::Duration;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::disappear::DisappearVariant;
use super::group::Group;
use super::projectile::{FireGate, Projectile};
use super::scoring;
use crate::settings::Settings;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Gameplay frozen
    Paused,
    /// A group reached the floor; only vanishing effects still animate
    GameOver,
}

/// Cannon movement command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CannonMove {
    Left,
    Right,
}

impl CannonMove {
    pub fn delta(self) -> i32 {
        match self {
            CannonMove::Left => -1,
            CannonMove::Right => 1,
        }
    }
}

/// Things that happened during a tick, drained by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Fired { projectile_id: u32, col: i32 },
    /// Projectile left the top of the playfield
    Missed { projectile_id: u32 },
    Merged { projectile_id: u32, group_id: u32, pos: Vec2 },
    GroupSpawned { group_id: u32, col: i32, blocks: usize },
    GroupCleared {
        group_id: u32,
        blocks: usize,
        points: u64,
        center: Vec2,
        variant: DisappearVariant,
    },
    LevelUp { level: u32 },
    /// Disappearance finished and the group was purged
    GroupVanished { group_id: u32 },
    GameOver { final_score: u64 },
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Seeded RNG, advanced by spawns and effects
    pub(crate) rng: Pcg32,
    pub settings: Settings,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Simulated time since the session started
    pub clock: Duration,
    pub phase: GamePhase,
    /// Score (never decreases)
    pub score: u64,
    /// score / threshold + 1
    pub level: u32,
    /// Current time required between spawns
    pub spawn_delay: Duration,
    /// Time of the most recent spawn (None = spawn on the first tick)
    pub last_spawn: Option<Duration>,
    /// Overheat gauge and cooldown
    pub gate: FireGate,
    /// Cannon column, within [0, grid_width)
    pub cannon_col: i32,
    /// Live projectiles in firing order
    pub projectiles: Vec<Projectile>,
    /// Active (collidable) groups in spawn order
    pub groups: Vec<Group>,
    /// Cleared groups still playing their disappearance effect
    pub vanishing: Vec<Group>,
    /// Events since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new session with the given seed
    pub fn new(seed: u64, settings: Settings) -> Self {
        let spawn_delay = Duration::from_millis(settings.spawn_delay_initial_ms);
        let cannon_col = settings.grid_width / 2;
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            settings,
            time_ticks: 0,
            clock: Duration::ZERO,
            phase: GamePhase::Playing,
            score: 0,
            level: 1,
            spawn_delay,
            last_spawn: None,
            gate: FireGate::default(),
            cannon_col,
            projectiles: Vec::new(),
            groups: Vec::new(),
            vanishing: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// False once the game is over
    pub fn running(&self) -> bool {
        self.phase != GamePhase::GameOver
    }

    pub fn overheat(&self) -> u32 {
        self.gate.overheat
    }

    /// Take all events accumulated since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Shift the cannon one column; rejected at the playfield edges
    pub fn move_cannon(&mut self, dir: CannonMove) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        let col = self.cannon_col + dir.delta();
        if col < 0 || col >= self.settings.grid_width {
            return false;
        }
        self.cannon_col = col;
        true
    }

    /// Fire a projectile from the cannon. Silently refused while
    /// overheated, inside the cooldown window, or when not playing.
    pub fn fire(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        let cooldown = self.settings.fire_cooldown();
        let max = self.settings.overheat_max;
        if !self.gate.can_fire(self.clock, cooldown, max) {
            return false;
        }

        let id = self.next_entity_id();
        let pos = Vec2::new(
            self.settings.grid().grid_to_pixel_x(self.cannon_col),
            self.settings.projectile_spawn_y(),
        );
        self.projectiles
            .push(Projectile::new(id, pos, self.settings.projectile_speed, self.clock));
        self.gate.record_shot(self.clock, max);
        log::debug!(
            "Fired projectile {} from column {} (overheat {})",
            id,
            self.cannon_col,
            self.gate.overheat
        );
        self.events.push(GameEvent::Fired {
            projectile_id: id,
            col: self.cannon_col,
        });
        true
    }

    /// Add points for a cleared group; returns true on level-up
    pub(crate) fn award(&mut self, points: u64) -> bool {
        self.score += points;
        let level = scoring::level_for(self.score, &self.settings);
        let leveled = level > self.level;
        self.level = level;
        leveled
    }

    /// Ensure collections are in creation order for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.projectiles.sort_by_key(|p| p.id);
        self.groups.sort_by_key(|g| g.id);
        self.vanishing.sort_by_key(|g| g.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session() {
        let state = GameState::new(1, Settings::default());
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.cannon_col, 8);
        assert!(state.running());
        assert_eq!(state.spawn_delay, Duration::from_millis(12_000));
    }

    #[test]
    fn test_cannon_bounds() {
        let settings = Settings {
            grid_width: 3,
            ..Settings::default()
        };
        let mut state = GameState::new(1, settings);
        assert_eq!(state.cannon_col, 1);
        assert!(state.move_cannon(CannonMove::Left));
        assert!(!state.move_cannon(CannonMove::Left));
        assert_eq!(state.cannon_col, 0);
        assert!(state.move_cannon(CannonMove::Right));
        assert!(state.move_cannon(CannonMove::Right));
        assert!(!state.move_cannon(CannonMove::Right));
        assert_eq!(state.cannon_col, 2);
    }

    #[test]
    fn test_fire_spawns_above_cannon() {
        let mut state = GameState::new(1, Settings::default());
        assert!(state.fire());
        let p = state.projectiles[0].clone();
        assert_eq!(p.pos, Vec2::new(8.0 * 60.0, state.settings.projectile_spawn_y()));
        assert!(p.vel_y < 0.0);
        assert_eq!(state.overheat(), 20);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::Fired {
                projectile_id: p.id,
                col: 8
            }]
        );
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_fire_refused_in_cooldown_and_overheat() {
        let mut state = GameState::new(1, Settings::default());
        assert!(state.fire());
        // Same instant: cooldown
        assert!(!state.fire());
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.overheat(), 20);

        state.clock = Duration::from_millis(250);
        assert!(state.fire());
        assert_eq!(state.overheat(), 60);

        state.gate.overheat = 220;
        state.clock = Duration::from_secs(5);
        assert!(!state.fire());
        assert_eq!(state.projectiles.len(), 2);
    }

    #[test]
    fn test_award_levels() {
        let mut state = GameState::new(1, Settings::default());
        assert!(!state.award(490));
        assert_eq!(state.level, 1);
        assert!(state.award(10));
        assert_eq!(state.level, 2);
        assert_eq!(state.score, 500);
    }
}
