//! Player projectiles and the cannon's fire gate

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Visual tag carried by a block (group colour or projectile colour)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlockTag {
    /// Blocks that spawned as part of a falling group
    #[default]
    Group,
    /// Blocks that arrived as projectiles
    Shot,
}

/// A single block fired upward by the cannon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    /// Top-left corner in pixels
    pub pos: Vec2,
    /// Vertical velocity in pixels/second (negative = up)
    pub vel_y: f32,
    /// Simulation time the shot was fired (for trail rendering)
    pub fired_at: Duration,
}

impl Projectile {
    pub fn new(id: u32, pos: Vec2, speed: f32, fired_at: Duration) -> Self {
        Self {
            id,
            pos,
            vel_y: -speed.abs(),
            fired_at,
        }
    }

    /// Move by velocity over `dt`
    pub fn advance(&mut self, dt: Duration) {
        self.pos.y += self.vel_y * dt.as_secs_f32();
    }

    /// True once the projectile has risen past `top_limit`
    pub fn is_off_screen(&self, top_limit: f32) -> bool {
        self.pos.y < top_limit
    }

    /// Time since the shot left the cannon
    pub fn trail_age(&self, now: Duration) -> Duration {
        now.saturating_sub(self.fired_at)
    }
}

/// Cannon heat gauge and shot cooldown
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FireGate {
    /// Current heat (0..=max)
    pub overheat: u32,
    /// Time of the last accepted shot
    pub last_fire: Option<Duration>,
}

impl FireGate {
    /// Whether a shot at `now` would be accepted
    pub fn can_fire(&self, now: Duration, cooldown: Duration, max: u32) -> bool {
        if self.overheat >= max {
            return false;
        }
        match self.last_fire {
            Some(last) => now.saturating_sub(last) >= cooldown,
            None => true,
        }
    }

    /// Record an accepted shot: heat grows superlinearly, clamped to `max`
    pub fn record_shot(&mut self, now: Duration, max: u32) {
        self.overheat = (20 + self.overheat.saturating_mul(2)).min(max);
        self.last_fire = Some(now);
    }

    /// Per-tick cooldown of the gauge
    pub fn decay(&mut self, amount: u32) {
        self.overheat = self.overheat.saturating_sub(amount);
    }

    /// Clearing a group vents the cannon
    pub fn vent(&mut self) {
        self.overheat = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COOLDOWN: Duration = Duration::from_millis(250);

    #[test]
    fn test_projectile_moves_up() {
        let mut p = Projectile::new(1, Vec2::new(0.0, 500.0), 480.0, Duration::ZERO);
        p.advance(Duration::from_millis(500));
        assert!((p.pos.y - 260.0).abs() < 0.001);
        assert!(!p.is_off_screen(-60.0));

        p.advance(Duration::from_secs(1));
        assert!(p.is_off_screen(-60.0));
    }

    #[test]
    fn test_overheat_escalates() {
        let mut gate = FireGate::default();
        gate.record_shot(Duration::ZERO, 220);
        assert_eq!(gate.overheat, 20);
        gate.record_shot(Duration::from_millis(300), 220);
        assert_eq!(gate.overheat, 60);
        gate.record_shot(Duration::from_millis(600), 220);
        assert_eq!(gate.overheat, 140);
        // 20 + 280 clamps to max
        gate.record_shot(Duration::from_millis(900), 220);
        assert_eq!(gate.overheat, 220);
    }

    #[test]
    fn test_fire_gate_refusals() {
        let mut gate = FireGate::default();
        assert!(gate.can_fire(Duration::ZERO, COOLDOWN, 220));
        gate.record_shot(Duration::ZERO, 220);

        // Inside the cooldown window
        assert!(!gate.can_fire(Duration::from_millis(249), COOLDOWN, 220));
        assert!(gate.can_fire(Duration::from_millis(250), COOLDOWN, 220));

        // Overheated
        gate.overheat = 220;
        assert!(!gate.can_fire(Duration::from_secs(10), COOLDOWN, 220));
        gate.decay(1);
        assert!(gate.can_fire(Duration::from_secs(10), COOLDOWN, 220));
    }

    #[test]
    fn test_decay_and_vent() {
        let mut gate = FireGate { overheat: 2, last_fire: None };
        gate.decay(1);
        gate.decay(1);
        gate.decay(1);
        assert_eq!(gate.overheat, 0);

        gate.overheat = 150;
        gate.vent();
        assert_eq!(gate.overheat, 0);
    }
}
