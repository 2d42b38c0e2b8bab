//! Group disappearance animation
//!
//! A cleared group runs one of three effects for a fixed duration. The
//! per-block motion lives in a visual overlay indexed like the group's
//! block list; simulation positions are never touched.

use std::time::Duration;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Which effect a cleared group plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisappearVariant {
    /// Blocks fly outward from the group centre, spinning and fading
    Exploding,
    /// Blocks accelerate toward the centre while shrinking
    Imploding,
    /// Blocks drift upward, grow slightly and fade out
    Fading,
}

impl DisappearVariant {
    pub const ALL: [DisappearVariant; 3] = [
        DisappearVariant::Exploding,
        DisappearVariant::Imploding,
        DisappearVariant::Fading,
    ];

    /// Uniform random pick
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DisappearVariant::Exploding => "explode",
            DisappearVariant::Imploding => "implode",
            DisappearVariant::Fading => "fade",
        }
    }
}

/// Transient render transform of one block during the effect
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockVisual {
    /// Displacement from the block's settled position (pixels)
    pub offset: Vec2,
    /// Per-tick velocity picked at start
    pub vel: Vec2,
    /// Rotation in degrees
    pub angle: f32,
    pub scale: f32,
    pub alpha: f32,
}

impl BlockVisual {
    fn new(vel: Vec2, angle: f32) -> Self {
        Self {
            offset: Vec2::ZERO,
            vel,
            angle,
            scale: 1.0,
            alpha: 1.0,
        }
    }
}

/// Running disappearance effect
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisappearEffect {
    pub variant: DisappearVariant,
    pub started_at: Duration,
    pub duration: Duration,
    /// elapsed / duration, clamped to 1
    pub progress: f32,
    /// Group centre when the effect began
    pub center: Vec2,
    /// One entry per group block, same order
    pub visuals: Vec<BlockVisual>,
}

impl DisappearEffect {
    /// Set up per-block kinematics for `variant`
    pub fn start(
        variant: DisappearVariant,
        blocks: &[Vec2],
        center: Vec2,
        now: Duration,
        duration: Duration,
        rng: &mut impl Rng,
    ) -> Self {
        let visuals = blocks
            .iter()
            .map(|&pos| {
                let angle = rng.random::<f32>() * 360.0;
                let vel = match variant {
                    DisappearVariant::Exploding => {
                        let speed = 5.0 + rng.random::<f32>() * 3.0;
                        radial_dir(pos - center) * speed
                    }
                    DisappearVariant::Imploding => {
                        let speed = 4.0 + rng.random::<f32>() * 2.0;
                        radial_dir(center - pos) * speed
                    }
                    DisappearVariant::Fading => Vec2::new(
                        (rng.random::<f32>() - 0.5) * 2.0,
                        rng.random::<f32>() * 2.0,
                    ),
                };
                BlockVisual::new(vel, angle)
            })
            .collect();

        Self {
            variant,
            started_at: now,
            duration,
            progress: 0.0,
            center,
            visuals,
        }
    }

    /// Advance to `now`; returns true once the effect has finished
    pub fn update(&mut self, now: Duration) -> bool {
        let elapsed = now.saturating_sub(self.started_at);
        self.progress = if self.duration.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0) as f32
        };
        let p = self.progress;

        for v in &mut self.visuals {
            match self.variant {
                DisappearVariant::Exploding => {
                    v.offset += v.vel * p;
                    v.angle += p * 360.0;
                    v.alpha = 1.0 - p;
                }
                DisappearVariant::Imploding => {
                    // Accelerates toward the centre as progress grows
                    v.offset += v.vel * (p * 2.0);
                    v.angle += p * 720.0;
                    v.scale = 1.0 - p;
                    v.alpha = 1.0 - p;
                }
                DisappearVariant::Fading => {
                    v.offset.x += v.vel.x * p;
                    v.offset.y -= v.vel.y * p * 2.0;
                    v.angle += p * 180.0;
                    v.alpha = 1.0 - p * p;
                    v.scale = 1.0 + p * 0.2;
                }
            }
        }

        elapsed >= self.duration
    }
}

/// Unit direction, with zero distance treated as length 1 (no motion)
fn radial_dir(delta: Vec2) -> Vec2 {
    let dist = delta.length();
    if dist == 0.0 { delta } else { delta / dist }
}

/// Lifecycle of a group's disappearance
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum DisappearState {
    /// Still in play
    #[default]
    Idle,
    /// Cleared, animating
    Active(DisappearEffect),
    /// Animation finished; the group must not be reused
    Removed,
}

impl DisappearState {
    pub fn is_idle(&self) -> bool {
        matches!(self, DisappearState::Idle)
    }

    pub fn effect(&self) -> Option<&DisappearEffect> {
        match self {
            DisappearState::Active(effect) => Some(effect),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn square() -> Vec<Vec2> {
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(60.0, 0.0),
            Vec2::new(0.0, 60.0),
            Vec2::new(60.0, 60.0),
        ]
    }

    fn start(variant: DisappearVariant) -> DisappearEffect {
        let mut rng = Pcg32::seed_from_u64(3);
        DisappearEffect::start(
            variant,
            &square(),
            Vec2::new(30.0, 30.0),
            Duration::from_millis(500),
            Duration::from_millis(1000),
            &mut rng,
        )
    }

    #[test]
    fn test_explosion_moves_outward() {
        let mut effect = start(DisappearVariant::Exploding);
        for v in &effect.visuals {
            let speed = v.vel.length();
            assert!((5.0..=8.0).contains(&speed), "speed {speed}");
        }
        assert!(!effect.update(Duration::from_millis(1000)));
        // Top-left block flies up and to the left
        assert!(effect.visuals[0].offset.x < 0.0 && effect.visuals[0].offset.y < 0.0);
        assert!((effect.visuals[0].alpha - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_implosion_moves_inward_and_shrinks() {
        let mut effect = start(DisappearVariant::Imploding);
        for v in &effect.visuals {
            let speed = v.vel.length();
            assert!((4.0..=6.0).contains(&speed), "speed {speed}");
        }
        effect.update(Duration::from_millis(750));
        let bottom_right = effect.visuals[3];
        assert!(bottom_right.offset.x < 0.0 && bottom_right.offset.y < 0.0);
        assert!((bottom_right.scale - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_fade_drifts_up_and_grows() {
        let mut effect = start(DisappearVariant::Fading);
        effect.update(Duration::from_millis(1000));
        for v in &effect.visuals {
            assert!(v.offset.y <= 0.0);
            assert!((v.alpha - 0.75).abs() < 1e-6);
            assert!((v.scale - 1.1).abs() < 1e-6);
        }
    }

    #[test]
    fn test_completes_after_duration() {
        let mut effect = start(DisappearVariant::Exploding);
        assert!(!effect.update(Duration::from_millis(1499)));
        assert!(effect.update(Duration::from_millis(1500)));
        assert_eq!(effect.progress, 1.0);
    }

    #[test]
    fn test_block_at_center_does_not_move() {
        let mut rng = Pcg32::seed_from_u64(9);
        let effect = DisappearEffect::start(
            DisappearVariant::Exploding,
            &[Vec2::ZERO],
            Vec2::ZERO,
            Duration::ZERO,
            Duration::from_secs(1),
            &mut rng,
        );
        assert_eq!(effect.visuals[0].vel, Vec2::ZERO);
    }
}
