//! Read-only view of the simulation for presentation
//!
//! A snapshot is owned data copied out of `GameState` once per frame, so
//! renderers never hold a borrow on the live simulation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::duration_ms;
use crate::sim::{BlockTag, DisappearVariant, GamePhase, GameState, Group};

/// One block as it should be drawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockView {
    /// Top-left corner in pixels, effect offset applied
    pub pos: Vec2,
    /// Degrees
    pub rotation: f32,
    pub scale: f32,
    pub alpha: f32,
    pub tag: BlockTag,
}

impl BlockView {
    fn settled(pos: Vec2, tag: BlockTag) -> Self {
        Self {
            pos,
            rotation: 0.0,
            scale: 1.0,
            alpha: 1.0,
            tag,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileView {
    pub id: u32,
    pub pos: Vec2,
    /// Time since the shot was fired (drives the trail fade)
    pub trail_age_ms: f32,
}

/// An active, collidable group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupView {
    pub id: u32,
    pub center: Vec2,
    pub blocks: Vec<BlockView>,
    /// Index pairs into `blocks` for connection lines
    pub links: Vec<(usize, usize)>,
}

/// A cleared group playing its disappearance effect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VanishingView {
    pub id: u32,
    pub variant: DisappearVariant,
    pub progress: f32,
    pub blocks: Vec<BlockView>,
}

/// Everything a frame needs to draw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub score: u64,
    pub level: u32,
    pub overheat: u32,
    pub overheat_max: u32,
    pub cannon_col: i32,
    pub running: bool,
    pub paused: bool,
    pub projectiles: Vec<ProjectileView>,
    pub groups: Vec<GroupView>,
    pub vanishing: Vec<VanishingView>,
}

impl GameSnapshot {
    pub fn capture(state: &GameState) -> Self {
        Self {
            score: state.score,
            level: state.level,
            overheat: state.overheat(),
            overheat_max: state.settings.overheat_max,
            cannon_col: state.cannon_col,
            running: state.running(),
            paused: state.phase == GamePhase::Paused,
            projectiles: state
                .projectiles
                .iter()
                .map(|p| ProjectileView {
                    id: p.id,
                    pos: p.pos,
                    trail_age_ms: duration_ms(p.trail_age(state.clock)),
                })
                .collect(),
            groups: state.groups.iter().map(group_view).collect(),
            vanishing: state.vanishing.iter().filter_map(vanishing_view).collect(),
        }
    }

    /// Overheat as a 0..=1 gauge fill
    pub fn heat_ratio(&self) -> f32 {
        if self.overheat_max == 0 {
            return 0.0;
        }
        (self.overheat as f32 / self.overheat_max as f32).min(1.0)
    }
}

fn group_view(group: &Group) -> GroupView {
    GroupView {
        id: group.id,
        center: group.center().unwrap_or_default(),
        blocks: group
            .blocks()
            .iter()
            .map(|b| BlockView::settled(b.pos, b.tag))
            .collect(),
        links: group.adjacent_pairs(),
    }
}

fn vanishing_view(group: &Group) -> Option<VanishingView> {
    let effect = group.disappear.effect()?;
    let blocks = group
        .blocks()
        .iter()
        .zip(&effect.visuals)
        .map(|(b, v)| BlockView {
            pos: b.pos + v.offset,
            rotation: v.angle,
            scale: v.scale,
            alpha: v.alpha,
            tag: b.tag,
        })
        .collect();
    Some(VanishingView {
        id: group.id,
        variant: effect.variant,
        progress: effect.progress,
        blocks,
    })
}
