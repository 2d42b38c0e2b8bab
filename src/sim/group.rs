//! Falling block groups
//!
//! A group is a set of grid-aligned blocks that drops one whole cell at a
//! time. Projectiles merge into it; once its bounding box is fully
//! occupied it is cleared and plays a disappearance effect.

use std::time::Duration;

use glam::{IVec2, Vec2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::disappear::{DisappearEffect, DisappearState, DisappearVariant};
use super::projectile::BlockTag;
use super::shape::ShapePattern;
use crate::consts::{MOVE_INTERVAL_BASE_MS, MOVE_INTERVAL_MIN_MS};

/// A settled block owned by a group
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Top-left corner in pixels
    pub pos: Vec2,
    pub tag: BlockTag,
}

impl Block {
    pub fn new(pos: Vec2, tag: BlockTag) -> Self {
        Self { pos, tag }
    }
}

/// Axis-aligned bounds; `max` is the right/bottom edge, not the last corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }
}

/// Time between one-cell drops for a fall speed
pub fn move_interval_for(fall_speed: f32) -> Duration {
    let ms = if fall_speed > 0.0 {
        (MOVE_INTERVAL_BASE_MS / fall_speed) as u64
    } else {
        u64::MAX
    };
    Duration::from_millis(ms.max(MOVE_INTERVAL_MIN_MS))
}

/// A falling cluster of blocks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: u32,
    blocks: Vec<Block>,
    cell_size: f32,
    pub fall_speed: f32,
    pub move_interval: Duration,
    /// Time accumulated toward the next drop
    since_move: Duration,
    /// Recomputed whenever membership or position changes
    bounds: Option<Bounds>,
    pub disappear: DisappearState,
}

impl Group {
    pub fn new(id: u32, cell_size: f32, fall_speed: f32) -> Self {
        Self {
            id,
            blocks: Vec::new(),
            cell_size,
            fall_speed,
            move_interval: move_interval_for(fall_speed),
            since_move: Duration::ZERO,
            bounds: None,
            disappear: DisappearState::Idle,
        }
    }

    /// Build a group from a shape with its top-left cell at `top_left`
    pub fn from_pattern(
        id: u32,
        pattern: &ShapePattern,
        top_left: Vec2,
        cell_size: f32,
        fall_speed: f32,
    ) -> Self {
        let mut group = Self::new(id, cell_size, fall_speed);
        group.blocks = pattern
            .filled_cells()
            .map(|c| Block::new(top_left + c.as_vec2() * cell_size, BlockTag::Group))
            .collect();
        group.refresh_bounds();
        group
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Add a member block
    pub fn add_block(&mut self, block: Block) {
        self.blocks.push(block);
        self.refresh_bounds();
    }

    fn refresh_bounds(&mut self) {
        let size = Vec2::splat(self.cell_size);
        self.bounds = self.blocks.iter().fold(None, |acc, b| {
            let (lo, hi) = (b.pos, b.pos + size);
            Some(match acc {
                None => Bounds { min: lo, max: hi },
                Some(bb) => Bounds {
                    min: bb.min.min(lo),
                    max: bb.max.max(hi),
                },
            })
        });
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    /// Bottom edge (bounding box max Y)
    pub fn bottom_y(&self) -> Option<f32> {
        self.bounds.map(|b| b.max.y)
    }

    pub fn center(&self) -> Option<Vec2> {
        self.bounds.map(|b| b.center())
    }

    /// Accumulate `dt`; drop one cell per elapsed move interval.
    /// Returns the number of cells dropped.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        if !self.disappear.is_idle() {
            return 0;
        }
        self.since_move += dt;
        let mut steps = 0;
        while self.since_move >= self.move_interval {
            self.since_move -= self.move_interval;
            steps += 1;
        }
        if steps > 0 {
            let drop = steps as f32 * self.cell_size;
            for block in &mut self.blocks {
                block.pos.y += drop;
            }
            self.refresh_bounds();
        }
        steps
    }

    /// Generous hitbox: a projectile at `pos` touches the group if it is
    /// near any member from below, from the side, or just close overall.
    pub fn check_collision(&self, pos: Vec2) -> bool {
        let c = self.cell_size;
        self.blocks.iter().any(|block| {
            let dx = (block.pos.x - pos.x).abs();
            let dy = (block.pos.y - pos.y).abs();

            let from_below = dx < c * 0.5 && pos.y > block.pos.y && dy < c;
            let lateral = dy < c * 0.5 && dx < c;
            let close = dx < c * 0.9 && dy < c * 0.9;

            from_below || lateral || close
        })
    }

    /// Whether a member already sits on the cell with top-left `pos`
    pub fn is_occupied(&self, pos: Vec2) -> bool {
        let eps = self.cell_size * 1e-3;
        self.blocks
            .iter()
            .any(|b| (b.pos.x - pos.x).abs() < eps && (b.pos.y - pos.y).abs() < eps)
    }

    /// Member nearest to `pos` by Euclidean distance (first wins ties)
    pub fn closest_block(&self, pos: Vec2) -> Option<&Block> {
        self.blocks.iter().fold(None, |best: Option<&Block>, b| match best {
            Some(cur) if cur.pos.distance_squared(pos) <= b.pos.distance_squared(pos) => Some(cur),
            _ => Some(b),
        })
    }

    /// Cell of each block relative to the bounding box's top-left
    fn relative_cells(&self, bounds: &Bounds) -> impl Iterator<Item = IVec2> + '_ {
        let min = bounds.min;
        let c = self.cell_size;
        self.blocks.iter().map(move |b| {
            let rel = (b.pos - min) / c;
            IVec2::new(rel.x.round() as i32, rel.y.round() as i32)
        })
    }

    /// Occupancy of the bounding box as (cols, rows, row-major cells)
    pub fn occupancy(&self) -> Option<(usize, usize, Vec<bool>)> {
        let bounds = self.bounds?;
        let dims = bounds.size() / self.cell_size;
        let cols = dims.x.round() as usize;
        let rows = dims.y.round() as usize;
        let mut cells = vec![false; cols * rows];
        for cell in self.relative_cells(&bounds) {
            if cell.x >= 0 && cell.y >= 0 && (cell.x as usize) < cols && (cell.y as usize) < rows {
                cells[cell.y as usize * cols + cell.x as usize] = true;
            }
        }
        Some((cols, rows, cells))
    }

    /// True iff every cell inside the bounding box is occupied.
    /// Duplicate blocks on one cell count once.
    pub fn is_complete_rectangle(&self) -> bool {
        match self.occupancy() {
            Some((_, _, cells)) => cells.iter().all(|&c| c),
            None => false,
        }
    }

    /// Two blocks one cell apart horizontally or vertically
    pub fn are_adjacent(&self, a: &Block, b: &Block) -> bool {
        let eps = self.cell_size * 1e-3;
        let dx = (a.pos.x - b.pos.x).abs();
        let dy = (a.pos.y - b.pos.y).abs();
        ((dx - self.cell_size).abs() < eps && dy < eps)
            || (dx < eps && (dy - self.cell_size).abs() < eps)
    }

    /// Index pairs of adjacent members (for connection lines)
    pub fn adjacent_pairs(&self) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for i in 0..self.blocks.len() {
            for j in i + 1..self.blocks.len() {
                if self.are_adjacent(&self.blocks[i], &self.blocks[j]) {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }

    /// Begin a random disappearance effect; no-op if already started
    pub fn start_disappear(
        &mut self,
        now: Duration,
        duration: Duration,
        rng: &mut impl Rng,
    ) -> Option<DisappearVariant> {
        if !self.disappear.is_idle() {
            return None;
        }
        let variant = DisappearVariant::random(rng);
        let center = self.center().unwrap_or(Vec2::ZERO);
        let positions: Vec<Vec2> = self.blocks.iter().map(|b| b.pos).collect();
        self.disappear = DisappearState::Active(DisappearEffect::start(
            variant, &positions, center, now, duration, rng,
        ));
        Some(variant)
    }

    /// Advance the effect; on completion clears all blocks and returns true
    pub fn update_disappear_effect(&mut self, now: Duration) -> bool {
        let DisappearState::Active(effect) = &mut self.disappear else {
            return false;
        };
        if effect.update(now) {
            self.blocks.clear();
            self.bounds = None;
            self.disappear = DisappearState::Removed;
            return true;
        }
        false
    }
}
