//! Grid/pixel coordinate mapping
//!
//! Grid cell (col, row) has its top-left corner at
//! `origin + (col, row) * cell_size`. Settled blocks always sit on these
//! corners; projectiles move continuously between them.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

/// Converts between pixel space and discrete grid cells
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridMapper {
    /// Side of one cell in pixels
    pub cell_size: f32,
    /// Pixel position of cell (0, 0)
    pub origin: Vec2,
}

impl GridMapper {
    pub fn new(cell_size: f32, origin: Vec2) -> Self {
        debug_assert!(cell_size > 0.0, "cell size must be positive");
        Self { cell_size, origin }
    }

    #[inline]
    pub fn grid_to_pixel_x(&self, col: i32) -> f32 {
        self.origin.x + col as f32 * self.cell_size
    }

    #[inline]
    pub fn grid_to_pixel_y(&self, row: i32) -> f32 {
        self.origin.y + row as f32 * self.cell_size
    }

    /// Top-left pixel corner of a cell
    #[inline]
    pub fn grid_to_pixel(&self, cell: IVec2) -> Vec2 {
        Vec2::new(self.grid_to_pixel_x(cell.x), self.grid_to_pixel_y(cell.y))
    }

    /// Column containing pixel x
    #[inline]
    pub fn pixel_to_grid_x(&self, x: f32) -> i32 {
        ((x - self.origin.x) / self.cell_size).floor() as i32
    }

    /// Row containing pixel y
    #[inline]
    pub fn pixel_to_grid_y(&self, y: f32) -> i32 {
        ((y - self.origin.y) / self.cell_size).floor() as i32
    }

    /// Cell containing a pixel position
    #[inline]
    pub fn pixel_to_grid(&self, pos: Vec2) -> IVec2 {
        IVec2::new(self.pixel_to_grid_x(pos.x), self.pixel_to_grid_y(pos.y))
    }

    /// Cell whose corner is nearest to a pixel position
    pub fn nearest_cell(&self, pos: Vec2) -> IVec2 {
        let rel = (pos - self.origin) / self.cell_size;
        IVec2::new(rel.x.round() as i32, rel.y.round() as i32)
    }

    /// Round a pixel position onto the nearest cell corner
    pub fn snap(&self, pos: Vec2) -> Vec2 {
        self.grid_to_pixel(self.nearest_cell(pos))
    }
}
