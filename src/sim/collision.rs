//! Projectile-to-group collision resolution
//!
//! Hit testing lives on `Group`; this module picks which group is hit and
//! where the projectile settles once it merges.

use glam::Vec2;

use super::grid::GridMapper;
use super::group::Group;

/// How a snapped position was derived
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapAxis {
    /// Same column as the nearest block, one cell above or below
    Vertical,
    /// Same row as the nearest block, one cell left or right
    Horizontal,
    /// No nearest block; rounded to the nearest grid cell
    Grid,
}

/// Where a colliding projectile settles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snap {
    pub pos: Vec2,
    pub axis: SnapAxis,
}

/// Index of the first group (spawn order) the projectile touches
pub fn first_hit(groups: &[Group], pos: Vec2) -> Option<usize> {
    groups.iter().position(|g| g.check_collision(pos))
}

/// Snap a projectile at `pos` next to the nearest member of `group`.
///
/// The dominant axis of the offset from that member decides the side:
/// mostly vertical settles above/below in its column, otherwise left/right
/// in its row. A projectile sitting exactly on a member rose into it and
/// settles below. The result is never an occupied cell: if the chosen
/// cell is taken, the projectile backs out along the side it came from
/// (down its column, or further along its row) to the first free cell.
pub fn resolve_snap(group: &Group, pos: Vec2, grid: &GridMapper) -> Snap {
    let Some(closest) = group.closest_block(pos) else {
        log::error!("group {} has no blocks to snap against", group.id);
        debug_assert!(false, "snap against empty group {}", group.id);
        return Snap {
            pos: grid.snap(pos),
            axis: SnapAxis::Grid,
        };
    };

    let c = group.cell_size();
    let d = pos - closest.pos;

    let (axis, step) = if d.y.abs() > d.x.abs() || d == Vec2::ZERO {
        let dy = if d.y < 0.0 { -c } else { c };
        (SnapAxis::Vertical, Vec2::new(0.0, dy))
    } else {
        let dx = if d.x < 0.0 { -c } else { c };
        (SnapAxis::Horizontal, Vec2::new(dx, 0.0))
    };

    let mut target = closest.pos + step;
    if group.is_occupied(target) {
        // Projectiles rise, so inside a column they came from below
        let back = match axis {
            SnapAxis::Vertical => Vec2::new(0.0, c),
            _ => step,
        };
        target = closest.pos + back;
        while group.is_occupied(target) {
            target += back;
        }
        log::debug!(
            "snap target taken in group {}, backed out to {:?}",
            group.id,
            target
        );
    }

    Snap { pos: target, axis }
}
