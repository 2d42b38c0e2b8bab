//! Idle/demo player
//!
//! Picks the lowest active group and fills its shortest column, one shot
//! at a time, keeping the cannon below half heat.

use super::state::{CannonMove, GameState};
use super::tick::TickInput;

/// Column the autopilot wants to shoot into, if any group is active
pub fn target_column(state: &GameState) -> Option<i32> {
    let grid = state.settings.grid();
    let group = state
        .groups
        .iter()
        .filter(|g| !g.is_empty())
        .max_by(|a, b| {
            let ay = a.bottom_y().unwrap_or(f32::MIN);
            let by = b.bottom_y().unwrap_or(f32::MIN);
            ay.partial_cmp(&by).unwrap_or(std::cmp::Ordering::Equal)
        })?;

    let bounds = group.bounds()?;
    let (cols, rows, cells) = group.occupancy()?;
    let first_col = grid.pixel_to_grid_x(bounds.min.x + grid.cell_size * 0.5);

    // Cells still missing per column, minus shots already on their way
    let mut best: Option<(usize, i32)> = None;
    for col in 0..cols {
        let filled = (0..rows).filter(|&r| cells[r * cols + col]).count();
        let grid_col = first_col + col as i32;
        let in_flight = state
            .projectiles
            .iter()
            .filter(|p| grid.pixel_to_grid_x(p.pos.x + grid.cell_size * 0.5) == grid_col)
            .count();
        let missing = (rows - filled).saturating_sub(in_flight);
        if missing > 0 && best.is_none_or(|(m, _)| missing > m) {
            best = Some((missing, grid_col));
        }
    }

    best.map(|(_, col)| col)
        .filter(|&col| col >= 0 && col < state.settings.grid_width)
}

/// Build this tick's input from the current state
pub fn plan(state: &GameState) -> TickInput {
    let mut input = TickInput::default();
    let Some(target) = target_column(state) else {
        return input;
    };

    if state.cannon_col < target {
        input.cannon_move = Some(CannonMove::Right);
    } else if state.cannon_col > target {
        input.cannon_move = Some(CannonMove::Left);
    } else if state.overheat() < state.settings.overheat_max / 2 {
        input.fire = true;
    }
    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::group::{Block, Group};
    use crate::sim::projectile::BlockTag;
    use glam::Vec2;

    fn state_with_group(cells: &[(i32, i32)]) -> GameState {
        let mut state = GameState::new(5, Settings::default());
        let grid = state.settings.grid();
        let id = state.next_entity_id();
        let mut group = Group::new(id, grid.cell_size, 1.0);
        for &(c, r) in cells {
            group.add_block(Block::new(
                Vec2::new(grid.grid_to_pixel_x(c), grid.grid_to_pixel_y(r)),
                BlockTag::Group,
            ));
        }
        state.groups.push(group);
        state
    }

    #[test]
    fn test_targets_shortest_column() {
        // Column 3 is two deep, column 4 only one
        let state = state_with_group(&[(3, 0), (4, 0), (3, 1)]);
        assert_eq!(target_column(&state), Some(4));
    }

    #[test]
    fn test_plan_moves_then_fires() {
        let mut state = state_with_group(&[(3, 0), (4, 0), (3, 1)]);
        assert_eq!(plan(&state).cannon_move, Some(CannonMove::Left));

        state.cannon_col = 4;
        let input = plan(&state);
        assert!(input.fire);
        assert_eq!(input.cannon_move, None);

        state.gate.overheat = state.settings.overheat_max;
        assert!(!plan(&state).fire);
    }

    #[test]
    fn test_in_flight_shots_count() {
        let mut state = state_with_group(&[(3, 0), (4, 0), (3, 1)]);
        state.cannon_col = 4;
        assert!(state.fire());
        // Column 4 is now covered by the shot in flight
        assert_eq!(target_column(&state), None);
    }

    #[test]
    fn test_idle_without_groups() {
        let state = GameState::new(5, Settings::default());
        let input = plan(&state);
        assert!(!input.fire);
        assert!(input.cannon_move.is_none());
    }
}
