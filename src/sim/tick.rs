//! Fixed timestep simulation tick
//!
//! Core game loop that advances the simulation deterministically. Each
//! tick runs, in order: input, clock, overheat decay, spawning,
//! projectiles (with merge and clear), group falls (with game over), and
//! vanishing effects.

use std::time::Duration;

use rand::Rng;

use super::autopilot;
use super::collision::{first_hit, resolve_snap};
use super::disappear::DisappearState;
use super::group::{Block, Group};
use super::projectile::BlockTag;
use super::scoring;
use super::shape::ShapePattern;
use super::state::{CannonMove, GameEvent, GamePhase, GameState};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Shoot from the cannon's current column
    pub fire: bool,
    /// Shift the cannon one column
    pub cannon_move: Option<CannonMove>,
    /// Pause toggle
    pub pause: bool,
    /// Idle/demo mode - the autopilot plays the game
    pub idle_mode: bool,
}

/// Advance the game state by one timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: Duration) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                log::info!("Paused");
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                log::info!("Resumed");
            }
            GamePhase::GameOver => {}
        }
    }

    match state.phase {
        GamePhase::Paused => return,
        GamePhase::GameOver => {
            // Gameplay has stopped; let cleared groups finish vanishing
            state.clock += dt;
            advance_vanishing(state);
            return;
        }
        GamePhase::Playing => {}
    }

    let input = if input.idle_mode {
        autopilot::plan(state)
    } else {
        input.clone()
    };
    if let Some(dir) = input.cannon_move {
        state.move_cannon(dir);
    }
    if input.fire {
        state.fire();
    }

    state.time_ticks += 1;
    state.clock += dt;

    state.gate.decay(state.settings.overheat_decay);

    maybe_spawn_group(state);

    update_projectiles(state, dt);

    if update_groups(state, dt) {
        return;
    }

    // A drop can land a group on a projectile that was just short of it
    resolve_hits(state);

    advance_vanishing(state);

    // Ensure deterministic ordering
    state.normalize_order();
}

/// Spawn a group if the spawn delay has elapsed, then shorten the delay
fn maybe_spawn_group(state: &mut GameState) {
    let due = match state.last_spawn {
        None => true,
        Some(last) => state.clock.saturating_sub(last) >= state.spawn_delay,
    };
    if !due {
        return;
    }
    spawn_group(state);
    state.last_spawn = Some(state.clock);
    state.spawn_delay = scoring::next_spawn_delay(state.spawn_delay, &state.settings);
}

/// Generate a random group above the playfield; returns its id
pub fn spawn_group(state: &mut GameState) -> u32 {
    let size = scoring::shape_size(state.level);
    let cols = size.min(state.settings.grid_width.max(2) as usize);
    let pattern = ShapePattern::generate(cols, size, &mut state.rng);

    let max_col = (state.settings.grid_width - pattern.cols as i32).max(1);
    let col = state.rng.random_range(0..max_col);

    let grid = state.settings.grid();
    let top_left = glam::Vec2::new(
        grid.grid_to_pixel_x(col),
        grid.grid_to_pixel_y(state.settings.spawn_row),
    );
    let id = state.next_entity_id();
    let group = Group::from_pattern(
        id,
        &pattern,
        top_left,
        grid.cell_size,
        scoring::fall_speed(state.level),
    );

    log::info!(
        "Spawned group {} at column {} ({}x{}, {} blocks, next spawn in {:?})",
        id,
        col,
        pattern.cols,
        pattern.rows,
        group.block_count(),
        state.spawn_delay
    );
    state.events.push(GameEvent::GroupSpawned {
        group_id: id,
        col,
        blocks: group.block_count(),
    });
    state.groups.push(group);
    id
}

/// Move projectiles, drop misses, then merge hits
fn update_projectiles(state: &mut GameState, dt: Duration) {
    let top = state.settings.top_limit();
    let events = &mut state.events;
    state.projectiles.retain_mut(|projectile| {
        projectile.advance(dt);
        if projectile.is_off_screen(top) {
            log::debug!("Projectile {} missed", projectile.id);
            events.push(GameEvent::Missed {
                projectile_id: projectile.id,
            });
            return false;
        }
        true
    });

    resolve_hits(state);
}

/// Merge every projectile touching a group into the first group it touches
fn resolve_hits(state: &mut GameState) {
    let mut i = 0;
    while i < state.projectiles.len() {
        let pos = state.projectiles[i].pos;
        let Some(group_idx) = first_hit(&state.groups, pos) else {
            i += 1;
            continue;
        };

        let projectile = state.projectiles.remove(i);
        merge_projectile(state, group_idx, projectile.id, pos);
    }
}

/// Snap the projectile onto the group, then test that group for completion
fn merge_projectile(state: &mut GameState, group_idx: usize, projectile_id: u32, pos: glam::Vec2) {
    let grid = state.settings.grid();
    let group = &mut state.groups[group_idx];
    let snap = resolve_snap(group, pos, &grid);
    group.add_block(Block::new(snap.pos, BlockTag::Shot));

    log::debug!(
        "Projectile {} merged into group {} at {:?} ({:?})",
        projectile_id,
        group.id,
        snap.pos,
        snap.axis
    );
    state.events.push(GameEvent::Merged {
        projectile_id,
        group_id: group.id,
        pos: snap.pos,
    });

    if group.is_complete_rectangle() {
        clear_group(state, group_idx);
    }
}

/// Score a completed group and hand it to the vanishing list
fn clear_group(state: &mut GameState, group_idx: usize) {
    let mut group = state.groups.remove(group_idx);
    let blocks = group.block_count();
    let center = group.center().unwrap_or_default();

    let duration = state.settings.disappear_duration();
    let Some(variant) = group.start_disappear(state.clock, duration, &mut state.rng) else {
        log::error!("group {} completed while already disappearing", group.id);
        debug_assert!(false, "clear of non-idle group {}", group.id);
        // Let the running effect finish; no second award
        state.vanishing.push(group);
        return;
    };

    let points = scoring::points_for(blocks, &state.settings);
    let leveled = state.award(points);
    state.gate.vent();

    log::info!(
        "Cleared group {} ({} blocks, +{} points, score {}, {})",
        group.id,
        blocks,
        points,
        state.score,
        variant.as_str()
    );
    state.events.push(GameEvent::GroupCleared {
        group_id: group.id,
        blocks,
        points,
        center,
        variant,
    });
    if leveled {
        log::info!("Level up: {}", state.level);
        state.events.push(GameEvent::LevelUp { level: state.level });
    }
    state.vanishing.push(group);
}

/// Drop every active group; returns true if one reached the floor
fn update_groups(state: &mut GameState, dt: Duration) -> bool {
    let floor = state.settings.floor_y();
    for group in &mut state.groups {
        group.advance(dt);

        if group.bottom_y().is_some_and(|y| y >= floor) {
            state.phase = GamePhase::GameOver;
            log::info!(
                "Game over: group {} reached the floor (score {}, level {})",
                group.id,
                state.score,
                state.level
            );
            state.events.push(GameEvent::GameOver {
                final_score: state.score,
            });
            return true;
        }
    }
    false
}

/// Animate cleared groups and purge the ones that finished
fn advance_vanishing(state: &mut GameState) {
    for group in &mut state.vanishing {
        if group.update_disappear_effect(state.clock) {
            log::debug!("Group {} vanished", group.id);
            state.events.push(GameEvent::GroupVanished { group_id: group.id });
        }
    }
    state
        .vanishing
        .retain(|g| !matches!(g.disappear, DisappearState::Removed));
}
