//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod disappear;
pub mod grid;
pub mod group;
pub mod projectile;
pub mod scoring;
pub mod shape;
pub mod state;
pub mod tick;

pub use collision::{Snap, SnapAxis, first_hit, resolve_snap};
pub use disappear::{BlockVisual, DisappearEffect, DisappearState, DisappearVariant};
pub use grid::GridMapper;
pub use group::{Block, Bounds, Group};
pub use projectile::{BlockTag, FireGate, Projectile};
pub use shape::ShapePattern;
pub use state::{CannonMove, GameEvent, GamePhase, GameState};
pub use tick::{TickInput, spawn_group, tick};
