//! Frame rendering
//!
//! Renderers consume `GameSnapshot`s only and never touch the simulation.

pub mod text;

pub use text::render_frame;
