//! Asteroid Siege - A wrap-around arcade shooter with an alien hunter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, AI, game state)
//! - `session`: Start/pause/reset control surface around the simulation
//! - `platform`: Key polling and the browser host
//! - `highscores`: Leaderboard cache and high-score service boundary
//! - `tuning`: Data-driven game balance

pub mod highscores;
pub mod platform;
pub mod session;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use session::Session;
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Nominal simulation rate (ticks per second)
    pub const TICKS_PER_SECOND: u32 = 60;
    /// Fixed simulation timestep in seconds (for hosts driving the loop)
    pub const SIM_DT: f32 = 1.0 / TICKS_PER_SECOND as f32;
    /// Maximum ticks per host frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Signed shortest rotation from `current` to `target`, in [-π, π)
#[inline]
pub fn shortest_angle_delta(current: f32, target: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    (target - current + 3.0 * PI).rem_euclid(TAU) - PI
}

/// Unit vector for a heading in screen space (y grows downward, so sin is negated)
#[inline]
pub fn heading_vector(heading: f32) -> Vec2 {
    Vec2::new(heading.cos(), -heading.sin())
}

/// Unit vector for a plain screen-space angle (as returned by `atan2(dy, dx)`)
#[inline]
pub fn angle_vector(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}
