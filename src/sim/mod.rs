//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed tick per call, no wall clock
//! - Seeded RNG only
//! - Stable iteration order (storage order, backward for removals)
//! - No rendering or platform dependencies

pub mod alien;
pub mod asteroid;
pub mod collision;
pub mod debris;
pub mod events;
pub mod physics;
pub mod respawn;
pub mod scoring;
pub mod ship;
pub mod state;
pub mod tick;

pub use collision::{Collidable, circles_overlap, resolve_collisions};
pub use events::{GameEvent, SoundCue, TickEvents};
pub use respawn::find_safe_spawn;
pub use state::{
    Alien, AlienBullet, AlienState, Asteroid, AsteroidShape, Bullet, Debris, GamePhase, GameState,
    Ship, ShipState,
};
pub use tick::{TickInput, tick};
