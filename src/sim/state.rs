//! Game state and core simulation types
//!
//! The entity store and session counters. Everything the next tick needs,
//! including the RNG stream, lives here so a snapshot fully describes a run.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::{alien, asteroid};
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// World built, waiting for `start`
    Ready,
    /// Active gameplay
    Playing,
    /// Frozen: entities are drawn but not updated
    Paused,
    /// Run ended (lives exhausted)
    GameOver,
}

/// Ship lifecycle. Each transient state carries its own countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShipState {
    /// Materialize animation; input and collisions ignored
    Spawning { ticks: u32 },
    /// Flying normally but cannot be destroyed
    Invulnerable { ticks: u32 },
    Active,
    /// Blown up; physics frozen until the timer runs out
    Exploding { ticks: u32 },
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub pos: Vec2,
    /// Velocity (the accumulated thrust vector)
    pub vel: Vec2,
    /// Heading in radians, 0 = right, π/2 = up the screen
    pub heading: f32,
    /// Rotation applied this tick (one of -R, 0, +R)
    pub rotation: f32,
    pub radius: f32,
    pub thrusting: bool,
    pub state: ShipState,
}

impl Ship {
    /// Fresh ship at `pos`, entering the spawn sequence
    pub fn new(pos: Vec2, tuning: &Tuning) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            heading: std::f32::consts::FRAC_PI_2,
            rotation: 0.0,
            radius: tuning.ship_radius,
            thrusting: false,
            state: Self::spawn_state(tuning),
        }
    }

    /// First state after (re)spawn. Zero-length windows are skipped.
    pub fn spawn_state(tuning: &Tuning) -> ShipState {
        if tuning.ship_spawn_ticks > 0 {
            ShipState::Spawning {
                ticks: tuning.ship_spawn_ticks,
            }
        } else {
            Self::post_spawn_state(tuning)
        }
    }

    /// State entered once the materialize animation finishes
    pub fn post_spawn_state(tuning: &Tuning) -> ShipState {
        if tuning.ship_invulnerable_ticks > 0 {
            ShipState::Invulnerable {
                ticks: tuning.ship_invulnerable_ticks,
            }
        } else {
            ShipState::Active
        }
    }

    /// Only a plain active ship can be destroyed by collisions
    pub fn is_vulnerable(&self) -> bool {
        self.state == ShipState::Active
    }

    /// Protected by a spawn or invulnerability window
    pub fn is_invulnerable(&self) -> bool {
        matches!(
            self.state,
            ShipState::Spawning { .. } | ShipState::Invulnerable { .. }
        )
    }

    pub fn is_exploding(&self) -> bool {
        matches!(self.state, ShipState::Exploding { .. })
    }

    /// Accepts input and moves under physics
    pub fn is_flying(&self) -> bool {
        matches!(
            self.state,
            ShipState::Active | ShipState::Invulnerable { .. }
        )
    }
}

/// Jagged outline, generated once per asteroid and never mutated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsteroidShape {
    /// Per-vertex radial multiplier (1.0 = on the collision circle)
    pub offsets: Vec<f32>,
}

/// An asteroid entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asteroid {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub rotation: f32,
    pub rotation_speed: f32,
    /// 3 = large, 2 = medium, 1 = small
    pub size: u8,
    pub radius: f32,
    pub shape: AsteroidShape,
}

/// A player bullet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Ticks left before expiry
    pub life: u32,
}

/// Alien lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlienState {
    /// Warp-in animation; cannot collide or fire
    Spawning { ticks: u32 },
    /// Flying and firing, but cannot be hit or ram
    Invulnerable { ticks: u32 },
    Active,
}

/// The alien hunter ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alien {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub heading: f32,
    pub target_heading: f32,
    pub rotation: f32,
    pub radius: f32,
    pub thrusting: bool,
    /// Ticks until the next random re-heading
    pub reorient_ticks: u32,
    /// Ticks until the next shot
    pub fire_ticks: u32,
    pub state: AlienState,
}

impl Alien {
    /// Can be shot, rammed, or crash into asteroids
    pub fn is_vulnerable(&self) -> bool {
        self.state == AlienState::Active
    }

    pub fn can_fire(&self) -> bool {
        !matches!(self.state, AlienState::Spawning { .. })
    }
}

/// An alien projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlienBullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub life: u32,
    /// Cosmetic pulse phase (radians)
    pub pulse: f32,
}

/// Cosmetic debris: a line segment when `length > 0`, otherwise a point particle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Debris {
    pub pos: Vec2,
    pub vel: Vec2,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub length: f32,
    pub life: u32,
    pub max_life: u32,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// RNG stream; every random draw in the core comes from here
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u32,
    /// Current level (1-based)
    pub level: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub ship: Ship,
    pub asteroids: Vec<Asteroid>,
    pub bullets: Vec<Bullet>,
    pub aliens: Vec<Alien>,
    pub alien_bullets: Vec<AlienBullet>,
    /// Visual only, never collides
    pub debris: Vec<Debris>,
    /// Ticks until the next alien spawn attempt
    pub alien_spawn_ticks: u32,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let mut state = Self::with_rng(tuning, Pcg32::seed_from_u64(seed));
        state.seed = seed;
        state
    }

    /// Create a new game state drawing from an injected generator
    pub fn with_rng(tuning: Tuning, rng: Pcg32) -> Self {
        let center = Vec2::new(tuning.world_width / 2.0, tuning.world_height / 2.0);
        let ship = Ship::new(center, &tuning);
        let lives = tuning.starting_lives;

        let mut state = Self {
            seed: 0,
            rng,
            tuning,
            phase: GamePhase::Ready,
            score: 0,
            lives,
            level: 1,
            time_ticks: 0,
            ship,
            asteroids: Vec::new(),
            bullets: Vec::new(),
            aliens: Vec::new(),
            alien_bullets: Vec::new(),
            debris: Vec::new(),
            alien_spawn_ticks: 0,
            next_id: 1,
        };

        asteroid::spawn_level(&mut state);
        alien::reset_spawn_timer_for_level(&mut state);

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Screen center
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.tuning.world_width / 2.0, self.tuning.world_height / 2.0)
    }

    /// World dimensions
    pub fn bounds(&self) -> Vec2 {
        Vec2::new(self.tuning.world_width, self.tuning.world_height)
    }
}
