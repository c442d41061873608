//! Cosmetic debris. Shares the tick/lifetime discipline but never collides.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::physics::integrate_debris;
use super::state::{Debris, GameState};
use crate::heading_vector;

/// Point particles flying out from `pos`
pub fn spawn_burst(state: &mut GameState, pos: Vec2, count: usize, speed: f32) {
    let life = state.tuning.debris_lifetime_ticks;
    for _ in 0..count {
        if state.debris.len() >= state.tuning.max_debris {
            break;
        }
        let dir = state.rng.random_range(0.0..TAU);
        let s = speed * state.rng.random_range(0.3f32..=1.0);
        state.debris.push(Debris {
            pos,
            vel: heading_vector(dir) * s,
            rotation: 0.0,
            rotation_speed: 0.0,
            length: 0.0,
            life,
            max_life: life,
        });
    }
}

/// The ship breaks into tumbling hull segments
pub fn spawn_ship_debris(state: &mut GameState) {
    let ship_pos = state.ship.pos;
    let ship_vel = state.ship.vel;
    let radius = state.ship.radius;
    // Slower-burning than sparks so the wreck lingers through the explosion
    let life = state.tuning.debris_lifetime_ticks * 3 / 2;

    for i in 0..6 {
        if state.debris.len() >= state.tuning.max_debris {
            break;
        }
        let dir = i as f32 / 6.0 * TAU + state.rng.random_range(-0.3f32..=0.3);
        let speed = state.rng.random_range(0.5f32..=1.5);
        state.debris.push(Debris {
            pos: ship_pos + heading_vector(dir) * radius * 0.5,
            vel: ship_vel * 0.5 + heading_vector(dir) * speed,
            rotation: state.rng.random_range(0.0..TAU),
            rotation_speed: state.rng.random_range(-0.2f32..=0.2),
            length: radius * state.rng.random_range(0.6f32..=1.2),
            life,
            max_life: life,
        });
    }
}

/// Advance all debris and drop what has burned out
pub fn update_debris(state: &mut GameState) {
    for d in &mut state.debris {
        integrate_debris(d);
    }
    state.debris.retain(|d| d.life > 0);
}
