//! Per-tick integration
//!
//! Thrust/friction for the two ships, constant drift for everything else,
//! and toroidal wrap so nothing leaves the screen for good.

use glam::Vec2;

use super::state::{Alien, Asteroid, Bullet, Debris, Ship};
use crate::tuning::Tuning;
use crate::{heading_vector, shortest_angle_delta};

/// Wrap one axis. Entities fully past an edge reappear past the opposite one.
#[inline]
pub fn wrap_axis(value: f32, radius: f32, dimension: f32) -> f32 {
    if value < -radius {
        dimension + radius
    } else if value > dimension + radius {
        -radius
    } else {
        value
    }
}

/// Wrap a position independently per axis
#[inline]
pub fn wrap_position(pos: Vec2, radius: f32, bounds: Vec2) -> Vec2 {
    Vec2::new(
        wrap_axis(pos.x, radius, bounds.x),
        wrap_axis(pos.y, radius, bounds.y),
    )
}

/// Thrust-or-coast velocity update shared by ship and alien.
/// Friction is a plain multiplier, so velocity decays without ever snapping to zero.
#[inline]
pub fn apply_thrust(vel: Vec2, heading: f32, thrusting: bool, thrust: f32, friction: f32) -> Vec2 {
    if thrusting {
        vel + heading_vector(heading) * thrust
    } else {
        vel * friction
    }
}

/// Advance the player ship one tick (rotation already chosen from input)
pub fn integrate_ship(ship: &mut Ship, tuning: &Tuning, bounds: Vec2) {
    ship.heading = crate::normalize_angle(ship.heading + ship.rotation);
    ship.vel = apply_thrust(
        ship.vel,
        ship.heading,
        ship.thrusting,
        tuning.ship_thrust,
        tuning.ship_friction,
    );
    ship.pos = wrap_position(ship.pos + ship.vel, ship.radius, bounds);
}

/// Rotation toward a target heading at a fixed rate, zero once within `epsilon`
#[inline]
pub fn steer_toward(heading: f32, target: f32, turn_rate: f32, epsilon: f32) -> f32 {
    let delta = shortest_angle_delta(heading, target);
    if delta.abs() < epsilon {
        0.0
    } else {
        turn_rate * delta.signum()
    }
}

/// Advance the alien one tick: steer, thrust/coast, cap speed, move, wrap
pub fn integrate_alien(alien: &mut Alien, tuning: &Tuning, bounds: Vec2) {
    alien.rotation = steer_toward(
        alien.heading,
        alien.target_heading,
        tuning.alien_turn_rate,
        tuning.alien_heading_epsilon,
    );
    alien.heading = crate::normalize_angle(alien.heading + alien.rotation);
    alien.vel = apply_thrust(
        alien.vel,
        alien.heading,
        alien.thrusting,
        tuning.alien_thrust,
        tuning.alien_friction,
    )
    .clamp_length_max(tuning.alien_max_speed);
    alien.pos = wrap_position(alien.pos + alien.vel, alien.radius, bounds);
}

/// Constant drift plus spin
pub fn integrate_asteroid(asteroid: &mut Asteroid, bounds: Vec2) {
    asteroid.pos = wrap_position(asteroid.pos + asteroid.vel, asteroid.radius, bounds);
    asteroid.rotation = crate::normalize_angle(asteroid.rotation + asteroid.rotation_speed);
}

/// Move a player bullet and burn one tick of its life
pub fn integrate_bullet(bullet: &mut Bullet, bounds: Vec2) {
    bullet.pos = wrap_position(bullet.pos + bullet.vel, bullet.radius, bounds);
    bullet.life = bullet.life.saturating_sub(1);
}

/// Debris never wraps; it fades out where it flies
pub fn integrate_debris(debris: &mut Debris) {
    debris.pos += debris.vel;
    debris.rotation += debris.rotation_speed;
    debris.life = debris.life.saturating_sub(1);
}
