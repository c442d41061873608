//! Safe respawn locator
//!
//! Finds a ship spawn point clear of every asteroid now and where it will be
//! `lookahead` ticks from now. Center first, then jittered quadrant centers,
//! then a forced clearance of the center. Always terminates with a safe point.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::Asteroid;
use crate::heading_vector;
use crate::tuning::Tuning;

/// Linear extrapolation of an asteroid's position
#[inline]
pub fn predicted_position(asteroid: &Asteroid, lookahead: f32) -> Vec2 {
    asteroid.pos + asteroid.vel * lookahead
}

/// True if `point` keeps `safe_distance` from every asteroid, now and predicted
pub fn is_safe(point: Vec2, asteroids: &[Asteroid], safe_distance: f32, lookahead: f32) -> bool {
    asteroids.iter().all(|a| {
        a.pos.distance(point) >= safe_distance
            && predicted_position(a, lookahead).distance(point) >= safe_distance
    })
}

/// Center of quadrant `q` (0..4, row-major), jittered by up to an eighth of the screen
fn quadrant_candidate(q: u32, bounds: Vec2, rng: &mut Pcg32) -> Vec2 {
    let col = (q % 2) as f32;
    let row = ((q / 2) % 2) as f32;
    let base = Vec2::new(bounds.x * (0.25 + 0.5 * col), bounds.y * (0.25 + 0.5 * row));
    let jitter = Vec2::new(
        rng.random_range(-1.0f32..=1.0) * bounds.x / 8.0,
        rng.random_range(-1.0f32..=1.0) * bounds.y / 8.0,
    );
    base + jitter
}

/// Locate a spawn point, relocating asteroids if the search comes up empty
pub fn find_safe_spawn(asteroids: &mut [Asteroid], tuning: &Tuning, rng: &mut Pcg32) -> Vec2 {
    let bounds = Vec2::new(tuning.world_width, tuning.world_height);
    let center = bounds / 2.0;
    let safe = tuning.respawn_safe_distance;
    let lookahead = tuning.respawn_lookahead_ticks;

    if is_safe(center, asteroids, safe, lookahead) {
        return center;
    }

    for attempt in 0..tuning.respawn_max_attempts {
        let candidate = quadrant_candidate(attempt % 4, bounds, rng);
        if is_safe(candidate, asteroids, safe, lookahead) {
            log::debug!("Respawn at quadrant {} after {} attempts", attempt % 4, attempt + 1);
            return candidate;
        }
    }

    // Push offenders out from the center. The extra drift term keeps the
    // predicted position clear too, not just the current one.
    let mut relocated = 0;
    for asteroid in asteroids.iter_mut() {
        if is_safe(center, std::slice::from_ref(asteroid), safe, lookahead) {
            continue;
        }
        let offset = asteroid.pos - center;
        let dir = if offset.length_squared() > f32::EPSILON {
            offset.normalize()
        } else {
            heading_vector(rng.random_range(0.0..TAU))
        };
        let push = safe * 1.5 + asteroid.vel.length() * lookahead;
        asteroid.pos = center + dir * push;
        relocated += 1;
    }
    log::warn!(
        "No safe respawn point after {} attempts; cleared {} asteroids from center",
        tuning.respawn_max_attempts,
        relocated
    );

    center
}
