//! Asteroid lifecycle: level batches, size scaling, jagged outlines, splitting

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::events::{GameEvent, SoundCue, TickEvents};
use super::state::{Asteroid, AsteroidShape, GameState};
use super::{debris, scoring};
use crate::heading_vector;
use crate::tuning::Tuning;

/// Largest asteroid size
pub const LARGE: u8 = 3;

/// Level speed multiplier, growing linearly up to a cap
pub fn level_speed_scale(level: u32, tuning: &Tuning) -> f32 {
    let growth = level.saturating_sub(1) as f32 * tuning.asteroid_speed_per_level;
    (1.0 + growth).min(tuning.asteroid_max_level_speed_scale)
}

/// Collision radius for a size at a level (later levels bring slightly smaller rocks)
pub fn asteroid_radius(size: u8, level: u32, tuning: &Tuning) -> f32 {
    let shrink = level.saturating_sub(1) as f32 * tuning.asteroid_radius_shrink_per_level;
    let level_scale = (1.0 - shrink).max(tuning.asteroid_min_radius_scale);
    tuning.asteroid_large_radius * tuning.size_radius_scale(size) * level_scale
}

/// Drift speed: faster with level, faster for smaller sizes
pub fn asteroid_speed(size: u8, level: u32, tuning: &Tuning) -> f32 {
    tuning.asteroid_base_speed * level_speed_scale(level, tuning) * tuning.size_speed_scale(size)
}

/// Spin speed scales the same way as drift
pub fn asteroid_spin(size: u8, level: u32, tuning: &Tuning) -> f32 {
    tuning.asteroid_rotation_speed * level_speed_scale(level, tuning) * tuning.size_speed_scale(size)
}

/// Random jagged outline
pub fn generate_shape(rng: &mut Pcg32, tuning: &Tuning) -> AsteroidShape {
    let count = rng.random_range(tuning.asteroid_vertices_min..=tuning.asteroid_vertices_max);
    let jag = tuning.asteroid_jaggedness;
    let offsets = (0..count)
        .map(|_| 1.0 + rng.random_range(-1.0f32..=1.0) * jag)
        .collect();
    AsteroidShape { offsets }
}

/// Build one asteroid. `heading` fixes the drift direction, otherwise it is random.
pub fn create_asteroid(
    id: u32,
    pos: Vec2,
    size: u8,
    level: u32,
    heading: Option<f32>,
    rng: &mut Pcg32,
    tuning: &Tuning,
) -> Asteroid {
    let heading = heading.unwrap_or_else(|| rng.random_range(0.0..TAU));
    let speed = asteroid_speed(size, level, tuning);
    let spin_dir = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
    let shape = generate_shape(rng, tuning);

    Asteroid {
        id,
        pos,
        vel: heading_vector(heading) * speed,
        rotation: rng.random_range(0.0..TAU),
        rotation_speed: asteroid_spin(size, level, tuning) * spin_dir,
        size,
        radius: asteroid_radius(size, level, tuning),
        shape,
    }
}

/// Number of large asteroids at the start of a level
pub fn level_asteroid_count(level: u32, tuning: &Tuning) -> u32 {
    tuning.asteroid_base_count + level
}

/// Spawn the level's batch of large asteroids, keeping clear of the ship
pub fn spawn_level(state: &mut GameState) {
    let count = level_asteroid_count(state.level, &state.tuning);
    let min_dist = state.ship.radius * state.tuning.asteroid_safe_spawn_multiple;
    let ship_pos = state.ship.pos;
    let bounds = state.bounds();

    for _ in 0..count {
        // Rejection sampling; after the attempt budget the last candidate stands
        let mut pos = ship_pos;
        for _ in 0..state.tuning.asteroid_spawn_attempts.max(1) {
            pos = Vec2::new(
                state.rng.random_range(0.0..bounds.x),
                state.rng.random_range(0.0..bounds.y),
            );
            if pos.distance(ship_pos) >= min_dist {
                break;
            }
        }

        let id = state.next_entity_id();
        let asteroid = create_asteroid(
            id,
            pos,
            LARGE,
            state.level,
            None,
            &mut state.rng,
            &state.tuning,
        );
        state.asteroids.push(asteroid);
    }

    log::info!("Level {}: spawned {} asteroids", state.level, count);
}

/// How many children a split produces: more with level, always within the configured bounds
pub fn split_count(level: u32, rng: &mut Pcg32, tuning: &Tuning) -> u32 {
    let min = tuning.asteroid_min_split_children;
    let max = tuning.asteroid_max_split_children;
    let extra = level.min(max - min);
    (min + rng.random_range(0..=extra)).min(max)
}

/// Children for a destroyed asteroid. Empty for the smallest size.
///
/// Children fan out across a half-turn centered on `direction` (a known
/// collision heading) or, failing that, the parent's own travel heading.
pub fn split_asteroid(
    state: &mut GameState,
    parent: &Asteroid,
    direction: Option<f32>,
) -> Vec<Asteroid> {
    if parent.size <= 1 {
        return Vec::new();
    }

    let size = parent.size - 1;
    let level = state.level;
    let count = split_count(level, &mut state.rng, &state.tuning);

    let base = match direction {
        Some(angle) => angle,
        None if parent.vel.length_squared() > f32::EPSILON => (-parent.vel.y).atan2(parent.vel.x),
        None => state.rng.random_range(0.0..TAU),
    };
    let parent_speed = parent.vel.length();

    let mut children = Vec::with_capacity(count as usize);
    for i in 0..count {
        let t = if count > 1 {
            i as f32 / (count - 1) as f32 - 0.5
        } else {
            0.0
        };
        let jitter = state.rng.random_range(-0.15f32..=0.15);
        let heading = base + t * PI + jitter;

        let id = state.next_entity_id();
        let mut child = create_asteroid(
            id,
            parent.pos,
            size,
            level,
            Some(heading),
            &mut state.rng,
            &state.tuning,
        );
        // Never slower than the parent was drifting
        let speed = child.vel.length().max(parent_speed);
        child.vel = heading_vector(heading) * speed;
        children.push(child);
    }
    children
}

/// Who destroyed an asteroid; only the player earns points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestroyCause {
    PlayerBullet,
    PlayerShip,
    Alien,
    AlienBullet,
}

impl DestroyCause {
    pub fn scores(&self) -> bool {
        matches!(self, DestroyCause::PlayerBullet | DestroyCause::PlayerShip)
    }
}

/// Remove the asteroid at `index`, award points, and queue its children into `spawned`
pub fn destroy_asteroid(
    state: &mut GameState,
    index: usize,
    cause: DestroyCause,
    direction: Option<f32>,
    spawned: &mut Vec<Asteroid>,
    events: &mut TickEvents,
) {
    let asteroid = state.asteroids.remove(index);

    let points = if cause.scores() {
        scoring::asteroid_points(asteroid.size, state.level, state.tuning.asteroid_base_points)
    } else {
        0
    };
    scoring::award(state, points, events);

    events.push(GameEvent::AsteroidDestroyed {
        points,
        position: asteroid.pos,
        size: asteroid.size,
    });
    events.play(SoundCue::bang_for_size(asteroid.size));
    debris::spawn_burst(state, asteroid.pos, 4 + asteroid.size as usize * 2, 1.5);

    spawned.extend(split_asteroid(state, &asteroid, direction));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GamePhase;
    use proptest::prelude::*;

    fn state_with(seed: u64) -> GameState {
        let mut state = GameState::new(Tuning::default(), seed);
        state.phase = GamePhase::Playing;
        state
    }

    /// A renderable outline: at least a triangle of positive offsets
    fn shape_is_valid(shape: &AsteroidShape) -> bool {
        shape.offsets.len() >= 3 && shape.offsets.iter().all(|o| *o > 0.0)
    }

    fn rock(state: &mut GameState, size: u8, pos: Vec2, vel: Vec2) -> Asteroid {
        let id = state.next_entity_id();
        let mut a = create_asteroid(id, pos, size, state.level, None, &mut state.rng, &state.tuning);
        a.vel = vel;
        a
    }

    #[test]
    fn test_level_one_count_and_clearance() {
        let state = state_with(7);
        assert_eq!(state.asteroids.len(), 4);
        let min = state.ship.radius * state.tuning.asteroid_safe_spawn_multiple;
        for a in &state.asteroids {
            assert_eq!(a.size, LARGE);
            assert!(a.pos.distance(state.ship.pos) >= min);
            assert!(shape_is_valid(&a.shape));
        }
    }

    #[test]
    fn test_smaller_is_faster() {
        let t = Tuning::default();
        assert!(asteroid_speed(1, 1, &t) > asteroid_speed(2, 1, &t));
        assert!(asteroid_speed(2, 1, &t) > asteroid_speed(3, 1, &t));
        assert!(asteroid_spin(1, 1, &t) > asteroid_spin(3, 1, &t));
    }

    #[test]
    fn test_level_speed_is_capped() {
        let t = Tuning::default();
        assert_eq!(level_speed_scale(1, &t), 1.0);
        assert!(level_speed_scale(5, &t) > level_speed_scale(2, &t));
        assert_eq!(level_speed_scale(500, &t), t.asteroid_max_level_speed_scale);
    }

    #[test]
    fn test_split_count_at_level_one() {
        let t = Tuning::default();
        let mut rng = <Pcg32 as rand::SeedableRng>::seed_from_u64(3);
        for _ in 0..200 {
            let n = split_count(1, &mut rng, &t);
            assert!((2..=3).contains(&n));
        }
    }

    #[test]
    fn test_small_asteroid_never_splits() {
        let mut state = state_with(11);
        let parent = rock(&mut state, 1, Vec2::new(100.0, 100.0), Vec2::new(1.0, 0.0));
        assert!(split_asteroid(&mut state, &parent, None).is_empty());
    }

    #[test]
    fn test_directional_split_follows_collision_heading() {
        let mut state = state_with(5);
        let parent = rock(&mut state, 3, Vec2::new(300.0, 300.0), Vec2::ZERO);
        // Heading 0 is screen-right: every child must drift rightward-ish
        let children = split_asteroid(&mut state, &parent, Some(0.0));
        for child in &children {
            let heading = (-child.vel.y).atan2(child.vel.x);
            assert!(heading.abs() <= std::f32::consts::FRAC_PI_2 + 0.16);
        }
    }

    proptest! {
        #[test]
        fn prop_split_conservation(seed in any::<u64>(), size in 1u8..=3, level in 1u32..12) {
            let mut state = state_with(seed);
            state.level = level;
            let parent = rock(&mut state, size, Vec2::new(200.0, 200.0), Vec2::new(0.5, -0.25));
            let children = split_asteroid(&mut state, &parent, None);
            if size == 1 {
                prop_assert!(children.is_empty());
            } else {
                prop_assert!((2..=4).contains(&children.len()));
                for child in &children {
                    prop_assert_eq!(child.size, size - 1);
                    prop_assert_eq!(child.pos, parent.pos);
                    prop_assert!(shape_is_valid(&child.shape));
                }
            }
        }
    }
}
