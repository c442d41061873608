//! Alien AI and spawn scheduler
//!
//! Aliens show up from a level threshold on, wander by picking random
//! headings, and fire at where the ship is going to be.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::events::{GameEvent, SoundCue, TickEvents};
use super::physics::integrate_alien;
use super::debris;
use super::state::{Alien, AlienBullet, AlienState, GameState};
use crate::tuning::Tuning;
use crate::angle_vector;

/// Spawn interval after a spawn: shrinks with level down to a floor
pub fn spawn_interval(level: u32, tuning: &Tuning) -> u32 {
    let levels_past = level.saturating_sub(tuning.alien_level_threshold);
    let decrease = levels_past.saturating_mul(tuning.alien_spawn_decrease_per_level);
    tuning
        .alien_spawn_interval_ticks
        .saturating_sub(decrease)
        .max(tuning.alien_min_spawn_interval_ticks)
}

/// First interval of a level: the base interval plus half again as grace
pub fn grace_interval(tuning: &Tuning) -> u32 {
    tuning.alien_spawn_interval_ticks.saturating_mul(3) / 2
}

/// Reset the scheduler at the start of a level
pub fn reset_spawn_timer_for_level(state: &mut GameState) {
    if state.level >= state.tuning.alien_level_threshold {
        state.alien_spawn_ticks = grace_interval(&state.tuning);
    }
}

/// Count down to the next spawn and spawn when due
pub fn update_spawn_scheduler(state: &mut GameState, events: &mut TickEvents) {
    if state.level < state.tuning.alien_level_threshold {
        return;
    }

    state.alien_spawn_ticks = state.alien_spawn_ticks.saturating_sub(1);
    if state.alien_spawn_ticks > 0 {
        return;
    }

    if state.aliens.len() < state.tuning.max_aliens {
        spawn_alien(state, events);
    }
    state.alien_spawn_ticks = spawn_interval(state.level, &state.tuning);
}

/// Enter from a random screen edge, drifting inward
pub fn spawn_alien(state: &mut GameState, events: &mut TickEvents) {
    let bounds = state.bounds();
    let tuning = &state.tuning;
    let rng = &mut state.rng;
    let r = tuning.alien_radius;
    let speed = tuning.alien_entry_speed;
    // Sideways drift so entries are not perfectly perpendicular
    let drift = rng.random_range(-0.5f32..=0.5) * speed;

    let (pos, vel) = match rng.random_range(0..4u32) {
        0 => (
            Vec2::new(rng.random_range(0.0..bounds.x), -r),
            Vec2::new(drift, speed),
        ),
        1 => (
            Vec2::new(bounds.x + r, rng.random_range(0.0..bounds.y)),
            Vec2::new(-speed, drift),
        ),
        2 => (
            Vec2::new(rng.random_range(0.0..bounds.x), bounds.y + r),
            Vec2::new(drift, -speed),
        ),
        _ => (
            Vec2::new(-r, rng.random_range(0.0..bounds.y)),
            Vec2::new(speed, drift),
        ),
    };

    let heading = (-vel.y).atan2(vel.x);
    let state_on_entry = if tuning.alien_spawn_ticks > 0 {
        AlienState::Spawning {
            ticks: tuning.alien_spawn_ticks,
        }
    } else {
        post_spawn_state(tuning)
    };
    let fire_ticks = rng.random_range(tuning.alien_fire_min_ticks..=tuning.alien_fire_max_ticks);
    let reorient_ticks = tuning.alien_reorient_ticks;

    let id = state.next_entity_id();
    state.aliens.push(Alien {
        id,
        pos,
        vel,
        heading,
        target_heading: heading,
        rotation: 0.0,
        radius: r,
        thrusting: false,
        reorient_ticks,
        fire_ticks,
        state: state_on_entry,
    });

    log::info!("Alien {} spawned at {:?} (level {})", id, pos, state.level);
    events.push(GameEvent::AlienSpawned { position: pos });
    events.play(SoundCue::AlienSpawn);
}

fn post_spawn_state(tuning: &Tuning) -> AlienState {
    if tuning.alien_invulnerable_ticks > 0 {
        AlienState::Invulnerable {
            ticks: tuning.alien_invulnerable_ticks,
        }
    } else {
        AlienState::Active
    }
}

/// Where the ship will be after `lookahead` ticks at its current velocity
#[inline]
pub fn predict_aim_point(ship_pos: Vec2, ship_vel: Vec2, lookahead: f32) -> Vec2 {
    ship_pos + ship_vel * lookahead
}

/// Screen-space angle (`atan2(dy, dx)`) from `from` toward `target`
#[inline]
pub fn aim_angle(from: Vec2, target: Vec2) -> f32 {
    let d = target - from;
    d.y.atan2(d.x)
}

/// Inside the visible play field (alien bullets are culled outside it)
#[inline]
fn on_screen(pos: Vec2, bounds: Vec2) -> bool {
    pos.x >= 0.0 && pos.x <= bounds.x && pos.y >= 0.0 && pos.y <= bounds.y
}

/// Timers, wandering, physics and firing for every alien
pub fn update_aliens(state: &mut GameState, events: &mut TickEvents) {
    let bounds = state.bounds();
    let ship_targetable = state.ship.is_flying();
    let ship_pos = state.ship.pos;
    let ship_vel = state.ship.vel;

    for i in 0..state.aliens.len() {
        let tuning = &state.tuning;
        let rng = &mut state.rng;
        let alien = &mut state.aliens[i];

        alien.state = match alien.state {
            AlienState::Spawning { ticks } if ticks <= 1 => post_spawn_state(tuning),
            AlienState::Spawning { ticks } => AlienState::Spawning { ticks: ticks - 1 },
            AlienState::Invulnerable { ticks } if ticks <= 1 => AlienState::Active,
            AlienState::Invulnerable { ticks } => AlienState::Invulnerable { ticks: ticks - 1 },
            AlienState::Active => AlienState::Active,
        };

        // Periodic random re-heading; not every reorientation means moving
        alien.reorient_ticks = alien.reorient_ticks.saturating_sub(1);
        if alien.reorient_ticks == 0 {
            alien.target_heading = rng.random_range(-std::f32::consts::PI..std::f32::consts::PI);
            alien.thrusting = rng.random_bool(tuning.alien_thrust_chance);
            alien.reorient_ticks = tuning.alien_reorient_ticks;
        }

        integrate_alien(alien, tuning, bounds);

        if !alien.can_fire() || !ship_targetable {
            continue;
        }
        alien.fire_ticks = alien.fire_ticks.saturating_sub(1);
        if alien.fire_ticks > 0 {
            continue;
        }
        // Shots from the wrap margin would be culled at once; hold the loaded
        // shot until the alien is back on screen
        if !on_screen(alien.pos, bounds) {
            continue;
        }
        alien.fire_ticks = rng.random_range(tuning.alien_fire_min_ticks..=tuning.alien_fire_max_ticks);

        if state.alien_bullets.len() >= tuning.max_alien_bullets {
            continue;
        }

        let target = predict_aim_point(ship_pos, ship_vel, tuning.alien_aim_lookahead_ticks);
        let spread = if tuning.alien_aim_spread > 0.0 {
            rng.random_range(-tuning.alien_aim_spread..=tuning.alien_aim_spread)
        } else {
            0.0
        };
        let angle = aim_angle(alien.pos, target) + spread;
        let dir = angle_vector(angle);

        state.alien_bullets.push(AlienBullet {
            pos: alien.pos + dir * alien.radius,
            vel: dir * tuning.alien_bullet_speed,
            radius: tuning.alien_bullet_radius,
            life: tuning.alien_bullet_lifetime_ticks,
            pulse: 0.0,
        });
        events.push(GameEvent::AlienFired {
            position: alien.pos,
            angle,
        });
        events.play(SoundCue::AlienFire);
    }
}

/// Move alien bullets; they expire by lifetime or on leaving the screen
pub fn update_alien_bullets(state: &mut GameState) {
    let bounds = state.bounds();
    for b in &mut state.alien_bullets {
        b.pos += b.vel;
        b.life = b.life.saturating_sub(1);
        b.pulse = (b.pulse + 0.3) % TAU;
    }
    state.alien_bullets.retain(|b| b.life > 0 && on_screen(b.pos, bounds));
}

/// Remove the alien at `index` with effects
pub fn destroy_alien(
    state: &mut GameState,
    index: usize,
    was_shot: bool,
    angle: f32,
    events: &mut TickEvents,
) {
    let alien = state.aliens.remove(index);
    debris::spawn_burst(state, alien.pos, 12, 2.0);
    log::info!("Alien {} destroyed (shot: {})", alien.id, was_shot);
    events.push(GameEvent::AlienDestroyed {
        was_shot,
        position: alien.pos,
        angle,
    });
    events.play(SoundCue::Explode);
}
