//! Ship state machine
//!
//! Spawning -> Invulnerable -> Active -> Exploding -> (respawn | game over).
//! Timers count down once per tick; transitions happen at tick boundaries.

use glam::Vec2;

use super::events::{GameEvent, SoundCue, TickEvents};
use super::physics::integrate_ship;
use super::state::{Bullet, GamePhase, GameState, Ship, ShipState};
use super::tick::TickInput;
use super::{debris, respawn};
use crate::heading_vector;

/// Run the ship's timers, input, physics and firing for one tick
pub fn update_ship(state: &mut GameState, input: &TickInput, events: &mut TickEvents) {
    match state.ship.state {
        ShipState::Spawning { ticks } => {
            let ticks = ticks.saturating_sub(1);
            state.ship.state = if ticks == 0 {
                Ship::post_spawn_state(&state.tuning)
            } else {
                ShipState::Spawning { ticks }
            };
            // Materializing: no input, no movement
            return;
        }
        ShipState::Invulnerable { ticks } => {
            let ticks = ticks.saturating_sub(1);
            state.ship.state = if ticks == 0 {
                ShipState::Active
            } else {
                ShipState::Invulnerable { ticks }
            };
        }
        ShipState::Active => {}
        ShipState::Exploding { ticks } => {
            let ticks = ticks.saturating_sub(1);
            if ticks == 0 {
                finish_explosion(state, events);
            } else {
                state.ship.state = ShipState::Exploding { ticks };
            }
            return;
        }
    }

    steer_and_thrust(state, input, events);
    let bounds = state.bounds();
    integrate_ship(&mut state.ship, &state.tuning, bounds);

    if input.fire {
        fire_bullet(state, events);
    }
}

/// Map held keys onto rotation and thrust
fn steer_and_thrust(state: &mut GameState, input: &TickInput, events: &mut TickEvents) {
    let rate = state.tuning.ship_turn_rate;
    state.ship.rotation = match (input.left, input.right) {
        (true, false) => rate,
        (false, true) => -rate,
        _ => 0.0,
    };

    if input.thrust != state.ship.thrusting {
        events.play(if input.thrust {
            SoundCue::ThrustStart
        } else {
            SoundCue::ThrustStop
        });
    }
    state.ship.thrusting = input.thrust;
}

/// Spawn a bullet from the nose, respecting the in-flight cap
pub fn fire_bullet(state: &mut GameState, events: &mut TickEvents) -> bool {
    if state.bullets.len() >= state.tuning.max_bullets {
        return false;
    }
    let ship = &state.ship;
    let dir = heading_vector(ship.heading);
    state.bullets.push(Bullet {
        pos: ship.pos + dir * ship.radius * 4.0 / 3.0,
        vel: dir * state.tuning.bullet_speed,
        radius: state.tuning.bullet_radius,
        life: state.tuning.bullet_lifetime_ticks,
    });
    events.play(SoundCue::Fire);
    true
}

/// Blow up the ship. Costs a life; repeated hits while exploding are ignored.
pub fn destroy_ship(state: &mut GameState, events: &mut TickEvents) {
    if state.ship.is_exploding() {
        return;
    }

    let position = state.ship.pos;
    debris::spawn_ship_debris(state);

    if state.ship.thrusting {
        events.play(SoundCue::ThrustStop);
    }
    state.ship.state = ShipState::Exploding {
        ticks: state.tuning.ship_explode_ticks.max(1),
    };
    state.ship.vel = Vec2::ZERO;
    state.ship.rotation = 0.0;
    state.ship.thrusting = false;
    state.lives = state.lives.saturating_sub(1);

    log::info!("Ship destroyed at {:?}, {} lives left", position, state.lives);
    events.push(GameEvent::ShipDestroyed { position });
    events.play(SoundCue::Explode);
}

/// Explosion finished: respawn somewhere safe, or end the run
fn finish_explosion(state: &mut GameState, events: &mut TickEvents) {
    if state.lives == 0 {
        state.phase = GamePhase::GameOver;
        log::info!("Game over: score {} at level {}", state.score, state.level);
        events.push(GameEvent::GameOver {
            score: state.score,
            level: state.level,
        });
        return;
    }

    let position = respawn::find_safe_spawn(&mut state.asteroids, &state.tuning, &mut state.rng);
    state.ship = Ship::new(position, &state.tuning);
    events.push(GameEvent::ShipRespawned { position });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    fn playing(tuning: Tuning) -> GameState {
        let mut state = GameState::new(tuning, 21);
        state.phase = GamePhase::Playing;
        state.asteroids.clear();
        state
    }

    #[test]
    fn test_spawn_sequence() {
        let tuning = Tuning {
            ship_spawn_ticks: 2,
            ship_invulnerable_ticks: 3,
            ..Default::default()
        };
        let mut state = playing(tuning);
        let mut events = TickEvents::default();
        let input = TickInput {
            thrust: true,
            ..Default::default()
        };

        update_ship(&mut state, &input, &mut events);
        assert_eq!(state.ship.state, ShipState::Spawning { ticks: 1 });
        assert_eq!(state.ship.vel, Vec2::ZERO);

        update_ship(&mut state, &input, &mut events);
        assert_eq!(state.ship.state, ShipState::Invulnerable { ticks: 3 });

        for _ in 0..3 {
            update_ship(&mut state, &input, &mut events);
        }
        assert_eq!(state.ship.state, ShipState::Active);
        assert!(state.ship.vel.length() > 0.0);
    }

    #[test]
    fn test_turn_left_is_positive() {
        let tuning = Tuning {
            ship_spawn_ticks: 0,
            ..Default::default()
        };
        let mut state = playing(tuning);
        let before = state.ship.heading;
        let input = TickInput {
            left: true,
            ..Default::default()
        };
        update_ship(&mut state, &input, &mut TickEvents::default());
        assert!(state.ship.heading > before);

        let both = TickInput {
            left: true,
            right: true,
            ..Default::default()
        };
        update_ship(&mut state, &both, &mut TickEvents::default());
        assert_eq!(state.ship.rotation, 0.0);
    }

    #[test]
    fn test_bullet_cap() {
        let tuning = Tuning {
            max_bullets: 2,
            ..Default::default()
        };
        let mut state = playing(tuning);
        let mut events = TickEvents::default();
        assert!(fire_bullet(&mut state, &mut events));
        assert!(fire_bullet(&mut state, &mut events));
        assert!(!fire_bullet(&mut state, &mut events));
        assert_eq!(state.bullets.len(), 2);
        assert_eq!(
            events.sounds.iter().filter(|s| **s == SoundCue::Fire).count(),
            2
        );
    }

    #[test]
    fn test_explosion_then_respawn() {
        let tuning = Tuning {
            ship_explode_ticks: 3,
            ..Default::default()
        };
        let mut state = playing(tuning);
        let mut events = TickEvents::default();

        destroy_ship(&mut state, &mut events);
        assert_eq!(state.lives, 2);
        // A second hit during the explosion costs nothing
        destroy_ship(&mut state, &mut events);
        assert_eq!(state.lives, 2);

        for _ in 0..3 {
            update_ship(&mut state, &TickInput::default(), &mut events);
        }
        assert!(matches!(state.ship.state, ShipState::Spawning { .. }));
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(
            events
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::ShipRespawned { .. }))
        );
    }

    #[test]
    fn test_last_life_ends_game() {
        let tuning = Tuning {
            starting_lives: 1,
            ship_explode_ticks: 1,
            ..Default::default()
        };
        let mut state = playing(tuning);
        let mut events = TickEvents::default();
        destroy_ship(&mut state, &mut events);
        update_ship(&mut state, &TickInput::default(), &mut events);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(events.events.contains(&GameEvent::GameOver { score: 0, level: 1 }));
    }
}
