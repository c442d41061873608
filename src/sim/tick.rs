//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use super::events::TickEvents;
use super::physics::{integrate_asteroid, integrate_bullet};
use super::state::{GamePhase, GameState};
use super::{alien, collision, debris, scoring, ship};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Rotate counter-clockwise
    pub left: bool,
    /// Rotate clockwise
    pub right: bool,
    pub thrust: bool,
    /// One-shot: produces at most one bullet this tick
    pub fire: bool,
}

/// Advance the game state by one tick and report what happened
pub fn tick(state: &mut GameState, input: &TickInput) -> TickEvents {
    let mut events = TickEvents::default();

    // Paused, not started, or over: nothing moves
    if state.phase != GamePhase::Playing {
        return events;
    }

    state.time_ticks += 1;

    // Ship: timers, input, physics, firing
    ship::update_ship(state, input, &mut events);

    // Background entities
    let bounds = state.bounds();
    for asteroid in &mut state.asteroids {
        integrate_asteroid(asteroid, bounds);
    }
    for bullet in &mut state.bullets {
        integrate_bullet(bullet, bounds);
    }
    state.bullets.retain(|b| b.life > 0);
    alien::update_alien_bullets(state);
    debris::update_debris(state);

    // Alien scheduler and AI
    alien::update_spawn_scheduler(state, &mut events);
    alien::update_aliens(state, &mut events);

    collision::resolve_collisions(state, &mut events);

    // A game that just ended does not roll into a new level
    if state.phase == GamePhase::Playing {
        scoring::check_level_clear(state, &mut events);
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::asteroid::create_asteroid;
    use crate::sim::events::GameEvent;
    use crate::sim::state::ShipState;
    use crate::tuning::Tuning;
    use glam::Vec2;
    use proptest::prelude::*;

    fn playing(tuning: Tuning, seed: u64) -> GameState {
        let mut state = GameState::new(tuning, seed);
        state.phase = GamePhase::Playing;
        state
    }

    fn resting_rock(state: &mut GameState, size: u8, pos: Vec2) {
        let id = state.next_entity_id();
        let mut rock = create_asteroid(id, pos, size, state.level, None, &mut state.rng, &state.tuning);
        rock.vel = Vec2::ZERO;
        rock.rotation_speed = 0.0;
        state.asteroids.push(rock);
    }

    #[test]
    fn test_ready_and_paused_do_not_advance() {
        let mut state = GameState::new(Tuning::default(), 1);
        let before = state.asteroids[0].pos;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.time_ticks, 0);

        state.phase = GamePhase::Paused;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.asteroids[0].pos, before);
    }

    #[test]
    fn test_single_shot_splits_large_asteroid() {
        let tuning = Tuning {
            ship_spawn_ticks: 0,
            alien_level_threshold: 99,
            ..Default::default()
        };
        let mut state = playing(tuning, 2024);
        state.asteroids.clear();
        // Directly in the line of fire, above the ship
        let target = state.ship.pos - Vec2::new(0.0, 80.0);
        resting_rock(&mut state, 3, target);

        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        let mut events = tick(&mut state, &fire);
        let mut ticks = 1;
        while state.score == 0 && ticks < 30 {
            events = tick(&mut state, &TickInput::default());
            ticks += 1;
        }

        assert_eq!(state.score, 100);
        assert!((2..=3).contains(&state.asteroids.len()));
        for child in &state.asteroids {
            assert_eq!(child.size, 2);
            assert_eq!(child.pos, target);
        }
        assert!(events.events.contains(&GameEvent::AsteroidDestroyed {
            points: 100,
            position: target,
            size: 3,
        }));
    }

    #[test]
    fn test_invulnerability_window_holds_for_full_duration() {
        let tuning = Tuning {
            ship_spawn_ticks: 0,
            ship_invulnerable_ticks: 180,
            alien_level_threshold: 99,
            ..Default::default()
        };
        let mut state = playing(tuning, 5);
        state.asteroids.clear();
        let pos = state.ship.pos;
        resting_rock(&mut state, 3, pos);

        for t in 1..180 {
            let events = tick(&mut state, &TickInput::default());
            assert_eq!(
                events.count(|e| matches!(e, GameEvent::ShipDestroyed { .. })),
                0,
                "ship destroyed early at tick {t}"
            );
        }
        assert!(state.ship.is_invulnerable());

        let events = tick(&mut state, &TickInput::default());
        assert_eq!(
            events.count(|e| matches!(e, GameEvent::ShipDestroyed { .. })),
            1
        );
        assert!(matches!(state.ship.state, ShipState::Exploding { .. }));
    }

    #[test]
    fn test_level_advances_when_field_cleared() {
        let tuning = Tuning {
            alien_level_threshold: 99,
            ..Default::default()
        };
        let mut state = playing(tuning, 8);
        state.asteroids.clear();
        let events = tick(&mut state, &TickInput::default());
        assert_eq!(state.level, 2);
        assert_eq!(state.asteroids.len(), 5);
        assert!(events.events.contains(&GameEvent::LevelComplete { level: 1 }));
    }

    #[test]
    fn test_bullets_expire_by_lifetime() {
        let tuning = Tuning {
            ship_spawn_ticks: 0,
            bullet_lifetime_ticks: 5,
            alien_level_threshold: 99,
            ..Default::default()
        };
        let mut state = playing(tuning, 3);
        state.asteroids.clear();
        resting_rock(&mut state, 1, Vec2::new(5.0, 5.0));
        // Aim away from the lone rock
        state.ship.heading = 0.0;

        tick(
            &mut state,
            &TickInput {
                fire: true,
                ..Default::default()
            },
        );
        assert_eq!(state.bullets.len(), 1);
        for _ in 0..3 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.bullets.len(), 1);
        tick(&mut state, &TickInput::default());
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_determinism() {
        let tuning = Tuning {
            alien_level_threshold: 1,
            alien_spawn_interval_ticks: 60,
            alien_min_spawn_interval_ticks: 30,
            ..Default::default()
        };
        let mut state1 = playing(tuning.clone(), 99999);
        let mut state2 = playing(tuning, 99999);

        for i in 0..600u32 {
            let input = TickInput {
                left: i % 50 < 10,
                right: i % 70 > 60,
                thrust: i % 40 < 15,
                fire: i % 9 == 0,
            };
            let e1 = tick(&mut state1, &input);
            let e2 = tick(&mut state2, &input);
            assert_eq!(e1.events, e2.events);
        }

        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.level, state2.level);
        assert_eq!(state1.ship.pos, state2.ship.pos);
        assert_eq!(state1.asteroids.len(), state2.asteroids.len());
        for (a, b) in state1.asteroids.iter().zip(&state2.asteroids) {
            assert_eq!(a.pos, b.pos);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_tick_invariants(
            seed in any::<u64>(),
            inputs in prop::collection::vec((any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()), 1..300),
        ) {
            let tuning = Tuning {
                alien_level_threshold: 1,
                alien_spawn_interval_ticks: 120,
                alien_min_spawn_interval_ticks: 60,
                ..Default::default()
            };
            let mut state = playing(tuning, seed);
            let mut last_score = 0;
            let mut last_level = 1;

            for (left, right, thrust, fire) in inputs {
                let invulnerable = state.ship.is_invulnerable();
                let events = tick(&mut state, &TickInput { left, right, thrust, fire });

                // Bullet cap
                prop_assert!(state.bullets.len() <= state.tuning.max_bullets);
                // Monotonic score and level
                prop_assert!(state.score >= last_score);
                prop_assert!(state.level >= last_level);
                last_score = state.score;
                last_level = state.level;
                // A ship protected for the whole tick is never destroyed during it
                if invulnerable && state.ship.is_invulnerable() {
                    prop_assert_eq!(
                        events.count(|e| matches!(e, GameEvent::ShipDestroyed { .. })),
                        0
                    );
                }
                // Wrap band
                let bounds = state.bounds();
                for a in &state.asteroids {
                    prop_assert!(a.pos.x >= -a.radius && a.pos.x <= bounds.x + a.radius);
                    prop_assert!(a.pos.y >= -a.radius && a.pos.y <= bounds.y + a.radius);
                }
                let s = &state.ship;
                prop_assert!(s.pos.x >= -s.radius && s.pos.x <= bounds.x + s.radius);
                prop_assert!(s.pos.y >= -s.radius && s.pos.y <= bounds.y + s.radius);
                // Lifetimes never linger at zero
                prop_assert!(state.bullets.iter().all(|b| b.life > 0));
                prop_assert!(state.aliens.len() <= state.tuning.max_aliens);
            }
        }
    }
}
