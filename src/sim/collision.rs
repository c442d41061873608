//! Collision detection and resolution
//!
//! Everything is a circle. Pairs are resolved in a fixed precedence and all
//! loops walk backward so removing an element mid-pass never skips or
//! revisits a neighbour. Children from split asteroids are held back until
//! every pass is done, so a rock born this tick cannot be hit this tick.

use glam::Vec2;

use super::alien::destroy_alien;
use super::asteroid::{DestroyCause, destroy_asteroid};
use super::events::{GameEvent, TickEvents};
use super::physics::wrap_position;
use super::ship::destroy_ship;
use super::state::{Alien, AlienBullet, Asteroid, Bullet, GameState, Ship};

/// Anything with a center and a collision radius
pub trait Collidable {
    fn position(&self) -> Vec2;
    fn radius(&self) -> f32;
}

macro_rules! impl_collidable {
    ($($ty:ty),*) => {
        $(impl Collidable for $ty {
            #[inline]
            fn position(&self) -> Vec2 {
                self.pos
            }
            #[inline]
            fn radius(&self) -> f32 {
                self.radius
            }
        })*
    };
}

impl_collidable!(Ship, Asteroid, Bullet, Alien, AlienBullet);

/// Strict circle overlap: touching edges do not collide
#[inline]
pub fn circles_overlap(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> bool {
    a_pos.distance(b_pos) < a_radius + b_radius
}

#[inline]
pub fn overlaps(a: &impl Collidable, b: &impl Collidable) -> bool {
    circles_overlap(a.position(), a.radius(), b.position(), b.radius())
}

/// Heading (ship convention) pointing from `from` to `to`
#[inline]
fn heading_between(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    (-d.y).atan2(d.x)
}

/// Resolve all collisions for this tick in precedence order
pub fn resolve_collisions(state: &mut GameState, events: &mut TickEvents) {
    let mut spawned: Vec<Asteroid> = Vec::new();

    bullets_vs_aliens(state, events);
    bullets_vs_asteroids(state, &mut spawned, events);
    ship_vs_asteroids(state, &mut spawned, events);
    ship_vs_aliens(state, events);
    aliens_vs_asteroids(state, &mut spawned, events);
    alien_bullets_vs_asteroids(state, &mut spawned, events);
    alien_bullets_vs_ship(state, events);

    // Children of a rock straddling an edge get their own (smaller) wrap band
    let bounds = state.bounds();
    for mut child in spawned {
        child.pos = wrap_position(child.pos, child.radius, bounds);
        state.asteroids.push(child);
    }
}

/// 1. Player bullets destroy vulnerable aliens
fn bullets_vs_aliens(state: &mut GameState, events: &mut TickEvents) {
    for a in (0..state.aliens.len()).rev() {
        if !state.aliens[a].is_vulnerable() {
            continue;
        }
        for b in (0..state.bullets.len()).rev() {
            if overlaps(&state.bullets[b], &state.aliens[a]) {
                let bullet = state.bullets.remove(b);
                let angle = (-bullet.vel.y).atan2(bullet.vel.x);
                let points = state.tuning.alien_points;
                super::scoring::award(state, points, events);
                destroy_alien(state, a, true, angle, events);
                break;
            }
        }
    }
}

/// 2. Player bullets destroy (and split) asteroids
fn bullets_vs_asteroids(state: &mut GameState, spawned: &mut Vec<Asteroid>, events: &mut TickEvents) {
    for b in (0..state.bullets.len()).rev() {
        for r in (0..state.asteroids.len()).rev() {
            if overlaps(&state.bullets[b], &state.asteroids[r]) {
                state.bullets.remove(b);
                destroy_asteroid(state, r, DestroyCause::PlayerBullet, None, spawned, events);
                break;
            }
        }
    }
}

/// 3. Asteroids destroy an unprotected ship (and break up on impact)
fn ship_vs_asteroids(state: &mut GameState, spawned: &mut Vec<Asteroid>, events: &mut TickEvents) {
    if !state.ship.is_vulnerable() {
        return;
    }
    for r in (0..state.asteroids.len()).rev() {
        if overlaps(&state.ship, &state.asteroids[r]) {
            let direction = heading_between(state.ship.pos, state.asteroids[r].pos);
            destroy_ship(state, events);
            destroy_asteroid(state, r, DestroyCause::PlayerShip, Some(direction), spawned, events);
            return;
        }
    }
}

/// 4. Ship and alien ram each other; both go
fn ship_vs_aliens(state: &mut GameState, events: &mut TickEvents) {
    if !state.ship.is_vulnerable() {
        return;
    }
    for a in (0..state.aliens.len()).rev() {
        let alien = &state.aliens[a];
        if alien.is_vulnerable() && overlaps(&state.ship, alien) {
            let angle = heading_between(state.ship.pos, alien.pos);
            destroy_ship(state, events);
            destroy_alien(state, a, false, angle, events);
            return;
        }
    }
}

/// 5. Alien crashes into an asteroid; both go, with one combined effect
fn aliens_vs_asteroids(state: &mut GameState, spawned: &mut Vec<Asteroid>, events: &mut TickEvents) {
    for a in (0..state.aliens.len()).rev() {
        if !state.aliens[a].is_vulnerable() {
            continue;
        }
        for r in (0..state.asteroids.len()).rev() {
            if overlaps(&state.aliens[a], &state.asteroids[r]) {
                let alien_pos = state.aliens[a].pos;
                let rock_pos = state.asteroids[r].pos;
                let direction = heading_between(alien_pos, rock_pos);

                events.push(GameEvent::CollisionEffect {
                    position: (alien_pos + rock_pos) * 0.5,
                });
                destroy_asteroid(state, r, DestroyCause::Alien, Some(direction), spawned, events);
                destroy_alien(state, a, false, direction, events);
                break;
            }
        }
    }
}

/// 6. Alien bullets break asteroids too
fn alien_bullets_vs_asteroids(
    state: &mut GameState,
    spawned: &mut Vec<Asteroid>,
    events: &mut TickEvents,
) {
    for b in (0..state.alien_bullets.len()).rev() {
        for r in (0..state.asteroids.len()).rev() {
            if overlaps(&state.alien_bullets[b], &state.asteroids[r]) {
                state.alien_bullets.remove(b);
                destroy_asteroid(state, r, DestroyCause::AlienBullet, None, spawned, events);
                break;
            }
        }
    }
}

/// 7. Alien bullets destroy an unprotected ship
fn alien_bullets_vs_ship(state: &mut GameState, events: &mut TickEvents) {
    for b in (0..state.alien_bullets.len()).rev() {
        if !state.ship.is_vulnerable() {
            return;
        }
        if overlaps(&state.alien_bullets[b], &state.ship) {
            state.alien_bullets.remove(b);
            destroy_ship(state, events);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::asteroid::create_asteroid;
    use crate::sim::state::{AlienState, GamePhase, ShipState};
    use crate::tuning::Tuning;

    fn arena() -> GameState {
        let mut state = GameState::new(Tuning::default(), 4242);
        state.phase = GamePhase::Playing;
        state.asteroids.clear();
        state
    }

    fn add_rock(state: &mut GameState, size: u8, pos: Vec2) {
        let id = state.next_entity_id();
        let mut rock = create_asteroid(id, pos, size, state.level, None, &mut state.rng, &state.tuning);
        rock.vel = Vec2::ZERO;
        state.asteroids.push(rock);
    }

    fn add_alien(state: &mut GameState, pos: Vec2, alien_state: AlienState) {
        let id = state.next_entity_id();
        state.aliens.push(Alien {
            id,
            pos,
            vel: Vec2::ZERO,
            heading: 0.0,
            target_heading: 0.0,
            rotation: 0.0,
            radius: 18.0,
            thrusting: false,
            reorient_ticks: 100,
            fire_ticks: 100,
            state: alien_state,
        });
    }

    fn bullet_at(pos: Vec2) -> Bullet {
        Bullet {
            pos,
            vel: Vec2::new(1.0, 0.0),
            radius: 0.0,
            life: 10,
        }
    }

    #[test]
    fn test_overlap_is_strict() {
        assert!(circles_overlap(Vec2::ZERO, 5.0, Vec2::new(9.9, 0.0), 5.0));
        assert!(!circles_overlap(Vec2::ZERO, 5.0, Vec2::new(10.0, 0.0), 5.0));
    }

    #[test]
    fn test_bullet_splits_asteroid_and_children_wait() {
        let mut state = arena();
        add_rock(&mut state, 3, Vec2::new(100.0, 100.0));
        state.bullets.push(bullet_at(Vec2::new(100.0, 100.0)));
        // A second bullet sitting on the same spot must not hit the fresh children
        state.bullets.push(bullet_at(Vec2::new(100.0, 100.0)));

        let mut events = TickEvents::default();
        resolve_collisions(&mut state, &mut events);

        assert_eq!(state.score, 100);
        assert_eq!(state.bullets.len(), 1);
        assert!((2..=3).contains(&state.asteroids.len()));
        assert!(state.asteroids.iter().all(|a| a.size == 2));
    }

    #[test]
    fn test_one_bullet_one_kill() {
        let mut state = arena();
        add_rock(&mut state, 1, Vec2::new(100.0, 100.0));
        add_rock(&mut state, 1, Vec2::new(102.0, 100.0));
        state.bullets.push(bullet_at(Vec2::new(101.0, 100.0)));

        resolve_collisions(&mut state, &mut TickEvents::default());
        assert_eq!(state.asteroids.len(), 1);
        assert!(state.bullets.is_empty());
        assert_eq!(state.score, 300);
    }

    #[test]
    fn test_invulnerable_alien_ignores_bullets() {
        let mut state = arena();
        add_alien(&mut state, Vec2::new(200.0, 200.0), AlienState::Invulnerable { ticks: 10 });
        state.bullets.push(bullet_at(Vec2::new(200.0, 200.0)));
        resolve_collisions(&mut state, &mut TickEvents::default());
        assert_eq!(state.aliens.len(), 1);
        assert_eq!(state.bullets.len(), 1);

        state.aliens[0].state = AlienState::Active;
        let mut events = TickEvents::default();
        resolve_collisions(&mut state, &mut events);
        assert!(state.aliens.is_empty());
        assert_eq!(state.score, state.tuning.alien_points as u64);
        assert!(events.events.iter().any(|e| matches!(
            e,
            GameEvent::AlienDestroyed { was_shot: true, .. }
        )));
    }

    #[test]
    fn test_protected_ship_survives_everything() {
        let mut state = arena();
        state.ship.state = ShipState::Invulnerable { ticks: 50 };
        let pos = state.ship.pos;
        add_rock(&mut state, 3, pos);
        add_alien(&mut state, pos, AlienState::Invulnerable { ticks: 50 });
        state.alien_bullets.push(AlienBullet {
            pos,
            vel: Vec2::ZERO,
            radius: 3.0,
            life: 10,
            pulse: 0.0,
        });

        let mut events = TickEvents::default();
        resolve_collisions(&mut state, &mut events);
        assert!(!state.ship.is_exploding());
        assert_eq!(state.lives, 3);
        assert_eq!(
            events.count(|e| matches!(e, GameEvent::ShipDestroyed { .. })),
            0
        );
    }

    #[test]
    fn test_ship_rams_alien() {
        let mut state = arena();
        state.ship.state = ShipState::Active;
        let pos = state.ship.pos;
        add_alien(&mut state, pos + Vec2::new(10.0, 0.0), AlienState::Active);

        let mut events = TickEvents::default();
        resolve_collisions(&mut state, &mut events);
        assert!(state.ship.is_exploding());
        assert!(state.aliens.is_empty());
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_alien_asteroid_crash_emits_midpoint_effect() {
        let mut state = arena();
        add_rock(&mut state, 2, Vec2::new(100.0, 100.0));
        add_alien(&mut state, Vec2::new(120.0, 100.0), AlienState::Active);

        let mut events = TickEvents::default();
        resolve_collisions(&mut state, &mut events);
        assert!(state.aliens.is_empty());
        assert!(state.asteroids.iter().all(|a| a.size == 1));
        assert!(events.events.contains(&GameEvent::CollisionEffect {
            position: Vec2::new(110.0, 100.0)
        }));
        // Alien kills are not the player's
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_alien_bullet_splits_asteroid_without_score() {
        let mut state = arena();
        let pos = Vec2::new(150.0, 450.0);
        add_rock(&mut state, 3, pos);
        state.alien_bullets.push(AlienBullet {
            pos,
            vel: Vec2::ZERO,
            radius: 3.0,
            life: 10,
            pulse: 0.0,
        });

        let mut events = TickEvents::default();
        resolve_collisions(&mut state, &mut events);
        assert!(state.alien_bullets.is_empty());
        assert!((2..=3).contains(&state.asteroids.len()));
        assert!(state.asteroids.iter().all(|a| a.size == 2 && a.pos == pos));
        assert_eq!(state.score, 0);
        assert!(events.events.contains(&GameEvent::AsteroidDestroyed {
            points: 0,
            position: pos,
            size: 3,
        }));
        assert_eq!(
            events.count(|e| matches!(e, GameEvent::ScoreChanged { .. })),
            0
        );
    }

    #[test]
    fn test_alien_bullet_hits_active_ship() {
        let mut state = arena();
        state.ship.state = ShipState::Active;
        let pos = state.ship.pos;
        state.alien_bullets.push(AlienBullet {
            pos,
            vel: Vec2::ZERO,
            radius: 3.0,
            life: 10,
            pulse: 0.0,
        });
        resolve_collisions(&mut state, &mut TickEvents::default());
        assert!(state.ship.is_exploding());
        assert!(state.alien_bullets.is_empty());
        assert_eq!(state.lives, 2);
    }
}
