//! Score tables and level progression

use super::events::{GameEvent, SoundCue, TickEvents};
use super::state::GameState;
use super::{alien, asteroid};

/// Extra points per asteroid at later levels: floor((level - 1) * 0.5 * base)
pub fn level_bonus(level: u32, base_points: u32) -> u32 {
    level.saturating_sub(1) * base_points / 2
}

/// Points for destroying an asteroid: smaller rocks are worth more
pub fn asteroid_points(size: u8, level: u32, base_points: u32) -> u32 {
    base_points * (4 - size.clamp(1, 3) as u32) + level_bonus(level, base_points)
}

/// Add points to the score. Score only ever grows during a run.
pub fn award(state: &mut GameState, points: u32, events: &mut TickEvents) {
    if points == 0 {
        return;
    }
    state.score += points as u64;
    events.push(GameEvent::ScoreChanged { score: state.score });
}

/// Advance the level once the asteroid field is empty
pub fn check_level_clear(state: &mut GameState, events: &mut TickEvents) -> bool {
    if !state.asteroids.is_empty() {
        return false;
    }

    let cleared = state.level;
    state.level += 1;
    log::info!("Level {} cleared, starting level {}", cleared, state.level);

    events.push(GameEvent::LevelComplete { level: cleared });
    events.play(SoundCue::LevelUp);

    asteroid::spawn_level(state);
    alien::reset_spawn_timer_for_level(state);
    true
}
