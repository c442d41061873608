//! Data-driven game balance
//!
//! Every constant the simulation reads lives here so hosts can load a
//! validated JSON override (LocalStorage on web, a file natively).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration loading / validation failure
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning json is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Simulation tuning. All speeds are pixels per tick, all durations are ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === World ===
    pub world_width: f32,
    pub world_height: f32,

    // === Ship ===
    pub ship_radius: f32,
    pub ship_thrust: f32,
    /// Per-tick velocity multiplier while not thrusting
    pub ship_friction: f32,
    /// Radians per tick while a turn key is held
    pub ship_turn_rate: f32,
    pub ship_spawn_ticks: u32,
    pub ship_invulnerable_ticks: u32,
    pub ship_explode_ticks: u32,
    pub starting_lives: u32,

    // === Player bullets ===
    pub bullet_speed: f32,
    pub bullet_lifetime_ticks: u32,
    pub bullet_radius: f32,
    pub max_bullets: usize,

    // === Asteroids ===
    pub asteroid_base_count: u32,
    pub asteroid_large_radius: f32,
    /// Radius scale per size, indexed by `size - 1` (small, medium, large)
    pub asteroid_size_radius_scale: [f32; 3],
    pub asteroid_radius_shrink_per_level: f32,
    pub asteroid_min_radius_scale: f32,
    pub asteroid_base_speed: f32,
    pub asteroid_speed_per_level: f32,
    pub asteroid_max_level_speed_scale: f32,
    /// Speed (and spin) multiplier per size, indexed by `size - 1`
    pub asteroid_size_speed_scale: [f32; 3],
    pub asteroid_rotation_speed: f32,
    pub asteroid_vertices_min: u32,
    pub asteroid_vertices_max: u32,
    pub asteroid_jaggedness: f32,
    /// Level asteroids spawn at least this many ship radii from the ship
    pub asteroid_safe_spawn_multiple: f32,
    pub asteroid_spawn_attempts: u32,
    pub asteroid_min_split_children: u32,
    pub asteroid_max_split_children: u32,
    pub asteroid_base_points: u32,

    // === Safe respawn ===
    pub respawn_safe_distance: f32,
    pub respawn_lookahead_ticks: f32,
    pub respawn_max_attempts: u32,

    // === Alien ===
    pub alien_level_threshold: u32,
    pub max_aliens: usize,
    pub alien_spawn_interval_ticks: u32,
    pub alien_min_spawn_interval_ticks: u32,
    pub alien_spawn_decrease_per_level: u32,
    pub alien_radius: f32,
    pub alien_entry_speed: f32,
    pub alien_thrust: f32,
    pub alien_friction: f32,
    pub alien_max_speed: f32,
    pub alien_turn_rate: f32,
    pub alien_heading_epsilon: f32,
    pub alien_reorient_ticks: u32,
    pub alien_thrust_chance: f64,
    pub alien_spawn_ticks: u32,
    pub alien_invulnerable_ticks: u32,
    pub alien_fire_min_ticks: u32,
    pub alien_fire_max_ticks: u32,
    pub alien_aim_lookahead_ticks: f32,
    /// Maximum random deviation (radians, either side) added to the aim
    pub alien_aim_spread: f32,
    pub alien_bullet_speed: f32,
    pub alien_bullet_radius: f32,
    pub alien_bullet_lifetime_ticks: u32,
    pub max_alien_bullets: usize,
    pub alien_points: u32,

    // === Cosmetic ===
    pub debris_lifetime_ticks: u32,
    pub max_debris: usize,

    // === Session ===
    pub game_over_prompt_delay_ticks: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            world_width: 800.0,
            world_height: 600.0,

            ship_radius: 15.0,
            ship_thrust: 0.1,
            ship_friction: 0.99,
            ship_turn_rate: 0.087, // ~300°/s at 60 Hz
            ship_spawn_ticks: 60,
            ship_invulnerable_ticks: 180,
            ship_explode_ticks: 90,
            starting_lives: 3,

            bullet_speed: 8.0,
            bullet_lifetime_ticks: 60,
            bullet_radius: 0.0,
            max_bullets: 10,

            asteroid_base_count: 3,
            asteroid_large_radius: 50.0,
            asteroid_size_radius_scale: [0.25, 0.5, 1.0],
            asteroid_radius_shrink_per_level: 0.02,
            asteroid_min_radius_scale: 0.7,
            asteroid_base_speed: 1.0,
            asteroid_speed_per_level: 0.1,
            asteroid_max_level_speed_scale: 2.5,
            asteroid_size_speed_scale: [2.0, 1.5, 1.0],
            asteroid_rotation_speed: 0.02,
            asteroid_vertices_min: 7,
            asteroid_vertices_max: 12,
            asteroid_jaggedness: 0.4,
            asteroid_safe_spawn_multiple: 6.0,
            asteroid_spawn_attempts: 50,
            asteroid_min_split_children: 2,
            asteroid_max_split_children: 4,
            asteroid_base_points: 100,

            respawn_safe_distance: 120.0,
            respawn_lookahead_ticks: 30.0,
            respawn_max_attempts: 20,

            alien_level_threshold: 2,
            max_aliens: 1,
            alien_spawn_interval_ticks: 1200,
            alien_min_spawn_interval_ticks: 480,
            alien_spawn_decrease_per_level: 120,
            alien_radius: 18.0,
            alien_entry_speed: 1.5,
            alien_thrust: 0.05,
            alien_friction: 0.98,
            alien_max_speed: 3.0,
            alien_turn_rate: 0.05,
            alien_heading_epsilon: 0.05,
            alien_reorient_ticks: 120,
            alien_thrust_chance: 0.7,
            alien_spawn_ticks: 60,
            alien_invulnerable_ticks: 120,
            alien_fire_min_ticks: 60,
            alien_fire_max_ticks: 150,
            alien_aim_lookahead_ticks: 30.0,
            alien_aim_spread: 0.2,
            alien_bullet_speed: 5.0,
            alien_bullet_radius: 3.0,
            alien_bullet_lifetime_ticks: 180,
            max_alien_bullets: 3,
            alien_points: 1000,

            debris_lifetime_ticks: 60,
            max_debris: 256,

            game_over_prompt_delay_ticks: 180,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document (missing fields keep defaults)
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load from a JSON file on disk
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path(path: impl AsRef<std::path::Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), TuningError> {
            Err(TuningError::Invalid { field, reason })
        }

        if !(self.world_width > 0.0) {
            return invalid("world_width", "must be positive");
        }
        if !(self.world_height > 0.0) {
            return invalid("world_height", "must be positive");
        }
        if !(self.ship_radius > 0.0) {
            return invalid("ship_radius", "must be positive");
        }
        if !(self.ship_friction > 0.0 && self.ship_friction <= 1.0) {
            return invalid("ship_friction", "must be in (0, 1]");
        }
        if !(self.alien_friction > 0.0 && self.alien_friction <= 1.0) {
            return invalid("alien_friction", "must be in (0, 1]");
        }
        if self.ship_thrust < 0.0 || self.alien_thrust < 0.0 {
            return invalid("thrust", "must not be negative");
        }
        if self.bullet_speed < 0.0 || self.alien_bullet_speed < 0.0 {
            return invalid("bullet_speed", "must not be negative");
        }
        if self.asteroid_base_speed < 0.0 || self.asteroid_speed_per_level < 0.0 {
            return invalid("asteroid_base_speed", "must not be negative");
        }
        if self.bullet_lifetime_ticks == 0 {
            return invalid("bullet_lifetime_ticks", "must be at least one tick");
        }
        if self.starting_lives == 0 {
            return invalid("starting_lives", "must be at least one");
        }
        if self.asteroid_vertices_min < 3 {
            return invalid("asteroid_vertices_min", "a shape needs at least 3 vertices");
        }
        if self.asteroid_vertices_min > self.asteroid_vertices_max {
            return invalid("asteroid_vertices_max", "must be >= asteroid_vertices_min");
        }
        if !(0.0..1.0).contains(&self.asteroid_jaggedness) {
            return invalid("asteroid_jaggedness", "must be in [0, 1)");
        }
        if self.asteroid_min_split_children < 2
            || self.asteroid_max_split_children > 4
            || self.asteroid_min_split_children > self.asteroid_max_split_children
        {
            return invalid("asteroid_split_children", "bounds must satisfy 2 <= min <= max <= 4");
        }
        if self.asteroid_size_radius_scale.iter().any(|s| *s <= 0.0) {
            return invalid("asteroid_size_radius_scale", "must be positive");
        }
        if !(self.asteroid_min_radius_scale > 0.0) {
            return invalid("asteroid_min_radius_scale", "must be positive");
        }
        if self.alien_fire_min_ticks == 0 || self.alien_fire_min_ticks > self.alien_fire_max_ticks {
            return invalid("alien_fire_ticks", "need 1 <= min <= max");
        }
        if self.alien_min_spawn_interval_ticks == 0
            || self.alien_min_spawn_interval_ticks > self.alien_spawn_interval_ticks
        {
            return invalid("alien_spawn_interval_ticks", "need 1 <= min <= base interval");
        }
        if self.alien_reorient_ticks == 0 {
            return invalid("alien_reorient_ticks", "must be at least one tick");
        }
        if !(0.0..=1.0).contains(&self.alien_thrust_chance) {
            return invalid("alien_thrust_chance", "must be a probability");
        }
        if self.alien_aim_spread < 0.0 {
            return invalid("alien_aim_spread", "must not be negative");
        }
        if self.respawn_safe_distance < 0.0 {
            return invalid("respawn_safe_distance", "must not be negative");
        }
        Ok(())
    }

    /// Radius scale for `size` (1..=3)
    pub fn size_radius_scale(&self, size: u8) -> f32 {
        self.asteroid_size_radius_scale[size_index(size)]
    }

    /// Speed/spin multiplier for `size` (1..=3)
    pub fn size_speed_scale(&self, size: u8) -> f32 {
        self.asteroid_size_speed_scale[size_index(size)]
    }
}

#[inline]
fn size_index(size: u8) -> usize {
    (size.clamp(1, 3) - 1) as usize
}
