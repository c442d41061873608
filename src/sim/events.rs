//! Per-tick events for renderers and audio
//!
//! The core never calls into presentation. It appends what happened during a
//! tick here and the host drains it after the tick commits.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Gameplay event raised during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GameEvent {
    ShipDestroyed { position: Vec2 },
    ShipRespawned { position: Vec2 },
    AsteroidDestroyed { points: u32, position: Vec2, size: u8 },
    AlienSpawned { position: Vec2 },
    AlienDestroyed { was_shot: bool, position: Vec2, angle: f32 },
    AlienFired { position: Vec2, angle: f32 },
    /// Alien and asteroid crashed into each other (effect at the midpoint)
    CollisionEffect { position: Vec2 },
    LevelComplete { level: u32 },
    ScoreChanged { score: u64 },
    GameOver { score: u64, level: u32 },
    /// Game-over delay elapsed and the score ranks on the leaderboard
    PromptInitials { score: u64, rank: usize },
    /// Game-over delay elapsed without a ranking score
    ShowHighScores,
}

/// Named sound trigger; synthesis is entirely the host's concern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SoundCue {
    Fire,
    BangLarge,
    BangMedium,
    BangSmall,
    Explode,
    AlienSpawn,
    AlienFire,
    ThrustStart,
    ThrustStop,
    LevelUp,
}

impl SoundCue {
    /// Bang matching an asteroid size
    pub fn bang_for_size(size: u8) -> Self {
        match size {
            0 | 1 => SoundCue::BangSmall,
            2 => SoundCue::BangMedium,
            _ => SoundCue::BangLarge,
        }
    }
}

/// Append-only event log for one tick
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickEvents {
    pub events: Vec<GameEvent>,
    pub sounds: Vec<SoundCue>,
}

impl TickEvents {
    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn play(&mut self, cue: SoundCue) {
        self.sounds.push(cue);
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.sounds.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.sounds.is_empty()
    }

    /// Number of events matching a predicate (handy for hosts and tests)
    pub fn count(&self, pred: impl Fn(&GameEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}
