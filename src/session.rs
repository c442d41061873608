//! Session control surface
//!
//! `start`, `pause`, `resume`, `reset` and `tick` are the only mutators a host
//! gets. Everything else is a read-only snapshot or the last tick's events.

use rand::Rng;

use crate::highscores::{HighScoreEntry, HighScoreError, HighScores, SubmitRequest};
use crate::sim::{GameEvent, GamePhase, GameState, TickEvents, TickInput, tick};
use crate::tuning::{Tuning, TuningError};

/// Final numbers of a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOverSummary {
    pub score: u64,
    pub level: u32,
    /// Leaderboard rank against the cached list, if it places
    pub rank: Option<usize>,
}

/// One play session: the simulation plus its game-over bookkeeping
#[derive(Debug, Clone)]
pub struct Session {
    state: GameState,
    tuning: Tuning,
    seed: u64,
    events: TickEvents,
    high_scores: HighScores,
    /// Countdown from game over to the initials/leaderboard prompt
    prompt_ticks: Option<u32>,
}

impl Session {
    /// Create a session in the `Ready` phase. Tuning is validated here so the
    /// core never sees bad values.
    pub fn new(tuning: Tuning, seed: u64) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self {
            state: GameState::new(tuning.clone(), seed),
            tuning,
            seed,
            events: TickEvents::default(),
            high_scores: HighScores::new(),
            prompt_ticks: None,
        })
    }

    /// Begin play. From `GameOver` this starts a fresh run first, seeded from
    /// the finished run's stream so each restart gets a new field.
    pub fn start(&mut self) {
        match self.state.phase {
            GamePhase::Ready => {
                self.state.phase = GamePhase::Playing;
                log::info!("Session started (seed {})", self.seed);
            }
            GamePhase::GameOver => {
                let next_seed = self.state.rng.random::<u64>();
                self.reset_with_seed(next_seed);
                self.state.phase = GamePhase::Playing;
                log::info!("Session restarted (seed {})", self.seed);
            }
            GamePhase::Playing | GamePhase::Paused => {}
        }
    }

    pub fn pause(&mut self) {
        if self.state.phase == GamePhase::Playing {
            self.state.phase = GamePhase::Paused;
            log::debug!("Paused at tick {}", self.state.time_ticks);
        }
    }

    pub fn resume(&mut self) {
        if self.state.phase == GamePhase::Paused {
            self.state.phase = GamePhase::Playing;
            log::debug!("Resumed at tick {}", self.state.time_ticks);
        }
    }

    /// Toggle between playing and paused
    pub fn toggle_pause(&mut self) {
        match self.state.phase {
            GamePhase::Playing => self.pause(),
            GamePhase::Paused => self.resume(),
            _ => {}
        }
    }

    /// Discard the world and rebuild it from the session seed
    pub fn reset(&mut self) {
        self.state = GameState::new(self.tuning.clone(), self.seed);
        self.events.clear();
        self.prompt_ticks = None;
    }

    /// Rebuild with a new seed
    pub fn reset_with_seed(&mut self, seed: u64) {
        self.seed = seed;
        self.reset();
    }

    /// Advance one tick. Frozen phases still run the game-over countdown.
    pub fn tick(&mut self, input: &TickInput) -> &TickEvents {
        self.events = tick(&mut self.state, input);

        let ended = self
            .events
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::GameOver { .. }));
        if ended {
            self.prompt_ticks = Some(self.tuning.game_over_prompt_delay_ticks);
        } else if let Some(ticks) = self.prompt_ticks {
            self.prompt_ticks = Some(ticks.saturating_sub(1));
        }

        if self.prompt_ticks == Some(0) {
            self.prompt_ticks = None;
            let score = self.state.score;
            let event = match self.high_scores.potential_rank(score) {
                Some(rank) => GameEvent::PromptInitials { score, rank },
                None => GameEvent::ShowHighScores,
            };
            self.events.push(event);
        }

        &self.events
    }

    /// Read-only view of the world
    pub fn snapshot(&self) -> &GameState {
        &self.state
    }

    /// Events raised by the most recent tick
    pub fn events(&self) -> &TickEvents {
        &self.events
    }

    /// Serialized snapshot for hosts that cross a language boundary
    pub fn snapshot_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.state)
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    /// Feed in a leaderboard fetch; failures keep the cached list
    pub fn apply_high_score_fetch(
        &mut self,
        result: Result<Vec<HighScoreEntry>, HighScoreError>,
    ) -> bool {
        self.high_scores.apply_fetch(result)
    }

    /// Feed in a submission result; failures come back as a player-facing message
    pub fn apply_high_score_submit(
        &mut self,
        result: Result<Vec<HighScoreEntry>, HighScoreError>,
    ) -> Result<(), String> {
        self.high_scores.apply_submit(result)
    }

    /// Final score and level, once the run is over
    pub fn game_over_summary(&self) -> Option<GameOverSummary> {
        (self.state.phase == GamePhase::GameOver).then(|| GameOverSummary {
            score: self.state.score,
            level: self.state.level,
            rank: self.high_scores.potential_rank(self.state.score),
        })
    }

    /// Build the submission for the finished run
    pub fn submit_request(
        &self,
        initials: &str,
        timestamp: impl Into<String>,
    ) -> Result<SubmitRequest, HighScoreError> {
        SubmitRequest::new(initials, self.state.score, self.state.level, timestamp)
    }
}
