//! High score leaderboard
//!
//! Cached copy of the service's top 10, plus the request/response shapes of
//! `GET /api/highscores` and `POST /api/highscores`. The cache is what the
//! session consults at game over to decide whether to prompt for initials.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Number of letters in a set of initials
pub const INITIALS_LEN: usize = 3;

/// Errors at the high-score service boundary. None of these are fatal to play.
#[derive(Debug, Error)]
pub enum HighScoreError {
    #[error("Initials must be exactly three letters, got {0:?}")]
    InvalidInitials(String),
    #[error("Malformed high score response: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("High score rejected: {0}")]
    Rejected(String),
    #[error("High score service returned status {0}")]
    Status(u16),
    #[cfg(feature = "remote-scores")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// A single leaderboard row as served by the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub initials: String,
    pub score: u64,
    /// Opaque service timestamp, kept verbatim
    #[serde(default)]
    pub timestamp: String,
}

/// Extra context attached to a submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameData {
    pub level: u32,
    pub timestamp: String,
}

/// Body of `POST /api/highscores`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub initials: String,
    pub score: u64,
    #[serde(rename = "gameData")]
    pub game_data: GameData,
}

impl SubmitRequest {
    /// Build a submission, normalizing and validating the initials
    pub fn new(
        initials: &str,
        score: u64,
        level: u32,
        timestamp: impl Into<String>,
    ) -> Result<Self, HighScoreError> {
        Ok(Self {
            initials: normalize_initials(initials)?,
            score,
            game_data: GameData {
                level,
                timestamp: timestamp.into(),
            },
        })
    }
}

/// Every body shape the service answers with
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ServiceResponse {
    List(Vec<HighScoreEntry>),
    Wrapped { highscores: Vec<HighScoreEntry> },
    Error { error: String },
}

/// Trim and uppercase; exactly three ASCII letters survive
pub fn normalize_initials(raw: &str) -> Result<String, HighScoreError> {
    let trimmed = raw.trim();
    if trimmed.len() != INITIALS_LEN || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(HighScoreError::InvalidInitials(raw.to_string()));
    }
    Ok(trimmed.to_ascii_uppercase())
}

/// Parse a service body into a sorted, truncated list
fn parse_response(body: &str) -> Result<Vec<HighScoreEntry>, HighScoreError> {
    let mut entries = match serde_json::from_str::<ServiceResponse>(body)? {
        ServiceResponse::List(entries) | ServiceResponse::Wrapped { highscores: entries } => {
            entries
        }
        ServiceResponse::Error { error } => return Err(HighScoreError::Rejected(error)),
    };
    // Stable sort keeps service order among ties
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries.truncate(MAX_HIGH_SCORES);
    Ok(entries)
}

/// High score leaderboard cache
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// LocalStorage key (used only in wasm32)
    pub const STORAGE_KEY: &'static str = "asteroid_siege_highscores";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build from an unordered list (sorted descending, trimmed to top 10)
    pub fn from_entries(mut entries: Vec<HighScoreEntry>) -> Self {
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(MAX_HIGH_SCORES);
        Self { entries }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Must beat the lowest entry outright
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Take a fetch result. A failure keeps the last known list.
    pub fn apply_fetch(&mut self, result: Result<Vec<HighScoreEntry>, HighScoreError>) -> bool {
        match result {
            Ok(entries) => {
                *self = Self::from_entries(entries);
                log::info!("Loaded {} high scores", self.entries.len());
                true
            }
            Err(err) => {
                log::warn!(
                    "High score fetch failed, keeping {} cached entries: {}",
                    self.entries.len(),
                    err
                );
                false
            }
        }
    }

    /// Take a submission result. A failure comes back as a message for the player.
    pub fn apply_submit(
        &mut self,
        result: Result<Vec<HighScoreEntry>, HighScoreError>,
    ) -> Result<(), String> {
        match result {
            Ok(entries) => {
                *self = Self::from_entries(entries);
                log::info!("High score submitted ({} entries)", self.entries.len());
                Ok(())
            }
            Err(err) => {
                log::warn!("High score submission failed: {}", err);
                Err(match err {
                    HighScoreError::Rejected(message) => message,
                    other => other.to_string(),
                })
            }
        }
    }

    /// Parse a `GET /api/highscores` body
    pub fn parse_list_response(body: &str) -> Result<Vec<HighScoreEntry>, HighScoreError> {
        parse_response(body)
    }

    /// Parse a `POST /api/highscores` body: the updated list or a validation error
    pub fn parse_submit_response(body: &str) -> Result<Vec<HighScoreEntry>, HighScoreError> {
        parse_response(body)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}

/// Async client for the high-score service
#[cfg(feature = "remote-scores")]
pub mod remote {
    use reqwest::Client;

    use super::{HighScoreEntry, HighScoreError, HighScores, SubmitRequest};

    fn endpoint(base_url: &str) -> String {
        format!("{}/api/highscores", base_url.trim_end_matches('/'))
    }

    /// Map a response onto entries, preferring the service's own error message
    async fn read_entries(
        response: reqwest::Response,
    ) -> Result<Vec<HighScoreEntry>, HighScoreError> {
        let status = response.status();
        let body = response.text().await?;
        match HighScores::parse_list_response(&body) {
            Ok(entries) if status.is_success() => Ok(entries),
            Err(HighScoreError::Rejected(message)) => Err(HighScoreError::Rejected(message)),
            _ if !status.is_success() => Err(HighScoreError::Status(status.as_u16())),
            other => other,
        }
    }

    /// `GET /api/highscores`
    pub async fn fetch_high_scores(base_url: &str) -> Result<Vec<HighScoreEntry>, HighScoreError> {
        log::debug!("Fetching high scores from {}", base_url);
        let response = Client::new().get(endpoint(base_url)).send().await?;
        read_entries(response).await
    }

    /// `POST /api/highscores`
    pub async fn submit_high_score(
        base_url: &str,
        request: &SubmitRequest,
    ) -> Result<Vec<HighScoreEntry>, HighScoreError> {
        log::debug!(
            "Submitting {} for {} to {}",
            request.score,
            request.initials,
            base_url
        );
        let response = Client::new()
            .post(endpoint(base_url))
            .json(request)
            .send()
            .await?;
        read_entries(response).await
    }
}
