//! High score leaderboard
//!
//! Fed by the game-over callback. Serializable so the host can persist it.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::game::GameOverListener;

/// Board size
pub const MAX_HIGH_SCORES: usize = 10;

/// One finished run on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Obstacles dodged
    pub score: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// Best runs, highest score first
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Whether `score` would earn a place on the board
    ///
    /// A run that dodged nothing is never recorded.
    pub fn qualifies(&self, score: u32) -> bool {
        score > 0
            && (self.entries.len() < MAX_HIGH_SCORES
                || self.entries.last().is_none_or(|lowest| score > lowest.score))
    }

    /// 1-based place `score` would take, or `None` when it misses the board
    pub fn potential_rank(&self, score: u32) -> Option<usize> {
        self.qualifies(score).then(|| self.insertion_index(score) + 1)
    }

    /// Record a finished run and return its 1-based place
    ///
    /// Equal scores rank behind the ones already on the board. The lowest
    /// entry falls off once the board is full.
    pub fn add_score(&mut self, score: u32, timestamp: f64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let index = self.insertion_index(score);
        self.entries.insert(index, HighScoreEntry { score, timestamp });
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(index + 1)
    }

    /// First slot holding a strictly lower score
    fn insertion_index(&self, score: u32) -> usize {
        self.entries.partition_point(|entry| entry.score >= score)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best recorded score
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parse a stored leaderboard, falling back to empty on bad data
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(scores) => scores,
            Err(err) => {
                log::warn!("Discarding unreadable high scores: {}", err);
                Self::new()
            }
        }
    }
}

impl GameOverListener for HighScores {
    fn on_game_over(&mut self, final_score: u32) {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as f64)
            .unwrap_or(0.0);
        if let Some(rank) = self.add_score(final_score, timestamp) {
            log::info!("New high score {} at rank {}", final_score, rank);
        }
    }
}
