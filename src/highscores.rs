//! Local leaderboard
//!
//! Default scoreboard sink: keeps the top 10 runs, persisted to LocalStorage on
//! the web and held in memory natively.

use serde::{Deserialize, Serialize};

use crate::platform::{self, PlatformError, ScoreEntry, Scoreboard};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single leaderboard entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Final distance
    pub score: u64,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// Top-10 leaderboard, highest first
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Leaderboard {
    pub entries: Vec<HighScoreEntry>,
}

impl Leaderboard {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "gravity_flip_leaderboard";

    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Add a score. Returns the rank achieved (1-indexed) or None if it didn't
    /// qualify. Ties rank below existing entries.
    pub fn add_score(&mut self, score: u64, timestamp: f64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry { score, timestamp };
        let rank = match self.entries.iter().position(|e| score > e.score) {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };
        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Best `n` scores
    pub fn top(&self, n: usize) -> Vec<ScoreEntry> {
        self.entries
            .iter()
            .take(n)
            .map(|e| ScoreEntry { score: e.score })
            .collect()
    }

    /// Load the leaderboard from LocalStorage (WASM only). Missing key means
    /// an empty board.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Result<Self, PlatformError> {
        let stored = crate::persistence::local_storage()?
            .get_item(Self::STORAGE_KEY)
            .map_err(|e| PlatformError::Storage(format!("{:?}", e)))?;
        match stored {
            Some(json) => {
                let board: Leaderboard = serde_json::from_str(&json)?;
                log::info!("Loaded {} high scores", board.entries.len());
                Ok(board)
            }
            None => Ok(Self::new()),
        }
    }

    /// Save the leaderboard to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) -> Result<(), PlatformError> {
        let json = serde_json::to_string(self)?;
        crate::persistence::local_storage()?
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|e| PlatformError::Storage(format!("{:?}", e)))?;
        log::debug!("Leaderboard saved ({} entries)", self.entries.len());
        Ok(())
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Result<Self, PlatformError> {
        Ok(Self::new())
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) -> Result<(), PlatformError> {
        Ok(())
    }
}

impl Scoreboard for Leaderboard {
    fn submit(&mut self, score: u64) -> Result<(), PlatformError> {
        if let Some(rank) = self.add_score(score, platform::now_ms()) {
            log::info!("Score {} ranked #{}", score, rank);
            self.save()?;
        }
        Ok(())
    }

    fn fetch_top(&mut self, n: usize) -> Result<Vec<ScoreEntry>, PlatformError> {
        Ok(self.top(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_never_qualifies() {
        let board = Leaderboard::new();
        assert!(!board.qualifies(0));
        assert!(board.qualifies(1));
    }

    #[test]
    fn test_ranks_sorted_descending() {
        let mut board = Leaderboard::new();
        assert_eq!(board.add_score(30, 0.0), Some(1));
        assert_eq!(board.add_score(42, 1.0), Some(1));
        assert_eq!(board.add_score(10, 2.0), Some(3));
        // Tie goes below the existing entry
        assert_eq!(board.add_score(30, 3.0), Some(3));

        let scores: Vec<u64> = board.top(10).iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![42, 30, 30, 10]);
        assert_eq!(board.top_score(), Some(42));
    }

    #[test]
    fn test_board_truncates_to_ten() {
        let mut board = Leaderboard::new();
        for s in 1..=12 {
            board.add_score(s, 0.0);
        }
        assert_eq!(board.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(board.entries.last().map(|e| e.score), Some(3));
        assert!(!board.qualifies(3));
        assert_eq!(board.add_score(2, 0.0), None);
    }

    #[test]
    fn test_scoreboard_fetch_top() {
        let mut board = Leaderboard::new();
        for s in [5, 50, 25] {
            board.submit(s).unwrap();
        }
        let top = board.fetch_top(2).unwrap();
        assert_eq!(top, vec![ScoreEntry { score: 50 }, ScoreEntry { score: 25 }]);
    }
}
