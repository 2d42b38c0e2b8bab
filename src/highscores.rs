//! High score leaderboard system
//!
//! Persisted as a JSON file, tracks top 10 scores.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Errors from loading or saving the leaderboard
#[derive(Debug, thiserror::Error)]
pub enum HighScoreError {
    #[error("high score file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("high score parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Final score
    pub score: u64,
    /// Level reached
    pub level: u32,
    /// Unix timestamp (seconds) when achieved
    pub timestamp: u64,
}

/// High score leaderboard, sorted descending by score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
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

    /// Add a new score to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, score: u64, level: u32, timestamp: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            score,
            level,
            timestamp,
        };

        // Ties keep the older entry ahead
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
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

    /// Record a finished game. Returns true if it made the table.
    pub fn report_final_score(&mut self, score: u64, level: u32, timestamp: u64) -> bool {
        match self.add_score(score, level, timestamp) {
            Some(rank) => {
                log::info!("New high score #{}: {} (level {})", rank, score, level);
                true
            }
            None => {
                log::info!("Final score {} did not make the leaderboard", score);
                false
            }
        }
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load high scores from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, HighScoreError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let mut scores: HighScores = serde_json::from_str(&json)?;
        // Hand-edited files may be unsorted or oversized
        scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
        scores.entries.truncate(MAX_HIGH_SCORES);
        log::info!("Loaded {} high scores", scores.entries.len());
        Ok(scores)
    }

    /// Load, or start fresh if the file is missing or unreadable
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(scores) => scores,
            Err(e) => {
                log::info!("No high scores loaded ({}), starting fresh", e);
                Self::new()
            }
        }
    }

    /// Save high scores to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), HighScoreError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_table() -> HighScores {
        let mut scores = HighScores::new();
        for i in 1..=MAX_HIGH_SCORES as u64 {
            scores.add_score(i * 100, 1, i);
        }
        scores
    }

    #[test]
    fn test_zero_qualifies_when_not_full() {
        let mut scores = HighScores::new();
        assert!(scores.qualifies(0));
        assert_eq!(scores.add_score(0, 1, 0), Some(1));
        assert_eq!(scores.top_score(), Some(0));
    }

    #[test]
    fn test_sorted_descending() {
        let mut scores = HighScores::new();
        scores.add_score(300, 1, 0);
        scores.add_score(500, 2, 0);
        assert_eq!(scores.add_score(400, 1, 0), Some(2));
        let order: Vec<u64> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(order, vec![500, 400, 300]);
    }

    #[test]
    fn test_full_table_needs_to_beat_lowest() {
        let mut scores = full_table();
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        // Lowest stored is 100
        assert!(!scores.qualifies(100));
        assert!(!scores.report_final_score(50, 1, 0));
        assert!(scores.qualifies(101));
        assert_eq!(scores.potential_rank(101), Some(10));

        assert!(scores.report_final_score(550, 3, 0));
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.score), Some(200));
        assert_eq!(scores.entries[5].score, 550);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("pulse_blocks_scores_{}.json", std::process::id()));
        let scores = full_table();
        scores.save(&path).unwrap();
        let loaded = HighScores::load(&path).unwrap();
        assert_eq!(loaded, scores);
        std::fs::remove_file(&path).unwrap();

        assert!(HighScores::load(&path).is_err());
        assert!(HighScores::load_or_default(&path).is_empty());
    }
}
