//! Scorecard of best rounds
//!
//! Persisted to LocalStorage, keeps the 10 best rounds (fewest strokes first).

use serde::{Deserialize, Serialize};

use crate::difficulty::Difficulty;

/// Maximum number of rounds to keep
pub const MAX_ROUNDS: usize = 10;

/// A completed round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundEntry {
    /// Strokes taken, penalties included
    pub strokes: u32,
    pub difficulty: Difficulty,
    /// Unix timestamp (ms) when holed
    pub timestamp: f64,
}

impl RoundEntry {
    /// Ordering key: fewer strokes first, harder courses break ties
    fn rank_key(&self) -> (u32, std::cmp::Reverse<u8>) {
        (self.strokes, std::cmp::Reverse(difficulty_rank(self.difficulty)))
    }
}

fn difficulty_rank(d: Difficulty) -> u8 {
    match d {
        Difficulty::Easy => 0,
        Difficulty::Medium => 1,
        Difficulty::Hard => 2,
    }
}

/// Best rounds leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScoreCard {
    pub entries: Vec<RoundEntry>,
}

impl ScoreCard {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "mini_golf_scorecard";

    /// Check if a round makes the card
    pub fn qualifies(&self, strokes: u32, difficulty: Difficulty) -> bool {
        if strokes == 0 {
            return false;
        }
        if self.entries.len() < MAX_ROUNDS {
            return true;
        }
        let candidate = RoundEntry {
            strokes,
            difficulty,
            timestamp: 0.0,
        };
        self.entries
            .last()
            .map(|e| candidate.rank_key() < e.rank_key())
            .unwrap_or(true)
    }

    /// Record a round. Returns the rank achieved (1-indexed) or None if it didn't qualify.
    pub fn add_round(&mut self, strokes: u32, difficulty: Difficulty, timestamp: f64) -> Option<usize> {
        if !self.qualifies(strokes, difficulty) {
            return None;
        }

        let entry = RoundEntry {
            strokes,
            difficulty,
            timestamp,
        };

        let pos = self
            .entries
            .iter()
            .position(|e| entry.rank_key() < e.rank_key());
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

        self.entries.truncate(MAX_ROUNDS);

        Some(rank)
    }

    /// Fewest strokes recorded on a difficulty
    pub fn best_for(&self, difficulty: Difficulty) -> Option<u32> {
        self.entries
            .iter()
            .filter(|e| e.difficulty == difficulty)
            .map(|e| e.strokes)
            .min()
    }

    /// Load the scorecard from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(card) = serde_json::from_str::<ScoreCard>(&json) {
                    log::info!("Loaded {} rounds", card.entries.len());
                    return card;
                }
            }
        }

        log::info!("No scorecard found, starting fresh");
        Self::default()
    }

    /// Save the scorecard to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Scorecard saved ({} rounds)", self.entries.len());
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fewest_strokes_rank_first() {
        let mut card = ScoreCard::default();
        assert_eq!(card.add_round(4, Difficulty::Easy, 1.0), Some(1));
        assert_eq!(card.add_round(2, Difficulty::Easy, 2.0), Some(1));
        assert_eq!(card.add_round(3, Difficulty::Easy, 3.0), Some(2));

        let strokes: Vec<u32> = card.entries.iter().map(|e| e.strokes).collect();
        assert_eq!(strokes, vec![2, 3, 4]);
    }

    #[test]
    fn test_harder_course_breaks_ties() {
        let mut card = ScoreCard::default();
        card.add_round(3, Difficulty::Easy, 1.0);
        assert_eq!(card.add_round(3, Difficulty::Hard, 2.0), Some(1));
        assert_eq!(card.entries[0].difficulty, Difficulty::Hard);
    }

    #[test]
    fn test_full_card_rejects_worse_rounds() {
        let mut card = ScoreCard::default();
        for i in 0..MAX_ROUNDS as u32 {
            card.add_round(i + 1, Difficulty::Medium, i as f64);
        }
        assert_eq!(card.entries.len(), MAX_ROUNDS);
        assert!(!card.qualifies(20, Difficulty::Medium));
        assert_eq!(card.add_round(20, Difficulty::Medium, 99.0), None);

        // A better round bumps the worst one off
        assert_eq!(card.add_round(1, Difficulty::Hard, 100.0), Some(1));
        assert_eq!(card.entries.len(), MAX_ROUNDS);
        assert_eq!(card.entries.last().map(|e| e.strokes), Some(9));
    }

    #[test]
    fn test_zero_strokes_never_qualifies() {
        let card = ScoreCard::default();
        assert!(!card.qualifies(0, Difficulty::Easy));
    }

    #[test]
    fn test_best_for_difficulty() {
        let mut card = ScoreCard::default();
        card.add_round(5, Difficulty::Easy, 1.0);
        card.add_round(3, Difficulty::Hard, 2.0);
        card.add_round(4, Difficulty::Easy, 3.0);

        assert_eq!(card.best_for(Difficulty::Easy), Some(4));
        assert_eq!(card.best_for(Difficulty::Hard), Some(3));
        assert_eq!(card.best_for(Difficulty::Medium), None);
    }
}
