//! AI configuration.
//!
//! An explicit value passed to every AI entry point; nothing is read from
//! the environment.

use serde::{Deserialize, Serialize};

use crate::mcts::SearchConfig;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    /// Heuristics only.
    Easy,
    #[default]
    Normal,
    /// Searches from the first trick.
    Hard,
}

impl Difficulty {
    /// Progress (completed tricks / 12) from which search may be used.
    #[must_use]
    pub fn search_from(self) -> f64 {
        match self {
            Difficulty::Easy => f64::INFINITY,
            Difficulty::Normal => 0.25,
            Difficulty::Hard => 0.0,
        }
    }

    /// Progress from which every card decision is searched.
    #[must_use]
    pub fn search_always_from(self) -> f64 {
        match self {
            Difficulty::Easy => f64::INFINITY,
            Difficulty::Normal => 0.6,
            Difficulty::Hard => 0.4,
        }
    }

    /// In the middle game, search only with at most this many cards in hand.
    #[must_use]
    pub fn mid_game_hand_limit(self) -> usize {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Normal => 8,
            Difficulty::Hard => 12,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AIConfig {
    pub difficulty: Difficulty,
    pub search: SearchConfig,
    /// Mixed with the game position to seed each decision.
    pub seed: u64,
}

impl Default for AIConfig {
    fn default() -> Self {
        Self::for_difficulty(Difficulty::Normal)
    }
}

impl AIConfig {
    /// Search preset matching the difficulty.
    #[must_use]
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        let search = match difficulty {
            Difficulty::Easy => SearchConfig::fast(),
            Difficulty::Normal => SearchConfig::normal(),
            Difficulty::Hard => SearchConfig::strong(),
        };
        Self {
            difficulty,
            search,
            seed: 0x5EED,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_search(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }
}
