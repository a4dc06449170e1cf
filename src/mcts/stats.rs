//! Search statistics for diagnostics and tuning.

use serde::{Deserialize, Serialize};

/// Win statistics for one candidate action.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ArmStats {
    pub visits: u32,
    /// Sum of rewards in `[0, 1]`.
    pub wins: f64,
}

impl ArmStats {
    /// Mean reward, 0 when unvisited.
    #[must_use]
    pub fn win_rate(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.wins / f64::from(self.visits)
        }
    }

    pub fn record(&mut self, reward: f64) {
        self.visits += 1;
        self.wins += reward;
    }

    pub fn merge(&mut self, other: &ArmStats) {
        self.visits += other.visits;
        self.wins += other.wins;
    }
}

/// Statistics collected during one search.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SearchStats {
    /// Playouts (card search) or simulated games (bid search) scored.
    pub iterations: u32,

    /// Worlds sampled.
    pub determinizations: u32,

    /// Parallel batches completed.
    pub batches: u32,

    /// Worlds dropped because a playout hit an engine error.
    pub failed_worlds: u32,

    /// The time budget expired before the iteration cap.
    pub timed_out: bool,

    /// The caller's cancellation flag stopped the search.
    pub cancelled: bool,

    /// Total time spent searching (microseconds).
    pub time_us: u64,
}

impl SearchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// The search stopped before its iteration cap.
    #[must_use]
    pub fn cut_short(&self) -> bool {
        self.timed_out || self.cancelled
    }

    #[must_use]
    pub fn iterations_per_second(&self) -> f64 {
        if self.time_us == 0 {
            0.0
        } else {
            f64::from(self.iterations) / (self.time_us as f64 / 1_000_000.0)
        }
    }
}
