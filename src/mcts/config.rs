//! Search configuration parameters.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Determinized Monte Carlo search parameters.
///
/// Card search samples `determinizations` worlds and runs
/// `playouts_per_determinization` playouts in each. Bid search runs
/// `bid_simulations` games per candidate declaration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Worlds sampled per card decision.
    pub determinizations: u32,

    /// Playouts per world, spread over candidate cards by the selection
    /// policy.
    pub playouts_per_determinization: u32,

    /// Wall-clock budget, checked between batches. `None` = iteration cap only.
    pub time_limit: Option<Duration>,

    /// UCB1 exploration constant (default: sqrt(2)).
    pub exploration_constant: f64,

    /// Probability that a heuristic rollout follows the card evaluator
    /// instead of playing uniformly at random.
    pub rollout_bias: f64,

    /// Worlds (or bid simulations) run in parallel between budget checks.
    pub batch_size: usize,

    /// Simulated games per candidate declaration.
    pub bid_simulations: u32,

    /// Most declarations evaluated per bidding decision.
    pub max_bid_options: usize,

    /// Minimum estimated win rate before the AI commits to a declaration.
    pub min_bid_win_rate: f64,

    /// Same seed produces the same search when the iteration cap binds.
    pub seed: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::normal()
    }
}

impl SearchConfig {
    /// Low latency, for easy opponents and tests.
    #[must_use]
    pub fn fast() -> Self {
        Self {
            determinizations: 8,
            playouts_per_determinization: 40,
            time_limit: Some(Duration::from_millis(300)),
            exploration_constant: std::f64::consts::SQRT_2,
            rollout_bias: 0.3,
            batch_size: 4,
            bid_simulations: 24,
            max_bid_options: 3,
            min_bid_win_rate: 0.55,
            seed: 42,
        }
    }

    #[must_use]
    pub fn normal() -> Self {
        Self {
            determinizations: 20,
            playouts_per_determinization: 80,
            time_limit: Some(Duration::from_secs(1)),
            rollout_bias: 0.5,
            batch_size: 8,
            bid_simulations: 60,
            max_bid_options: 4,
            min_bid_win_rate: 0.5,
            ..Self::fast()
        }
    }

    #[must_use]
    pub fn strong() -> Self {
        Self {
            determinizations: 40,
            playouts_per_determinization: 150,
            time_limit: Some(Duration::from_secs(3)),
            rollout_bias: 0.7,
            batch_size: 8,
            bid_simulations: 120,
            max_bid_options: 4,
            min_bid_win_rate: 0.5,
            ..Self::fast()
        }
    }

    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_determinizations(mut self, worlds: u32, playouts: u32) -> Self {
        self.determinizations = worlds;
        self.playouts_per_determinization = playouts;
        self
    }

    /// `None` disables the clock so only iteration caps apply.
    pub fn with_time_limit(mut self, limit: Option<Duration>) -> Self {
        self.time_limit = limit;
        self
    }

    pub fn with_rollout_bias(mut self, bias: f64) -> Self {
        self.rollout_bias = bias.clamp(0.0, 1.0);
        self
    }

    pub fn with_bid_simulations(mut self, simulations: u32) -> Self {
        self.bid_simulations = simulations;
        self
    }

    /// Total playouts a card search may run.
    #[must_use]
    pub fn playout_budget(&self) -> u64 {
        u64::from(self.determinizations) * u64::from(self.playouts_per_determinization)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_normal() {
        let config = SearchConfig::default();
        assert_eq!(config, SearchConfig::normal());
        assert!((config.exploration_constant - std::f64::consts::SQRT_2).abs() < 0.001);
    }

    #[test]
    fn test_presets_scale_up() {
        let (fast, normal, strong) = (SearchConfig::fast(), SearchConfig::normal(), SearchConfig::strong());
        assert!(fast.playout_budget() < normal.playout_budget());
        assert!(normal.playout_budget() < strong.playout_budget());
        assert!(fast.bid_simulations < strong.bid_simulations);
    }

    #[test]
    fn test_builder_pattern() {
        let config = SearchConfig::fast()
            .with_exploration(2.0)
            .with_seed(123)
            .with_determinizations(3, 10)
            .with_time_limit(None)
            .with_rollout_bias(1.5);

        assert_eq!(config.exploration_constant, 2.0);
        assert_eq!(config.seed, 123);
        assert_eq!(config.playout_budget(), 30);
        assert_eq!(config.time_limit, None);
        assert_eq!(config.rollout_bias, 1.0);
    }

    #[test]
    fn test_serialization() {
        let config = SearchConfig::strong();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: SearchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
