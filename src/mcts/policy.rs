//! Search policies for arm selection and rollouts.
//!
//! Policies are trait-based to allow customization:
//! - `SelectionPolicy`: which candidate card gets the next playout (UCB1)
//! - `RolloutPolicy`: how the remaining cards are played out (random,
//!   heuristic-biased)

use crate::ai::evaluator::select_best_card;
use crate::core::{Card, GameError, GameRng, GameState, PlayerId};
use crate::sim::{apply_play_in_place, is_terminal, legal_plays, result, SimResult};

use super::config::SearchConfig;
use super::stats::ArmStats;

// =============================================================================
// Selection Policy
// =============================================================================

/// Policy for choosing which candidate receives the next playout.
pub trait SelectionPolicy: Send + Sync {
    /// Index into `arms` of the candidate to try next.
    fn select(&self, arms: &[ArmStats], config: &SearchConfig) -> usize;
}

/// UCB1 (Upper Confidence Bound) selection policy.
///
/// Balances exploitation (high win rate) with exploration (low visits).
/// Formula: Q(a) + c * sqrt(ln(N) / n(a))
#[derive(Clone, Debug, Default)]
pub struct UCB1;

impl SelectionPolicy for UCB1 {
    fn select(&self, arms: &[ArmStats], config: &SearchConfig) -> usize {
        let total: u32 = arms.iter().map(|a| a.visits).sum();
        let ln_total = f64::from(total.max(1)).ln();

        arms.iter()
            .enumerate()
            .map(|(i, arm)| {
                let exploration = if arm.visits == 0 {
                    f64::INFINITY
                } else {
                    config.exploration_constant * (ln_total / f64::from(arm.visits)).sqrt()
                };
                (i, arm.win_rate() + exploration)
            })
            .max_by(|(ia, a), (ib, b)| {
                a.partial_cmp(b)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| ib.cmp(ia))
            })
            .map(|(i, _)| i)
            .unwrap_or(0)
    }
}

/// Round-robin over candidates, ignoring results.
#[derive(Clone, Debug, Default)]
pub struct Uniform;

impl SelectionPolicy for Uniform {
    fn select(&self, arms: &[ArmStats], _config: &SearchConfig) -> usize {
        arms.iter()
            .enumerate()
            .min_by_key(|(i, a)| (a.visits, *i))
            .map(|(i, _)| i)
            .unwrap_or(0)
    }
}

// =============================================================================
// Rollout Policy
// =============================================================================

/// Policy for playing a determinized game to the end.
pub trait RolloutPolicy: Send + Sync {
    /// Pick one of `plays` (never empty) for `player`.
    fn choose(&self, state: &GameState, player: PlayerId, plays: &[Card], rng: &mut GameRng) -> Card;

    /// Play until [`is_terminal`] and score the result.
    ///
    /// The state is modified during the rollout.
    fn rollout(&self, state: &mut GameState, rng: &mut GameRng) -> Result<SimResult, GameError> {
        while !is_terminal(state) {
            let player = state.current_player_index;
            let plays = legal_plays(state, player);
            if plays.is_empty() {
                return Err(GameError::invariant(format!("{player} has no legal play")));
            }
            let card = self.choose(state, player, &plays, rng);
            apply_play_in_place(state, player, card)?;
        }
        result(state)
    }
}

/// Uniformly random legal plays.
#[derive(Clone, Debug, Default)]
pub struct RandomRollout;

impl RolloutPolicy for RandomRollout {
    fn choose(&self, _state: &GameState, _player: PlayerId, plays: &[Card], rng: &mut GameRng) -> Card {
        rng.choose(plays).copied().unwrap_or(plays[0])
    }
}

/// Follows the card evaluator with probability `bias`, otherwise random.
#[derive(Clone, Debug)]
pub struct HeuristicRollout {
    pub bias: f64,
}

impl HeuristicRollout {
    #[must_use]
    pub fn new(bias: f64) -> Self {
        Self {
            bias: bias.clamp(0.0, 1.0),
        }
    }
}

impl Default for HeuristicRollout {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl RolloutPolicy for HeuristicRollout {
    fn choose(&self, state: &GameState, player: PlayerId, plays: &[Card], rng: &mut GameRng) -> Card {
        if rng.gen_bool(self.bias) {
            if let Some(card) = select_best_card(state, player).filter(|c| plays.contains(c)) {
                return card;
            }
        }
        RandomRollout.choose(state, player, plays, rng)
    }
}
