//! Monte Carlo bid selection.
//!
//! Each candidate declaration is tried in the same set of sampled worlds
//! (common random numbers): the other seats are assumed to pass, the
//! Napoleon picks an adjutant card and discards heuristically, and the game
//! is rolled out. The best win rate is declared if it clears
//! `min_bid_win_rate`; otherwise the seat passes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::ai::heuristics::{candidate_declarations, choose_adjutant_card, choose_discards};
use crate::core::{GameError, GameRng, GameState, NapoleonDeclaration, Phase, PlayerId, Suit};
use crate::rules::engine::{assign_adjutant, discard_cards};
use crate::sim::determinize;

use super::config::SearchConfig;
use super::policy::{HeuristicRollout, RolloutPolicy};
use super::stats::{ArmStats, SearchStats};

/// Simulated outcome of one candidate declaration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BidCandidate {
    pub target: u8,
    pub suit: Suit,
    pub stats: ArmStats,
}

impl BidCandidate {
    #[must_use]
    pub fn win_rate(&self) -> f64 {
        self.stats.win_rate()
    }
}

/// Result of a bid search. `declaration` is `None` when the seat should pass.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BidDecision {
    pub declaration: Option<(u8, Suit)>,
    pub candidates: Vec<BidCandidate>,
}

pub struct BidSearch {
    config: SearchConfig,
    rollout: Box<dyn RolloutPolicy>,
    cancel: Option<Arc<AtomicBool>>,
    stats: SearchStats,
}

impl BidSearch {
    #[must_use]
    pub fn new(config: SearchConfig) -> Self {
        let rollout = HeuristicRollout::new(config.rollout_bias);
        Self {
            config,
            rollout: Box::new(rollout),
            cancel: None,
            stats: SearchStats::default(),
        }
    }

    pub fn with_rollout<R: RolloutPolicy + 'static>(mut self, rollout: R) -> Self {
        self.rollout = Box::new(rollout);
        self
    }

    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Evaluate the cheapest legal declaration in each of the best-supported
    /// suits for `player`.
    pub fn search(&mut self, state: &GameState, player: PlayerId) -> BidDecision {
        let start = Instant::now();
        self.stats.reset();

        let options: Vec<(u8, Suit)> = candidate_declarations(state, player)
            .into_iter()
            .take(self.config.max_bid_options)
            .map(|(target, suit, _)| (target, suit))
            .collect();
        if options.is_empty() || state.phase != Phase::Bidding {
            return BidDecision::default();
        }

        let mut root_rng = GameRng::new(self.config.seed);
        let world_rngs: Vec<GameRng> = (0..self.config.bid_simulations)
            .map(|_| root_rng.fork())
            .collect();
        let batch_size = self.config.batch_size.max(1);

        let mut candidates = Vec::with_capacity(options.len());
        'options: for (target, suit) in options {
            let mut stats = ArmStats::default();
            for chunk in world_rngs.chunks(batch_size) {
                if self.should_stop(start) {
                    if stats.visits > 0 {
                        candidates.push(BidCandidate { target, suit, stats });
                    }
                    break 'options;
                }
                let rollout = &*self.rollout;
                let outcomes: Vec<Result<bool, GameError>> = chunk
                    .par_iter()
                    .map(|rng| simulate_declaration(state, player, target, suit, rng.clone(), rollout))
                    .collect();

                for outcome in outcomes {
                    match outcome {
                        Ok(won) => {
                            stats.record(if won { 1.0 } else { 0.0 });
                            self.stats.iterations += 1;
                        }
                        Err(error) => {
                            self.stats.failed_worlds += 1;
                            warn!(%error, "bid simulation failed");
                        }
                    }
                }
                self.stats.batches += 1;
            }
            trace!(bid_target = target, suit = %suit, win_rate = stats.win_rate(), "declaration simulated");
            candidates.push(BidCandidate { target, suit, stats });
        }
        self.stats.determinizations = self.config.bid_simulations;
        self.stats.time_us = start.elapsed().as_micros() as u64;

        let best = candidates.iter().fold(None::<&BidCandidate>, |best, c| match best {
            Some(b) if b.win_rate() >= c.win_rate() => best,
            _ => Some(c),
        });
        let declaration = best
            .filter(|c| c.stats.visits > 0 && c.win_rate() >= self.config.min_bid_win_rate)
            .map(|c| (c.target, c.suit));

        debug!(
            player = %player,
            options = candidates.len(),
            best_rate = best.map(BidCandidate::win_rate),
            declaration = ?declaration,
            "bid search finished"
        );
        BidDecision {
            declaration,
            candidates,
        }
    }

    fn should_stop(&mut self, start: Instant) -> bool {
        if self.cancel.as_ref().is_some_and(|f| f.load(Ordering::Relaxed)) {
            self.stats.cancelled = true;
            return true;
        }
        if self.config.time_limit.is_some_and(|limit| start.elapsed() >= limit) {
            self.stats.timed_out = true;
            return true;
        }
        false
    }

    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }
}

/// Play one sampled game in which `player` wins the bidding with
/// `(target, suit)`. Returns whether the Napoleon side made the target.
fn simulate_declaration(
    state: &GameState,
    player: PlayerId,
    target: u8,
    suit: Suit,
    mut rng: GameRng,
    rollout: &dyn RolloutPolicy,
) -> Result<bool, GameError> {
    let mut world = determinize(state, player, &mut rng);
    for p in world.players.iter_mut() {
        p.is_napoleon = p.id == player;
        p.is_adjutant = false;
    }
    world.passed_players = PlayerId::all().filter(|&p| p != player).collect();
    world.needs_redeal = false;
    world.napoleon_declaration = Some(NapoleonDeclaration::new(player, target, suit));
    world.trump_suit = Some(suit);
    world.phase = Phase::Adjutant;
    world.current_player_index = player;

    let adjutant_card = choose_adjutant_card(&world, player);
    assign_adjutant(&mut world, adjutant_card)?;
    let discard = choose_discards(&world, player);
    discard_cards(&mut world, player, &discard)?;

    Ok(rollout.rollout(&mut world, &mut rng)?.napoleon_won)
}
