//! Determinized Monte Carlo card search.
//!
//! For each sampled world the searching seat's candidate cards compete for a
//! fixed number of playouts under the selection policy (UCB1 by default).
//! Per-card statistics are then merged across worlds and the best aggregate
//! win rate is played.
//!
//! Worlds run in parallel batches on the rayon pool. Each world owns its
//! cloned state and a forked RNG, so results only depend on the seed when the
//! playout cap (not the clock) binds. The time limit and the cancellation
//! flag are checked between batches; a started playout always finishes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use tracing::{debug, trace, warn};

use crate::core::{Card, GameError, GameRng, GameState, PlayerId};
use crate::sim::{apply_play_in_place, determinize, legal_plays};

use super::config::SearchConfig;
use super::policy::{HeuristicRollout, RolloutPolicy, SelectionPolicy, UCB1};
use super::stats::{ArmStats, SearchStats};

/// Card search context.
///
/// Owns the configuration and policies, and keeps the statistics of the last
/// search for inspection.
pub struct CardSearch {
    config: SearchConfig,
    selection: Box<dyn SelectionPolicy>,
    rollout: Box<dyn RolloutPolicy>,
    cancel: Option<Arc<AtomicBool>>,
    stats: SearchStats,
    card_stats: Vec<(Card, ArmStats)>,
}

impl CardSearch {
    /// UCB1 selection with heuristic rollouts biased by `config.rollout_bias`.
    #[must_use]
    pub fn new(config: SearchConfig) -> Self {
        let rollout = HeuristicRollout::new(config.rollout_bias);
        Self {
            config,
            selection: Box::new(UCB1),
            rollout: Box::new(rollout),
            cancel: None,
            stats: SearchStats::default(),
            card_stats: Vec::new(),
        }
    }

    pub fn with_selection<S: SelectionPolicy + 'static>(mut self, selection: S) -> Self {
        self.selection = Box::new(selection);
        self
    }

    pub fn with_rollout<R: RolloutPolicy + 'static>(mut self, rollout: R) -> Self {
        self.rollout = Box::new(rollout);
        self
    }

    /// Stop between batches once `flag` is set.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Best card for `player`, or `None` if there is nothing to play or the
    /// search was stopped before any playout finished.
    pub fn search(&mut self, state: &GameState, player: PlayerId) -> Option<Card> {
        let start = Instant::now();
        self.stats.reset();
        self.card_stats.clear();

        let plays = legal_plays(state, player);
        match plays.len() {
            0 => return None,
            1 => return Some(plays[0]),
            _ => {}
        }

        let mut merged: FxHashMap<Card, ArmStats> = FxHashMap::default();
        let mut root_rng = GameRng::new(self.config.seed);
        let batch_size = self.config.batch_size.max(1);
        let mut remaining = self.config.determinizations;

        while remaining > 0 {
            if self.should_stop(start) {
                break;
            }
            let batch = remaining.min(batch_size as u32);
            remaining -= batch;

            let rngs: Vec<GameRng> = (0..batch).map(|_| root_rng.fork()).collect();
            let (selection, rollout, config) = (&*self.selection, &*self.rollout, &self.config);
            let outcomes: Vec<Result<Vec<ArmStats>, GameError>> = rngs
                .into_par_iter()
                .map(|rng| run_world(state, player, &plays, rng, selection, rollout, config))
                .collect();

            for outcome in outcomes {
                match outcome {
                    Ok(arms) => {
                        self.stats.determinizations += 1;
                        for (card, arm) in plays.iter().zip(&arms) {
                            self.stats.iterations += arm.visits;
                            merged.entry(*card).or_default().merge(arm);
                        }
                    }
                    Err(error) => {
                        self.stats.failed_worlds += 1;
                        warn!(%error, "playout failed, world discarded");
                    }
                }
            }
            self.stats.batches += 1;
            trace!(batch = self.stats.batches, playouts = self.stats.iterations, "batch complete");
        }

        self.stats.time_us = start.elapsed().as_micros() as u64;
        self.card_stats = plays
            .iter()
            .map(|c| (*c, merged.get(c).copied().unwrap_or_default()))
            .collect();

        let best = self
            .card_stats
            .iter()
            .filter(|(_, arm)| arm.visits > 0)
            .fold(None::<(Card, f64)>, |best, (card, arm)| match best {
                Some((_, rate)) if rate >= arm.win_rate() => best,
                _ => Some((*card, arm.win_rate())),
            });

        debug!(
            player = %player,
            playouts = self.stats.iterations,
            worlds = self.stats.determinizations,
            cut_short = self.stats.cut_short(),
            best = ?best,
            "card search finished"
        );
        best.map(|(card, _)| card)
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

    /// Merged statistics per candidate card from the last search.
    #[must_use]
    pub fn card_stats(&self) -> &[(Card, ArmStats)] {
        &self.card_stats
    }

    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }
}

/// Playouts over all candidates in one sampled world.
fn run_world(
    state: &GameState,
    player: PlayerId,
    plays: &[Card],
    mut rng: GameRng,
    selection: &dyn SelectionPolicy,
    rollout: &dyn RolloutPolicy,
    config: &SearchConfig,
) -> Result<Vec<ArmStats>, GameError> {
    let world = determinize(state, player, &mut rng);
    let on_napoleon_side = world.is_napoleon_side(player);
    let mut arms = vec![ArmStats::default(); plays.len()];

    for _ in 0..config.playouts_per_determinization {
        let idx = selection.select(&arms, config);
        let mut sim = world.clone();
        apply_play_in_place(&mut sim, player, plays[idx])?;
        let outcome = rollout.rollout(&mut sim, &mut rng)?;
        arms[idx].record(if outcome.napoleon_won == on_napoleon_side { 1.0 } else { 0.0 });
    }
    Ok(arms)
}
