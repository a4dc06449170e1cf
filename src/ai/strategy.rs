//! Heuristic vs search, per decision.
//!
//! Early tricks are played from heuristics, late tricks are searched, and the
//! middle game searches only once hands are small enough for a search to be
//! cheap and informative. Search results that come back empty fall back to
//! the evaluator, so a decision is always produced.

use tracing::debug;

use crate::core::{Card, GameState, PlayerId, Suit, TRICKS_PER_GAME};
use crate::mcts::{BidSearch, CardSearch, SearchConfig};

use super::config::{AIConfig, Difficulty};
use super::evaluator::select_best_card;
use super::heuristics::heuristic_bid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    Heuristic,
    Search,
}

/// Strategy for `player`'s next card.
#[must_use]
pub fn choose_strategy(state: &GameState, player: PlayerId, difficulty: Difficulty) -> Strategy {
    if difficulty == Difficulty::Easy {
        return Strategy::Heuristic;
    }
    let progress = state.completed_tricks() as f64 / TRICKS_PER_GAME as f64;
    let hand_size = state.players.get(player.index()).map_or(0, |p| p.hand.len());

    if progress >= difficulty.search_always_from() {
        Strategy::Search
    } else if progress >= difficulty.search_from() && hand_size <= difficulty.mid_game_hand_limit() {
        Strategy::Search
    } else {
        Strategy::Heuristic
    }
}

/// Card for `player`, searched or heuristic per [`choose_strategy`].
#[must_use]
pub fn select_card(state: &GameState, player: PlayerId, config: &AIConfig) -> Option<Card> {
    let strategy = choose_strategy(state, player, config.difficulty);
    let searched = match strategy {
        Strategy::Search => {
            let search_config = decision_config(&config.search, config.seed, state, player);
            CardSearch::new(search_config).search(state, player)
        }
        Strategy::Heuristic => None,
    };
    let card = searched.or_else(|| select_best_card(state, player));
    debug!(player = %player, ?strategy, card = ?card, "card selected");
    card
}

/// Declaration for `player`, or `None` to pass.
#[must_use]
pub fn select_bid(state: &GameState, player: PlayerId, config: &AIConfig) -> Option<(u8, Suit)> {
    if config.difficulty == Difficulty::Easy {
        return heuristic_bid(state, player);
    }
    let search_config = decision_config(&config.search, config.seed, state, player);
    BidSearch::new(search_config).search(state, player).declaration
}

/// Per-decision search seed, so consecutive turns do not replay the same
/// sampled worlds.
fn decision_config(search: &SearchConfig, seed: u64, state: &GameState, player: PlayerId) -> SearchConfig {
    let position = (state.completed_tricks() as u64) << 16
        | (state.current_trick.len() as u64) << 8
        | u64::from(state.declaration_turn) << 24
        | player.index() as u64;
    search
        .clone()
        .with_seed(search.seed ^ seed ^ position.wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Trick;
    use crate::rules::engine::initialize_game;

    fn with_tricks(completed: usize, hand_size: usize) -> GameState {
        let mut state = initialize_game(["A", "B", "C", "D"], 4);
        for _ in 0..completed {
            state.tricks.push_back(Trick::new());
        }
        state.players[1].hand = state.players[1].hand.iter().copied().take(hand_size).collect();
        state
    }

    #[test]
    fn test_easy_is_always_heuristic() {
        let state = with_tricks(11, 1);
        assert_eq!(choose_strategy(&state, PlayerId::new(1), Difficulty::Easy), Strategy::Heuristic);
    }

    #[test]
    fn test_normal_progression() {
        let p = PlayerId::new(1);
        assert_eq!(choose_strategy(&with_tricks(0, 12), p, Difficulty::Normal), Strategy::Heuristic);
        assert_eq!(choose_strategy(&with_tricks(4, 8), p, Difficulty::Normal), Strategy::Search);
        assert_eq!(choose_strategy(&with_tricks(4, 9), p, Difficulty::Normal), Strategy::Heuristic);
        assert_eq!(choose_strategy(&with_tricks(8, 4), p, Difficulty::Normal), Strategy::Search);
    }

    #[test]
    fn test_hard_searches_from_first_trick() {
        let state = with_tricks(0, 12);
        assert_eq!(choose_strategy(&state, PlayerId::new(1), Difficulty::Hard), Strategy::Search);
    }

    #[test]
    fn test_decision_seed_varies_by_position() {
        let state = initialize_game(["A", "B", "C", "D"], 4);
        let base = SearchConfig::fast();
        let a = decision_config(&base, 1, &state, PlayerId::new(0));
        let b = decision_config(&base, 1, &state, PlayerId::new(1));
        assert_ne!(a.seed, b.seed);
        assert_eq!(a.seed, decision_config(&base, 1, &state, PlayerId::new(0)).seed);
    }
}
