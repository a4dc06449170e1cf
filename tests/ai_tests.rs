//! AI integration tests: full games driven by `process_ai_turn`.

mod common;

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use common::{init_tracing, playing, won_bidding};
use napoleon::ai::{is_ai_turn, process_ai_turn, select_best_card, AIConfig, Difficulty};
use napoleon::core::{GameState, Phase, PlayerId, Suit};
use napoleon::mcts::{BidSearch, CardSearch, SearchConfig};
use napoleon::rules::{calculate_game_result, initialize_ai_game, pass, validate_consistency};
use napoleon::sim::legal_plays;

fn all_ai(mut state: GameState) -> GameState {
    for p in state.players.iter_mut() {
        p.is_ai = true;
    }
    state
}

fn tiny_search() -> SearchConfig {
    SearchConfig::fast()
        .with_determinizations(2, 6)
        .with_bid_simulations(2)
        .with_time_limit(None)
        .with_seed(99)
}

/// Step until the game finishes, checking consistency after every action.
fn drive(mut state: GameState, config: &AIConfig) -> GameState {
    for _ in 0..200 {
        if state.phase == Phase::Finished {
            break;
        }
        assert!(is_ai_turn(&state));
        state = process_ai_turn(&state, config).unwrap();
        validate_consistency(&state).unwrap();
    }
    state
}

#[test]
fn test_heuristic_ai_finishes_game() {
    init_tracing();
    let state = all_ai(won_bidding(21, 13, Suit::Spades));
    let config = AIConfig::for_difficulty(Difficulty::Easy);

    let state = drive(state, &config);
    assert_eq!(state.phase, Phase::Finished);
    assert_eq!(state.tricks.len(), 12);
    calculate_game_result(&state).unwrap();
}

#[test]
fn test_search_ai_finishes_game() {
    init_tracing();
    let state = all_ai(won_bidding(22, 14, Suit::Hearts));
    let config = AIConfig::for_difficulty(Difficulty::Hard).with_search(tiny_search());

    let state = drive(state, &config);
    assert_eq!(state.phase, Phase::Finished);
}

#[test]
fn test_ai_game_is_reproducible() {
    let config = AIConfig::for_difficulty(Difficulty::Hard).with_search(tiny_search());
    let run = || {
        let state = drive(all_ai(won_bidding(23, 13, Suit::Clubs)), &config);
        state.tricks.iter().cloned().collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}

#[test]
fn test_ai_bids_with_zero_threshold() {
    let mut search = tiny_search();
    search.min_bid_win_rate = 0.0;
    let config = AIConfig::for_difficulty(Difficulty::Normal).with_search(search);

    let state = initialize_ai_game("Human", 24);
    let state = pass(&state, PlayerId::new(0)).unwrap();
    let next = process_ai_turn(&state, &config).unwrap();

    let declaration = next.napoleon_declaration.unwrap();
    assert_eq!(declaration.player_id, PlayerId::new(1));
    assert!(next.players[1].is_napoleon);
}

#[test]
fn test_ai_drives_adjutant_and_exchange() {
    let state = all_ai(won_bidding(25, 13, Suit::Spades));
    let config = AIConfig::for_difficulty(Difficulty::Easy);

    let state = process_ai_turn(&state, &config).unwrap();
    assert_eq!(state.phase, Phase::Exchange);
    assert!(state.napoleon_declaration.unwrap().adjutant_card.is_some());
    assert_eq!(state.players[0].hand.len(), 16);

    let state = process_ai_turn(&state, &config).unwrap();
    assert_eq!(state.phase, Phase::Playing);
    assert_eq!(state.players[0].hand.len(), 12);
}

#[test]
fn test_human_napoleon_is_not_driven() {
    let state = won_bidding(26, 13, Suit::Spades);
    assert!(!is_ai_turn(&state));
    let next = process_ai_turn(&state, &AIConfig::default()).unwrap();
    assert_eq!(next, state);
}

#[test]
fn test_evaluator_picks_legal_cards_all_game() {
    let mut state = playing(27);
    while state.phase == Phase::Playing {
        let player = state.current_player_index;
        let card = select_best_card(&state, player).unwrap();
        assert!(legal_plays(&state, player).contains(&card));
        state = napoleon::rules::play_card(&state, player, card).unwrap();
    }
    assert_eq!(state.phase, Phase::Finished);
}

#[test]
fn test_cancelled_searches_stop() {
    let flag = Arc::new(AtomicBool::new(true));

    let state = playing(28);
    let mut search = CardSearch::new(tiny_search()).with_cancel_flag(Arc::clone(&flag));
    assert_eq!(search.search(&state, PlayerId::new(0)), None);
    assert!(search.stats().cancelled);

    let state = initialize_ai_game("Human", 28);
    let mut bids = BidSearch::new(tiny_search()).with_cancel_flag(flag);
    assert_eq!(bids.search(&state, PlayerId::new(0)).declaration, None);
}
