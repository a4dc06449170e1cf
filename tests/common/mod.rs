//! Shared fixtures for integration tests.

#![allow(dead_code)]

use napoleon::ai::{choose_adjutant_card, choose_discards};
use napoleon::core::{Card, GameState, NapoleonDeclaration, PlayerId, Suit};
use napoleon::rules::{declare, exchange_cards, initialize_game, pass, set_adjutant};
use napoleon::sim::legal_plays;

/// Install a subscriber once; `RUST_LOG` controls the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Seat 0 declares `target` in `suit`, seats 1-3 pass.
pub fn won_bidding(seed: u64, target: u8, suit: Suit) -> GameState {
    let state = initialize_game(["North", "East", "South", "West"], seed);
    let mut state = declare(&state, NapoleonDeclaration::new(PlayerId::new(0), target, suit))
        .expect("opening declaration");
    for seat in 1..4 {
        state = pass(&state, PlayerId::new(seat)).expect("pass");
    }
    state
}

/// Bidding, adjutant and exchange done heuristically; seat 0 leads.
pub fn playing(seed: u64) -> GameState {
    let state = won_bidding(seed, 13, Suit::Spades);
    let card = choose_adjutant_card(&state, PlayerId::new(0));
    let state = set_adjutant(&state, card).expect("adjutant");
    let discard = choose_discards(&state, PlayerId::new(0));
    exchange_cards(&state, PlayerId::new(0), &discard).expect("exchange")
}

/// First legal card for the seat to act.
pub fn first_legal(state: &GameState) -> Card {
    legal_plays(state, state.current_player_index)[0]
}
