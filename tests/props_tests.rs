//! Property-based tests over randomly played games.

mod common;

use proptest::prelude::*;

use common::playing;
use napoleon::core::{Card, GameRng, GameState, NapoleonDeclaration, Phase, PlayerId, Suit};
use napoleon::rules::{
    calculate_game_result, declare, initialize_game, is_game_decided, pass, play_card,
    validate_consistency,
};
use napoleon::sim::{determinize, legal_plays};

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 48,
        ..ProptestConfig::default()
    }
}

fn suit() -> impl Strategy<Value = Suit> {
    prop::sample::select(Suit::ALL.to_vec())
}

/// Play `picks.len()` cards, each chosen by index among the legal plays.
fn play_random(mut state: GameState, picks: &[usize]) -> GameState {
    for &pick in picks {
        if state.phase != Phase::Playing {
            break;
        }
        let plays = legal_plays(&state, state.current_player_index);
        let card = plays[pick % plays.len()];
        state = play_card(&state, state.current_player_index, card).unwrap();
    }
    state
}

fn sorted(cards: impl IntoIterator<Item = Card>) -> Vec<Card> {
    let mut cards: Vec<Card> = cards.into_iter().collect();
    cards.sort();
    cards
}

proptest! {
    #![proptest_config(config())]

    /// Hands, hidden pile and tricks always hold each of the 52 cards once.
    #[test]
    fn prop_card_conservation(seed in any::<u64>(), picks in prop::collection::vec(any::<usize>(), 0..48)) {
        let state = play_random(playing(seed), &picks);
        prop_assert_eq!(state.card_count(), 52);
        prop_assert!(validate_consistency(&state).is_ok());
    }

    /// A card is accepted exactly when it is among the legal plays.
    #[test]
    fn prop_follow_suit_legality(seed in any::<u64>(), picks in prop::collection::vec(any::<usize>(), 0..40)) {
        let state = play_random(playing(seed), &picks);
        prop_assume!(state.phase == Phase::Playing);

        let player = state.current_player_index;
        let legal = legal_plays(&state, player);
        for &card in &state.players[player.index()].hand {
            let accepted = play_card(&state, player, card).is_ok();
            prop_assert_eq!(accepted, legal.contains(&card), "card {}", card);
            if let (Some(lead), true) = (state.leading_suit(), accepted) {
                let holds_lead = state.players[player.index()].has_suit(lead);
                prop_assert!(!holds_lead || card.suit == lead);
            }
        }
    }

    /// Accepted declarations strictly increase by (target, suit priority).
    #[test]
    fn prop_declaration_monotonicity(
        seed in any::<u64>(),
        attempts in prop::collection::vec((13u8..=20, suit(), any::<bool>()), 1..24),
    ) {
        let mut state = initialize_game(["A", "B", "C", "D"], seed);
        let mut accepted: Vec<(u8, u8)> = Vec::new();

        for (target, suit, try_declare) in attempts {
            if state.phase != Phase::Bidding || state.needs_redeal {
                break;
            }
            let player = state.current_player_index;
            if try_declare {
                if let Ok(next) = declare(&state, NapoleonDeclaration::new(player, target, suit)) {
                    accepted.push((target, suit.priority()));
                    state = next;
                    continue;
                }
            }
            state = pass(&state, player).unwrap();
        }

        for pair in accepted.windows(2) {
            prop_assert!(pair[0] < pair[1], "{:?} then {:?}", pair[0], pair[1]);
        }
    }

    /// Determinization keeps the perspective hand, played cards and hand
    /// sizes, and only permutes the unseen cards.
    #[test]
    fn prop_determinization_fidelity(
        seed in any::<u64>(),
        picks in prop::collection::vec(any::<usize>(), 0..40),
        seat in 0u8..4,
        world_seed in any::<u64>(),
    ) {
        let state = play_random(playing(seed), &picks);
        let perspective = PlayerId::new(seat);
        let world = determinize(&state, perspective, &mut GameRng::new(world_seed));

        prop_assert_eq!(&world.players[seat as usize].hand, &state.players[seat as usize].hand);
        prop_assert_eq!(&world.tricks, &state.tricks);
        prop_assert_eq!(&world.current_trick, &state.current_trick);
        prop_assert_eq!(world.hidden_cards.len(), state.hidden_cards.len());

        let unseen = |s: &GameState| {
            sorted(
                s.players
                    .iter()
                    .filter(|p| p.id != perspective)
                    .flat_map(|p| p.hand.iter().copied())
                    .chain(s.hidden_cards.iter().copied()),
            )
        };
        prop_assert_eq!(unseen(&world), unseen(&state));
        for (a, b) in world.players.iter().zip(state.players.iter()) {
            prop_assert_eq!(a.hand.len(), b.hand.len());
        }
        prop_assert!(validate_consistency(&world).is_ok());
    }

    /// Once a game is reported decided, finishing it never changes the result.
    #[test]
    fn prop_early_decision_never_misfires(seed in any::<u64>(), picks in prop::collection::vec(any::<usize>(), 48)) {
        let mut state = playing(seed);
        let mut early: Option<bool> = None;

        for &pick in &picks {
            if state.phase != Phase::Playing {
                break;
            }
            if early.is_none() {
                early = is_game_decided(&state).napoleon_won;
            }
            state = play_random(state, &[pick]);
        }

        prop_assert_eq!(state.phase, Phase::Finished);
        let result = calculate_game_result(&state).unwrap();
        if let Some(napoleon_won) = early {
            prop_assert_eq!(napoleon_won, result.napoleon_won);
        }
    }
}
