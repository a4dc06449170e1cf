//! Heuristic choices outside card play: bid estimate, adjutant card and
//! exchange discards. Also used inside bid-search simulations.

use crate::core::{Card, GameState, PlayerId, Rank, Suit};
use crate::rules::bidding::legal_declarations;
use crate::rules::engine::DISCARD_COUNT;
use crate::rules::special::{counter_jack, is_named_card, trump_jack, HEART_QUEEN, MIGHTY};

/// Face cards a hand with no useful features is expected to collect.
const BASE_EXPECTATION: f64 = 5.0;

/// Expected face cards the Napoleon side captures with `hand` and `trump`.
#[must_use]
pub fn expected_face_cards<'a>(hand: impl IntoIterator<Item = &'a Card>, trump: Suit) -> f64 {
    let mut points = 0.0;
    for &card in hand {
        points += if card == MIGHTY {
            3.0
        } else if card == trump_jack(trump) {
            2.5
        } else if card == counter_jack(trump) {
            2.0
        } else if card.suit == trump {
            match card.rank {
                Rank::Ace => 1.6,
                Rank::King => 1.3,
                Rank::Queen => 1.1,
                _ => 0.8,
            }
        } else if card.rank == Rank::Ace {
            1.0
        } else if card == HEART_QUEEN {
            0.5
        } else if card.rank == Rank::King {
            0.3
        } else {
            0.0
        };
    }
    (BASE_EXPECTATION + points).min(20.0)
}

/// Suits ordered by how well `hand` supports them as trump, best first.
#[must_use]
pub fn rank_trump_suits(state: &GameState, player: PlayerId) -> Vec<(Suit, f64)> {
    let hand = &state.players[player.index()].hand;
    let mut suits: Vec<(Suit, f64)> = Suit::ALL
        .iter()
        .map(|&s| (s, expected_face_cards(hand.iter(), s)))
        .collect();
    suits.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.0.priority().cmp(&a.0.priority()))
    });
    suits
}

/// Cheapest legal declaration per suit, best-supported suit first.
#[must_use]
pub fn candidate_declarations(state: &GameState, player: PlayerId) -> Vec<(u8, Suit, f64)> {
    let legal = legal_declarations(state.napoleon_declaration.as_ref());
    rank_trump_suits(state, player)
        .into_iter()
        .filter_map(|(suit, expected)| {
            legal
                .iter()
                .find(|(_, s)| *s == suit)
                .map(|&(target, _)| (target, suit, expected))
        })
        .collect()
}

/// Declare the cheapest legal bid in the best suit if the hand supports it.
#[must_use]
pub fn heuristic_bid(state: &GameState, player: PlayerId) -> Option<(u8, Suit)> {
    candidate_declarations(state, player)
        .into_iter()
        .find(|&(target, _, expected)| expected >= f64::from(target))
        .map(|(target, suit, _)| (target, suit))
}

/// Strongest card the Napoleon does not hold.
///
/// Preference: Mighty, trump Jack, counter Jack, trump Ace, other Aces
/// (strongest suit first), then trump King and Queen.
#[must_use]
pub fn choose_adjutant_card(state: &GameState, napoleon: PlayerId) -> Card {
    let hand = &state.players[napoleon.index()].hand;
    let trump = state.trump_suit.unwrap_or(Suit::Spades);

    let mut preferences = vec![MIGHTY, trump_jack(trump), counter_jack(trump), Card::new(trump, Rank::Ace)];
    preferences.extend(Suit::ALL.iter().map(|&s| Card::new(s, Rank::Ace)));
    preferences.push(Card::new(trump, Rank::King));
    preferences.push(Card::new(trump, Rank::Queen));

    preferences
        .into_iter()
        .find(|c| !hand.contains(c))
        .unwrap_or_else(|| {
            Rank::ALL
                .iter()
                .rev()
                .map(|&r| Card::new(trump, r))
                .find(|c| !hand.contains(c))
                .unwrap_or(MIGHTY)
        })
}

/// Four cards to discard after taking the hidden pile.
///
/// Keeps named cards, trumps and face cards; among the rest, throws low
/// cards from short suits first to create voids.
#[must_use]
pub fn choose_discards(state: &GameState, napoleon: PlayerId) -> Vec<Card> {
    let hand = &state.players[napoleon.index()].hand;
    let trump = state.trump_suit;
    let adjutant_card = state.napoleon_declaration.and_then(|d| d.adjutant_card);

    let suit_len = |suit: Suit| hand.iter().filter(|c| c.suit == suit).count() as u32;
    let keep_value = |card: &Card| -> u32 {
        let value = u32::from(card.value());
        if is_named_card(*card, trump) || Some(*card) == adjutant_card {
            1000
        } else if Some(card.suit) == trump {
            200 + value
        } else if card.is_face() {
            100 + value
        } else {
            value + 3 * suit_len(card.suit)
        }
    };

    let mut cards: Vec<Card> = hand.iter().copied().collect();
    cards.sort_by_key(|c| (keep_value(c), *c));
    cards.truncate(DISCARD_COUNT);
    cards
}
