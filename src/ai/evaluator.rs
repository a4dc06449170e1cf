//! Heuristic card evaluation.
//!
//! ## Scoring
//!
//! [`score_card`] adds up:
//! - base trick strength from [`card_strength`]
//! - named-card bonuses
//! - a role adjustment (Napoleon likes strength, the adjutant the middle,
//!   opponents the extremes)
//! - Same-2 potential and breakage
//! - a discount for low cards of a lead suit that can no longer go Same-2
//! - Same-2 risk on face cards
//!
//! and scales the total by game phase.
//!
//! ## Selection
//!
//! [`select_best_card`] branches on leading vs following. Followers first ask
//! whether any legal card takes the trick; scores only break ties between
//! cards of equal strength.

use std::cmp::Ordering;

use crate::core::{Card, GameState, PlayedCard, PlayerId, Rank, Suit, Trick, PLAYER_COUNT, TRICKS_PER_GAME};
use crate::rules::special::{
    card_strength, is_counter_jack, is_mighty, is_named_card, is_trump_jack, provisional_winner,
    resolve_trick_winner, same_two_breaker, same_two_live,
};
use crate::sim::legal_plays;

const MIGHTY_BONUS: f64 = 300.0;
const TRUMP_JACK_BONUS: f64 = 200.0;
const COUNTER_JACK_BONUS: f64 = 190.0;
const PLAIN_TRUMP_BONUS: f64 = 40.0;

/// Strength the adjutant and opponents measure "middle" against.
const MID_STRENGTH: f64 = 300.0;
const ADJUTANT_SIGNAL_BONUS: f64 = 400.0;
const CONTROL_PENALTY: f64 = 40.0;

const SAME_TWO_LEAD_BONUS: f64 = 120.0;
const SAME_TWO_LIVE_BONUS: f64 = 150.0;
const SAME_TWO_BROKEN_PENALTY: f64 = 90.0;
const NON_VIABLE_DISCOUNT: f64 = 30.0;
const NON_VIABLE_MAX_VALUE: u8 = 6;
const FACE_RISK_PENALTY: f64 = 70.0;

/// How a seat plays, as far as it knows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Napoleon,
    Adjutant,
    Opponent,
}

impl Role {
    #[must_use]
    pub fn of(state: &GameState, player: PlayerId) -> Self {
        match state.players.get(player.index()) {
            Some(p) if p.is_napoleon => Role::Napoleon,
            Some(p) if p.is_adjutant => Role::Adjutant,
            _ => Role::Opponent,
        }
    }

    #[must_use]
    pub fn is_napoleon_side(self) -> bool {
        matches!(self, Role::Napoleon | Role::Adjutant)
    }
}

/// Heuristic desirability of playing `card` now.
#[must_use]
pub fn score_card(card: Card, state: &GameState, player: PlayerId) -> f64 {
    Evaluator::new(state, player).score(card)
}

/// The evaluator's pick among `player`'s legal plays.
#[must_use]
pub fn select_best_card(state: &GameState, player: PlayerId) -> Option<Card> {
    let plays = legal_plays(state, player);
    match plays.len() {
        0 => None,
        1 => Some(plays[0]),
        _ => {
            let eval = Evaluator::new(state, player);
            if state.current_trick.is_empty() {
                eval.choose_lead(&plays)
            } else {
                eval.choose_follow(&plays)
            }
        }
    }
}

/// Per-decision context shared by scoring and selection.
struct Evaluator<'a> {
    state: &'a GameState,
    player: PlayerId,
    role: Role,
    trump: Option<Suit>,
    lead: Option<Suit>,
    first_trick: bool,
    progress: f64,
    trick: &'a Trick,
}

impl<'a> Evaluator<'a> {
    fn new(state: &'a GameState, player: PlayerId) -> Self {
        Self {
            state,
            player,
            role: Role::of(state, player),
            trump: state.trump_suit,
            lead: state.leading_suit(),
            first_trick: state.is_first_trick(),
            progress: state.completed_tricks() as f64 / TRICKS_PER_GAME as f64,
            trick: &state.current_trick,
        }
    }

    // === Scoring ===

    fn strength(&self, card: Card) -> u32 {
        card_strength(card, self.trump, self.lead.or(Some(card.suit)), self.first_trick)
    }

    fn score(&self, card: Card) -> f64 {
        let strength = f64::from(self.strength(card));
        let total = strength
            + self.named_bonus(card)
            + self.role_adjustment(card, strength)
            + self.same_two_adjustment(card)
            - self.non_viable_discount(card)
            - self.face_card_risk(card);
        total * self.phase_weight()
    }

    fn named_bonus(&self, card: Card) -> f64 {
        if is_mighty(card) {
            MIGHTY_BONUS
        } else if is_trump_jack(card, self.trump) {
            TRUMP_JACK_BONUS
        } else if is_counter_jack(card, self.trump) {
            COUNTER_JACK_BONUS
        } else if !self.first_trick && Some(card.suit) == self.trump {
            PLAIN_TRUMP_BONUS
        } else {
            0.0
        }
    }

    fn role_adjustment(&self, card: Card, strength: f64) -> f64 {
        match self.role {
            Role::Napoleon => strength * 0.25,
            Role::Adjutant => {
                let signal = if self.adjutant_card() == Some(card) {
                    ADJUTANT_SIGNAL_BONUS
                } else {
                    0.0
                };
                signal - (strength - MID_STRENGTH).abs() * 0.1
            }
            Role::Opponent => {
                let extremes = (strength - MID_STRENGTH).abs() * 0.15;
                let gives_up_control = !self.trick.is_empty()
                    && self.known_napoleon_side_winning()
                    && !self.takes_trick(card);
                extremes - if gives_up_control { CONTROL_PENALTY } else { 0.0 }
            }
        }
    }

    fn same_two_adjustment(&self, card: Card) -> f64 {
        if card.rank != Rank::Two || Some(card.suit) == self.trump {
            return 0.0;
        }
        let Some(lead) = self.lead else {
            return if self.progress < 0.5 { SAME_TWO_LEAD_BONUS } else { 0.0 };
        };
        if card.suit != lead || self.first_trick {
            return 0.0;
        }
        if same_two_live(self.trick, self.trump, self.first_trick) {
            return SAME_TWO_LIVE_BONUS;
        }
        if self.single_suited() {
            if let Some(breaker) = self
                .trick
                .cards
                .iter()
                .find(|p| same_two_breaker(p.card, self.trump))
            {
                let earliness = (PLAYER_COUNT - usize::from(breaker.order)) as f64 / PLAYER_COUNT as f64;
                return -SAME_TWO_BROKEN_PENALTY * (0.5 + self.progress) * earliness;
            }
        }
        0.0
    }

    fn non_viable_discount(&self, card: Card) -> f64 {
        let Some(lead) = self.lead else {
            return 0.0;
        };
        let mixed = self.trick.cards.iter().any(|p| p.card.suit != lead);
        if mixed && card.suit == lead && !card.is_face() && card.value() <= NON_VIABLE_MAX_VALUE {
            NON_VIABLE_DISCOUNT
        } else {
            0.0
        }
    }

    fn face_card_risk(&self, card: Card) -> f64 {
        let Some(lead) = self.lead else {
            return 0.0;
        };
        if !card.is_face() || card.suit != lead || !(2..=3).contains(&self.trick.len()) {
            return 0.0;
        }
        if !same_two_live(self.trick, self.trump, self.first_trick) {
            return 0.0;
        }
        let two = Card::new(lead, Rank::Two);
        let two_outstanding = !self.state.played_cards().any(|p| p.card == two)
            && !self.state.players[self.player.index()].has_card(two);
        if !two_outstanding {
            return 0.0;
        }
        if self.role == Role::Adjutant && self.napoleon_winning() {
            return 0.0;
        }
        let faces = f64::from(self.trick.face_cards());
        FACE_RISK_PENALTY * (0.5 + self.progress) * (1.0 + 0.5 * faces)
    }

    fn phase_weight(&self) -> f64 {
        if self.progress < 1.0 / 3.0 {
            0.9
        } else if self.progress < 2.0 / 3.0 {
            1.0
        } else {
            1.15
        }
    }

    // === Trick reading ===

    fn single_suited(&self) -> bool {
        match self.lead {
            Some(lead) => self.trick.cards.iter().all(|p| p.card.suit == lead),
            None => false,
        }
    }

    fn current_winner(&self) -> Option<PlayedCard> {
        provisional_winner(self.trick, self.trump, self.first_trick)
    }

    /// Would `card` hold the trick if played now.
    fn takes_trick(&self, card: Card) -> bool {
        let mut trick = self.trick.clone();
        trick.push(card, self.player, false);
        let winner = if trick.is_full() {
            resolve_trick_winner(&trick, self.trump, self.first_trick).ok()
        } else {
            provisional_winner(&trick, self.trump, self.first_trick)
        };
        winner.is_some_and(|w| w.player_id == self.player)
    }

    fn napoleon_winning(&self) -> bool {
        let napoleon = self.state.napoleon();
        self.current_winner()
            .is_some_and(|w| Some(w.player_id) == napoleon)
    }

    /// The trick is held by a seat this player knows to be on the Napoleon
    /// side.
    fn known_napoleon_side_winning(&self) -> bool {
        self.current_winner()
            .is_some_and(|w| self.known_napoleon_side(w.player_id))
    }

    fn known_napoleon_side(&self, seat: PlayerId) -> bool {
        if self.state.napoleon() == Some(seat) {
            return true;
        }
        if seat == self.player {
            return self.role.is_napoleon_side();
        }
        (self.state.adjutant_revealed() || self.role == Role::Adjutant)
            && self.state.is_napoleon_side(seat)
    }

    fn adjutant_card(&self) -> Option<Card> {
        self.state.napoleon_declaration.and_then(|d| d.adjutant_card)
    }

    // === Selection ===

    fn choose_lead(&self, plays: &[Card]) -> Option<Card> {
        if self.role == Role::Adjutant {
            let weak: Vec<Card> = plays
                .iter()
                .copied()
                .filter(|&c| !c.is_face() && !is_named_card(c, self.trump))
                .collect();
            if !weak.is_empty() {
                return self.lowest(&weak);
            }
        }
        self.best_scored(plays)
    }

    fn choose_follow(&self, plays: &[Card]) -> Option<Card> {
        let winners: Vec<Card> = plays.iter().copied().filter(|&c| self.takes_trick(c)).collect();
        let losers: Vec<Card> = plays.iter().copied().filter(|c| !winners.contains(c)).collect();

        match self.role {
            Role::Napoleon if !winners.is_empty() => self.lowest(&winners),
            Role::Adjutant => {
                if !winners.is_empty() {
                    if let Some(signal) = self.signal_card(plays) {
                        return Some(signal);
                    }
                }
                if self.napoleon_winning() {
                    let faces: Vec<Card> = losers.iter().copied().filter(|c| c.is_face()).collect();
                    if !faces.is_empty() {
                        return self.lowest(&faces);
                    }
                }
                if winners.is_empty() {
                    self.discard(plays)
                } else {
                    self.lowest(&winners)
                }
            }
            Role::Opponent if !winners.is_empty() => {
                if self.known_napoleon_side_winning() {
                    self.lowest(&winners)
                } else {
                    self.yield_card(&winners, &losers)
                }
            }
            _ => self.discard(plays),
        }
    }

    /// Adjutant card on its own suit before any named card shows.
    fn signal_card(&self, plays: &[Card]) -> Option<Card> {
        let card = self.adjutant_card()?;
        let named_played = self
            .trick
            .cards
            .iter()
            .any(|p| is_named_card(p.card, self.trump));
        (plays.contains(&card) && self.lead == Some(card.suit) && !named_played).then_some(card)
    }

    /// Cheapest card that cannot help the other side. Opponents and anyone
    /// throwing into an enemy trick keep their face cards.
    fn discard(&self, plays: &[Card]) -> Option<Card> {
        let winner_is_ally = self
            .current_winner()
            .is_some_and(|w| self.known_napoleon_side(w.player_id) == self.role.is_napoleon_side());
        let keep_faces = self.role == Role::Opponent || !winner_is_ally;
        if keep_faces {
            let plain: Vec<Card> = plays.iter().copied().filter(|c| !c.is_face()).collect();
            if !plain.is_empty() {
                return self.lowest(&plain);
            }
        }
        self.lowest(plays)
    }

    /// Let a presumed teammate keep the trick. From the last seat the trick
    /// is safe, so feed it a face card.
    fn yield_card(&self, winners: &[Card], losers: &[Card]) -> Option<Card> {
        if losers.is_empty() {
            return self.lowest(winners);
        }
        if self.trick.len() == PLAYER_COUNT - 1 {
            if let Some(face) = losers
                .iter()
                .copied()
                .filter(|c| c.is_face() && !is_named_card(*c, self.trump))
                .max_by_key(|c| c.value())
            {
                return Some(face);
            }
        }
        self.discard(losers)
    }

    /// Weakest card; higher score breaks ties.
    fn lowest(&self, cards: &[Card]) -> Option<Card> {
        cards.iter().copied().min_by(|&a, &b| {
            self.strength(a)
                .cmp(&self.strength(b))
                .then_with(|| a.value().cmp(&b.value()))
                .then_with(|| self.score(b).partial_cmp(&self.score(a)).unwrap_or(Ordering::Equal))
        })
    }

    fn best_scored(&self, cards: &[Card]) -> Option<Card> {
        cards
            .iter()
            .copied()
            .map(|c| (c, self.score(c)))
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(Ordering::Equal))
            .map(|(c, _)| c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{NapoleonDeclaration, Phase, Player};
    use crate::core::GameRng;

    fn c(suit: Suit, rank: Rank) -> Card {
        Card::new(suit, rank)
    }

    /// Playing-phase table past the first trick, Napoleon in seat 0.
    fn table(trump: Suit, hands: [&[Card]; 4], adjutant: Option<(u8, Card)>) -> GameState {
        let players = std::array::from_fn(|i| {
            let mut p = Player::new(PlayerId::new(i as u8), format!("P{i}"), true);
            p.hand = hands[i].iter().copied().collect();
            p
        });
        let mut state = GameState::new(players, GameRng::new(0).state());
        state.phase = Phase::Playing;
        state.players[0].is_napoleon = true;
        let mut declaration = NapoleonDeclaration::new(PlayerId::new(0), 14, trump);
        if let Some((seat, card)) = adjutant {
            state.players[usize::from(seat)].is_adjutant = true;
            declaration.adjutant_card = Some(card);
        }
        state.napoleon_declaration = Some(declaration);
        state.trump_suit = Some(trump);

        let mut first = Trick::new();
        for (i, rank) in [Rank::Three, Rank::Four, Rank::Five, Rank::Six].into_iter().enumerate() {
            first.push(c(Suit::Diamonds, rank), PlayerId::new(i as u8), false);
        }
        first.completed = true;
        first.winner_player_id = Some(PlayerId::new(3));
        state.tricks.push_back(first);
        state
    }

    fn lead(state: &mut GameState, plays: &[(u8, Card)]) {
        for &(seat, card) in plays {
            state.current_trick.push(card, PlayerId::new(seat), false);
        }
        let next = plays.last().map_or(0, |(s, _)| (s + 1) % 4);
        state.current_player_index = PlayerId::new(next);
    }

    #[test]
    fn test_napoleon_takes_with_cheapest_winner() {
        let mut state = table(
            Suit::Spades,
            [&[], &[], &[c(Suit::Spades, Rank::Jack), c(Suit::Spades, Rank::Three), c(Suit::Hearts, Rank::Five)], &[]],
            None,
        );
        state.players[0].is_napoleon = false;
        state.players[2].is_napoleon = true;
        if let Some(d) = state.napoleon_declaration.as_mut() {
            d.player_id = PlayerId::new(2);
        }
        lead(&mut state, &[(1, c(Suit::Clubs, Rank::King))]);

        assert_eq!(select_best_card(&state, PlayerId::new(2)), Some(c(Suit::Spades, Rank::Three)));
    }

    #[test]
    fn test_opponent_contests_napoleon_trick() {
        let mut state = table(
            Suit::Spades,
            [&[], &[c(Suit::Clubs, Rank::Ace), c(Suit::Clubs, Rank::Three)], &[], &[]],
            None,
        );
        lead(&mut state, &[(0, c(Suit::Clubs, Rank::King))]);

        assert_eq!(select_best_card(&state, PlayerId::new(1)), Some(c(Suit::Clubs, Rank::Ace)));
    }

    #[test]
    fn test_opponent_discards_plain_card_when_beaten() {
        let mut state = table(
            Suit::Spades,
            [&[], &[], &[c(Suit::Clubs, Rank::King), c(Suit::Clubs, Rank::Three)], &[]],
            None,
        );
        lead(&mut state, &[(1, c(Suit::Clubs, Rank::Ace))]);

        assert_eq!(select_best_card(&state, PlayerId::new(2)), Some(c(Suit::Clubs, Rank::Three)));
    }

    #[test]
    fn test_opponent_yields_to_teammate() {
        let mut state = table(
            Suit::Spades,
            [&[], &[], &[c(Suit::Spades, Rank::Three), c(Suit::Hearts, Rank::Five)], &[]],
            None,
        );
        lead(&mut state, &[(1, c(Suit::Clubs, Rank::Ace))]);

        assert_eq!(select_best_card(&state, PlayerId::new(2)), Some(c(Suit::Hearts, Rank::Five)));
    }

    #[test]
    fn test_adjutant_reveals_signal_card() {
        let signal = c(Suit::Hearts, Rank::Ten);
        let mut state = table(
            Suit::Spades,
            [&[], &[c(Suit::Hearts, Rank::Ace), signal, c(Suit::Hearts, Rank::Three)], &[], &[]],
            Some((1, signal)),
        );
        lead(&mut state, &[(3, c(Suit::Hearts, Rank::King))]);
        state.current_player_index = PlayerId::new(1);
        // Seat 3 led, seat 0 played low.
        state.current_trick.push(c(Suit::Hearts, Rank::Four), PlayerId::new(0), false);

        assert_eq!(select_best_card(&state, PlayerId::new(1)), Some(signal));
    }

    #[test]
    fn test_adjutant_holds_signal_when_beaten() {
        let signal = c(Suit::Hearts, Rank::Ten);
        let mut state = table(
            Suit::Spades,
            [&[], &[signal, c(Suit::Hearts, Rank::Three)], &[], &[]],
            Some((1, signal)),
        );
        lead(&mut state, &[(3, c(Suit::Hearts, Rank::Ace))]);
        state.current_player_index = PlayerId::new(1);
        state.current_trick.push(c(Suit::Hearts, Rank::Four), PlayerId::new(0), false);

        assert_eq!(select_best_card(&state, PlayerId::new(1)), Some(c(Suit::Hearts, Rank::Three)));
    }

    #[test]
    fn test_adjutant_feeds_winning_napoleon() {
        let mut state = table(
            Suit::Hearts,
            [&[], &[c(Suit::Spades, Rank::King), c(Suit::Spades, Rank::Four), c(Suit::Diamonds, Rank::Ace)], &[], &[]],
            Some((1, c(Suit::Diamonds, Rank::Ace))),
        );
        lead(&mut state, &[(0, c(Suit::Spades, Rank::Ace))]);

        assert_eq!(select_best_card(&state, PlayerId::new(1)), Some(c(Suit::Spades, Rank::King)));
    }

    #[test]
    fn test_live_same_two_scores_above_small_card() {
        let mut state = table(
            Suit::Spades,
            [&[], &[c(Suit::Clubs, Rank::Two), c(Suit::Clubs, Rank::Three)], &[], &[]],
            None,
        );
        lead(&mut state, &[(0, c(Suit::Clubs, Rank::Four))]);

        let two = score_card(c(Suit::Clubs, Rank::Two), &state, PlayerId::new(1));
        let three = score_card(c(Suit::Clubs, Rank::Three), &state, PlayerId::new(1));
        assert!(two > three);
    }

    #[test]
    fn test_face_card_risk_in_single_suited_trick() {
        let mut state = table(
            Suit::Spades,
            [&[], &[], &[c(Suit::Clubs, Rank::King), c(Suit::Clubs, Rank::Nine)], &[]],
            None,
        );
        lead(&mut state, &[(0, c(Suit::Clubs, Rank::Five)), (1, c(Suit::Clubs, Rank::Six))]);

        let king = score_card(c(Suit::Clubs, Rank::King), &state, PlayerId::new(2));
        let base = f64::from(card_strength(c(Suit::Clubs, Rank::King), Some(Suit::Spades), Some(Suit::Clubs), false));
        let eval = Evaluator::new(&state, PlayerId::new(2));
        assert!(eval.face_card_risk(c(Suit::Clubs, Rank::King)) > 0.0);
        assert!(king < (base + eval.role_adjustment(c(Suit::Clubs, Rank::King), base)) * eval.phase_weight());
    }

    #[test]
    fn test_napoleon_leads_strongest() {
        let mut state = table(
            Suit::Spades,
            [&[c(Suit::Spades, Rank::Ace), c(Suit::Clubs, Rank::Three), c(Suit::Hearts, Rank::Six)], &[], &[], &[]],
            None,
        );
        state.current_player_index = PlayerId::new(0);
        assert_eq!(select_best_card(&state, PlayerId::new(0)), Some(c(Suit::Spades, Rank::Ace)));
    }

    #[test]
    fn test_no_plays_outside_playing_phase() {
        let mut state = table(Suit::Spades, [&[c(Suit::Clubs, Rank::Two)], &[], &[], &[]], None);
        state.phase = Phase::Exchange;
        assert_eq!(select_best_card(&state, PlayerId::new(0)), None);
    }
}
