//! Game state: the aggregate root threaded through every transition.
//!
//! ## GameState
//!
//! Everything a collaborator needs to snapshot and restore a game:
//! - Players with their hands and team flags
//! - The trick in progress and the completed trick history
//! - Bidding bookkeeping (passes, adopted declaration, redeal flag)
//! - The hidden pile and the cards transferred from it
//! - RNG position, so redeals stay deterministic after a restore
//!
//! Hands and history are `im` persistent structures: cloning a state for a
//! search playout is O(1) and never aliases the authoritative state.

use im::{OrdSet, Vector};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use time::OffsetDateTime;

use super::card::{count_face_cards, Card, Suit};
use super::error::{GameError, SnapshotError};
use super::player::{Player, PlayerId, PLAYER_COUNT};
use super::rng::GameRngState;

/// Tricks in a game (and cards per hand once the exchange is done).
pub const TRICKS_PER_GAME: usize = 12;

/// Cards dealt to each player.
pub const HAND_SIZE: usize = 12;

/// Cards dealt face down to the centre.
pub const HIDDEN_CARD_COUNT: usize = 4;

/// Game phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Setup,
    /// Players declare or pass to become the Napoleon.
    Bidding,
    /// The Napoleon names the adjutant card.
    Adjutant,
    /// The Napoleon discards 4 of 16 cards.
    Exchange,
    Playing,
    Finished,
}

/// A card played into a trick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayedCard {
    pub card: Card,
    pub player_id: PlayerId,
    /// Position within the trick (0 = lead).
    pub order: u8,
    /// The Napoleon played the named adjutant card after taking it from the
    /// hidden pile, announcing a solo game.
    pub reveals_adjutant: bool,
}

/// One round of four plays.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Trick {
    pub cards: SmallVec<[PlayedCard; 4]>,
    pub completed: bool,
    pub winner_player_id: Option<PlayerId>,
    pub leading_suit: Option<Suit>,
}

impl Trick {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// All four seats have played.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cards.len() == PLAYER_COUNT
    }

    /// Append a play; the first play fixes the leading suit.
    pub fn push(&mut self, card: Card, player_id: PlayerId, reveals_adjutant: bool) {
        if self.cards.is_empty() {
            self.leading_suit = Some(card.suit);
        }
        let order = self.cards.len() as u8;
        self.cards.push(PlayedCard {
            card,
            player_id,
            order,
            reveals_adjutant,
        });
    }

    #[must_use]
    pub fn contains(&self, card: Card) -> bool {
        self.cards.iter().any(|p| p.card == card)
    }

    /// Face cards in this trick.
    #[must_use]
    pub fn face_cards(&self) -> u32 {
        count_face_cards(self.cards.iter().map(|p| &p.card))
    }
}

/// The adopted bid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NapoleonDeclaration {
    pub player_id: PlayerId,
    /// Face cards the Napoleon side promises to capture (13..=20).
    pub target_tricks: u8,
    /// Trump suit named with the bid.
    pub suit: Suit,
    pub adjutant_card: Option<Card>,
}

impl NapoleonDeclaration {
    #[must_use]
    pub fn new(player_id: PlayerId, target_tricks: u8, suit: Suit) -> Self {
        Self {
            player_id,
            target_tricks,
            suit,
            adjutant_card: None,
        }
    }
}

/// Complete game state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Game identifier; engine-created games use their deal seed.
    pub id: u64,
    pub players: [Player; PLAYER_COUNT],
    pub current_trick: Trick,
    /// Completed tricks, oldest first.
    pub tricks: Vector<Trick>,
    pub current_player_index: PlayerId,
    pub phase: Phase,
    pub hidden_cards: Vector<Card>,
    pub passed_players: OrdSet<PlayerId>,
    /// Bidding actions taken in the current round.
    pub declaration_turn: u32,
    pub needs_redeal: bool,
    pub napoleon_declaration: Option<NapoleonDeclaration>,
    pub trump_suit: Option<Suit>,
    pub exchanged_cards: Option<Vec<Card>>,
    /// Cards moved from the hidden pile into the Napoleon's hand.
    pub hidden_transfers: OrdSet<Card>,
    /// A trick has just completed and the presentation layer has not yet
    /// acknowledged it.
    pub show_trick_result: bool,
    pub rng: GameRngState,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl GameState {
    /// Empty table in `Setup`. Use [`crate::rules::engine::initialize_game`]
    /// to deal.
    #[must_use]
    pub fn new(players: [Player; PLAYER_COUNT], rng: GameRngState) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: 0,
            players,
            current_trick: Trick::new(),
            tricks: Vector::new(),
            current_player_index: PlayerId::new(0),
            phase: Phase::Setup,
            hidden_cards: Vector::new(),
            passed_players: OrdSet::new(),
            declaration_turn: 0,
            needs_redeal: false,
            napoleon_declaration: None,
            trump_suit: None,
            exchanged_cards: None,
            hidden_transfers: OrdSet::new(),
            show_trick_result: false,
            rng,
            created_at: now,
            updated_at: now,
        }
    }

    // === Players ===

    /// Look up a seat, rejecting ids outside the table.
    pub fn player(&self, id: PlayerId) -> Result<&Player, GameError> {
        self.players
            .get(id.index())
            .ok_or(GameError::PlayerNotFound(id))
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player, GameError> {
        self.players
            .get_mut(id.index())
            .ok_or(GameError::PlayerNotFound(id))
    }

    /// Seat whose turn it is.
    #[must_use]
    pub fn current_player(&self) -> &Player {
        &self.players[self.current_player_index.index()]
    }

    #[must_use]
    pub fn napoleon(&self) -> Option<PlayerId> {
        self.players.iter().find(|p| p.is_napoleon).map(|p| p.id)
    }

    #[must_use]
    pub fn adjutant(&self) -> Option<PlayerId> {
        self.players.iter().find(|p| p.is_adjutant).map(|p| p.id)
    }

    /// Napoleon or adjutant.
    #[must_use]
    pub fn is_napoleon_side(&self, id: PlayerId) -> bool {
        self.players
            .get(id.index())
            .is_some_and(Player::is_napoleon_side)
    }

    // === Tricks ===

    #[must_use]
    pub fn leading_suit(&self) -> Option<Suit> {
        self.current_trick.leading_suit
    }

    #[must_use]
    pub fn completed_tricks(&self) -> usize {
        self.tricks.len()
    }

    /// The trick in progress is the first of the game.
    #[must_use]
    pub fn is_first_trick(&self) -> bool {
        self.tricks.is_empty()
    }

    /// Iterate over every card played so far, history first.
    pub fn played_cards(&self) -> impl Iterator<Item = &PlayedCard> {
        self.tricks
            .iter()
            .flat_map(|t| t.cards.iter())
            .chain(self.current_trick.cards.iter())
    }

    /// Face cards captured by one seat in completed tricks.
    #[must_use]
    pub fn face_cards_won_by(&self, id: PlayerId) -> u32 {
        self.tricks
            .iter()
            .filter(|t| t.winner_player_id == Some(id))
            .map(Trick::face_cards)
            .sum()
    }

    /// Face cards captured by the Napoleon side in completed tricks.
    #[must_use]
    pub fn napoleon_side_face_cards(&self) -> u32 {
        PlayerId::all()
            .filter(|&p| self.is_napoleon_side(p))
            .map(|p| self.face_cards_won_by(p))
            .sum()
    }

    /// Face cards captured by anyone in completed tricks.
    #[must_use]
    pub fn captured_face_cards(&self) -> u32 {
        self.tricks.iter().map(Trick::face_cards).sum()
    }

    // === Hidden cards ===

    /// The card came from the hidden pile into the Napoleon's hand.
    #[must_use]
    pub fn was_hidden(&self, card: Card) -> bool {
        self.hidden_transfers.contains(&card)
    }

    /// The adjutant card has been played, so the team split is public.
    #[must_use]
    pub fn adjutant_revealed(&self) -> bool {
        let Some(card) = self.napoleon_declaration.and_then(|d| d.adjutant_card) else {
            return false;
        };
        self.played_cards().any(|p| p.card == card)
    }

    // === Bookkeeping ===

    /// Bump `updated_at`.
    pub fn touch(&mut self) {
        self.updated_at = OffsetDateTime::now_utc();
    }

    /// Cards currently accounted for in hands, hidden pile and tricks.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.players.iter().map(|p| p.hand.len()).sum::<usize>()
            + self.hidden_cards.len()
            + self.played_cards().count()
    }

    // === Snapshots ===

    /// Compact binary snapshot.
    pub fn to_snapshot(&self) -> Result<Vec<u8>, SnapshotError> {
        bincode::serialize(self).map_err(SnapshotError::Encode)
    }

    /// Restore a state produced by [`GameState::to_snapshot`].
    pub fn from_snapshot(bytes: &[u8]) -> Result<Self, SnapshotError> {
        bincode::deserialize(bytes).map_err(SnapshotError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::card::Rank;
    use crate::core::rng::GameRng;

    fn table() -> GameState {
        let players = std::array::from_fn(|i| {
            Player::new(PlayerId::new(i as u8), format!("P{i}"), i > 0)
        });
        GameState::new(players, GameRng::new(1).state())
    }

    #[test]
    fn test_new_state_is_setup() {
        let state = table();
        assert_eq!(state.phase, Phase::Setup);
        assert!(state.is_first_trick());
        assert_eq!(state.card_count(), 0);
        assert_eq!(state.napoleon(), None);
    }

    #[test]
    fn test_trick_push_sets_leading_suit() {
        let mut trick = Trick::new();
        trick.push(Card::new(Suit::Clubs, Rank::King), PlayerId::new(1), false);
        trick.push(Card::new(Suit::Hearts, Rank::Two), PlayerId::new(2), false);

        assert_eq!(trick.leading_suit, Some(Suit::Clubs));
        assert_eq!(trick.cards[1].order, 1);
        assert_eq!(trick.face_cards(), 1);
        assert!(!trick.is_full());
    }

    #[test]
    fn test_face_cards_by_winner() {
        let mut state = table();
        let mut trick = Trick::new();
        trick.push(Card::new(Suit::Clubs, Rank::King), PlayerId::new(0), false);
        trick.push(Card::new(Suit::Clubs, Rank::Ten), PlayerId::new(1), false);
        trick.push(Card::new(Suit::Clubs, Rank::Two), PlayerId::new(2), false);
        trick.push(Card::new(Suit::Clubs, Rank::Ace), PlayerId::new(3), false);
        trick.completed = true;
        trick.winner_player_id = Some(PlayerId::new(3));
        state.tricks.push_back(trick);

        assert_eq!(state.face_cards_won_by(PlayerId::new(3)), 3);
        assert_eq!(state.face_cards_won_by(PlayerId::new(0)), 0);
        assert_eq!(state.captured_face_cards(), 3);

        state.players[3].is_napoleon = true;
        assert_eq!(state.napoleon_side_face_cards(), 3);
    }

    #[test]
    fn test_player_not_found() {
        let state = table();
        assert_eq!(
            state.player(PlayerId::new(9)).unwrap_err(),
            GameError::PlayerNotFound(PlayerId::new(9))
        );
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let mut state = table();
        state.players[2].hand.push_back(Card::new(Suit::Spades, Rank::Ace));
        state.hidden_transfers.insert(Card::new(Suit::Hearts, Rank::Queen));

        let bytes = state.to_snapshot().unwrap();
        let restored = GameState::from_snapshot(&bytes).unwrap();
        assert_eq!(state, restored);
    }

    #[test]
    fn test_json_roundtrip_keeps_timestamps() {
        let state = table();
        let json = serde_json::to_string(&state).unwrap();
        let restored: GameState = serde_json::from_str(&json).unwrap();

        assert_eq!(state.created_at, restored.created_at);
        assert_eq!(state.updated_at, restored.updated_at);
        assert_eq!(state, restored);
    }
}
