//! Core types: cards, seats, state, RNG and errors.
//!
//! Everything here is plain data. Rules live in [`crate::rules`].

pub mod card;
pub mod error;
pub mod player;
pub mod rng;
pub mod state;

pub use card::{count_face_cards, full_deck, Card, CardId, Rank, Suit, DECK_SIZE, FACE_CARD_TOTAL};
pub use error::{GameError, SnapshotError};
pub use player::{Player, PlayerId, PlayerMap, PLAYER_COUNT};
pub use rng::{GameRng, GameRngState};
pub use state::{
    GameState, NapoleonDeclaration, Phase, PlayedCard, Trick, HAND_SIZE, HIDDEN_CARD_COUNT,
    TRICKS_PER_GAME,
};
