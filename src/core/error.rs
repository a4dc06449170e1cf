//! Game-rule errors.
//!
//! Every transition validates its preconditions and returns one of these
//! instead of changing state. None of them are transient: the caller decides
//! whether to show them to a player or treat them as a bug.

use thiserror::Error;

use super::card::{Card, Suit};
use super::player::PlayerId;
use super::state::Phase;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("action requires phase {expected:?}, game is in {actual:?}")]
    WrongPhase { expected: Phase, actual: Phase },

    #[error("{player} acted out of turn (current: {current})")]
    NotPlayersTurn { player: PlayerId, current: PlayerId },

    #[error("{player} does not hold {card}")]
    CardNotInHand { player: PlayerId, card: Card },

    #[error("must follow the leading suit {lead}")]
    MustFollowSuit { lead: Suit },

    #[error("exactly 4 cards must be discarded, got {count}")]
    InvalidDiscardCount { count: usize },

    #[error("{player} is not allowed to {action}")]
    UnauthorizedAction { player: PlayerId, action: &'static str },

    #[error("invalid declaration: {reason}")]
    InvalidDeclaration { reason: String },

    #[error("{0} not found")]
    PlayerNotFound(PlayerId),

    #[error("cannot resolve a trick holding {cards} cards")]
    NoWinnerDeterminable { cards: usize },

    #[error("{0} has already passed")]
    AlreadyPassed(PlayerId),

    #[error("no redeal is pending")]
    RedealNotPending,

    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

impl GameError {
    pub fn invalid_declaration(reason: impl Into<String>) -> Self {
        Self::InvalidDeclaration {
            reason: reason.into(),
        }
    }

    pub fn invariant(detail: impl Into<String>) -> Self {
        Self::InvariantViolation(detail.into())
    }
}

/// Failure to encode or decode a binary game snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot encoding failed: {0}")]
    Encode(#[source] bincode::Error),

    #[error("snapshot decoding failed: {0}")]
    Decode(#[source] bincode::Error),
}
