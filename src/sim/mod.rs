//! Game simulator used by AI search.
//!
//! Thin, trusted wrappers over the engine: plays skip follow-suit validation
//! because callers pick from [`legal_plays`], and terminal detection stops as
//! soon as the bid outcome can no longer change.
//!
//! Every function works on its own copy of the state; a search never aliases
//! the authoritative game.

mod determinize;

pub use determinize::determinize;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Card, GameError, GameState, Phase, PlayerId};
use crate::rules::engine::place_card;
use crate::rules::outcome::outcome_fixed;

pub use crate::rules::outcome::FACE_CARDS_PER_TRICK_CEILING;

/// Candidate cards for one play. A hand never exceeds 16 cards.
pub type Plays = SmallVec<[Card; 16]>;

/// Coarse outcome of a simulated game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimResult {
    pub napoleon_won: bool,
    pub napoleon_face_cards_won: u32,
    pub target_face_cards: u32,
}

/// Structural copy; `im` makes this O(1).
#[inline]
#[must_use]
pub fn clone_state(state: &GameState) -> GameState {
    state.clone()
}

/// Cards `player` may play: the leading suit if held, otherwise anything.
#[must_use]
pub fn legal_plays(state: &GameState, player: PlayerId) -> Plays {
    if state.phase != Phase::Playing {
        return Plays::new();
    }
    let Some(seat) = state.players.get(player.index()) else {
        return Plays::new();
    };

    if let Some(lead) = state.leading_suit() {
        let following: Plays = seat.hand.iter().copied().filter(|c| c.suit == lead).collect();
        if !following.is_empty() {
            return following;
        }
    }
    seat.hand.iter().copied().collect()
}

/// Play without follow-suit validation, returning the new state.
pub fn apply_play(state: &GameState, player: PlayerId, card: Card) -> Result<GameState, GameError> {
    let mut next = state.clone();
    apply_play_in_place(&mut next, player, card)?;
    Ok(next)
}

/// In-place variant of [`apply_play`] for playout loops.
pub fn apply_play_in_place(
    state: &mut GameState,
    player: PlayerId,
    card: Card,
) -> Result<(), GameError> {
    if state.phase != Phase::Playing {
        return Err(GameError::WrongPhase {
            expected: Phase::Playing,
            actual: state.phase,
        });
    }
    place_card(state, player, card)?;
    state.show_trick_result = false;
    Ok(())
}

/// All tricks played, or the bid outcome is already fixed.
#[must_use]
pub fn is_terminal(state: &GameState) -> bool {
    state.phase == Phase::Finished || outcome_fixed(state).is_some()
}

/// Outcome of a (usually terminal) simulated state.
pub fn result(state: &GameState) -> Result<SimResult, GameError> {
    let declaration = state.napoleon_declaration.ok_or(GameError::WrongPhase {
        expected: Phase::Playing,
        actual: state.phase,
    })?;
    let napoleon_face_cards_won = state.napoleon_side_face_cards();
    let target_face_cards = u32::from(declaration.target_tricks);
    let napoleon_won = match outcome_fixed(state) {
        Some((won, _)) => won,
        None => napoleon_face_cards_won >= target_face_cards,
    };
    Ok(SimResult {
        napoleon_won,
        napoleon_face_cards_won,
        target_face_cards,
    })
}
