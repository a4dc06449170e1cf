//! Bidding rules.
//!
//! A declaration promises a number of face cards (13..=20) and names the
//! trump suit. A new declaration must raise the count, or match it with a
//! stronger suit (spades > hearts > diamonds > clubs).

use serde::{Deserialize, Serialize};

use crate::core::{GameState, NapoleonDeclaration, Phase, PlayerId, Suit, PLAYER_COUNT};

/// Lowest legal target.
pub const MIN_TARGET: u8 = 13;

/// Highest legal target (every face card in the deck).
pub const MAX_TARGET: u8 = 20;

/// Lexicographic bid order: target first, suit priority second.
#[must_use]
pub fn declaration_rank(declaration: &NapoleonDeclaration) -> (u8, u8) {
    (declaration.target_tricks, declaration.suit.priority())
}

/// Check a candidate against bounds and the declaration it would replace.
#[must_use]
pub fn is_valid_declaration(
    candidate: &NapoleonDeclaration,
    current: Option<&NapoleonDeclaration>,
) -> bool {
    if !(MIN_TARGET..=MAX_TARGET).contains(&candidate.target_tricks) {
        return false;
    }
    match current {
        None => true,
        Some(current) => declaration_rank(candidate) > declaration_rank(current),
    }
}

/// Cheapest declarations still available.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimumDeclaration {
    pub min_tricks: u8,
    /// Suits legal at `min_tricks`; empty once bidding is exhausted.
    pub available_suits: Vec<Suit>,
}

impl MinimumDeclaration {
    /// No further declaration is possible.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.available_suits.is_empty()
    }
}

/// Minimum target and suits for the next declaration.
///
/// Stronger suits stay at the same count; once spades holds the count the
/// minimum rises by one with all suits open again. `{20, spades}` leaves
/// nothing (`min_tricks` 21, no suits).
#[must_use]
pub fn minimum_next_declaration(current: Option<&NapoleonDeclaration>) -> MinimumDeclaration {
    let Some(current) = current else {
        return MinimumDeclaration {
            min_tricks: MIN_TARGET,
            available_suits: Suit::ALL.to_vec(),
        };
    };

    let stronger: Vec<Suit> = Suit::ALL
        .iter()
        .copied()
        .filter(|s| s.priority() > current.suit.priority())
        .collect();

    if !stronger.is_empty() {
        return MinimumDeclaration {
            min_tricks: current.target_tricks,
            available_suits: stronger,
        };
    }

    let next = current.target_tricks + 1;
    MinimumDeclaration {
        min_tricks: next,
        available_suits: if next > MAX_TARGET {
            Vec::new()
        } else {
            Suit::ALL.to_vec()
        },
    }
}

/// Every `(target, suit)` a player may still declare, weakest first.
#[must_use]
pub fn legal_declarations(current: Option<&NapoleonDeclaration>) -> Vec<(u8, Suit)> {
    let minimum = minimum_next_declaration(current);
    let mut options = Vec::new();

    let mut suits_by_priority = Suit::ALL;
    suits_by_priority.sort_by_key(|s| s.priority());

    for target in minimum.min_tricks..=MAX_TARGET {
        for &suit in &suits_by_priority {
            if target == minimum.min_tricks && !minimum.available_suits.contains(&suit) {
                continue;
            }
            options.push((target, suit));
        }
    }
    options
}

/// Every player passed without a declaration ever being adopted.
#[must_use]
pub fn should_redeal(state: &GameState) -> bool {
    state.phase == Phase::Bidding
        && state.passed_players.len() == PLAYER_COUNT
        && state.napoleon_declaration.is_none()
}

/// Next seat to bid after the current one, skipping passed players and the
/// standing Napoleon. `None` means bidding is over.
#[must_use]
pub fn next_declarer(state: &GameState) -> Option<PlayerId> {
    let napoleon = state.napoleon_declaration.map(|d| d.player_id);
    state
        .current_player_index
        .following()
        .chain(std::iter::once(state.current_player_index))
        .find(|p| !state.passed_players.contains(p) && Some(*p) != napoleon)
}
