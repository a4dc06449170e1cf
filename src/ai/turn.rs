//! One AI step per call.
//!
//! [`process_ai_turn`] looks at the active phase, lets the responsible AI
//! seat act once through the engine's ordinary transitions, and returns the
//! new state. When no AI seat has to act the state comes back unchanged, so a
//! caller can loop on `is_ai_turn` and persist between steps.

use tracing::{info, warn};

use crate::core::{GameError, GameState, NapoleonDeclaration, Phase, PlayerId};
use crate::rules::engine::{declare, exchange_cards, pass, play_card, redeal, set_adjutant};

use super::config::AIConfig;
use super::heuristics::{choose_adjutant_card, choose_discards};
use super::strategy::{select_bid, select_card};

/// Seat that has to act in the current phase, if any.
fn acting_seat(state: &GameState) -> Option<PlayerId> {
    match state.phase {
        Phase::Bidding if !state.needs_redeal => Some(state.current_player_index),
        Phase::Playing => Some(state.current_player_index),
        Phase::Adjutant | Phase::Exchange => state.napoleon(),
        _ => None,
    }
}

/// True when [`process_ai_turn`] would act: an AI seat is due, or a redeal is
/// pending.
#[must_use]
pub fn is_ai_turn(state: &GameState) -> bool {
    if state.phase == Phase::Bidding && state.needs_redeal {
        return true;
    }
    acting_seat(state)
        .and_then(|seat| state.players.get(seat.index()))
        .is_some_and(|p| p.is_ai)
}

/// Advance the game by one AI action.
///
/// Bidding redeals first if every seat passed. The AI never hands its own
/// invalid choice back as an error: a rejected declaration degrades to a
/// pass. Errors that do surface come from an inconsistent input state.
pub fn process_ai_turn(state: &GameState, config: &AIConfig) -> Result<GameState, GameError> {
    if state.phase == Phase::Bidding && state.needs_redeal {
        info!("redealing after all passes");
        return redeal(state);
    }
    if !is_ai_turn(state) {
        return Ok(state.clone());
    }

    match state.phase {
        Phase::Bidding => bid(state, config),
        Phase::Adjutant => {
            let napoleon = require_napoleon(state)?;
            let card = choose_adjutant_card(state, napoleon);
            info!(player = %napoleon, card = %card, "AI names adjutant card");
            set_adjutant(state, card)
        }
        Phase::Exchange => {
            let napoleon = require_napoleon(state)?;
            let discard = choose_discards(state, napoleon);
            info!(player = %napoleon, discard = ?discard, "AI exchanges");
            exchange_cards(state, napoleon, &discard)
        }
        Phase::Playing => {
            let player = state.current_player_index;
            let card = select_card(state, player, config)
                .ok_or_else(|| GameError::invariant(format!("{player} has no legal play")))?;
            info!(player = %player, card = %card, trick = state.completed_tricks() + 1, "AI plays");
            play_card(state, player, card)
        }
        Phase::Setup | Phase::Finished => Ok(state.clone()),
    }
}

fn bid(state: &GameState, config: &AIConfig) -> Result<GameState, GameError> {
    let player = state.current_player_index;
    match select_bid(state, player, config) {
        Some((target, suit)) => {
            let declaration = NapoleonDeclaration::new(player, target, suit);
            match declare(state, declaration) {
                Ok(next) => {
                    info!(player = %player, bid_target = target, suit = %suit, "AI declares");
                    Ok(next)
                }
                Err(error) => {
                    warn!(player = %player, %error, "AI declaration rejected, passing");
                    pass(state, player)
                }
            }
        }
        None => {
            info!(player = %player, "AI passes");
            pass(state, player)
        }
    }
}

fn require_napoleon(state: &GameState) -> Result<PlayerId, GameError> {
    state
        .napoleon()
        .ok_or_else(|| GameError::invariant("no Napoleon after bidding"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::config::Difficulty;
    use crate::rules::engine::{initialize_ai_game, initialize_game};
    use crate::rules::outcome::validate_consistency;

    fn easy() -> AIConfig {
        AIConfig::for_difficulty(Difficulty::Easy).with_seed(1)
    }

    #[test]
    fn test_human_turn_is_untouched() {
        let state = initialize_ai_game("Human", 3);
        assert_eq!(state.current_player_index, PlayerId::new(0));
        assert!(!is_ai_turn(&state));

        let next = process_ai_turn(&state, &easy()).unwrap();
        assert_eq!(next, state);
    }

    #[test]
    fn test_all_human_table_is_untouched() {
        let state = initialize_game(["A", "B", "C", "D"], 3);
        assert!(!is_ai_turn(&state));
    }

    #[test]
    fn test_ai_bids_after_human_passes() {
        let state = initialize_ai_game("Human", 3);
        let state = pass(&state, PlayerId::new(0)).unwrap();
        assert!(is_ai_turn(&state));

        let next = process_ai_turn(&state, &easy()).unwrap();
        assert!(next.declaration_turn > state.declaration_turn);
        validate_consistency(&next).unwrap();
    }

    #[test]
    fn test_pending_redeal_is_resolved() {
        let mut state = initialize_ai_game("Human", 3);
        state.needs_redeal = true;
        assert!(is_ai_turn(&state));

        let next = process_ai_turn(&state, &easy()).unwrap();
        assert!(!next.needs_redeal);
        assert_eq!(next.phase, Phase::Bidding);
        assert_ne!(next.players[0].hand, state.players[0].hand);
    }

    #[test]
    fn test_finished_game_is_untouched() {
        let mut state = initialize_ai_game("Human", 3);
        state.phase = Phase::Finished;
        assert!(!is_ai_turn(&state));
        assert_eq!(process_ai_turn(&state, &easy()).unwrap(), state);
    }
}
