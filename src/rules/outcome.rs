//! Game outcome and inspection: result, early decision, progress and the
//! consistency check collaborators may run after each transition.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::core::{
    count_face_cards, GameError, GameState, Phase, PlayerId, PlayerMap, DECK_SIZE,
    FACE_CARD_TOTAL, TRICKS_PER_GAME,
};

/// Upper bound on face cards a single trick can carry.
pub const FACE_CARDS_PER_TRICK_CEILING: u32 = 4;

/// Final (or provisional) score of a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub napoleon_won: bool,
    pub napoleon: PlayerId,
    pub adjutant: Option<PlayerId>,
    pub napoleon_face_cards: u32,
    pub opponent_face_cards: u32,
    pub target_face_cards: u32,
    pub face_cards_by_player: PlayerMap<u32>,
    /// Seats on the winning side.
    pub winners: Vec<PlayerId>,
}

/// Why a game's outcome is fixed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecisionReason {
    AllTricksPlayed,
    /// The Napoleon side already holds the target.
    TargetReached,
    /// Even every face card still in play would not reach the target.
    TargetUnreachable,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameDecision {
    pub decided: bool,
    pub napoleon_won: Option<bool>,
    pub reason: Option<DecisionReason>,
}

impl GameDecision {
    const UNDECIDED: Self = Self {
        decided: false,
        napoleon_won: None,
        reason: None,
    };
}

/// Snapshot for progress displays.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameProgress {
    pub phase: Phase,
    pub completed_tricks: usize,
    pub total_tricks: usize,
    /// `completed_tricks / total_tricks`.
    pub progress: f64,
    pub current_player: PlayerId,
    pub napoleon_face_cards: u32,
    pub opponent_face_cards: u32,
    pub target_face_cards: Option<u32>,
    /// Face cards still in hands or the current trick.
    pub face_cards_in_play: u32,
}

/// Score the game from the Napoleon side's captured face cards.
///
/// Valid once a declaration is adopted; before the last trick the result is
/// provisional.
pub fn calculate_game_result(state: &GameState) -> Result<GameResult, GameError> {
    let declaration = state.napoleon_declaration.ok_or(GameError::WrongPhase {
        expected: Phase::Playing,
        actual: state.phase,
    })?;

    let face_cards_by_player = PlayerMap::new(|p| state.face_cards_won_by(p));
    let napoleon_face_cards = state.napoleon_side_face_cards();
    let opponent_face_cards = state.captured_face_cards() - napoleon_face_cards;
    let target_face_cards = u32::from(declaration.target_tricks);
    let napoleon_won = napoleon_face_cards >= target_face_cards;

    let winners = PlayerId::all()
        .filter(|&p| state.is_napoleon_side(p) == napoleon_won)
        .collect();

    Ok(GameResult {
        napoleon_won,
        napoleon: declaration.player_id,
        adjutant: state.adjutant(),
        napoleon_face_cards,
        opponent_face_cards,
        target_face_cards,
        face_cards_by_player,
        winners,
    })
}

/// Whether the outcome is already fixed.
#[must_use]
pub fn is_game_decided(state: &GameState) -> GameDecision {
    match outcome_fixed(state) {
        Some((napoleon_won, reason)) => GameDecision {
            decided: true,
            napoleon_won: Some(napoleon_won),
            reason: Some(reason),
        },
        None => GameDecision::UNDECIDED,
    }
}

/// `(napoleon_won, reason)` once no remaining play can change the result.
///
/// The bound on what the Napoleon side can still gain is the smaller of the
/// per-trick ceiling over the remaining tricks and the face cards actually
/// left in hands and the current trick, so it never fires early.
pub(crate) fn outcome_fixed(state: &GameState) -> Option<(bool, DecisionReason)> {
    if !matches!(state.phase, Phase::Playing | Phase::Finished) {
        return None;
    }
    let target = u32::from(state.napoleon_declaration?.target_tricks);
    let won = state.napoleon_side_face_cards();

    if state.tricks.len() >= TRICKS_PER_GAME {
        return Some((won >= target, DecisionReason::AllTricksPlayed));
    }
    if won >= target {
        return Some((true, DecisionReason::TargetReached));
    }

    let remaining_tricks = (TRICKS_PER_GAME - state.tricks.len()) as u32;
    let attainable = (remaining_tricks * FACE_CARDS_PER_TRICK_CEILING).min(face_cards_in_play(state));
    if won + attainable < target {
        return Some((false, DecisionReason::TargetUnreachable));
    }
    None
}

fn face_cards_in_play(state: &GameState) -> u32 {
    let in_hands: u32 = state
        .players
        .iter()
        .map(|p| count_face_cards(p.hand.iter()))
        .sum();
    in_hands + state.current_trick.face_cards()
}

#[must_use]
pub fn get_game_progress(state: &GameState) -> GameProgress {
    let completed_tricks = state.completed_tricks();
    let napoleon_face_cards = state.napoleon_side_face_cards();
    GameProgress {
        phase: state.phase,
        completed_tricks,
        total_tricks: TRICKS_PER_GAME,
        progress: completed_tricks as f64 / TRICKS_PER_GAME as f64,
        current_player: state.current_player_index,
        napoleon_face_cards,
        opponent_face_cards: state.captured_face_cards() - napoleon_face_cards,
        target_face_cards: state
            .napoleon_declaration
            .map(|d| u32::from(d.target_tricks)),
        face_cards_in_play: face_cards_in_play(state),
    }
}

/// Check the structural invariants of a dealt game.
///
/// Does not repair anything; the first violation found is returned.
pub fn validate_consistency(state: &GameState) -> Result<(), GameError> {
    if state.phase == Phase::Setup {
        return Ok(());
    }

    let mut seen = FxHashSet::default();
    let all_cards = state
        .players
        .iter()
        .flat_map(|p| p.hand.iter())
        .chain(state.hidden_cards.iter())
        .chain(state.played_cards().map(|p| &p.card));
    for card in all_cards {
        if !seen.insert(*card) {
            return Err(GameError::invariant(format!("{card} appears twice")));
        }
    }
    if seen.len() != DECK_SIZE {
        return Err(GameError::invariant(format!(
            "{} cards accounted for, expected {DECK_SIZE}",
            seen.len()
        )));
    }
    let face_total = count_face_cards(seen.iter());
    if face_total != FACE_CARD_TOTAL {
        return Err(GameError::invariant(format!("{face_total} face cards in deck")));
    }

    let napoleons: Vec<PlayerId> = state
        .players
        .iter()
        .filter(|p| p.is_napoleon)
        .map(|p| p.id)
        .collect();
    match state.napoleon_declaration {
        Some(declaration) if napoleons != [declaration.player_id] => {
            return Err(GameError::invariant(format!(
                "declaration by {} but napoleon flags on {napoleons:?}",
                declaration.player_id
            )));
        }
        None if !napoleons.is_empty() => {
            return Err(GameError::invariant("napoleon flag set without a declaration"));
        }
        _ => {}
    }

    let adjutants = state.players.iter().filter(|p| p.is_adjutant).count();
    if adjutants > 1 {
        return Err(GameError::invariant(format!("{adjutants} adjutants")));
    }
    if state.players.iter().any(|p| p.is_napoleon && p.is_adjutant) {
        return Err(GameError::invariant("napoleon flagged as adjutant"));
    }

    if state.tricks.len() > TRICKS_PER_GAME {
        return Err(GameError::invariant(format!("{} tricks recorded", state.tricks.len())));
    }
    if state.current_trick.is_full() {
        return Err(GameError::invariant("current trick holds four unresolved cards"));
    }
    if (state.phase == Phase::Finished) != (state.tricks.len() == TRICKS_PER_GAME) {
        return Err(GameError::invariant("finished phase does not match trick count"));
    }

    for player in &state.players {
        if player.is_napoleon {
            continue;
        }
        if let Some(card) = player.hand.iter().find(|c| state.was_hidden(**c)) {
            return Err(GameError::invariant(format!(
                "{} holds {card} from the hidden pile",
                player.id
            )));
        }
    }

    Ok(())
}
