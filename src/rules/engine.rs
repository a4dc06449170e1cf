//! Game state machine.
//!
//! `Setup → Bidding → Adjutant → Exchange → Playing → Finished`, plus a
//! `needs_redeal` flag that sends an all-pass bidding round back to a fresh
//! deal.
//!
//! Every transition takes `&GameState` and returns a new state or a
//! [`GameError`]; the input is never modified. Hands and history are `im`
//! structures, so the copy is cheap.

use im::{OrdSet, Vector};
use tracing::{debug, info};

use crate::core::{
    full_deck, Card, GameError, GameRng, GameState, NapoleonDeclaration, Phase, Player, PlayerId,
    Trick, HAND_SIZE, HIDDEN_CARD_COUNT, PLAYER_COUNT, TRICKS_PER_GAME,
};

use super::bidding::{is_valid_declaration, minimum_next_declaration, next_declarer, should_redeal};
use super::special::resolve_trick_winner;

/// Cards the Napoleon discards during the exchange.
pub const DISCARD_COUNT: usize = HIDDEN_CARD_COUNT;

// =============================================================================
// Setup
// =============================================================================

/// Start a game for four human players.
#[must_use]
pub fn initialize_game(names: [&str; PLAYER_COUNT], seed: u64) -> GameState {
    let players = std::array::from_fn(|i| Player::new(PlayerId::new(i as u8), names[i], false));
    start(players, seed)
}

/// Start a game with one human in seat 0 and three AI seats.
#[must_use]
pub fn initialize_ai_game(human_name: &str, seed: u64) -> GameState {
    let players = std::array::from_fn(|i| {
        let id = PlayerId::new(i as u8);
        if i == 0 {
            Player::new(id, human_name, false)
        } else {
            Player::new(id, format!("CPU {i}"), true)
        }
    });
    start(players, seed)
}

fn start(players: [Player; PLAYER_COUNT], seed: u64) -> GameState {
    let mut state = GameState::new(players, GameRng::new(seed).state());
    state.id = seed;
    deal(&mut state);
    state.phase = Phase::Bidding;
    info!(seed, "game initialized");
    state
}

/// Shuffle and deal 12 cards per seat plus 4 hidden, advancing the stored
/// RNG position.
fn deal(state: &mut GameState) {
    let mut rng = GameRng::from_state(&state.rng);
    let mut deck = full_deck();
    rng.shuffle(&mut deck);

    let mut cards = deck.into_iter();
    for player in state.players.iter_mut() {
        player.hand = cards.by_ref().take(HAND_SIZE).collect();
    }
    state.hidden_cards = cards.collect();
    state.rng = rng.state();
}

// =============================================================================
// Bidding
// =============================================================================

/// Adopt a declaration from the player whose turn it is.
pub fn declare(state: &GameState, declaration: NapoleonDeclaration) -> Result<GameState, GameError> {
    require_phase(state, Phase::Bidding)?;
    if state.needs_redeal {
        return Err(GameError::invalid_declaration("a redeal is pending"));
    }
    let player = declaration.player_id;
    state.player(player)?;
    require_turn(state, player)?;
    if state.passed_players.contains(&player) {
        return Err(GameError::AlreadyPassed(player));
    }
    if !is_valid_declaration(&declaration, state.napoleon_declaration.as_ref()) {
        let minimum = minimum_next_declaration(state.napoleon_declaration.as_ref());
        return Err(GameError::invalid_declaration(format!(
            "{} {} does not beat the minimum of {} in {:?}",
            declaration.target_tricks, declaration.suit, minimum.min_tricks, minimum.available_suits
        )));
    }

    let mut next = state.clone();
    for p in next.players.iter_mut() {
        p.is_napoleon = p.id == player;
    }
    next.napoleon_declaration = Some(NapoleonDeclaration {
        adjutant_card: None,
        ..declaration
    });
    next.trump_suit = Some(declaration.suit);
    next.declaration_turn += 1;

    debug!(
        player = %player,
        target = declaration.target_tricks,
        suit = %declaration.suit,
        "declaration adopted"
    );

    if minimum_next_declaration(Some(&declaration)).is_exhausted() {
        close_bidding(&mut next, player);
    } else {
        advance_bidding(&mut next);
    }
    next.touch();
    Ok(next)
}

/// Pass for the player whose turn it is.
pub fn pass(state: &GameState, player: PlayerId) -> Result<GameState, GameError> {
    require_phase(state, Phase::Bidding)?;
    state.player(player)?;
    if state.passed_players.contains(&player) {
        return Err(GameError::AlreadyPassed(player));
    }
    require_turn(state, player)?;

    let mut next = state.clone();
    next.passed_players.insert(player);
    next.declaration_turn += 1;
    debug!(player = %player, passes = next.passed_players.len(), "pass");

    if should_redeal(&next) {
        next.needs_redeal = true;
        info!("all players passed, redeal required");
    } else {
        advance_bidding(&mut next);
    }
    next.touch();
    Ok(next)
}

/// Reshuffle after an all-pass round and reopen bidding.
pub fn redeal(state: &GameState) -> Result<GameState, GameError> {
    if !state.needs_redeal {
        return Err(GameError::RedealNotPending);
    }

    let mut next = state.clone();
    for p in next.players.iter_mut() {
        p.is_napoleon = false;
        p.is_adjutant = false;
    }
    next.passed_players = OrdSet::new();
    next.declaration_turn = 0;
    next.napoleon_declaration = None;
    next.trump_suit = None;
    next.needs_redeal = false;
    next.hidden_transfers = OrdSet::new();
    next.current_player_index = PlayerId::new(0);
    deal(&mut next);
    next.phase = Phase::Bidding;
    next.touch();

    info!("cards redealt");
    Ok(next)
}

fn advance_bidding(state: &mut GameState) {
    match next_declarer(state) {
        Some(player) => state.current_player_index = player,
        None => match state.napoleon_declaration {
            Some(declaration) => close_bidding(state, declaration.player_id),
            None => state.needs_redeal = true,
        },
    }
}

fn close_bidding(state: &mut GameState, napoleon: PlayerId) {
    state.phase = Phase::Adjutant;
    state.current_player_index = napoleon;
    info!(napoleon = %napoleon, "bidding closed");
}

// =============================================================================
// Adjutant and exchange
// =============================================================================

/// Name the adjutant card and hand the hidden pile to the Napoleon.
///
/// Whoever holds the card becomes the adjutant. If it lies in the hidden pile
/// (or the Napoleon names their own card) nobody does and the Napoleon plays
/// alone.
pub fn set_adjutant(state: &GameState, adjutant_card: Card) -> Result<GameState, GameError> {
    require_phase(state, Phase::Adjutant)?;
    let mut next = state.clone();
    let adjutant = assign_adjutant(&mut next, adjutant_card)?;
    next.touch();

    match adjutant {
        Some(adjutant) => info!(card = %adjutant_card, adjutant = %adjutant, "adjutant assigned"),
        None => info!(card = %adjutant_card, "no adjutant, napoleon plays alone"),
    }
    Ok(next)
}

/// Flag the adjutant, hand the hidden pile to the Napoleon and open the
/// exchange. Returns the adjutant seat, if any.
pub(crate) fn assign_adjutant(
    state: &mut GameState,
    adjutant_card: Card,
) -> Result<Option<PlayerId>, GameError> {
    let declaration = require_declaration(state)?;
    let napoleon = declaration.player_id;

    let holder = state
        .players
        .iter()
        .find(|p| p.has_card(adjutant_card))
        .map(|p| p.id)
        .filter(|&id| id != napoleon);

    for p in state.players.iter_mut() {
        p.is_adjutant = Some(p.id) == holder;
    }
    state.napoleon_declaration = Some(NapoleonDeclaration {
        adjutant_card: Some(adjutant_card),
        ..declaration
    });

    let hidden = std::mem::take(&mut state.hidden_cards);
    state.hidden_transfers = hidden.iter().copied().collect();
    state.player_mut(napoleon)?.hand.append(hidden);

    state.phase = Phase::Exchange;
    state.current_player_index = napoleon;
    Ok(holder)
}

/// The Napoleon discards exactly four cards, which become the new hidden pile.
pub fn exchange_cards(
    state: &GameState,
    player: PlayerId,
    discard: &[Card],
) -> Result<GameState, GameError> {
    require_phase(state, Phase::Exchange)?;
    state.player(player)?;
    let declaration = require_declaration(state)?;
    if declaration.player_id != player {
        return Err(GameError::UnauthorizedAction {
            player,
            action: "exchange cards",
        });
    }
    if discard.len() != DISCARD_COUNT {
        return Err(GameError::InvalidDiscardCount {
            count: discard.len(),
        });
    }

    let mut next = state.clone();
    discard_cards(&mut next, player, discard)?;
    next.touch();

    info!(napoleon = %player, "exchange complete, play begins");
    Ok(next)
}

/// Move `discard` from the Napoleon's hand to the hidden pile and start play.
pub(crate) fn discard_cards(
    state: &mut GameState,
    player: PlayerId,
    discard: &[Card],
) -> Result<(), GameError> {
    {
        let napoleon = state.player_mut(player)?;
        for &card in discard {
            if !napoleon.remove_card(card) {
                return Err(GameError::CardNotInHand { player, card });
            }
        }
    }

    let hand = state.player(player)?.hand.clone();
    state.hidden_transfers = state
        .hidden_transfers
        .iter()
        .copied()
        .filter(|c| hand.contains(c))
        .collect();
    state.hidden_cards = discard.iter().copied().collect::<Vector<_>>();
    state.exchanged_cards = Some(discard.to_vec());
    state.current_trick = Trick::new();
    state.phase = Phase::Playing;
    state.current_player_index = player;
    Ok(())
}

// =============================================================================
// Play
// =============================================================================

/// Play a card for the player whose turn it is, enforcing follow-suit.
pub fn play_card(state: &GameState, player: PlayerId, card: Card) -> Result<GameState, GameError> {
    require_phase(state, Phase::Playing)?;
    let seat = state.player(player)?;
    require_turn(state, player)?;
    if !seat.has_card(card) {
        return Err(GameError::CardNotInHand { player, card });
    }
    if let Some(lead) = state.leading_suit() {
        if card.suit != lead && seat.has_suit(lead) {
            return Err(GameError::MustFollowSuit { lead });
        }
    }

    let mut next = state.clone();
    let completed = place_card(&mut next, player, card)?;
    next.touch();

    debug!(player = %player, card = %card, "card played");
    if let Some(trick) = completed {
        debug!(
            winner = ?trick.winner_player_id,
            face_cards = trick.face_cards(),
            trick_no = next.tricks.len(),
            "trick completed"
        );
        if next.phase == Phase::Finished {
            info!("all tricks played");
        }
    }
    Ok(next)
}

/// Acknowledge the last completed trick.
#[must_use]
pub fn close_trick_result(state: &GameState) -> GameState {
    let mut next = state.clone();
    next.show_trick_result = false;
    next
}

/// Move a card from hand into the current trick and resolve the trick when it
/// fills. Follow-suit is the caller's responsibility.
///
/// Returns the completed trick, if this play completed one.
pub(crate) fn place_card(
    state: &mut GameState,
    player: PlayerId,
    card: Card,
) -> Result<Option<Trick>, GameError> {
    if !state.player_mut(player)?.remove_card(card) {
        return Err(GameError::CardNotInHand { player, card });
    }

    let reveals_adjutant = state.player(player)?.is_napoleon
        && state.napoleon_declaration.and_then(|d| d.adjutant_card) == Some(card)
        && state.was_hidden(card);

    state.current_trick.push(card, player, reveals_adjutant);

    if !state.current_trick.is_full() {
        state.current_player_index = player.next();
        return Ok(None);
    }

    let winner = resolve_trick_winner(&state.current_trick, state.trump_suit, state.is_first_trick())?;
    let mut trick = std::mem::take(&mut state.current_trick);
    trick.completed = true;
    trick.winner_player_id = Some(winner.player_id);

    state.tricks.push_back(trick.clone());
    state.current_player_index = winner.player_id;
    state.show_trick_result = true;
    if state.tricks.len() >= TRICKS_PER_GAME {
        state.phase = Phase::Finished;
    }
    Ok(Some(trick))
}

// =============================================================================
// Guards
// =============================================================================

fn require_phase(state: &GameState, expected: Phase) -> Result<(), GameError> {
    if state.phase == expected {
        Ok(())
    } else {
        Err(GameError::WrongPhase {
            expected,
            actual: state.phase,
        })
    }
}

fn require_turn(state: &GameState, player: PlayerId) -> Result<(), GameError> {
    if state.current_player_index == player {
        Ok(())
    } else {
        Err(GameError::NotPlayersTurn {
            player,
            current: state.current_player_index,
        })
    }
}

fn require_declaration(state: &GameState) -> Result<NapoleonDeclaration, GameError> {
    state
        .napoleon_declaration
        .ok_or_else(|| GameError::invariant("no declaration adopted"))
}
