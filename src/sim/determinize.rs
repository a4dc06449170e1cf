//! Sampling concrete worlds consistent with one seat's knowledge.

use smallvec::SmallVec;

use crate::core::{Card, GameRng, GameState, Phase, PlayerId};

/// Redeal every card `perspective` cannot see, keeping hand sizes.
///
/// The perspective hand and all played cards stay put. Other hands and the
/// hidden pile are pooled, shuffled and dealt back out in their original
/// sizes. Once the Napoleon has taken the hidden pile it is known to them and
/// stays fixed in their worlds.
///
/// While the adjutant card is unplayed the adjutant flag follows whoever
/// holds it in the sampled world.
#[must_use]
pub fn determinize(state: &GameState, perspective: PlayerId, rng: &mut GameRng) -> GameState {
    let mut world = state.clone();
    let hidden_known = state.napoleon() == Some(perspective)
        && matches!(state.phase, Phase::Exchange | Phase::Playing | Phase::Finished);

    let others: SmallVec<[PlayerId; 4]> = PlayerId::all().filter(|&p| p != perspective).collect();

    let mut pool: Vec<Card> = others
        .iter()
        .flat_map(|p| state.players[p.index()].hand.iter().copied())
        .collect();
    if !hidden_known {
        pool.extend(state.hidden_cards.iter().copied());
    }
    rng.shuffle(&mut pool);

    let mut cards = pool.into_iter();
    for &p in &others {
        let size = state.players[p.index()].hand.len();
        world.players[p.index()].hand = cards.by_ref().take(size).collect();
    }
    if !hidden_known {
        world.hidden_cards = cards.collect();
    }

    reassign_adjutant(&mut world);
    if let Some(napoleon) = world.napoleon() {
        let hand = world.players[napoleon.index()].hand.clone();
        world.hidden_transfers = world
            .hidden_transfers
            .iter()
            .copied()
            .filter(|c| hand.contains(c))
            .collect();
    }
    world
}

fn reassign_adjutant(world: &mut GameState) {
    if world.adjutant_revealed() {
        return;
    }
    let Some(declaration) = world.napoleon_declaration else {
        return;
    };
    let Some(card) = declaration.adjutant_card else {
        return;
    };

    let holder = world
        .players
        .iter()
        .find(|p| p.has_card(card))
        .map(|p| p.id)
        .filter(|&id| id != declaration.player_id);
    for p in world.players.iter_mut() {
        p.is_adjutant = Some(p.id) == holder;
    }
}
