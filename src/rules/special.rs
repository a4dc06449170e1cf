//! Named cards and trick resolution.
//!
//! ## Named Cards
//!
//! - **Mighty**: A♠, the strongest card in the deck.
//! - **Trump Jack**: Jack of the trump suit.
//! - **Counter Jack**: Jack of the trump suit's partner (spades↔clubs,
//!   hearts↔diamonds).
//! - **Heart-Queen**: Q♥, which only matters when it meets the Mighty.
//!
//! ## Resolution Order
//!
//! A full trick is resolved by the first rule that applies:
//!
//! 1. **Yoromeki** (Mighty and Heart-Queen together): a Hunting-Jack pair wins
//!    if present; otherwise trump Jack, counter Jack, then Heart-Queen.
//! 2. **Hunting-Jack**: exactly one named Jack plus the Jack of its diagonal
//!    suit, no Mighty. The ordinary Jack wins.
//! 3. **Same-2**: from the second trick on, four cards of the non-trump
//!    leading suit including its 2, with no Mighty or counter Jack. The 2 wins.
//! 4. **Strength**: highest [`card_strength`].

use crate::core::{Card, GameError, PlayedCard, Rank, Suit, Trick, PLAYER_COUNT};

/// A♠.
pub const MIGHTY: Card = Card::new(Suit::Spades, Rank::Ace);

/// Q♥.
pub const HEART_QUEEN: Card = Card::new(Suit::Hearts, Rank::Queen);

const MIGHTY_STRENGTH: u32 = 1000;
const TRUMP_JACK_STRENGTH: u32 = 900;
const COUNTER_JACK_STRENGTH: u32 = 800;
const TRUMP_BASE: u32 = 500;
const LEAD_BASE: u32 = 100;

#[inline]
#[must_use]
pub fn is_mighty(card: Card) -> bool {
    card == MIGHTY
}

#[must_use]
pub const fn trump_jack(trump: Suit) -> Card {
    Card::new(trump, Rank::Jack)
}

#[must_use]
pub const fn counter_jack(trump: Suit) -> Card {
    Card::new(trump.partner(), Rank::Jack)
}

#[must_use]
pub fn is_trump_jack(card: Card, trump: Option<Suit>) -> bool {
    trump.is_some_and(|t| card == trump_jack(t))
}

#[must_use]
pub fn is_counter_jack(card: Card, trump: Option<Suit>) -> bool {
    trump.is_some_and(|t| card == counter_jack(t))
}

/// Mighty, trump Jack or counter Jack.
#[must_use]
pub fn is_named_card(card: Card, trump: Option<Suit>) -> bool {
    is_mighty(card) || is_trump_jack(card, trump) || is_counter_jack(card, trump)
}

/// A Jack that is neither the trump nor the counter Jack.
#[must_use]
pub fn is_plain_jack(card: Card, trump: Option<Suit>) -> bool {
    card.rank == Rank::Jack && !is_trump_jack(card, trump) && !is_counter_jack(card, trump)
}

/// Rank value with plain Jacks pushed below the 2 of their suit.
#[must_use]
pub fn suit_rank_value(card: Card, trump: Option<Suit>) -> u32 {
    if is_plain_jack(card, trump) {
        1
    } else {
        u32::from(card.value())
    }
}

/// Trick-taking strength of a card in context.
///
/// Mighty > trump Jack > counter Jack > trump cards > leading-suit cards >
/// off-suit cards. Trump carries no weight on the first trick. Off-suit
/// cards stay below [`LEAD_BASE`] and can never take a trick on strength.
#[must_use]
pub fn card_strength(
    card: Card,
    trump: Option<Suit>,
    leading: Option<Suit>,
    is_first_trick: bool,
) -> u32 {
    if is_mighty(card) {
        return MIGHTY_STRENGTH;
    }
    if is_trump_jack(card, trump) {
        return TRUMP_JACK_STRENGTH;
    }
    if is_counter_jack(card, trump) {
        return COUNTER_JACK_STRENGTH;
    }

    let value = suit_rank_value(card, trump);
    if !is_first_trick && Some(card.suit) == trump {
        TRUMP_BASE + value
    } else if Some(card.suit) == leading {
        LEAD_BASE + value
    } else {
        value
    }
}

/// Winner of a completed trick.
///
/// The trick must hold exactly four cards; anything else is a caller bug
/// reported as [`GameError::NoWinnerDeterminable`].
pub fn resolve_trick_winner(
    trick: &Trick,
    trump: Option<Suit>,
    is_first_trick: bool,
) -> Result<PlayedCard, GameError> {
    if trick.len() != PLAYER_COUNT {
        return Err(GameError::NoWinnerDeterminable { cards: trick.len() });
    }

    if let Some(two) = same_two_winner(&trick.cards, trick.leading_suit, trump, is_first_trick) {
        if special_winner(&trick.cards, trump).is_none() {
            return Ok(two);
        }
    }

    leading_card(&trick.cards, trump, trick.leading_suit, is_first_trick)
        .ok_or(GameError::NoWinnerDeterminable { cards: trick.len() })
}

/// Card currently taking a possibly incomplete trick.
///
/// Applies Yoromeki, Hunting-Jack and strength. Same-2 needs all four cards
/// and is left to [`resolve_trick_winner`].
#[must_use]
pub fn provisional_winner(trick: &Trick, trump: Option<Suit>, is_first_trick: bool) -> Option<PlayedCard> {
    leading_card(&trick.cards, trump, trick.leading_suit, is_first_trick)
}

fn leading_card(
    cards: &[PlayedCard],
    trump: Option<Suit>,
    leading: Option<Suit>,
    is_first_trick: bool,
) -> Option<PlayedCard> {
    if let Some(winner) = special_winner(cards, trump) {
        return Some(winner);
    }

    let mut best: Option<(PlayedCard, u32)> = None;
    for played in cards {
        let strength = card_strength(played.card, trump, leading, is_first_trick);
        if best.map_or(true, |(_, s)| strength > s) {
            best = Some((*played, strength));
        }
    }
    best.map(|(p, _)| p)
}

/// Yoromeki and Hunting-Jack, which override strength.
fn special_winner(cards: &[PlayedCard], trump: Option<Suit>) -> Option<PlayedCard> {
    let find = |card: Card| cards.iter().find(|p| p.card == card).copied();
    let has_mighty = find(MIGHTY).is_some();
    let hunter = hunting_jack(cards, trump);

    if has_mighty && find(HEART_QUEEN).is_some() {
        if hunter.is_some() {
            return hunter;
        }
        let rescue = trump.and_then(|t| find(trump_jack(t)).or_else(|| find(counter_jack(t))));
        return rescue.or_else(|| find(HEART_QUEEN));
    }

    if has_mighty {
        return None;
    }
    hunter
}

/// Ordinary Jack hunting the only named Jack in the trick.
fn hunting_jack(cards: &[PlayedCard], trump: Option<Suit>) -> Option<PlayedCard> {
    let trump = trump?;
    let mut named = cards
        .iter()
        .filter(|p| p.card == trump_jack(trump) || p.card == counter_jack(trump));

    let prey = named.next()?;
    if named.next().is_some() {
        return None;
    }

    let hunter = Card::new(prey.card.suit.diagonal(), Rank::Jack);
    cards.iter().find(|p| p.card == hunter).copied()
}

fn same_two_winner(
    cards: &[PlayedCard],
    leading: Option<Suit>,
    trump: Option<Suit>,
    is_first_trick: bool,
) -> Option<PlayedCard> {
    if is_first_trick || cards.len() != PLAYER_COUNT {
        return None;
    }
    let lead = leading?;
    if Some(lead) == trump || cards.iter().any(|p| p.card.suit != lead) {
        return None;
    }
    if cards
        .iter()
        .any(|p| is_mighty(p.card) || is_counter_jack(p.card, trump))
    {
        return None;
    }
    let two = Card::new(lead, Rank::Two);
    cards.iter().find(|p| p.card == two).copied()
}

/// Same-2 would currently apply if the remaining seats keep to the lead
/// suit: the trick so far is single-suited, non-trump, and unbroken.
#[must_use]
pub fn same_two_live(trick: &Trick, trump: Option<Suit>, is_first_trick: bool) -> bool {
    let Some(lead) = trick.leading_suit else {
        return false;
    };
    !is_first_trick
        && Some(lead) != trump
        && trick.cards.iter().all(|p| p.card.suit == lead)
        && !trick.cards.iter().any(|p| same_two_breaker(p.card, trump))
}

/// Cards whose presence voids Same-2 (or, for the trump Jack, outranks it in
/// any mixed trick).
#[must_use]
pub fn same_two_breaker(card: Card, trump: Option<Suit>) -> bool {
    is_mighty(card) || is_counter_jack(card, trump) || is_trump_jack(card, trump)
}
