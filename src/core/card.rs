//! Card vocabulary: suits, ranks, cards, and the 52-card deck.
//!
//! ## Suit Relationships
//!
//! Napoleon pairs suits in two fixed ways:
//! - **Partner** (same colour): spades↔clubs, hearts↔diamonds. The Jack of the
//!   trump suit's partner is the *counter Jack*.
//! - **Diagonal**: spades↔diamonds, clubs↔hearts. A named Jack is hunted by the
//!   Jack of its diagonal suit.
//!
//! ## Face Cards
//!
//! 10, J, Q, K and A are face cards. There are 20 in the deck and the bid is a
//! promise about how many of them the Napoleon side will capture.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of cards in a deck.
pub const DECK_SIZE: usize = 52;

/// Number of face cards (10, J, Q, K, A) in a deck.
pub const FACE_CARD_TOTAL: u32 = 20;

/// Card suit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Suit {
    Spades,
    Hearts,
    Diamonds,
    Clubs,
}

impl Suit {
    /// All suits, strongest bidding priority first.
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

    /// Bidding priority: spades > hearts > diamonds > clubs.
    #[must_use]
    pub const fn priority(self) -> u8 {
        match self {
            Suit::Spades => 4,
            Suit::Hearts => 3,
            Suit::Diamonds => 2,
            Suit::Clubs => 1,
        }
    }

    /// Same-colour partner suit (source of the counter Jack).
    #[must_use]
    pub const fn partner(self) -> Suit {
        match self {
            Suit::Spades => Suit::Clubs,
            Suit::Clubs => Suit::Spades,
            Suit::Hearts => Suit::Diamonds,
            Suit::Diamonds => Suit::Hearts,
        }
    }

    /// Diagonal suit (source of the hunting Jack).
    #[must_use]
    pub const fn diagonal(self) -> Suit {
        match self {
            Suit::Spades => Suit::Diamonds,
            Suit::Diamonds => Suit::Spades,
            Suit::Clubs => Suit::Hearts,
            Suit::Hearts => Suit::Clubs,
        }
    }

    /// Dense index 0..4.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Suit::Spades => 0,
            Suit::Hearts => 1,
            Suit::Diamonds => 2,
            Suit::Clubs => 3,
        }
    }

    fn symbol(self) -> char {
        match self {
            Suit::Spades => '♠',
            Suit::Hearts => '♥',
            Suit::Diamonds => '♦',
            Suit::Clubs => '♣',
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Card rank, 2 (lowest) to Ace (highest).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    /// All ranks in ascending order.
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// Numeric value: 2..=10, J=11, Q=12, K=13, A=14.
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Ten => 10,
            Rank::Jack => 11,
            Rank::Queen => 12,
            Rank::King => 13,
            Rank::Ace => 14,
        }
    }

    /// 10, J, Q, K and A count toward the bid.
    #[must_use]
    pub const fn is_face(self) -> bool {
        self.value() >= 10
    }

    fn label(self) -> &'static str {
        match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        }
    }
}

/// Stable card identifier, 0..52.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u8);

/// A playing card. Immutable value type.
///
/// ```
/// use napoleon::core::{Card, Rank, Suit};
///
/// let mighty = Card::new(Suit::Spades, Rank::Ace);
/// assert!(mighty.is_face());
/// assert_eq!(Card::from_id(mighty.id()), Some(mighty));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
}

impl Card {
    #[must_use]
    pub const fn new(suit: Suit, rank: Rank) -> Self {
        Self { suit, rank }
    }

    /// Stable identifier.
    #[must_use]
    pub const fn id(self) -> CardId {
        CardId((self.suit.index() * 13 + (self.rank.value() as usize - 2)) as u8)
    }

    /// Inverse of [`Card::id`].
    #[must_use]
    pub fn from_id(id: CardId) -> Option<Self> {
        let raw = id.0 as usize;
        if raw >= DECK_SIZE {
            return None;
        }
        Some(Self::new(Suit::ALL[raw / 13], Rank::ALL[raw % 13]))
    }

    /// Rank value shortcut.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u8 {
        self.rank.value()
    }

    #[inline]
    #[must_use]
    pub const fn is_face(self) -> bool {
        self.rank.is_face()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.label(), self.suit)
    }
}

/// The 52-card deck in suit-major order.
#[must_use]
pub fn full_deck() -> Vec<Card> {
    Suit::ALL
        .iter()
        .flat_map(|&suit| Rank::ALL.iter().map(move |&rank| Card::new(suit, rank)))
        .collect()
}

/// Count face cards in a sequence.
pub fn count_face_cards<'a>(cards: impl IntoIterator<Item = &'a Card>) -> u32 {
    cards.into_iter().filter(|c| c.is_face()).count() as u32
}
