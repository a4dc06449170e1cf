//! Seats and players.
//!
//! ## PlayerId
//!
//! Seat index 0..4. Napoleon is always played by exactly four players, so
//! seat arithmetic wraps at [`PLAYER_COUNT`].
//!
//! ## PlayerMap
//!
//! Per-seat data storage indexed by `PlayerId`.

use im::Vector;
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use super::card::{Card, Suit};

/// Number of seats at the table.
pub const PLAYER_COUNT: usize = 4;

/// Seat identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Raw seat index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Next seat clockwise.
    #[must_use]
    pub const fn next(self) -> Self {
        Self((self.0 + 1) % PLAYER_COUNT as u8)
    }

    /// Iterate over all four seats.
    ///
    /// ```
    /// use napoleon::core::PlayerId;
    ///
    /// let seats: Vec<_> = PlayerId::all().collect();
    /// assert_eq!(seats.len(), 4);
    /// assert_eq!(seats[3], PlayerId::new(3));
    /// ```
    pub fn all() -> impl Iterator<Item = PlayerId> {
        (0..PLAYER_COUNT as u8).map(PlayerId)
    }

    /// Seats in play order starting after `self`.
    pub fn following(self) -> impl Iterator<Item = PlayerId> {
        (1..PLAYER_COUNT as u8).map(move |offset| PlayerId((self.0 + offset) % PLAYER_COUNT as u8))
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Per-seat data storage with O(1) access.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: [T; PLAYER_COUNT],
}

impl<T> PlayerMap<T> {
    /// Build a map from a per-seat factory.
    pub fn new(factory: impl Fn(PlayerId) -> T) -> Self {
        Self {
            data: std::array::from_fn(|i| factory(PlayerId(i as u8))),
        }
    }

    /// All entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Iterate over (PlayerId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }
}

impl<T: Default> Default for PlayerMap<T> {
    fn default() -> Self {
        Self::new(|_| T::default())
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        &self.data[player.index()]
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        &mut self.data[player.index()]
    }
}

/// A seat at the table and the cards it holds.
///
/// `hand` is a persistent vector so cloning a player (and therefore a whole
/// game state) is cheap during search.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub hand: Vector<Card>,
    pub is_napoleon: bool,
    pub is_adjutant: bool,
    pub is_ai: bool,
    pub position: u8,
}

impl Player {
    #[must_use]
    pub fn new(id: PlayerId, name: impl Into<String>, is_ai: bool) -> Self {
        Self {
            id,
            name: name.into(),
            hand: Vector::new(),
            is_napoleon: false,
            is_adjutant: false,
            is_ai,
            position: id.0,
        }
    }

    #[must_use]
    pub fn has_card(&self, card: Card) -> bool {
        self.hand.contains(&card)
    }

    #[must_use]
    pub fn has_suit(&self, suit: Suit) -> bool {
        self.hand.iter().any(|c| c.suit == suit)
    }

    /// Napoleon or adjutant.
    #[must_use]
    pub fn is_napoleon_side(&self) -> bool {
        self.is_napoleon || self.is_adjutant
    }

    /// Remove a card from the hand. Returns false if it was not held.
    pub fn remove_card(&mut self, card: Card) -> bool {
        match self.hand.index_of(&card) {
            Some(pos) => {
                self.hand.remove(pos);
                true
            }
            None => false,
        }
    }
}
