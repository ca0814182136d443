//! Card types and deck utilities.

use core::fmt;

use alloc::vec::Vec;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Card suit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    /// Hearts.
    Hearts,
    /// Diamonds.
    Diamonds,
    /// Clubs.
    Clubs,
    /// Spades.
    Spades,
}

impl Suit {
    /// All four suits in deck order.
    pub const ALL: [Self; 4] = [Self::Hearts, Self::Diamonds, Self::Clubs, Self::Spades];

    const fn symbol(self) -> char {
        match self {
            Self::Hearts => '♥',
            Self::Diamonds => '♦',
            Self::Clubs => '♣',
            Self::Spades => '♠',
        }
    }
}

/// A playing card.
///
/// Cards compare equal by suit and rank; there is exactly one of each in a deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Card {
    /// The suit of the card.
    pub suit: Suit,
    /// The rank of the card (1 = Ace, 11 = Jack, 12 = Queen, 13 = King).
    pub rank: u8,
}

/// Rank of the Jack, used for nobs and his heels.
pub const JACK: u8 = 11;

impl Card {
    /// Creates a new card.
    ///
    /// Note: This function does not validate the rank. Values outside 1..=13
    /// are accepted but count as zero when scoring.
    #[must_use]
    pub const fn new(suit: Suit, rank: u8) -> Self {
        Self { suit, rank }
    }

    /// Returns the counting value of the card (see [`card_value`]).
    #[must_use]
    pub const fn value(self) -> u8 {
        card_value(self.rank)
    }

    /// Returns whether this card is a Jack.
    #[must_use]
    pub const fn is_jack(self) -> bool {
        self.rank == JACK
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rank {
            1 => write!(f, "A{}", self.suit.symbol()),
            11 => write!(f, "J{}", self.suit.symbol()),
            12 => write!(f, "Q{}", self.suit.symbol()),
            13 => write!(f, "K{}", self.suit.symbol()),
            rank => write!(f, "{rank}{}", self.suit.symbol()),
        }
    }
}

/// Number of cards per deck.
pub const DECK_SIZE: usize = 52;

/// Returns the counting value of a rank: Ace is 1, pip cards are face value,
/// and court cards are 10.
#[must_use]
pub const fn card_value(rank: u8) -> u8 {
    match rank {
        1..=10 => rank,
        11..=13 => 10,
        _ => 0,
    }
}

/// Builds the 52-card deck in suit-major, rank-minor order.
#[must_use]
pub fn create_deck() -> Vec<Card> {
    let mut cards = Vec::with_capacity(DECK_SIZE);
    for suit in Suit::ALL {
        for rank in 1..=13 {
            cards.push(Card::new(suit, rank));
        }
    }
    cards
}

/// Returns a uniformly shuffled copy of `deck`. The input is left untouched.
#[must_use]
pub fn shuffle<R: Rng + ?Sized>(deck: &[Card], rng: &mut R) -> Vec<Card> {
    let mut cards = deck.to_vec();
    cards.shuffle(rng);
    cards
}
