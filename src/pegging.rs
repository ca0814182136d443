//! The play: cards laid one at a time toward a count of 31.

use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::card::Card;
use crate::game::Player;
use crate::hand::is_run;

/// The count may never exceed this value.
pub const MAX_COUNT: u8 = 31;

/// Points scored by a single play, broken down by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PeggingScore {
    /// 2 if the play brought the count to 15.
    pub fifteen: u8,
    /// 2 if the play brought the count to 31.
    pub thirty_one: u8,
    /// Points for the streak of equal ranks ending with this play.
    pub pairs: u8,
    /// Length of the longest run formed by the trailing cards.
    pub run: u8,
}

impl PeggingScore {
    /// Total points for the play.
    #[must_use]
    pub const fn total(&self) -> u8 {
        self.fifteen + self.thirty_one + self.pairs + self.run
    }
}

/// The current count: cards played since the last reset.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PeggingState {
    /// Cards played since the last reset, in order.
    pub cards: Vec<Card>,
    /// Sum of the values of `cards`.
    pub total: u8,
    /// Who laid the most recent card, if anyone.
    pub last_played_by: Option<Player>,
}

impl PeggingState {
    /// Creates an empty count.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cards: Vec::new(),
            total: 0,
            last_played_by: None,
        }
    }

    /// Returns whether `card` can be laid without passing 31.
    #[must_use]
    pub const fn can_play(&self, card: Card) -> bool {
        self.total.saturating_add(card.value()) <= MAX_COUNT
    }

    /// Returns the cards in `hand` that can be laid on the current count.
    #[must_use]
    pub fn playable(&self, hand: &[Card]) -> Vec<Card> {
        hand.iter().copied().filter(|c| self.can_play(*c)).collect()
    }

    /// Returns whether any card in `hand` can be laid.
    #[must_use]
    pub fn has_play(&self, hand: &[Card]) -> bool {
        hand.iter().any(|c| self.can_play(*c))
    }

    /// Lays `card` for `player` and scores the play.
    ///
    /// The caller checks legality; the count is not clamped.
    pub fn play(&mut self, card: Card, player: Player) -> PeggingScore {
        self.cards.push(card);
        self.total = self.total.saturating_add(card.value());
        self.last_played_by = Some(player);
        score_play(&self.cards)
    }

    /// Clears the count and returns the cards that were on it.
    pub fn reset(&mut self) -> Vec<Card> {
        self.total = 0;
        self.last_played_by = None;
        core::mem::take(&mut self.cards)
    }
}

/// Scores the last card of `cards`, the sequence played since the last reset.
#[must_use]
pub fn score_play(cards: &[Card]) -> PeggingScore {
    let Some(last) = cards.last() else {
        return PeggingScore::default();
    };
    let total: u32 = cards.iter().map(|c| u32::from(c.value())).sum();

    let streak = cards
        .iter()
        .rev()
        .take_while(|c| c.rank == last.rank)
        .count();
    let pairs = match streak {
        2 => 2,
        3 => 6,
        4 => 12,
        _ => 0,
    };

    let run = (3..=cards.len())
        .rev()
        .find(|&len| is_run(&cards[cards.len() - len..]))
        .unwrap_or(0);

    PeggingScore {
        fifteen: if total == 15 { 2 } else { 0 },
        thirty_one: if total == u32::from(MAX_COUNT) { 2 } else { 0 },
        pairs,
        run: run as u8,
    }
}
