//! Hand and crib counting.

use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::card::Card;

/// Score of a complete cribbage hand, broken down by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HandScore {
    /// Points for combinations summing to fifteen (2 each).
    pub fifteens: u8,
    /// Points for pairs of equal rank (2 each).
    pub pairs: u8,
    /// Points for runs of three or more consecutive ranks.
    pub runs: u8,
    /// Points for a flush.
    pub flush: u8,
    /// Point for holding the Jack of the starter's suit.
    pub nobs: u8,
    /// Sum of all categories.
    pub total: u8,
}

impl HandScore {
    fn new(fifteens: u8, pairs: u8, runs: u8, flush: u8, nobs: u8) -> Self {
        Self {
            fifteens,
            pairs,
            runs,
            flush,
            nobs,
            total: fifteens + pairs + runs + flush + nobs,
        }
    }
}

/// Whether a set of cards is a player's hand or the dealer's crib.
///
/// The two differ only in the flush rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandKind {
    /// A player's own hand.
    Hand,
    /// The crib.
    Crib,
}

/// Returns every non-empty subset of `cards`, ordered by bitmask.
///
/// Intended for the small card sets of cribbage (at most a handful of cards).
#[must_use]
pub fn subsets(cards: &[Card]) -> Vec<Vec<Card>> {
    let count = cards.len();
    (1_u32..(1 << count))
        .map(|mask| {
            cards
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, card)| *card)
                .collect()
        })
        .collect()
}

/// Counts a player's hand with an optional starter.
///
/// The starter is only absent when evaluating cards before the cut.
#[must_use]
pub fn score_hand(hand: &[Card], starter: Option<Card>) -> HandScore {
    score(hand, starter, HandKind::Hand)
}

/// Counts the crib with an optional starter.
#[must_use]
pub fn score_crib(crib: &[Card], starter: Option<Card>) -> HandScore {
    score(crib, starter, HandKind::Crib)
}

/// Counts `cards` (plus the starter, if any) as a hand of the given kind.
#[must_use]
pub fn score(cards: &[Card], starter: Option<Card>, kind: HandKind) -> HandScore {
    let mut all = cards.to_vec();
    all.extend(starter);
    let combos = subsets(&all);

    HandScore::new(
        fifteens(&combos),
        pairs(&all),
        runs(&combos),
        flush(cards, starter, kind),
        nobs(cards, starter),
    )
}

fn fifteens(combos: &[Vec<Card>]) -> u8 {
    let count = combos
        .iter()
        .filter(|combo| combo.iter().map(|c| u32::from(c.value())).sum::<u32>() == 15)
        .count();
    (count * 2) as u8
}

fn pairs(cards: &[Card]) -> u8 {
    let mut points = 0;
    for (i, a) in cards.iter().enumerate() {
        for b in &cards[i + 1..] {
            if a.rank == b.rank {
                points += 2;
            }
        }
    }
    points
}

/// Returns whether the ranks are distinct and form an unbroken sequence.
pub(crate) fn is_run(cards: &[Card]) -> bool {
    let mut ranks: Vec<u8> = cards.iter().map(|c| c.rank).collect();
    ranks.sort_unstable();
    ranks.windows(2).all(|w| w[1].checked_sub(w[0]) == Some(1))
}

fn runs(combos: &[Vec<Card>]) -> u8 {
    // Every distinct run instance of the longest length counts, so duplicate
    // ranks multiply the run.
    let longest = combos
        .iter()
        .filter(|combo| combo.len() >= 3 && is_run(combo))
        .map(Vec::len)
        .max();

    longest.map_or(0, |len| {
        let instances = combos
            .iter()
            .filter(|combo| combo.len() == len && is_run(combo))
            .count();
        (instances * len) as u8
    })
}

fn flush(cards: &[Card], starter: Option<Card>, kind: HandKind) -> u8 {
    let Some(first) = cards.first() else {
        return 0;
    };
    if cards.len() < 4 || cards.iter().any(|c| c.suit != first.suit) {
        return 0;
    }

    let starter_matches = starter.is_some_and(|s| s.suit == first.suit);
    match kind {
        HandKind::Hand if starter_matches => 5,
        HandKind::Hand => 4,
        HandKind::Crib if starter_matches => 5,
        HandKind::Crib => 0,
    }
}

fn nobs(cards: &[Card], starter: Option<Card>) -> u8 {
    starter.map_or(0, |starter| {
        u8::from(
            cards
                .iter()
                .any(|c| c.is_jack() && c.suit == starter.suit),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Suit;

    const fn card(suit: Suit, rank: u8) -> Card {
        Card::new(suit, rank)
    }

    #[test]
    fn twenty_nine_hand() {
        let hand = [
            card(Suit::Spades, 5),
            card(Suit::Clubs, 5),
            card(Suit::Diamonds, 5),
            card(Suit::Hearts, 11),
        ];
        let score = score_hand(&hand, Some(card(Suit::Hearts, 5)));
        assert_eq!(score.fifteens, 16);
        assert_eq!(score.pairs, 12);
        assert_eq!(score.runs, 0);
        assert_eq!(score.flush, 0);
        assert_eq!(score.nobs, 1);
        assert_eq!(score.total, 29);
    }

    #[test]
    fn five_card_straight_flush_without_starter() {
        let hand: Vec<Card> = (1..=5).map(|r| card(Suit::Clubs, r)).collect();
        let score = score_hand(&hand, None);
        assert_eq!(score.runs, 5);
        assert_eq!(score.fifteens, 2);
        assert_eq!(score.flush, 4);
        assert_eq!(score.total, 11);
    }

    #[test]
    fn duplicate_ranks_multiply_runs() {
        let hand = [
            card(Suit::Hearts, 3),
            card(Suit::Clubs, 4),
            card(Suit::Spades, 5),
            card(Suit::Diamonds, 5),
        ];
        let score = score_hand(&hand, None);
        assert_eq!(score.runs, 6);
        assert_eq!(score.pairs, 2);
        assert_eq!(score.fifteens, 0);
    }

    #[test]
    fn double_double_run() {
        // Double double run: four runs of three and two pairs.
        let hand = [
            card(Suit::Hearts, 3),
            card(Suit::Clubs, 3),
            card(Suit::Spades, 4),
            card(Suit::Diamonds, 4),
        ];
        let score = score_hand(&hand, Some(card(Suit::Hearts, 5)));
        assert_eq!(score.runs, 12);
        assert_eq!(score.pairs, 4);
        // 3+3+4+5 with either four.
        assert_eq!(score.fifteens, 4);
        assert_eq!(score.total, 20);
    }

    #[test]
    fn longest_run_only() {
        let hand = [
            card(Suit::Hearts, 6),
            card(Suit::Clubs, 7),
            card(Suit::Spades, 8),
            card(Suit::Diamonds, 9),
        ];
        let score = score_hand(&hand, Some(card(Suit::Hearts, 13)));
        assert_eq!(score.runs, 4);
        // 6+9 and 7+8.
        assert_eq!(score.fifteens, 4);
    }

    #[test]
    fn hand_flush_rules() {
        let hand = [
            card(Suit::Hearts, 2),
            card(Suit::Hearts, 4),
            card(Suit::Hearts, 8),
            card(Suit::Hearts, 12),
        ];
        assert_eq!(score_hand(&hand, Some(card(Suit::Spades, 13))).flush, 4);
        assert_eq!(score_hand(&hand, Some(card(Suit::Hearts, 13))).flush, 5);
        assert_eq!(score_hand(&hand, None).flush, 4);
    }

    #[test]
    fn crib_flush_needs_all_five() {
        let crib = [
            card(Suit::Hearts, 2),
            card(Suit::Hearts, 4),
            card(Suit::Hearts, 8),
            card(Suit::Hearts, 12),
        ];
        assert_eq!(score_crib(&crib, Some(card(Suit::Spades, 13))).flush, 0);
        assert_eq!(score_crib(&crib, Some(card(Suit::Hearts, 13))).flush, 5);
        assert_eq!(score_crib(&crib, None).flush, 0);
    }

    #[test]
    fn nobs_needs_matching_starter() {
        let hand = [
            card(Suit::Hearts, 11),
            card(Suit::Clubs, 2),
            card(Suit::Spades, 4),
            card(Suit::Diamonds, 6),
        ];
        assert_eq!(score_hand(&hand, Some(card(Suit::Hearts, 9))).nobs, 1);
        assert_eq!(score_hand(&hand, Some(card(Suit::Clubs, 9))).nobs, 0);
        assert_eq!(score_hand(&hand, None).nobs, 0);
    }

    #[test]
    fn nineteen_hand_scores_nothing() {
        let hand = [
            card(Suit::Hearts, 2),
            card(Suit::Clubs, 4),
            card(Suit::Spades, 6),
            card(Suit::Diamonds, 8),
        ];
        assert_eq!(score_hand(&hand, Some(card(Suit::Hearts, 13))).total, 0);
    }

    #[test]
    fn subsets_of_five_cards() {
        let cards: Vec<Card> = (1..=5).map(|r| card(Suit::Spades, r)).collect();
        let all = subsets(&cards);
        assert_eq!(all.len(), 31);
        assert!(all.iter().all(|s| !s.is_empty()));
    }

    #[test]
    fn out_of_range_ranks_score_nothing() {
        let hand = [
            card(Suit::Hearts, 255),
            card(Suit::Clubs, 255),
            card(Suit::Spades, 254),
            card(Suit::Spades, 3),
        ];
        assert!(!is_run(&hand[..3]));
        let score = score_hand(&hand, Some(card(Suit::Diamonds, 0)));
        assert_eq!(score.fifteens, 0);
        assert_eq!(score.runs, 0);
    }
}
