//! Computer opponent: discard and pegging choices.

use alloc::vec::Vec;
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::card::Card;
use crate::hand::{is_run, score_hand};
use crate::options::Difficulty;
use crate::pegging::{MAX_COUNT, PeggingState};

/// Chance that a medium opponent plays its best card instead of a random one.
const MEDIUM_BEST_PLAY_CHANCE: f64 = 0.7;

/// Chooses two cards to lay away to the crib.
///
/// Every two-card discard is tried and the one leaving the best keep-hand is
/// returned; ties go to the first discard found. Returns `None` when the hand
/// holds fewer than two cards.
#[must_use]
pub fn select_discard(hand: &[Card], difficulty: Difficulty) -> Option<[Card; 2]> {
    let mut best: Option<([Card; 2], u32)> = None;

    for i in 0..hand.len() {
        for j in i + 1..hand.len() {
            let kept: Vec<Card> = hand
                .iter()
                .enumerate()
                .filter(|&(k, _)| k != i && k != j)
                .map(|(_, c)| *c)
                .collect();
            let value = evaluate_keep(&kept, difficulty);
            if best.is_none_or(|(_, best_value)| value > best_value) {
                best = Some(([hand[i], hand[j]], value));
            }
        }
    }

    best.map(|(discard, _)| discard)
}

/// Rates a keep-hand in tenths of a point.
///
/// The base is the hand's count without a starter. Hard opponents add a
/// tenth of the cards' pip total, the run length for an unbroken run, and two
/// points for a single suit.
#[must_use]
pub fn evaluate_keep(kept: &[Card], difficulty: Difficulty) -> u32 {
    let mut value = u32::from(score_hand(kept, None).total) * 10;

    if difficulty == Difficulty::Hard {
        value += kept.iter().map(|c| u32::from(c.value())).sum::<u32>();
        if kept.len() > 1 && is_run(kept) {
            value += kept.len() as u32 * 10;
        }
        if kept.windows(2).all(|w| w[0].suit == w[1].suit) {
            value += 20;
        }
    }

    value
}

/// Chooses a card to lay during the play, or `None` for a go.
pub fn select_peg_card<R: Rng + ?Sized>(
    hand: &[Card],
    pegging: &PeggingState,
    difficulty: Difficulty,
    rng: &mut R,
) -> Option<Card> {
    let playable = pegging.playable(hand);
    if playable.is_empty() {
        return None;
    }

    match difficulty {
        Difficulty::Easy => playable.choose(rng).copied(),
        Difficulty::Medium => {
            if rng.random_bool(MEDIUM_BEST_PLAY_CHANCE) {
                best_peg_card(&playable, pegging)
            } else {
                playable.choose(rng).copied()
            }
        }
        Difficulty::Hard => best_peg_card(&playable, pegging),
    }
}

/// Picks the highest-rated card from `playable`; ties go to the first.
fn best_peg_card(playable: &[Card], pegging: &PeggingState) -> Option<Card> {
    let mut best: Option<(Card, i32)> = None;
    for &card in playable {
        let rating = rate_peg_card(card, pegging);
        if best.is_none_or(|(_, best_rating)| rating > best_rating) {
            best = Some((card, rating));
        }
    }
    best.map(|(card, _)| card)
}

/// Rates laying `card` on the current count.
#[must_use]
pub fn rate_peg_card(card: Card, pegging: &PeggingState) -> i32 {
    let mut rating = 0;
    let new_total = pegging.total + card.value();

    if new_total == 15 || new_total == MAX_COUNT {
        rating += 2;
    }

    if pegging.cards.last().is_some_and(|last| last.rank == card.rank) {
        rating += 2;
    }

    if pegging.cards.len() >= 2 {
        let mut trio: Vec<Card> = pegging.cards[pegging.cards.len() - 2..].to_vec();
        trio.push(card);
        if is_run(&trio) {
            rating += trio.len() as i32;
        }
    }

    // Leaves the opponent a fifteen's worth of room to 31.
    if MAX_COUNT.checked_sub(new_total) == Some(15) {
        rating -= 1;
    }

    rating
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Suit;
    use crate::game::Player;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const fn card(suit: Suit, rank: u8) -> Card {
        Card::new(suit, rank)
    }

    fn count_of(cards: &[Card]) -> PeggingState {
        let mut pegging = PeggingState::new();
        for (i, c) in cards.iter().enumerate() {
            let player = if i % 2 == 0 { Player::User } else { Player::Ai };
            pegging.play(*c, player);
        }
        pegging
    }

    #[test]
    fn discard_keeps_the_fives() {
        let hand = [
            card(Suit::Hearts, 5),
            card(Suit::Clubs, 5),
            card(Suit::Spades, 5),
            card(Suit::Diamonds, 10),
            card(Suit::Hearts, 2),
            card(Suit::Clubs, 9),
        ];
        let discard = select_discard(&hand, Difficulty::Easy).unwrap();
        assert!(discard.contains(&card(Suit::Hearts, 2)));
        assert!(discard.contains(&card(Suit::Clubs, 9)));
    }

    #[test]
    fn hard_discard_is_reproducible() {
        let hand = [
            card(Suit::Hearts, 1),
            card(Suit::Clubs, 4),
            card(Suit::Spades, 7),
            card(Suit::Diamonds, 8),
            card(Suit::Hearts, 12),
            card(Suit::Clubs, 13),
        ];
        let first = select_discard(&hand, Difficulty::Hard);
        for _ in 0..5 {
            assert_eq!(select_discard(&hand, Difficulty::Hard), first);
        }
    }

    #[test]
    fn discard_needs_two_cards() {
        assert_eq!(select_discard(&[card(Suit::Hearts, 1)], Difficulty::Hard), None);
    }

    #[test]
    fn hard_bonus_prefers_suited_runs() {
        let suited_run = [
            card(Suit::Hearts, 9),
            card(Suit::Hearts, 10),
            card(Suit::Hearts, 11),
            card(Suit::Hearts, 12),
        ];
        assert!(
            evaluate_keep(&suited_run, Difficulty::Hard)
                > evaluate_keep(&suited_run, Difficulty::Easy)
        );
        // Run of four plus a four-card flush.
        assert_eq!(evaluate_keep(&suited_run, Difficulty::Easy), 80);
        // Bonus: pips 39, run 40, suit 20.
        assert_eq!(evaluate_keep(&suited_run, Difficulty::Hard), 179);
    }

    #[test]
    fn hard_takes_fifteen() {
        let pegging = count_of(&[card(Suit::Hearts, 10)]);
        let hand = [card(Suit::Clubs, 2), card(Suit::Spades, 5)];
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(
            select_peg_card(&hand, &pegging, Difficulty::Hard, &mut rng),
            Some(card(Suit::Spades, 5))
        );
    }

    #[test]
    fn hard_takes_pair() {
        let pegging = count_of(&[card(Suit::Hearts, 3)]);
        let hand = [card(Suit::Clubs, 2), card(Suit::Spades, 3)];
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(
            select_peg_card(&hand, &pegging, Difficulty::Hard, &mut rng),
            Some(card(Suit::Spades, 3))
        );
    }

    #[test]
    fn hard_extends_run() {
        let pegging = count_of(&[card(Suit::Hearts, 4), card(Suit::Diamonds, 5)]);
        let hand = [card(Suit::Clubs, 9), card(Suit::Spades, 6)];
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(
            select_peg_card(&hand, &pegging, Difficulty::Hard, &mut rng),
            Some(card(Suit::Spades, 6))
        );
    }

    #[test]
    fn run_bonus_is_run_length() {
        let pegging = count_of(&[card(Suit::Hearts, 2), card(Suit::Diamonds, 3)]);
        assert_eq!(rate_peg_card(card(Suit::Clubs, 4), &pegging), 3);
        assert_eq!(rate_peg_card(card(Suit::Clubs, 9), &pegging), 0);
    }

    #[test]
    fn hard_avoids_leaving_fifteen_to_go() {
        let pegging = count_of(&[card(Suit::Hearts, 10)]);
        // 10 + 6 = 16 leaves exactly 15; 10 + 7 = 17 does not.
        let hand = [card(Suit::Clubs, 6), card(Suit::Spades, 7)];
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(
            select_peg_card(&hand, &pegging, Difficulty::Hard, &mut rng),
            Some(card(Suit::Spades, 7))
        );
    }

    #[test]
    fn ties_go_to_first_card() {
        let pegging = PeggingState::new();
        let hand = [card(Suit::Clubs, 2), card(Suit::Spades, 3)];
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(
            select_peg_card(&hand, &pegging, Difficulty::Hard, &mut rng),
            Some(card(Suit::Clubs, 2))
        );
    }

    #[test]
    fn no_legal_card_means_go() {
        let pegging = count_of(&[
            card(Suit::Hearts, 10),
            card(Suit::Clubs, 10),
            card(Suit::Spades, 8),
        ]);
        let hand = [card(Suit::Clubs, 4), card(Suit::Spades, 13)];
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            assert_eq!(select_peg_card(&hand, &pegging, difficulty, &mut rng), None);
        }
    }

    #[test]
    fn random_tiers_only_play_legal_cards() {
        let pegging = count_of(&[
            card(Suit::Hearts, 10),
            card(Suit::Clubs, 12),
            card(Suit::Diamonds, 5),
        ]);
        let hand = [
            card(Suit::Clubs, 1),
            card(Suit::Spades, 13),
            card(Suit::Diamonds, 11),
            card(Suit::Hearts, 6),
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(77);
        for _ in 0..200 {
            for difficulty in [Difficulty::Easy, Difficulty::Medium] {
                let chosen = select_peg_card(&hand, &pegging, difficulty, &mut rng).unwrap();
                assert!(pegging.can_play(chosen));
                assert!(hand.contains(&chosen));
            }
        }
    }
}
