//! Property-based tests for scoring, computer play, and whole games.

use cribbage::ai::{select_discard, select_peg_card};
use cribbage::{
    Card, DECK_SIZE, Difficulty, Game, GamePhase, GameState, PeggingState, Player, Settings,
    WINNING_SCORE, create_deck, score_crib, score_hand,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// A shuffled deck; tests take distinct cards from the front.
fn deck_strategy() -> impl Strategy<Value = Vec<Card>> {
    Just(create_deck()).prop_shuffle()
}

fn difficulty_strategy() -> impl Strategy<Value = Difficulty> {
    prop_oneof![
        Just(Difficulty::Easy),
        Just(Difficulty::Medium),
        Just(Difficulty::Hard),
    ]
}

/// Lays cards from `source` until `plays` have been made or nothing fits.
fn count_from(source: &[Card], plays: usize) -> PeggingState {
    let mut pegging = PeggingState::new();
    for &card in source.iter().take(plays) {
        if !pegging.can_play(card) {
            break;
        }
        pegging.play(card, Player::User);
    }
    pegging
}

/// Takes the obvious legal action for the user, or runs the computer.
fn step(game: &Game, state: &GameState) {
    let result = match state.phase {
        GamePhase::SelectingDealer => game.draw_for_dealer(),
        GamePhase::Dealing => game.start_dealing(),
        GamePhase::Discarding => game.discard_to_crib(&state.player_hand[..2]),
        GamePhase::Cutting if state.dealer == Some(Player::User) => {
            let ticket = game.schedule_ai_turn().expect("computer cuts");
            game.run_ai_turn(ticket)
        }
        GamePhase::Cutting => game.cut_deck(),
        GamePhase::Pegging | GamePhase::Counting if state.waiting_for_acknowledgement => {
            game.acknowledge_score()
        }
        GamePhase::Pegging if state.current_player == Player::Ai => {
            let ticket = game.schedule_ai_turn().expect("computer pegs");
            game.run_ai_turn(ticket)
        }
        GamePhase::Pegging => match state.pegging.playable(&state.player_hand).first() {
            Some(&card) => game.play_card(card),
            None => game.pass(),
        },
        GamePhase::Counting | GamePhase::GameOver => unreachable!("{:?}", state.phase),
    };
    if let Err(err) = result {
        panic!("{err} in {:?}", state.phase);
    }
}

fn assert_conserved(state: &GameState) {
    let mut cards = state.all_cards();
    assert_eq!(cards.len(), DECK_SIZE, "card count in {:?}", state.phase);
    cards.sort();
    cards.dedup();
    assert_eq!(cards.len(), DECK_SIZE, "duplicate card in {:?}", state.phase);
}

proptest! {
    #[test]
    fn hand_score_ignores_card_order(deck in deck_strategy()) {
        let hand = &deck[..4];
        let starter = Some(deck[4]);
        let mut reversed = hand.to_vec();
        reversed.reverse();
        let mut rotated = hand.to_vec();
        rotated.rotate_left(1);

        let expected = score_hand(hand, starter);
        prop_assert_eq!(score_hand(&reversed, starter), expected);
        prop_assert_eq!(score_hand(&rotated, starter), expected);
    }

    #[test]
    fn hand_score_is_attainable(deck in deck_strategy()) {
        let score = score_hand(&deck[..4], Some(deck[4]));
        prop_assert!(score.total <= 29);
        prop_assert!(![19, 25, 26, 27].contains(&score.total), "impossible score {}", score.total);
        prop_assert_eq!(
            score.total,
            score.fifteens + score.pairs + score.runs + score.flush + score.nobs
        );
    }

    #[test]
    fn crib_never_outscores_same_hand(deck in deck_strategy()) {
        let starter = Some(deck[4]);
        let crib = score_crib(&deck[..4], starter);
        let hand = score_hand(&deck[..4], starter);
        prop_assert!(crib.total <= hand.total);
        prop_assert!(crib.flush == 0 || crib.flush == 5);
    }

    #[test]
    fn discard_is_two_held_cards(deck in deck_strategy(), difficulty in difficulty_strategy()) {
        let hand = &deck[..6];
        let discard = select_discard(hand, difficulty);
        prop_assert!(discard.is_some());
        let [a, b] = discard.unwrap_or([deck[0], deck[0]]);
        prop_assert_ne!(a, b);
        prop_assert!(hand.contains(&a) && hand.contains(&b));
    }

    #[test]
    fn computer_peg_is_always_legal(
        deck in deck_strategy(),
        hand_size in 1usize..=4,
        plays in 0usize..=7,
        difficulty in difficulty_strategy(),
        seed in any::<u64>(),
    ) {
        let hand = &deck[..hand_size];
        let pegging = count_from(&deck[4..], plays);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        match select_peg_card(hand, &pegging, difficulty, &mut rng) {
            Some(card) => {
                prop_assert!(hand.contains(&card));
                prop_assert!(pegging.can_play(card));
            }
            None => prop_assert!(!pegging.has_play(hand)),
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn full_game_conserves_cards(seed in any::<u64>(), difficulty in difficulty_strategy()) {
        let settings = Settings::default()
            .with_difficulty(difficulty)
            .with_ai_think_time_ms(0);
        let game = Game::new(settings, seed);

        let mut steps = 0;
        loop {
            let state = game.state();
            assert_conserved(&state);
            prop_assert!(state.pegging.total <= 31);
            if state.phase == GamePhase::GameOver {
                break;
            }
            step(&game, &state);
            steps += 1;
            prop_assert!(steps < 10_000, "game did not finish");
        }

        let state = game.state();
        let winner = state.winner.expect("winner is set");
        prop_assert!(state.scores.get(winner) >= WINNING_SCORE);
        prop_assert!(state.scores.get(winner.opponent()) < WINNING_SCORE);
        prop_assert!(!game.has_game_in_progress());

        let stats = game.stats();
        prop_assert_eq!(stats.games_played, 1);
        prop_assert_eq!(stats.games_won, u32::from(winner == Player::User));
        prop_assert_eq!(stats.highest_score, state.scores.user);
    }
}
