//! CLI cribbage example.

#![allow(clippy::missing_docs_in_private_items)]

use std::io::{self, Write};
use std::thread;
use std::time::{SystemTime, UNIX_EPOCH};

use cribbage::{Card, FileStorage, Game, GamePhase, GameState, Player, Suit};

fn main() {
    env_logger::init();
    println!("Cribbage CLI example (type 'q' to quit)");

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let dir = std::env::temp_dir().join("cribbage-cli");
    let game = Game::with_storage(FileStorage::new(dir), seed);

    if game.has_game_in_progress() {
        match prompt_line("Resume saved game? (y/n): ").as_str() {
            "y" | "yes" => println!("Resuming."),
            _ => {
                game.start_new_game();
            }
        }
    } else if game.state().is_game_over() {
        game.start_new_game();
    }

    loop {
        while let Some(ticket) = game.schedule_ai_turn() {
            thread::sleep(ticket.delay());
            let before = game.state();
            match game.run_ai_turn(ticket) {
                Ok(state) => report_ai(&before, &state),
                Err(err) => println!("Computer error: {err:?}"),
            }
        }

        let state = game.state();
        let result = match state.phase {
            GamePhase::SelectingDealer => {
                if prompt_line("Press enter to draw for dealer: ") == "q" {
                    return;
                }
                game.draw_for_dealer().map(|s| report_draw(&s))
            }
            GamePhase::Dealing => game.start_dealing().map(|_| ()),
            GamePhase::Discarding => {
                print_table(&state);
                let prompt = "Discard two cards to the crib (e.g. 1 4): ";
                let Some(cards) = prompt_cards(prompt, &state.player_hand, 2) else {
                    return;
                };
                game.discard_to_crib(&cards).map(|_| ())
            }
            GamePhase::Cutting => {
                if prompt_line("Press enter to cut: ") == "q" {
                    return;
                }
                game.cut_deck().map(|s| report_cut(&state, &s))
            }
            GamePhase::Pegging if state.waiting_for_acknowledgement => acknowledge(&game),
            GamePhase::Pegging => {
                print_table(&state);
                if game.can_play(Player::User) {
                    let Some(cards) = prompt_cards("Play a card: ", &state.player_hand, 1) else {
                        return;
                    };
                    game.play_card(cards[0]).map(|s| report_score(&state, &s))
                } else {
                    println!("You have no card to play. Go.");
                    game.pass().map(|_| ())
                }
            }
            GamePhase::Counting => acknowledge(&game),
            GamePhase::GameOver => {
                let winner = if state.winner == Some(Player::User) {
                    "You win"
                } else {
                    "The computer wins"
                };
                println!(
                    "{winner}! Final score: you {} computer {}",
                    state.scores.user, state.scores.ai
                );
                let stats = game.stats();
                println!(
                    "Games won: {} of {} (best {})",
                    stats.games_won, stats.games_played, stats.highest_score
                );
                match prompt_line("Play again? (y/n): ").as_str() {
                    "y" | "yes" => {
                        game.start_new_game();
                        Ok(())
                    }
                    _ => return,
                }
            }
        };

        if let Err(err) = result {
            println!("Action error: {err}");
        }
    }
}

fn acknowledge(game: &Game) -> Result<(), cribbage::ActionError> {
    let state = game.state();
    if let Some(event) = state.last_score {
        println!("{event}");
    }
    if prompt_line("Press enter to continue: ") == "q" {
        std::process::exit(0);
    }
    game.acknowledge_score().map(|_| ())
}

fn report_draw(state: &GameState) {
    let selection = state.dealer_selection;
    if let (Some(user), Some(ai)) = (selection.user_card, selection.ai_card) {
        println!(
            "You drew {}, the computer drew {}.",
            format_card(&user),
            format_card(&ai)
        );
    }
    match state.dealer {
        _ if selection.needs_redraw => println!("Tie. Draw again."),
        Some(Player::User) => println!("You deal first."),
        Some(Player::Ai) => println!("The computer deals first."),
        None => {}
    }
}

fn report_cut(before: &GameState, state: &GameState) {
    if let Some(starter) = state.starter {
        println!("Starter: {}", format_card(&starter));
    }
    report_score(before, state);
}

fn report_ai(before: &GameState, state: &GameState) {
    match (state.pegging.last_played_by, state.pegging.cards.last()) {
        (Some(Player::Ai), Some(card)) => {
            println!(
                "Computer plays {} (count {})",
                format_card(card),
                state.pegging.total
            );
        }
        _ if state.pegging.cards.is_empty() && state.played.is_empty() => {
            if let Some(starter) = state.starter {
                println!("Computer cuts {}", format_card(&starter));
            }
        }
        _ => {}
    }
    report_score(before, state);
}

/// Prints a new award unless it is shown on acknowledgement.
fn report_score(before: &GameState, state: &GameState) {
    if state.scores == before.scores
        || state.waiting_for_acknowledgement
        || state.phase == GamePhase::Counting
    {
        return;
    }
    if let Some(event) = state.last_score {
        println!("{event}");
    }
}

fn prompt_line(prompt: &str) -> String {
    print!("{prompt}");
    let _ = io::stdout().flush();

    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return String::new();
    }
    input.trim().to_lowercase()
}

/// Reads `count` distinct 1-based positions in `hand`.
fn prompt_cards(prompt: &str, hand: &[Card], count: usize) -> Option<Vec<Card>> {
    loop {
        let input = prompt_line(prompt);
        if input == "q" || input == "quit" {
            return None;
        }
        let cards: Vec<Card> = input
            .split_whitespace()
            .filter_map(|s| s.parse::<usize>().ok())
            .filter_map(|i| i.checked_sub(1).and_then(|i| hand.get(i)).copied())
            .collect();
        if cards.len() == count {
            return Some(cards);
        }
        println!("Please enter {count} card number(s) between 1 and {}.", hand.len());
    }
}

fn print_table(state: &GameState) {
    println!(
        "\nScore: you {} | computer {}",
        state.scores.user, state.scores.ai
    );
    if let Some(starter) = state.starter {
        println!("Starter: {}", format_card(&starter));
    }
    if state.phase == GamePhase::Pegging {
        println!(
            "Count {}: {}",
            state.pegging.total,
            format_cards(&state.pegging.cards)
        );
        println!("Computer holds {} card(s)", state.ai_hand.len());
    }
    let numbered = state
        .player_hand
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{}:{}", i + 1, format_card(c)))
        .collect::<Vec<_>>()
        .join(" ");
    println!("Your hand: {numbered}");
}

fn format_cards(cards: &[Card]) -> String {
    if cards.is_empty() {
        return "(none)".to_string();
    }
    cards.iter().map(format_card).collect::<Vec<_>>().join(" ")
}

fn format_card(card: &Card) -> String {
    let color_code = match card.suit {
        Suit::Hearts | Suit::Diamonds => "31",
        Suit::Clubs | Suit::Spades => "34",
    };
    colorize(&card.to_string(), color_code)
}

fn colorize(text: &str, code: &str) -> String {
    format!("\u{1b}[{code}m{text}\u{1b}[0m")
}
