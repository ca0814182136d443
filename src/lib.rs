//! A two-player cribbage engine with optional `no_std` support.
//!
//! The crate provides a [`Game`] type that runs a game of cribbage between a
//! user and a computer opponent: the draw for dealer, the deal and discard to
//! the crib, the cut, the play, and the count, up to 121 points.
//! The scoring rules live in [`hand`] and [`pegging`] as pure functions, and
//! the computer's choices in [`ai`].
//!
//! # Example
//!
//! ```
//! use cribbage::{Game, GamePhase, Settings};
//!
//! let game = Game::new(Settings::default(), 42);
//! let mut state = game.draw_for_dealer().unwrap();
//! while state.dealer_selection.needs_redraw {
//!     state = game.draw_for_dealer().unwrap();
//! }
//! let state = game.start_dealing().unwrap();
//! assert_eq!(state.phase, GamePhase::Discarding);
//! assert_eq!(state.player_hand.len(), 6);
//! ```
#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(all(not(feature = "std"), not(feature = "alloc")))]
compile_error!(
    "`std` is disabled but `alloc` feature is not enabled. Enable `alloc` or keep `std` enabled."
);

extern crate alloc;

pub mod ai;
pub mod card;
pub mod error;
pub mod game;
pub mod hand;
pub mod options;
pub mod pegging;
pub mod result;
pub mod storage;
mod sync;

// Re-export main types
pub use card::{Card, DECK_SIZE, Suit, card_value, create_deck, shuffle};
pub use error::{ActionError, StorageError};
pub use game::{
    AiAction, AiTicket, CountingStep, DealerSelection, Game, GamePhase, GameState, Player, Scores,
    WINNING_SCORE,
};
pub use hand::{HandScore, score_crib, score_hand};
pub use options::{Difficulty, Settings};
pub use pegging::{PeggingScore, PeggingState};
pub use result::{ScoreEvent, ScoreReason};
#[cfg(feature = "std")]
pub use storage::FileStorage;
pub use storage::{MemoryStorage, Persistence, Stats, Storage};
