//! Game engine and state management.

use core::sync::atomic::{AtomicU64, Ordering};

use alloc::vec::Vec;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::sync::Mutex;

use crate::card::{Card, create_deck, shuffle};
use crate::error::ActionError;
use crate::hand::{HandScore, score_hand};
use crate::options::{Difficulty, Settings};
use crate::result::{ScoreEvent, ScoreReason};
use crate::storage::{MemoryStorage, Persistence, Stats, Storage};

mod ai_turn;
mod counting;
mod deal;
mod play;
pub mod state;

pub use ai_turn::{AiAction, AiTicket};
pub use state::{
    CountingStep, DEAL_SIZE, DISCARD_SIZE, DealerSelection, GamePhase, GameState, Player, Scores,
    WINNING_SCORE,
};

/// A hand or crib count at or above this is recorded as a perfect hand.
const PERFECT_HAND: u8 = 28;

/// The highest possible count.
const TWENTY_NINE: u8 = 29;

/// Everything a transition may use besides the state itself.
pub(crate) struct Context<'a> {
    rng: &'a mut ChaCha8Rng,
    difficulty: Difficulty,
    awards: Vec<ScoreEvent>,
}

impl Context<'_> {
    /// Applies an award to `state` and remembers it for statistics.
    ///
    /// Returns `true` if the award ended the game.
    fn award(&mut self, state: &mut GameState, event: ScoreEvent) -> bool {
        self.awards.push(event);
        state.award(event)
    }
}

impl GameState {
    /// Applies an award, ending the game if it reaches the winning score.
    fn award(&mut self, event: ScoreEvent) -> bool {
        self.last_score = Some(event);
        let score = self.scores.add(event.player, u16::from(event.points));
        if score >= WINNING_SCORE && self.phase != GamePhase::GameOver {
            log::info!("{:?} wins with {score} points", event.player);
            self.phase = GamePhase::GameOver;
            self.winner = Some(event.player);
            self.waiting_for_acknowledgement = false;
        }
        self.phase == GamePhase::GameOver
    }
}

/// A cribbage game between the user and the computer.
///
/// The game owns the authoritative [`GameState`]. Every action clones the
/// state, applies the transition to the copy, and commits it only on success,
/// so a rejected action never leaves a partial update behind. Committed
/// states are saved through the [`Persistence`] gateway.
pub struct Game {
    /// Current game state.
    pub state: Mutex<GameState>,
    /// Player settings.
    settings: Mutex<Settings>,
    /// Lifetime statistics.
    stats: Mutex<Stats>,
    /// Number of committed transitions, used to detect stale computer turns.
    revision: AtomicU64,
    /// Random number generator.
    rng: Mutex<ChaCha8Rng>,
    /// Storage for state, statistics, and settings.
    persistence: Mutex<Persistence>,
}

impl Game {
    /// Creates a new game with the given seed, kept in memory only.
    ///
    /// # Example
    ///
    /// ```
    /// use cribbage::{Game, GamePhase, Settings};
    ///
    /// let game = Game::new(Settings::default(), 42);
    /// assert_eq!(game.state().phase, GamePhase::SelectingDealer);
    /// ```
    #[must_use]
    pub fn new(settings: Settings, seed: u64) -> Self {
        let mut persistence = Persistence::new(MemoryStorage::new());
        persistence.save_settings(&settings);
        Self::build(settings, Stats::default(), None, persistence, seed)
    }

    /// Creates a game backed by `storage`, resuming any saved game.
    ///
    /// Saved settings and statistics are restored. A missing, unreadable, or
    /// inconsistent saved game falls back to a fresh one.
    pub fn with_storage(storage: impl Storage + Send + 'static, seed: u64) -> Self {
        let persistence = Persistence::new(storage);
        let settings = persistence.load_settings().unwrap_or_default();
        let stats = persistence.load_stats().unwrap_or_default();
        let saved = persistence.load_game_state().filter(|state| {
            let consistent = state.is_consistent();
            if !consistent {
                log::error!("Discarding inconsistent saved game");
            }
            consistent
        });
        if saved.is_some() {
            log::info!("Resuming saved game");
        }
        Self::build(settings, stats, saved, persistence, seed)
    }

    fn build(
        settings: Settings,
        stats: Stats,
        saved: Option<GameState>,
        mut persistence: Persistence,
        seed: u64,
    ) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let state = saved.unwrap_or_else(|| GameState::new(shuffle(&create_deck(), &mut rng)));
        persistence.save_game_state(&state);

        Self {
            state: Mutex::new(state),
            settings: Mutex::new(settings),
            stats: Mutex::new(stats),
            revision: AtomicU64::new(0),
            rng: Mutex::new(rng),
            persistence: Mutex::new(persistence),
        }
    }

    /// Commits the result of `apply` if it succeeds.
    ///
    /// When `expected_revision` is given, the transition is rejected unless
    /// no other transition has been committed since that revision.
    fn transition<F>(&self, expected_revision: Option<u64>, apply: F) -> Result<GameState, ActionError>
    where
        F: FnOnce(&mut GameState, &mut Context<'_>) -> Result<(), ActionError>,
    {
        let mut state = self.state.lock();

        if expected_revision.is_some_and(|r| r != self.revision.load(Ordering::SeqCst)) {
            log::warn!("Dropping stale computer turn in {:?}", state.phase);
            return Err(ActionError::StaleAiTurn);
        }

        let difficulty = self.settings.lock().difficulty;
        let mut next = state.clone();
        let mut rng = self.rng.lock();
        let mut ctx = Context {
            rng: &mut rng,
            difficulty,
            awards: Vec::new(),
        };

        if let Err(err) = apply(&mut next, &mut ctx) {
            log::warn!("Rejected action in {:?}: {err}", state.phase);
            return Err(err);
        }
        let awards = ctx.awards;
        drop(rng);

        let was_over = state.is_game_over();
        *state = next.clone();
        let revision = self.revision.fetch_add(1, Ordering::SeqCst) + 1;
        self.persistence.lock().save_game_state(&next);
        drop(state);

        log::debug!(
            "Committed revision {revision}: {:?}, user {} ai {}",
            next.phase,
            next.scores.user,
            next.scores.ai
        );
        self.record_stats(&awards, was_over, &next);

        Ok(next)
    }

    fn record_stats(&self, awards: &[ScoreEvent], was_over: bool, state: &GameState) {
        let mut stats = self.stats.lock();
        let before = *stats;

        for event in awards {
            if event.player != Player::User {
                continue;
            }
            if let ScoreReason::Hand(_) | ScoreReason::Crib(_) = event.reason {
                if event.points >= PERFECT_HAND {
                    stats.perfect_hands += 1;
                }
                if event.points == TWENTY_NINE {
                    stats.twenty_nine_hands += 1;
                }
            }
        }

        if !was_over && state.is_game_over() {
            stats.games_played += 1;
            if state.winner == Some(Player::User) {
                stats.games_won += 1;
            }
            stats.highest_score = stats.highest_score.max(state.scores.user);
        }

        if *stats != before {
            let snapshot = *stats;
            drop(stats);
            self.persistence.lock().save_stats(&snapshot);
        }
    }

    /// Abandons the current game and starts a fresh one.
    ///
    /// Any computer turn scheduled for the old game becomes stale.
    pub fn start_new_game(&self) -> GameState {
        let result = self.transition(None, |state, ctx| {
            *state = GameState::new(shuffle(&create_deck(), ctx.rng));
            Ok(())
        });
        log::info!("Started a new game");
        result.unwrap_or_else(|_| self.state())
    }

    /// Draws one card for each player; the lower card deals.
    ///
    /// On a tie the state records `needs_redraw` and stays in
    /// [`GamePhase::SelectingDealer`].
    ///
    /// # Errors
    ///
    /// Returns an error if the game is not selecting a dealer.
    pub fn draw_for_dealer(&self) -> Result<GameState, ActionError> {
        self.transition(None, GameState::draw_for_dealer)
    }

    /// Deals six cards to each player.
    ///
    /// # Errors
    ///
    /// Returns an error if the dealer has not been chosen yet.
    pub fn start_dealing(&self) -> Result<GameState, ActionError> {
        self.transition(None, GameState::start_dealing)
    }

    /// Lays away two of the user's cards; the computer discards at the same time.
    ///
    /// # Errors
    ///
    /// Returns an error if the game is not discarding or `cards` is not two
    /// distinct cards from the user's hand.
    pub fn discard_to_crib(&self, cards: &[Card]) -> Result<GameState, ActionError> {
        self.transition(None, |state, ctx| state.discard_to_crib(cards, ctx))
    }

    /// Cuts the starter on the user's behalf.
    ///
    /// # Errors
    ///
    /// Returns an error if the game is not cutting or the computer is the
    /// one to cut.
    pub fn cut_deck(&self) -> Result<GameState, ActionError> {
        self.transition(None, |state, ctx| state.cut_deck(Player::User, ctx))
    }

    /// Lays one of the user's cards.
    ///
    /// # Errors
    ///
    /// Returns an error if it is not the user's turn to play, the card is not
    /// held, or it would take the count past 31.
    pub fn play_card(&self, card: Card) -> Result<GameState, ActionError> {
        self.transition(None, |state, ctx| state.play_card(Player::User, card, ctx))
    }

    /// Says "go" for the user.
    ///
    /// # Errors
    ///
    /// Returns an error if it is not the user's turn or the user holds a
    /// playable card.
    pub fn pass(&self) -> Result<GameState, ActionError> {
        self.transition(None, |state, ctx| state.pass(Player::User, ctx))
    }

    /// Acknowledges the award on display and moves on.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing is waiting for acknowledgement.
    pub fn acknowledge_score(&self) -> Result<GameState, ActionError> {
        self.transition(None, GameState::acknowledge_score)
    }

    /// Returns a snapshot of the current state.
    pub fn state(&self) -> GameState {
        self.state.lock().clone()
    }

    /// Returns the number of committed transitions.
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::SeqCst)
    }

    /// Returns whether a game has been started and is not yet over.
    pub fn has_game_in_progress(&self) -> bool {
        self.state.lock().is_in_progress()
    }

    /// Returns whether `player` holds a card that can be laid on the count.
    pub fn can_play(&self, player: Player) -> bool {
        self.state.lock().can_play(player)
    }

    /// Counts `player`'s kept hand with the current starter.
    pub fn count_hand(&self, player: Player) -> HandScore {
        let state = self.state.lock();
        score_hand(state.kept(player), state.starter)
    }

    /// Returns the current settings.
    pub fn settings(&self) -> Settings {
        *self.settings.lock()
    }

    /// Returns lifetime statistics.
    pub fn stats(&self) -> Stats {
        *self.stats.lock()
    }

    fn update_settings(&self, update: impl FnOnce(Settings) -> Settings) {
        let mut settings = self.settings.lock();
        *settings = update(*settings);
        let snapshot = *settings;
        drop(settings);
        self.persistence.lock().save_settings(&snapshot);
    }

    /// Sets the computer's difficulty. Takes effect from the next action.
    pub fn set_difficulty(&self, difficulty: Difficulty) {
        self.update_settings(|s| s.with_difficulty(difficulty));
    }

    /// Sets whether sound is enabled.
    pub fn set_sound_enabled(&self, enabled: bool) {
        self.update_settings(|s| s.with_sound_enabled(enabled));
    }

    /// Sets whether haptic feedback is enabled.
    pub fn set_haptic_enabled(&self, enabled: bool) {
        self.update_settings(|s| s.with_haptic_enabled(enabled));
    }

    /// Deletes all saved data. The game in memory is unaffected.
    pub fn clear_saved_data(&self) {
        self.persistence.lock().clear_all();
    }
}
