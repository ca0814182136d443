//! Game state types.

use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::card::Card;
use crate::pegging::{MAX_COUNT, PeggingState};
use crate::result::ScoreEvent;

/// Score that ends the game.
pub const WINNING_SCORE: u16 = 121;

/// Cards dealt to each player at the start of a round.
pub const DEAL_SIZE: usize = 6;

/// Cards each player contributes to the crib.
pub const DISCARD_SIZE: usize = 2;

/// One of the two seats at the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    /// The human player.
    User,
    /// The computer opponent.
    Ai,
}

impl Player {
    /// Returns the other player.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::User => Self::Ai,
            Self::Ai => Self::User,
        }
    }
}

/// Game phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GamePhase {
    /// Both players draw a card; the lower card deals.
    SelectingDealer,
    /// The dealer is known and the cards are about to be dealt.
    Dealing,
    /// Each player lays away two cards to the crib.
    Discarding,
    /// The non-dealer cuts the starter.
    Cutting,
    /// Cards are played one at a time toward 31.
    Pegging,
    /// Hands and crib are counted.
    Counting,
    /// A player reached the winning score.
    GameOver,
}

/// Which hand the counting phase is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CountingStep {
    /// The non-dealer's hand, counted first.
    NonDealerHand,
    /// The dealer's hand.
    DealerHand,
    /// The dealer's crib, counted last.
    Crib,
}

/// Cards drawn to decide the first dealer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DealerSelection {
    /// Card drawn by the user.
    pub user_card: Option<Card>,
    /// Card drawn by the computer.
    pub ai_card: Option<Card>,
    /// Whether the draw tied and must be repeated.
    pub needs_redraw: bool,
}

/// Running scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Scores {
    /// The user's score.
    pub user: u16,
    /// The computer's score.
    pub ai: u16,
}

impl Scores {
    /// Returns the score of `player`.
    #[must_use]
    pub const fn get(&self, player: Player) -> u16 {
        match player {
            Player::User => self.user,
            Player::Ai => self.ai,
        }
    }

    /// Adds points to `player` and returns the new score.
    pub fn add(&mut self, player: Player, points: u16) -> u16 {
        let score = match player {
            Player::User => &mut self.user,
            Player::Ai => &mut self.ai,
        };
        *score = score.saturating_add(points);
        *score
    }
}

/// Complete state of a game in progress.
///
/// The state is a plain value: the controller clones it, applies a
/// transition, and commits the result as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Current phase.
    pub phase: GamePhase,
    /// Undealt cards. Dealing and cutting take from the front.
    pub deck: Vec<Card>,
    /// Cards the user still holds.
    pub player_hand: Vec<Card>,
    /// Cards the computer still holds.
    pub ai_hand: Vec<Card>,
    /// The user's four kept cards, for counting after pegging.
    pub player_keep: Vec<Card>,
    /// The computer's four kept cards, for counting after pegging.
    pub ai_keep: Vec<Card>,
    /// The crib.
    pub crib: Vec<Card>,
    /// The cut card.
    pub starter: Option<Card>,
    /// Whose turn it is during pegging.
    pub current_player: Player,
    /// The dealer of the current round.
    pub dealer: Option<Player>,
    /// Result of the draw for first deal.
    pub dealer_selection: DealerSelection,
    /// Running scores.
    pub scores: Scores,
    /// The current count during pegging.
    pub pegging: PeggingState,
    /// Cards pegged in earlier counts of this round.
    pub played: Vec<Card>,
    /// The hand being shown during counting.
    pub counting: Option<CountingStep>,
    /// The winner, once the game is over.
    pub winner: Option<Player>,
    /// The most recent award, for display.
    pub last_score: Option<ScoreEvent>,
    /// Whether play is paused until the award is acknowledged.
    pub waiting_for_acknowledgement: bool,
}

impl GameState {
    /// Creates a fresh game ready for the draw for dealer.
    #[must_use]
    pub const fn new(deck: Vec<Card>) -> Self {
        Self {
            phase: GamePhase::SelectingDealer,
            deck,
            player_hand: Vec::new(),
            ai_hand: Vec::new(),
            player_keep: Vec::new(),
            ai_keep: Vec::new(),
            crib: Vec::new(),
            starter: None,
            current_player: Player::User,
            dealer: None,
            dealer_selection: DealerSelection {
                user_card: None,
                ai_card: None,
                needs_redraw: false,
            },
            scores: Scores { user: 0, ai: 0 },
            pegging: PeggingState::new(),
            played: Vec::new(),
            counting: None,
            winner: None,
            last_score: None,
            waiting_for_acknowledgement: false,
        }
    }

    /// Returns the cards `player` still holds.
    #[must_use]
    pub fn hand(&self, player: Player) -> &[Card] {
        match player {
            Player::User => &self.player_hand,
            Player::Ai => &self.ai_hand,
        }
    }

    pub(crate) const fn hand_mut(&mut self, player: Player) -> &mut Vec<Card> {
        match player {
            Player::User => &mut self.player_hand,
            Player::Ai => &mut self.ai_hand,
        }
    }

    /// Returns the four cards `player` kept for counting.
    #[must_use]
    pub fn kept(&self, player: Player) -> &[Card] {
        match player {
            Player::User => &self.player_keep,
            Player::Ai => &self.ai_keep,
        }
    }

    /// Returns whether `player` holds a card that fits under 31.
    #[must_use]
    pub fn can_play(&self, player: Player) -> bool {
        self.pegging.has_play(self.hand(player))
    }

    /// Returns whether the game has been started and is not yet over.
    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        !matches!(self.phase, GamePhase::SelectingDealer | GamePhase::GameOver)
    }

    /// Returns whether the game has ended.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Returns every physical card location, for conservation checks.
    ///
    /// The kept copies used for counting are not included.
    #[must_use]
    pub fn all_cards(&self) -> Vec<Card> {
        let mut cards = Vec::with_capacity(crate::card::DECK_SIZE);
        cards.extend_from_slice(&self.deck);
        cards.extend_from_slice(&self.player_hand);
        cards.extend_from_slice(&self.ai_hand);
        cards.extend_from_slice(&self.crib);
        cards.extend(self.starter);
        cards.extend_from_slice(&self.pegging.cards);
        cards.extend_from_slice(&self.played);
        cards
    }

    /// Returns whether the state could have come from a real game.
    ///
    /// Every rank is in 1..=13, the card locations hold each of the 52 cards
    /// exactly once, and the count matches the cards on it.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let mut cards = self.all_cards();
        let in_range = |c: &Card| (1..=13).contains(&c.rank);
        if !cards
            .iter()
            .chain(&self.player_keep)
            .chain(&self.ai_keep)
            .all(in_range)
        {
            return false;
        }

        let total = cards.len();
        cards.sort_unstable();
        cards.dedup();
        if total != crate::card::DECK_SIZE || cards.len() != total {
            return false;
        }

        let count: u32 = self.pegging.cards.iter().map(|c| u32::from(c.value())).sum();
        self.pegging.total <= MAX_COUNT && u32::from(self.pegging.total) == count
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
