use core::time::Duration;

use crate::error::ActionError;

use super::{Game, GamePhase, GameState, Player};

/// Something the computer has to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiAction {
    /// Cut the starter (the user is dealing).
    Cut,
    /// Lay a card or say go.
    Peg,
}

/// A computer action scheduled for later.
///
/// The ticket remembers the revision of the game it was issued for. If any
/// other transition commits first (a user action or a new game), running the
/// ticket does nothing and reports [`ActionError::StaleAiTurn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AiTicket {
    revision: u64,
    phase: GamePhase,
    action: AiAction,
    delay: Duration,
}

impl AiTicket {
    /// The action the computer will take.
    #[must_use]
    pub const fn action(&self) -> AiAction {
        self.action
    }

    /// The phase the ticket was issued in.
    #[must_use]
    pub const fn phase(&self) -> GamePhase {
        self.phase
    }

    /// The revision the ticket was issued at.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// How long the host should wait before running the ticket.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }
}

impl GameState {
    /// Returns the action the computer owes, if any.
    #[must_use]
    pub fn pending_ai_action(&self) -> Option<AiAction> {
        match self.phase {
            GamePhase::Cutting if self.dealer == Some(Player::User) => Some(AiAction::Cut),
            GamePhase::Pegging
                if !self.waiting_for_acknowledgement && self.current_player == Player::Ai =>
            {
                Some(AiAction::Peg)
            }
            _ => None,
        }
    }
}

impl Game {
    /// Returns the action the computer owes, if any.
    pub fn pending_ai_action(&self) -> Option<AiAction> {
        self.state.lock().pending_ai_action()
    }

    /// Issues a ticket for the computer's next action, if it has one.
    ///
    /// The host waits [`AiTicket::delay`] and then calls [`Game::run_ai_turn`].
    pub fn schedule_ai_turn(&self) -> Option<AiTicket> {
        let state = self.state.lock();
        let action = state.pending_ai_action()?;
        Some(AiTicket {
            revision: self.revision(),
            phase: state.phase,
            action,
            delay: self.settings().ai_think_time(),
        })
    }

    /// Performs a scheduled computer action.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::StaleAiTurn`] if the game has moved on since the
    /// ticket was issued.
    pub fn run_ai_turn(&self, ticket: AiTicket) -> Result<GameState, ActionError> {
        self.transition(Some(ticket.revision), |state, ctx| {
            if state.phase != ticket.phase || state.pending_ai_action() != Some(ticket.action) {
                return Err(ActionError::StaleAiTurn);
            }
            match ticket.action {
                AiAction::Cut => state.cut_deck(Player::Ai, ctx),
                AiAction::Peg => state.ai_peg(ctx),
            }
        })
    }

    /// Runs every computer action that is owed right now, without waiting.
    ///
    /// Returns the number of actions taken.
    pub fn run_pending_ai_turns(&self) -> usize {
        let mut taken = 0;
        while let Some(ticket) = self.schedule_ai_turn() {
            if self.run_ai_turn(ticket).is_err() {
                break;
            }
            taken += 1;
        }
        taken
    }
}
