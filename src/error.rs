//! Error types for game operations.

use alloc::string::String;
use thiserror::Error;

/// Reasons an action was rejected.
///
/// A rejected action leaves the game state untouched, so callers are free to
/// ignore these errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActionError {
    /// The action does not belong to the current phase.
    #[error("invalid game phase for this action")]
    InvalidPhase,
    /// The other player is to act.
    #[error("not your turn")]
    NotYourTurn,
    /// An award must be acknowledged first.
    #[error("waiting for a score to be acknowledged")]
    AwaitingAcknowledgement,
    /// No award is on display.
    #[error("nothing to acknowledge")]
    NothingToAcknowledge,
    /// The card is not in the player's hand.
    #[error("card not in hand")]
    CardNotInHand,
    /// The card would take the count past 31.
    #[error("card would take the count past 31")]
    ExceedsThirtyOne,
    /// A go was called while holding a playable card.
    #[error("a playable card must be played")]
    MustPlay,
    /// The discard is not two distinct cards from the hand.
    #[error("discard must be exactly two cards from your hand")]
    InvalidDiscard,
    /// The deck ran short.
    #[error("not enough cards in the deck")]
    NotEnoughCards,
    /// The game has already been won.
    #[error("the game is over")]
    GameOver,
    /// The scheduled computer turn no longer matches the game.
    #[error("scheduled computer turn is stale")]
    StaleAiTurn,
}

/// Errors raised by a storage backend.
///
/// These never reach the game controller's callers; the persistence gateway
/// logs them and carries on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// The backend failed to read or write.
    #[error("storage backend error: {0}")]
    Backend(String),
    /// A stored value could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}
