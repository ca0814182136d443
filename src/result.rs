//! Score awards reported by the game.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::game::Player;
use crate::hand::HandScore;
use crate::pegging::PeggingScore;

/// Why points were awarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind", content = "detail")]
pub enum ScoreReason {
    /// The dealer cut a Jack as the starter.
    HisHeels,
    /// Points from laying a card during the play.
    Pegging(PeggingScore),
    /// Nobody could play; the last player to lay a card pegs one.
    Go,
    /// The final card of the play.
    LastCard,
    /// A player's hand was counted.
    Hand(HandScore),
    /// The dealer's crib was counted.
    Crib(HandScore),
}

/// A single award of points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEvent {
    /// Who scored.
    pub player: Player,
    /// Points awarded.
    pub points: u8,
    /// What the points were for.
    pub reason: ScoreReason,
}

impl fmt::Display for ScoreEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (who, whose) = match self.player {
            Player::User => ("You", "Your"),
            Player::Ai => ("AI", "AI's"),
        };
        let unit = if self.points == 1 { "point" } else { "points" };

        match self.reason {
            ScoreReason::HisHeels => write!(f, "{who} scored {} {unit} for his heels", self.points),
            ScoreReason::Pegging(_) => write!(f, "{who} pegged {} {unit}", self.points),
            ScoreReason::Go => write!(f, "{who} scored {} {unit} for go", self.points),
            ScoreReason::LastCard => write!(f, "{who} scored {} {unit} for last card", self.points),
            ScoreReason::Hand(_) => write!(f, "{whose} hand scores {} {unit}", self.points),
            ScoreReason::Crib(_) => write!(f, "{whose} crib scores {} {unit}", self.points),
        }
    }
}
