use crate::error::ActionError;
use crate::hand::{score_crib, score_hand};
use crate::result::{ScoreEvent, ScoreReason};

use super::{Context, CountingStep, GamePhase, GameState};

impl GameState {
    /// Enters the counting phase and counts the non-dealer's hand.
    pub(super) fn start_counting(&mut self, ctx: &mut Context<'_>) {
        self.phase = GamePhase::Counting;
        self.waiting_for_acknowledgement = false;
        self.count(CountingStep::NonDealerHand, ctx);
    }

    /// Counts one hand and waits for it to be acknowledged.
    fn count(&mut self, step: CountingStep, ctx: &mut Context<'_>) {
        let Some(dealer) = self.dealer else {
            return;
        };

        let (player, reason) = match step {
            CountingStep::NonDealerHand => {
                let player = dealer.opponent();
                (player, ScoreReason::Hand(score_hand(self.kept(player), self.starter)))
            }
            CountingStep::DealerHand => (
                dealer,
                ScoreReason::Hand(score_hand(self.kept(dealer), self.starter)),
            ),
            CountingStep::Crib => (dealer, ScoreReason::Crib(score_crib(&self.crib, self.starter))),
        };
        let points = match reason {
            ScoreReason::Hand(score) | ScoreReason::Crib(score) => score.total,
            _ => 0,
        };

        self.counting = Some(step);
        self.waiting_for_acknowledgement = true;
        ctx.award(
            self,
            ScoreEvent {
                player,
                points,
                reason,
            },
        );
    }

    pub(super) fn acknowledge_score(&mut self, ctx: &mut Context<'_>) -> Result<(), ActionError> {
        if self.phase == GamePhase::GameOver {
            return Err(ActionError::GameOver);
        }
        if !self.waiting_for_acknowledgement {
            return Err(ActionError::NothingToAcknowledge);
        }

        match self.phase {
            GamePhase::Pegging => {
                self.resume_play(ctx);
                Ok(())
            }
            GamePhase::Counting => match self.counting {
                None => {
                    self.count(CountingStep::NonDealerHand, ctx);
                    Ok(())
                }
                Some(CountingStep::NonDealerHand) => {
                    self.count(CountingStep::DealerHand, ctx);
                    Ok(())
                }
                Some(CountingStep::DealerHand) => {
                    self.count(CountingStep::Crib, ctx);
                    Ok(())
                }
                Some(CountingStep::Crib) => self.next_round(ctx),
            },
            _ => Err(ActionError::NothingToAcknowledge),
        }
    }
}
