use crate::ai::select_peg_card;
use crate::card::Card;
use crate::error::ActionError;
use crate::pegging::MAX_COUNT;
use crate::result::{ScoreEvent, ScoreReason};

use super::{Context, GamePhase, GameState, Player};

/// Points for a go or for the last card of the play.
const GO: u8 = 1;

impl GameState {
    fn ensure_turn(&self, player: Player) -> Result<(), ActionError> {
        self.ensure_phase(GamePhase::Pegging)?;

        if self.waiting_for_acknowledgement {
            return Err(ActionError::AwaitingAcknowledgement);
        }

        if self.current_player != player {
            return Err(ActionError::NotYourTurn);
        }

        Ok(())
    }

    fn hands_empty(&self) -> bool {
        self.player_hand.is_empty() && self.ai_hand.is_empty()
    }

    /// Returns `preferred` if they still hold cards, otherwise their opponent.
    fn next_to_act(&self, preferred: Player) -> Player {
        if self.hand(preferred).is_empty() {
            preferred.opponent()
        } else {
            preferred
        }
    }

    /// Moves the cards on the count to the played pile and resets the count.
    fn end_count(&mut self) {
        let cards = self.pegging.reset();
        self.played.extend(cards);
    }

    pub(super) fn play_card(
        &mut self,
        player: Player,
        card: Card,
        ctx: &mut Context<'_>,
    ) -> Result<(), ActionError> {
        self.ensure_turn(player)?;

        let index = self
            .hand(player)
            .iter()
            .position(|c| *c == card)
            .ok_or(ActionError::CardNotInHand)?;

        if !self.pegging.can_play(card) {
            return Err(ActionError::ExceedsThirtyOne);
        }

        self.hand_mut(player).remove(index);
        let score = self.pegging.play(card, player);
        log::debug!("{player:?} played {card}, count {}", self.pegging.total);

        if score.total() > 0 {
            let event = ScoreEvent {
                player,
                points: score.total(),
                reason: ScoreReason::Pegging(score),
            };
            if ctx.award(self, event) {
                return Ok(());
            }
        }

        if self.pegging.total == MAX_COUNT {
            // The 31 already scored; no go point follows it.
            self.end_count();
            if self.hands_empty() {
                self.start_counting(ctx);
            } else {
                self.current_player = self.next_to_act(player.opponent());
            }
            return Ok(());
        }

        if self.hands_empty() {
            let event = ScoreEvent {
                player,
                points: GO,
                reason: ScoreReason::LastCard,
            };
            if !ctx.award(self, event) {
                self.waiting_for_acknowledgement = true;
            }
            return Ok(());
        }

        self.current_player = self.next_to_act(player.opponent());
        Ok(())
    }

    pub(super) fn pass(&mut self, player: Player, ctx: &mut Context<'_>) -> Result<(), ActionError> {
        self.ensure_turn(player)?;

        if self.can_play(player) {
            return Err(ActionError::MustPlay);
        }

        let opponent = player.opponent();
        if self.can_play(opponent) {
            self.current_player = opponent;
            return Ok(());
        }

        match self.pegging.last_played_by {
            Some(last) => {
                let event = ScoreEvent {
                    player: last,
                    points: GO,
                    reason: ScoreReason::Go,
                };
                if !ctx.award(self, event) {
                    self.waiting_for_acknowledgement = true;
                }
            }
            None => self.resume_play(ctx),
        }
        Ok(())
    }

    /// Clears the count after a go or last card and hands the lead on.
    pub(super) fn resume_play(&mut self, ctx: &mut Context<'_>) {
        let last = self.pegging.last_played_by;
        self.end_count();
        self.waiting_for_acknowledgement = false;

        if self.hands_empty() {
            self.start_counting(ctx);
            return;
        }

        let leader = last.map_or(self.current_player, Player::opponent);
        self.current_player = self.next_to_act(leader);
    }

    /// Plays or passes for the computer.
    pub(super) fn ai_peg(&mut self, ctx: &mut Context<'_>) -> Result<(), ActionError> {
        let choice = select_peg_card(&self.ai_hand, &self.pegging, ctx.difficulty, ctx.rng);
        match choice {
            Some(card) => self.play_card(Player::Ai, card, ctx),
            None => self.pass(Player::Ai, ctx),
        }
    }
}
