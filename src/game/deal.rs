use rand::Rng;

use crate::ai::select_discard;
use crate::card::{Card, create_deck, shuffle};
use crate::error::ActionError;
use crate::pegging::PeggingState;
use crate::result::{ScoreEvent, ScoreReason};

use super::{Context, DEAL_SIZE, DISCARD_SIZE, DealerSelection, GamePhase, GameState, Player};

/// Points for cutting a Jack as the starter.
const HIS_HEELS: u8 = 2;

impl GameState {
    pub(super) fn ensure_phase(&self, phase: GamePhase) -> Result<(), ActionError> {
        match self.phase {
            current if current == phase => Ok(()),
            GamePhase::GameOver => Err(ActionError::GameOver),
            _ => Err(ActionError::InvalidPhase),
        }
    }

    pub(super) fn draw_for_dealer(&mut self, ctx: &mut Context<'_>) -> Result<(), ActionError> {
        self.ensure_phase(GamePhase::SelectingDealer)?;

        let (Some(&user_card), Some(&ai_card)) = (self.deck.first(), self.deck.get(1)) else {
            return Err(ActionError::NotEnoughCards);
        };
        let needs_redraw = user_card.rank == ai_card.rank;

        self.dealer_selection = DealerSelection {
            user_card: Some(user_card),
            ai_card: Some(ai_card),
            needs_redraw,
        };
        // The drawn cards go back before the deal.
        self.deck = shuffle(&self.deck, ctx.rng);

        if needs_redraw {
            log::debug!("Dealer draw tied on {user_card} and {ai_card}");
            return Ok(());
        }

        let dealer = if user_card.rank < ai_card.rank {
            Player::User
        } else {
            Player::Ai
        };
        log::info!("{dealer:?} deals first ({user_card} vs {ai_card})");
        self.dealer = Some(dealer);
        self.current_player = dealer.opponent();
        self.phase = GamePhase::Dealing;
        Ok(())
    }

    pub(super) fn start_dealing(&mut self, _ctx: &mut Context<'_>) -> Result<(), ActionError> {
        self.ensure_phase(GamePhase::Dealing)?;
        self.deal_hands()?;
        self.phase = GamePhase::Discarding;
        Ok(())
    }

    /// Deals a fresh round from the deck and clears the previous round's cards.
    fn deal_hands(&mut self) -> Result<(), ActionError> {
        if self.deck.len() < DEAL_SIZE * 2 {
            return Err(ActionError::NotEnoughCards);
        }

        self.player_hand = self.deck.drain(..DEAL_SIZE).collect();
        self.ai_hand = self.deck.drain(..DEAL_SIZE).collect();
        self.player_keep.clear();
        self.ai_keep.clear();
        self.crib.clear();
        self.starter = None;
        self.pegging = PeggingState::new();
        self.played.clear();
        self.counting = None;
        self.last_score = None;
        self.waiting_for_acknowledgement = false;
        if let Some(dealer) = self.dealer {
            self.current_player = dealer.opponent();
        }
        Ok(())
    }

    /// Starts the next round with the deal passing to the other player.
    pub(super) fn next_round(&mut self, ctx: &mut Context<'_>) -> Result<(), ActionError> {
        let dealer = self.dealer.ok_or(ActionError::InvalidPhase)?.opponent();
        self.dealer = Some(dealer);
        self.deck = shuffle(&create_deck(), ctx.rng);
        self.deal_hands()?;
        self.phase = GamePhase::Discarding;
        log::debug!("New round, {dealer:?} deals");
        Ok(())
    }

    pub(super) fn discard_to_crib(
        &mut self,
        cards: &[Card],
        ctx: &mut Context<'_>,
    ) -> Result<(), ActionError> {
        self.ensure_phase(GamePhase::Discarding)?;

        let valid = cards.len() == DISCARD_SIZE
            && cards[0] != cards[1]
            && cards.iter().all(|c| self.player_hand.contains(c));
        if !valid {
            return Err(ActionError::InvalidDiscard);
        }
        let ai_discard =
            select_discard(&self.ai_hand, ctx.difficulty).ok_or(ActionError::NotEnoughCards)?;

        self.player_hand.retain(|c| !cards.contains(c));
        self.ai_hand.retain(|c| !ai_discard.contains(c));
        self.player_keep.clone_from(&self.player_hand);
        self.ai_keep.clone_from(&self.ai_hand);
        self.crib = cards.iter().chain(&ai_discard).copied().collect();
        self.phase = GamePhase::Cutting;
        Ok(())
    }

    /// Cuts the starter. Only the non-dealer may cut.
    pub(super) fn cut_deck(
        &mut self,
        player: Player,
        ctx: &mut Context<'_>,
    ) -> Result<(), ActionError> {
        self.ensure_phase(GamePhase::Cutting)?;
        let dealer = self.dealer.ok_or(ActionError::InvalidPhase)?;
        if player == dealer {
            return Err(ActionError::NotYourTurn);
        }
        if self.deck.is_empty() {
            return Err(ActionError::NotEnoughCards);
        }

        let index = ctx.rng.random_range(0..self.deck.len());
        let starter = self.deck.remove(index);
        self.starter = Some(starter);
        self.phase = GamePhase::Pegging;
        self.current_player = dealer.opponent();
        log::debug!("{player:?} cut {starter}");

        if starter.is_jack() {
            ctx.award(
                self,
                ScoreEvent {
                    player: dealer,
                    points: HIS_HEELS,
                    reason: ScoreReason::HisHeels,
                },
            );
        }
        Ok(())
    }
}
