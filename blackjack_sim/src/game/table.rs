use crate::game::player::PlayerSim;
use blackjack_lib::{BlackjackGameError, Deck, Hand, HandOutcome};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// The signed gains of one player for one round, one entry per hand in hand order.
/// This is what gets handed to an `OutcomeSink` after every round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub round_id: u64,
    pub player: String,
    pub gains: Vec<f64>,
    pub outcomes: Vec<HandOutcome>,
}

impl RoundOutcome {
    pub fn total(&self) -> f64 {
        self.gains.iter().sum()
    }
}

/// Struct for a simulated blackjack table. Owns the deck, the players and the dealer, and runs complete rounds.
pub struct BlackjackTableSim {
    players: Vec<PlayerSim>,
    dealer: PlayerSim,
    deck: Deck,
    n_decks: usize,
    blackjack_payout: f64,
    rng: StdRng,
}

impl BlackjackTableSim {
    /// Associated method for building a new table. `rng` is the only source of randomness used to shuffle the decks,
    /// no deck is shuffled until the first round is played.
    pub fn new(
        players: Vec<PlayerSim>,
        n_decks: usize,
        blackjack_payout: f64,
        rng: StdRng,
    ) -> Result<Self, BlackjackGameError> {
        if n_decks == 0 {
            return Err(BlackjackGameError::InvalidDeckCount);
        }
        Ok(BlackjackTableSim {
            players,
            dealer: PlayerSim::dealer(),
            deck: Deck::stacked(Vec::new()),
            n_decks,
            blackjack_payout,
            rng,
        })
    }

    /// Replaces the deck with `deck`, deals two cards to every player in order and then one card to the dealer.
    pub fn reset_with(&mut self, deck: Deck) -> Result<(), BlackjackGameError> {
        self.deck = deck;
        for player in self.players.iter_mut() {
            let cards = self.deck.draw(2)?;
            player.reset(vec![Hand::new(cards)])?;
        }
        let cards = self.deck.draw(1)?;
        self.dealer.reset(vec![Hand::new(cards)])
    }

    /// Plays a complete round with a new shuffled deck and returns the outcome for every player.
    pub fn play_a_game(&mut self, round_id: u64) -> Result<Vec<RoundOutcome>, BlackjackGameError> {
        let deck = Deck::new(self.n_decks, &mut self.rng)?;
        self.play_with_deck(round_id, deck)
    }

    /// Plays a complete round dealt from `deck`. If the round fails, e.g. because the deck runs out,
    /// the error is returned before any credit changes hands.
    pub fn play_with_deck(
        &mut self,
        round_id: u64,
        deck: Deck,
    ) -> Result<Vec<RoundOutcome>, BlackjackGameError> {
        self.reset_with(deck)?;

        for player in self.players.iter_mut() {
            let up_hand = &self.dealer.hands()[0];
            player.bet();
            if player.split_hand(up_hand) {
                trace!(round_id, player = player.name(), "split");
            }
            if player.double_down(up_hand) {
                trace!(round_id, player = player.name(), "double down");
            }
            deal_until_satisfied(player, &mut self.deck, up_hand)?;
        }

        let dealers_hand = self.play_dealer()?.clone();
        debug!(round_id, dealer = %dealers_hand, value = dealers_hand.value(), "dealer finished");

        let mut outcomes = Vec::with_capacity(self.players.len());
        for player in self.players.iter_mut() {
            let (hand_outcomes, gains) =
                evaluate_p_vs_d(player, &dealers_hand, self.blackjack_payout);
            player.settle();
            player.process_outcome(&gains);
            debug!(round_id, player = player.name(), ?gains, credit = player.credit(), "settled");
            outcomes.push(RoundOutcome {
                round_id,
                player: player.name().to_string(),
                gains,
                outcomes: hand_outcomes,
            });
        }

        Ok(outcomes)
    }

    /// The dealer draws until its own strategy is satisfied, returns the dealers final hand.
    pub fn play_dealer(&mut self) -> Result<&Hand, BlackjackGameError> {
        loop {
            let mask = self.dealer.wants_cards(&self.dealer.hands()[0]);
            let wanted = mask.iter().filter(|&&wants| wants).count();
            if wanted == 0 {
                break;
            }
            let cards = self.deck.draw(wanted)?;
            self.dealer.add_cards(cards, &mask)?;
        }
        Ok(&self.dealer.hands()[0])
    }

    pub fn players(&self) -> &[PlayerSim] {
        &self.players
    }

    pub fn dealer(&self) -> &PlayerSim {
        &self.dealer
    }

    pub fn cards_left(&self) -> usize {
        self.deck.cards_left()
    }
}

/// Repeatedly asks `player` which hands want a card and deals exactly one card per asking hand, until no hand asks.
fn deal_until_satisfied(
    player: &mut PlayerSim,
    deck: &mut Deck,
    up_hand: &Hand,
) -> Result<(), BlackjackGameError> {
    loop {
        let mask = player.wants_cards(up_hand);
        let wanted = mask.iter().filter(|&&wants| wants).count();
        if wanted == 0 {
            return Ok(());
        }
        let cards = deck.draw(wanted)?;
        player.add_cards(cards, &mask)?;
    }
}

/// Compares every hand of `player` against the dealers final hand, returns the outcome and signed gain of each hand.
pub fn evaluate_p_vs_d(
    player: &PlayerSim,
    dealers_hand: &Hand,
    blackjack_payout: f64,
) -> (Vec<HandOutcome>, Vec<f64>) {
    player
        .hands()
        .iter()
        .map(|hand| {
            let outcome = HandOutcome::settle(hand, dealers_hand);
            (outcome, outcome.gain(hand.bet, blackjack_payout))
        })
        .unzip()
}
