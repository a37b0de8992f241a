use crate::game::strategy::{DealerStrategy, Strategy};
use blackjack_lib::{BlackjackGameError, Card, Hand};
use std::fmt::Display;

/// Struct for a simulated player. The dealer is a `PlayerSim` holding a `DealerStrategy` and a single hand.
pub struct PlayerSim {
    name: String,
    credit: f64,
    hands: Vec<Hand>,
    flat_bet: f64,
    doubled: bool,
    strategy: Box<dyn Strategy>,
}

impl PlayerSim {
    /// Associated function to create a new `PlayerSim` struct. The player holds no hands until the first call to `reset()`.
    pub fn new(
        name: impl Into<String>,
        credit: f64,
        flat_bet: f64,
        strategy: Box<dyn Strategy>,
    ) -> PlayerSim {
        PlayerSim {
            name: name.into(),
            credit,
            hands: Vec::new(),
            flat_bet,
            doubled: false,
            strategy,
        }
    }

    /// Associated function to create the dealer.
    pub fn dealer() -> PlayerSim {
        PlayerSim::new("Dealer", 0.0, 0.0, Box::new(DealerStrategy))
    }

    /// Replaces the players hands for a new round, clears the double down flag and places the flat bet on every hand.
    /// Returns an error if `hands` is empty since the strategy would have nothing to play.
    pub fn reset(&mut self, hands: Vec<Hand>) -> Result<(), BlackjackGameError> {
        if hands.is_empty() {
            return Err(BlackjackGameError::UnboundHands(self.name.clone()));
        }
        self.hands = hands;
        self.doubled = false;
        self.bet();
        Ok(())
    }

    /// Places the flat bet on every hand.
    pub fn bet(&mut self) {
        for hand in self.hands.iter_mut() {
            hand.bet = self.flat_bet;
        }
    }

    /// Hands one card to every hand whose entry in `mask` is true, consuming `cards` in order.
    pub fn add_cards(&mut self, cards: Vec<Card>, mask: &[bool]) -> Result<(), BlackjackGameError> {
        let requested = mask.iter().filter(|&&wants| wants).count();
        if mask.len() != self.hands.len() || cards.len() != requested {
            return Err(BlackjackGameError::CardMismatch {
                requested,
                received: cards.len(),
            });
        }
        let mut cards = cards.into_iter();
        for (hand, &wants) in self.hands.iter_mut().zip(mask) {
            if !wants {
                continue;
            }
            if let Some(card) = cards.next() {
                hand.add(card);
            }
        }
        Ok(())
    }

    /// Tells the table which hands want another card. After a double down every hand takes exactly one more card,
    /// otherwise the decision is left to the strategy.
    pub fn wants_cards(&self, dealers_hand: &Hand) -> Vec<bool> {
        if self.doubled {
            return self.hands.iter().map(|hand| !hand.stand).collect();
        }
        self.strategy
            .wants_to_hit(&self.hands, dealers_hand)
            .into_iter()
            .zip(self.hands.iter())
            .map(|(wants, hand)| wants && !hand.stand)
            .collect()
    }

    /// Splits every hand the strategy approves of into two one card hands, each carrying the original bet.
    /// Returns true if at least one hand was split.
    pub fn split_hand(&mut self, dealers_hand: &Hand) -> bool {
        let mut split = false;
        let mut hands = Vec::with_capacity(self.hands.len() + 1);
        for hand in std::mem::take(&mut self.hands) {
            if hand.can_split() && self.strategy.wants_to_split(&hand, dealers_hand) {
                split = true;
                for card in hand.cards {
                    let mut new_hand = Hand::new(vec![card]);
                    new_hand.bet = hand.bet;
                    hands.push(new_hand);
                }
            } else {
                hands.push(hand);
            }
        }
        self.hands = hands;
        split
    }

    /// Doubles every bet when the strategy wants to double down on all hands. Returns true if the player doubled.
    pub fn double_down(&mut self, dealers_hand: &Hand) -> bool {
        if self
            .hands
            .iter()
            .all(|hand| self.strategy.wants_to_double_down(hand, dealers_hand))
        {
            for hand in self.hands.iter_mut() {
                hand.double_down();
            }
            self.doubled = true;
        }
        self.doubled
    }

    /// Adds the gains of a settled round to the players credit.
    pub fn process_outcome(&mut self, gains: &[f64]) {
        self.credit += gains.iter().sum::<f64>();
    }

    /// Marks every hand as settled.
    pub fn settle(&mut self) {
        for hand in self.hands.iter_mut() {
            hand.out = true;
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn credit(&self) -> f64 {
        self.credit
    }

    pub fn hands(&self) -> &[Hand] {
        &self.hands
    }

    /// The current bet on each hand, in hand order.
    pub fn bets(&self) -> Vec<f64> {
        self.hands.iter().map(|hand| hand.bet).collect()
    }

    pub fn has_doubled(&self) -> bool {
        self.doubled
    }

    /// Method to get a string that describes the players strategy
    pub fn label(&self) -> String {
        self.strategy.label()
    }
}

impl Display for PlayerSim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let hands = self
            .hands
            .iter()
            .map(|hand| format!("{} ({})", hand, hand.value()))
            .collect::<Vec<String>>()
            .join(", ");
        write!(
            f,
            "{:<21}{}\n\
             {:<21}{}\n\
             {:<21}{:?}\n\
             {:<21}{}\n\
             {:<21}${:.2}",
            "player:",
            self.name,
            "hands:",
            hands,
            "bets:",
            self.bets(),
            "doubled:",
            self.doubled,
            "credit:",
            self.credit,
        )
    }
}
