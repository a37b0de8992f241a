use crate::{Card, Rank};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Result of a single player hand compared against the dealer's final hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandOutcome {
    /// The player went over 21, lost regardless of the dealer.
    Bust,
    Loss,
    Push,
    Win,
    /// Two card 21 against a dealer without one.
    Blackjack,
}

impl HandOutcome {
    /// Settles `player` against the dealer's final hand. The checks are ordered, the first
    /// match wins: player bust, both blackjack, dealer blackjack, player blackjack,
    /// dealer bust, then the plain comparison of values.
    pub fn settle(player: &Hand, dealer: &Hand) -> HandOutcome {
        if player.is_busted() {
            HandOutcome::Bust
        } else if dealer.is_blackjack() && player.is_blackjack() {
            HandOutcome::Push
        } else if dealer.is_blackjack() {
            HandOutcome::Loss
        } else if player.is_blackjack() {
            HandOutcome::Blackjack
        } else if dealer.is_busted() || dealer.value() < player.value() {
            HandOutcome::Win
        } else if dealer.value() == player.value() {
            HandOutcome::Push
        } else {
            HandOutcome::Loss
        }
    }

    /// Signed amount won on `bet`, a blackjack pays `blackjack_payout` times the bet.
    pub fn gain(&self, bet: f64, blackjack_payout: f64) -> f64 {
        match self {
            HandOutcome::Bust | HandOutcome::Loss => -bet,
            HandOutcome::Push => 0.0,
            HandOutcome::Win => bet,
            HandOutcome::Blackjack => blackjack_payout * bet,
        }
    }
}

/// The cards played on one wager.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hand {
    pub cards: Vec<Card>,
    pub bet: f64,
    /// Set once the hand takes no more cards.
    pub stand: bool,
    /// Set once the hand busted or has been settled.
    pub out: bool,
    pub double_downs: u8,
}

impl Hand {
    pub fn new(cards: Vec<Card>) -> Hand {
        Hand {
            cards,
            ..Hand::default()
        }
    }

    /// Appends `card`. A doubled hand stands after the card it doubled for.
    pub fn add(&mut self, card: Card) {
        self.cards.push(card);
        if self.double_downs > 0 {
            self.stand = true;
        }
        if self.is_busted() {
            self.stand = true;
            self.out = true;
        }
    }

    /// Doubles the wager, the hand will take exactly one more card.
    pub fn double_down(&mut self) {
        self.bet *= 2.0;
        self.double_downs += 1;
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Best total of the hand: every ace starts at 11 and aces are demoted to 1 one at a
    /// time while the total is over 21.
    pub fn value(&self) -> u8 {
        self.evaluate().0
    }

    /// True while at least one ace is still counted as 11.
    pub fn is_soft(&self) -> bool {
        self.evaluate().1 > 0
    }

    fn evaluate(&self) -> (u8, usize) {
        let mut aces = self.cards.iter().filter(|c| c.is_ace()).count();
        let mut total: u32 = self.cards.iter().map(|c| c.value() as u32).sum();
        while total > 21 && aces > 0 {
            total -= 10;
            aces -= 1;
        }
        (u8::try_from(total).unwrap_or(u8::MAX), aces)
    }

    pub fn is_blackjack(&self) -> bool {
        self.cards.len() == 2 && self.value() == 21
    }

    pub fn is_busted(&self) -> bool {
        self.value() > 21
    }

    pub fn can_split(&self) -> bool {
        self.cards.len() == 2 && self.cards[0].rank == self.cards[1].rank
    }

    // Not used for payouts.
    pub fn is_triple_seven(&self) -> bool {
        self.cards.len() == 3 && self.cards.iter().all(|c| c.rank == Rank::Seven)
    }

    pub fn has_ace(&self) -> bool {
        self.cards.iter().any(|c| c.is_ace())
    }

    /// Rank symbols of the hand in sorted order.
    pub fn sorted_ranks(&self) -> Vec<&'static str> {
        let mut ranks = self.cards.iter().map(|c| c.rank).collect::<Vec<Rank>>();
        ranks.sort();
        ranks.into_iter().map(|r| r.symbol()).collect()
    }
}

impl Display for Hand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.cards.is_empty() {
            return write!(f, "empty Hand");
        }
        let cards = self
            .cards
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<String>>();
        write!(f, "{}", cards.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Suit;

    fn hand(ranks: &[Rank]) -> Hand {
        Hand::new(ranks.iter().map(|&r| Card::new(r, Suit::Hearts)).collect())
    }

    #[test]
    fn test_value_simple() {
        assert_eq!(hand(&[Rank::Two, Rank::Three]).value(), 5);
        assert_eq!(hand(&[Rank::King, Rank::Queen]).value(), 20);
    }

    #[test]
    fn test_value_soft_ace() {
        let h = hand(&[Rank::Ace, Rank::Eight]);
        assert_eq!(h.value(), 19);
        assert!(h.is_soft());
    }

    #[test]
    fn test_value_two_aces_and_nine() {
        let h = hand(&[Rank::Ace, Rank::Ace, Rank::Nine]);
        assert_eq!(h.value(), 21);
        assert!(h.is_soft());
    }

    #[test]
    fn test_value_hard_ace() {
        let h = hand(&[Rank::Ten, Rank::Ten, Rank::Ace]);
        assert_eq!(h.value(), 21);
        assert!(!h.is_soft());
        assert!(h.has_ace());
        assert!(!h.is_blackjack());
    }

    #[test]
    fn test_value_all_aces_demoted() {
        let h = hand(&[Rank::Ace, Rank::Ace, Rank::Ace, Rank::Ace, Rank::King, Rank::Nine]);
        assert_eq!(h.value(), 23);
        assert!(h.is_busted());
    }

    #[test]
    fn test_blackjack_not_triple_seven() {
        let h = hand(&[Rank::Ace, Rank::King]);
        assert!(h.is_blackjack());
        assert!(!h.is_triple_seven());
    }

    #[test]
    fn test_triple_seven_not_blackjack() {
        let h = hand(&[Rank::Seven, Rank::Seven, Rank::Seven]);
        assert_eq!(h.value(), 21);
        assert!(h.is_triple_seven());
        assert!(!h.is_blackjack());
    }

    #[test]
    fn test_can_split() {
        assert!(hand(&[Rank::Eight, Rank::Eight]).can_split());
        assert!(!hand(&[Rank::King, Rank::Queen]).can_split());
        assert!(!hand(&[Rank::Eight, Rank::Eight, Rank::Two]).can_split());
    }

    #[test]
    fn test_add_busts_and_stands() {
        let mut h = hand(&[Rank::King, Rank::Six]);
        h.add(Card::new(Rank::Nine, Suit::Clubs));
        assert!(h.is_busted());
        assert!(h.stand);
        assert!(h.out);
    }

    #[test]
    fn test_doubled_hand_stands_after_one_card() {
        let mut h = hand(&[Rank::Five, Rank::Six]);
        h.bet = 10.0;
        h.double_down();
        assert_eq!(h.bet, 20.0);
        assert!(!h.stand);
        h.add(Card::new(Rank::Two, Suit::Clubs));
        assert!(h.stand);
        assert!(!h.out);
    }

    #[test]
    fn test_sorted_ranks_and_display() {
        let h = hand(&[Rank::King, Rank::Ace, Rank::Five]);
        assert_eq!(h.sorted_ranks(), vec!["A", "5", "K"]);
        assert_eq!(h.to_string(), "Kh Ah 5h");
        assert_eq!(Hand::default().to_string(), "empty Hand");
    }

    #[test]
    fn test_settle_precedence() {
        let busted = hand(&[Rank::King, Rank::Queen, Rank::Five]);
        let dealer_busted = hand(&[Rank::King, Rank::Six, Rank::Nine]);
        let blackjack = hand(&[Rank::Ace, Rank::King]);
        let twenty = hand(&[Rank::King, Rank::Queen]);
        let nineteen = hand(&[Rank::King, Rank::Nine]);
        let three_card_21 = hand(&[Rank::Seven, Rank::Seven, Rank::Seven]);

        assert_eq!(HandOutcome::settle(&busted, &dealer_busted), HandOutcome::Bust);
        assert_eq!(HandOutcome::settle(&blackjack, &blackjack), HandOutcome::Push);
        assert_eq!(HandOutcome::settle(&three_card_21, &blackjack), HandOutcome::Loss);
        assert_eq!(HandOutcome::settle(&blackjack, &three_card_21), HandOutcome::Blackjack);
        assert_eq!(HandOutcome::settle(&nineteen, &dealer_busted), HandOutcome::Win);
        assert_eq!(HandOutcome::settle(&twenty, &nineteen), HandOutcome::Win);
        assert_eq!(HandOutcome::settle(&twenty, &twenty), HandOutcome::Push);
        assert_eq!(HandOutcome::settle(&nineteen, &twenty), HandOutcome::Loss);
    }

    #[test]
    fn test_gain() {
        assert_eq!(HandOutcome::Bust.gain(10.0, 1.5), -10.0);
        assert_eq!(HandOutcome::Loss.gain(10.0, 1.5), -10.0);
        assert_eq!(HandOutcome::Push.gain(10.0, 1.5), 0.0);
        assert_eq!(HandOutcome::Win.gain(10.0, 1.5), 10.0);
        assert_eq!(HandOutcome::Blackjack.gain(10.0, 1.5), 15.0);
        assert_eq!(HandOutcome::Blackjack.gain(5.0, 1.5), 7.5);
    }
}
