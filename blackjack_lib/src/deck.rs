use crate::{BlackjackGameError, Card, RANKS, SUITS};
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt::Display;

/// One or more 52 card packs merged into a single shuffled shoe.
/// Cards are drawn from the top without replacement until the deck is rebuilt.
#[derive(Debug, Clone)]
pub struct Deck {
    // The top of the deck is the end of the vector.
    cards: Vec<Card>,
}

impl Deck {
    /// Builds `n_decks` full packs and shuffles them with `rng`.
    pub fn new<R: Rng + ?Sized>(n_decks: usize, rng: &mut R) -> Result<Deck, BlackjackGameError> {
        if n_decks == 0 {
            return Err(BlackjackGameError::InvalidDeckCount);
        }
        let mut cards = Vec::with_capacity(52 * n_decks);
        for _ in 0..n_decks {
            for rank in RANKS {
                for suit in SUITS {
                    cards.push(Card::new(rank, suit));
                }
            }
        }
        let mut deck = Deck { cards };
        deck.shuffle(rng);
        Ok(deck)
    }

    /// Builds an unshuffled deck that deals `cards` in the given order.
    pub fn stacked(cards: Vec<Card>) -> Deck {
        let mut cards = cards;
        cards.reverse();
        Deck { cards }
    }

    /// Uniformly permutes the cards that are still in the deck.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    /// Removes and returns the next `n` cards. Either all `n` cards are drawn or,
    /// when fewer remain, none are and `DeckExhausted` is returned.
    pub fn draw(&mut self, n: usize) -> Result<Vec<Card>, BlackjackGameError> {
        let remaining = self.cards.len();
        if n > remaining {
            return Err(BlackjackGameError::DeckExhausted {
                requested: n,
                remaining,
            });
        }
        let mut drawn = self.cards.split_off(remaining - n);
        drawn.reverse();
        Ok(drawn)
    }

    pub fn draw_one(&mut self) -> Result<Card, BlackjackGameError> {
        self.cards.pop().ok_or(BlackjackGameError::DeckExhausted {
            requested: 1,
            remaining: 0,
        })
    }

    pub fn cards_left(&self) -> usize {
        self.cards.len()
    }
}

impl Display for Deck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.cards.is_empty() {
            return write!(f, "empty Deck");
        }
        let cards = self
            .cards
            .iter()
            .rev()
            .map(|c| c.to_string())
            .collect::<Vec<String>>();
        write!(f, "{}", cards.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Rank, Suit};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    #[test]
    fn test_new_deck_size() {
        let mut rng = StdRng::seed_from_u64(7);
        let deck = Deck::new(1, &mut rng).unwrap();
        assert_eq!(deck.cards_left(), 52);
        let deck = Deck::new(6, &mut rng).unwrap();
        assert_eq!(deck.cards_left(), 312);
    }

    #[test]
    fn test_zero_decks_rejected() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(
            Deck::new(0, &mut rng).unwrap_err(),
            BlackjackGameError::InvalidDeckCount
        );
    }

    #[test]
    fn test_multi_deck_composition() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut deck = Deck::new(2, &mut rng).unwrap();
        let cards = deck.draw(104).unwrap();
        let mut counts: HashMap<Card, usize> = HashMap::new();
        for card in cards {
            *counts.entry(card).or_default() += 1;
        }
        assert_eq!(counts.len(), 52);
        assert!(counts.values().all(|&n| n == 2));
    }

    #[test]
    fn test_same_seed_same_order() {
        let mut a = Deck::new(1, &mut StdRng::seed_from_u64(42)).unwrap();
        let mut b = Deck::new(1, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a.draw(52).unwrap(), b.draw(52).unwrap());
    }

    #[test]
    fn test_draw_until_exhausted() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut deck = Deck::new(1, &mut rng).unwrap();
        for i in 0..52 {
            assert_eq!(deck.draw(1).unwrap().len(), 1);
            assert_eq!(deck.cards_left(), 51 - i);
        }
        assert_eq!(
            deck.draw(1).unwrap_err(),
            BlackjackGameError::DeckExhausted {
                requested: 1,
                remaining: 0
            }
        );
        assert!(deck.draw_one().is_err());
        assert_eq!(deck.to_string(), "empty Deck");
    }

    #[test]
    fn test_failed_draw_keeps_cards() {
        let mut deck = Deck::stacked(vec![
            Card::new(Rank::Two, Suit::Clubs),
            Card::new(Rank::Three, Suit::Clubs),
        ]);
        assert!(deck.draw(3).is_err());
        assert_eq!(deck.cards_left(), 2);
    }

    #[test]
    fn test_stacked_draw_order() {
        let two = Card::new(Rank::Two, Suit::Clubs);
        let ace = Card::new(Rank::Ace, Suit::Spades);
        let king = Card::new(Rank::King, Suit::Hearts);
        let mut deck = Deck::stacked(vec![two, ace, king]);
        assert_eq!(deck.to_string(), "2c As Kh");
        assert_eq!(deck.draw(2).unwrap(), vec![two, ace]);
        assert_eq!(deck.draw_one().unwrap(), king);
    }
}
