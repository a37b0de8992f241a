//! Core data structures shared by the blackjack simulation: cards, decks, hands and the
//! rules for settling a finished hand against the dealer.

mod card;
mod deck;
mod error;
mod hand;

pub use card::{Card, Rank, Suit, RANKS, SUITS};
pub use deck::Deck;
pub use error::BlackjackGameError;
pub use hand::{Hand, HandOutcome};
