use thiserror::Error;

/// Errors raised while dealing or playing a round of blackjack.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BlackjackGameError {
    #[error("deck exhausted: requested {requested} card(s) but only {remaining} left")]
    DeckExhausted { requested: usize, remaining: usize },
    #[error("a deck needs at least one 52 card pack")]
    InvalidDeckCount,
    #[error("strategy for {0} has no hands to play")]
    UnboundHands(String),
    #[error("received {received} card(s) for {requested} hand(s) asking for one")]
    CardMismatch { requested: usize, received: usize },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
