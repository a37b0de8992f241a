use blackjack_lib::Hand;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod prelude {
    pub use super::{BasicStrategy, DealerStrategy, PolicyKind, Strategy};
}

/// Trait for a playing policy. A struct implementing `Strategy` decides, given a players hand(s) and the dealers visible hand,
/// which hands should take another card and whether a hand should be split or doubled down.
/// The dealer and the players only differ in which `Strategy` they hold.
pub trait Strategy: Send {
    /// Required method, returns one boolean per hand in `hands`, true if that hand wants another card.
    fn wants_to_hit(&self, hands: &[Hand], dealers_hand: &Hand) -> Vec<bool>;
    /// Required method, only consulted for a hand that can be split.
    fn wants_to_split(&self, hand: &Hand, dealers_hand: &Hand) -> bool;
    /// Required method, decides whether `hand` should be doubled down.
    fn wants_to_double_down(&self, hand: &Hand, dealers_hand: &Hand) -> bool;
    /// Required method, a short description of the strategy used for logging and summaries.
    fn label(&self) -> String;
}

/// The fixed dealer policy, hit below 17, never split or double down.
#[derive(Debug, Clone, Copy, Default)]
pub struct DealerStrategy;

impl Strategy for DealerStrategy {
    fn wants_to_hit(&self, hands: &[Hand], _dealers_hand: &Hand) -> Vec<bool> {
        hands.iter().map(|hand| hand.value() < 17).collect()
    }

    fn wants_to_split(&self, _hand: &Hand, _dealers_hand: &Hand) -> bool {
        false
    }

    fn wants_to_double_down(&self, _hand: &Hand, _dealers_hand: &Hand) -> bool {
        false
    }

    fn label(&self) -> String {
        "dealer".to_string()
    }
}

/// A struct that implements the table driven basic strategy. Every decision is keyed on the value of the dealers visible hand,
/// the value of the players hand and whether the players hand holds an ace.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicStrategy;

impl BasicStrategy {
    pub fn new() -> BasicStrategy {
        BasicStrategy
    }

    /// Returns true if a hand of value `mv` should stand against a dealer showing `dv`.
    fn stands(has_ace: bool, mv: u8, dv: u8) -> bool {
        if has_ace {
            ((dv <= 8 || dv == 11) && mv >= 18) || ((dv == 9 || dv == 10) && mv >= 19)
        } else {
            (dv <= 3 && mv >= 13) || ((4..=6).contains(&dv) && mv >= 12) || (dv >= 7 && mv >= 17)
        }
    }
}

impl Strategy for BasicStrategy {
    fn wants_to_hit(&self, hands: &[Hand], dealers_hand: &Hand) -> Vec<bool> {
        let dv = dealers_hand.value();
        hands
            .iter()
            .map(|hand| !BasicStrategy::stands(hand.has_ace(), hand.value(), dv))
            .collect()
    }

    fn wants_to_split(&self, hand: &Hand, dealers_hand: &Hand) -> bool {
        // Keyed on half the hand total, so a pair of aces (soft 12) keys as 6.
        let dv = dealers_hand.value();
        match hand.value() / 2 {
            8 => true,
            // A dealer 7 is left out of the nines on purpose.
            9 => matches!(dv, 2..=6 | 8 | 9),
            7 => (2..=8).contains(&dv),
            2 | 3 | 6 => (2..=7).contains(&dv),
            4 => dv == 5,
            _ => false,
        }
    }

    fn wants_to_double_down(&self, hand: &Hand, dealers_hand: &Hand) -> bool {
        let dv = dealers_hand.value();
        let mv = hand.value();
        if hand.has_ace() {
            match mv {
                11 => (2..=10).contains(&dv),
                10 => (2..=9).contains(&dv),
                9 => (2..=6).contains(&dv),
                _ => false,
            }
        } else {
            match mv {
                18 => (4..=6).contains(&dv),
                17 => (3..=6).contains(&dv),
                13..=16 => dv == 5 || dv == 6,
                12 => dv == 5,
                _ => false,
            }
        }
    }

    fn label(&self) -> String {
        "basic strategy".to_string()
    }
}

/// Tag for the available policies, used by configuration files and the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    Dealer,
    #[default]
    Basic,
}

impl PolicyKind {
    /// Builds the strategy the tag stands for.
    pub fn build(&self) -> Box<dyn Strategy> {
        match self {
            PolicyKind::Dealer => Box::new(DealerStrategy),
            PolicyKind::Basic => Box::new(BasicStrategy::new()),
        }
    }
}

impl Display for PolicyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolicyKind::Dealer => write!(f, "dealer"),
            PolicyKind::Basic => write!(f, "basic"),
        }
    }
}
