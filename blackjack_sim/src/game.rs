//! Module that focuses on the simulation of a series of blackjack rounds at a single table.
//! This module provides the strategies, the players and the table, and the loop that plays rounds and records their outcomes.

pub mod player;
pub mod strategy;
pub mod table;
pub mod prelude {
    pub use super::BlackjackGameSim;
    pub use crate::game::player::PlayerSim;
    pub use crate::game::strategy::{self, prelude::*};
    pub use crate::game::table::{BlackjackTableSim, RoundOutcome};
    pub use blackjack_lib::{BlackjackGameError, Card, Deck, Hand, HandOutcome};
}

pub use prelude::*;

use crate::write::OutcomeSink;
use crate::{SimulationError, SimulationSummary};
use tracing::{info, warn};

/// Struct that plays a fixed number of rounds at a `BlackjackTableSim`, hands every round outcome to an `OutcomeSink`
/// and keeps the per player tallies needed for reporting.
pub struct BlackjackGameSim {
    table: BlackjackTableSim,
    num_rounds: u64,
    report_every: u64,
    next_round: u64,
    summaries: Vec<SimulationSummary>,
    pub aborted_rounds: u64,
}

impl BlackjackGameSim {
    /// Associated method for building a new game.
    /// `num_rounds` is the number of rounds played during a single call to `self.run()`,
    /// `report_every` is the interval, in rounds, at which each players credit is logged. Zero turns reporting off.
    pub fn new(table: BlackjackTableSim, num_rounds: u64, report_every: u64) -> BlackjackGameSim {
        let summaries = table
            .players()
            .iter()
            .map(|player| SimulationSummary::new(player.name(), player.label(), player.credit()))
            .collect();
        BlackjackGameSim {
            table,
            num_rounds,
            report_every,
            next_round: 1,
            summaries,
            aborted_rounds: 0,
        }
    }

    /// Method that plays the configured number of rounds. A round that fails is logged and skipped, it changes no credit.
    /// Only a failure of `sink` stops the run.
    pub fn run(&mut self, sink: &mut dyn OutcomeSink) -> Result<(), SimulationError> {
        for _ in 0..self.num_rounds {
            let round_id = self.next_round;
            self.next_round += 1;

            match self.table.play_a_game(round_id) {
                Ok(outcomes) => {
                    for (summary, outcome) in self.summaries.iter_mut().zip(outcomes.iter()) {
                        summary.record(outcome);
                        sink.record(outcome)?;
                    }
                }
                Err(e) => {
                    warn!(round_id, error = %e, "round aborted");
                    self.aborted_rounds += 1;
                }
            }

            if self.report_every > 0 && round_id % self.report_every == 0 {
                self.report(round_id);
            }
        }

        for (summary, player) in self.summaries.iter_mut().zip(self.table.players()) {
            summary.final_credit = player.credit();
        }
        Ok(())
    }

    /// Logs the current credit of every player.
    fn report(&self, round_id: u64) {
        for player in self.table.players() {
            info!(round_id, player = player.name(), credit = player.credit(), "bankroll");
        }
    }

    pub fn summaries(&self) -> &[SimulationSummary] {
        &self.summaries
    }

    pub fn table(&self) -> &BlackjackTableSim {
        &self.table
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn game(num_rounds: u64, seed: u64) -> BlackjackGameSim {
        let players = vec![
            PlayerSim::new("Alice", 100.0, 10.0, PolicyKind::Basic.build()),
            PlayerSim::new("Bob", 100.0, 10.0, PolicyKind::Dealer.build()),
        ];
        let table = BlackjackTableSim::new(players, 2, 1.5, StdRng::seed_from_u64(seed)).unwrap();
        BlackjackGameSim::new(table, num_rounds, 10)
    }

    #[test]
    fn test_game() {
        let mut game = game(200, 9);
        let mut outcomes: Vec<RoundOutcome> = Vec::new();
        game.run(&mut outcomes).unwrap();

        assert_eq!(game.aborted_rounds, 0);
        assert_eq!(outcomes.len(), 400);
        assert_eq!(outcomes.first().map(|o| o.round_id), Some(1));
        assert_eq!(outcomes.last().map(|o| o.round_id), Some(200));

        // the sink sees exactly what moved the bankroll
        for (summary, player) in game.summaries().iter().zip(game.table().players()) {
            let total: f64 = outcomes
                .iter()
                .filter(|o| o.player == player.name())
                .map(|o| o.total())
                .sum();
            assert!((100.0 + total - player.credit()).abs() < 1e-9);
            assert_eq!(summary.final_credit, player.credit());
            assert!(summary.hands_played() >= 200);
        }
    }

    #[test]
    fn test_same_seed_same_outcomes() {
        let mut first: Vec<RoundOutcome> = Vec::new();
        let mut second: Vec<RoundOutcome> = Vec::new();
        game(50, 1234).run(&mut first).unwrap();
        game(50, 1234).run(&mut second).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_failed_rounds_are_skipped() {
        // 26 seats need 53 cards for the opening deal, so every round runs out of cards
        let players = (1..=26)
            .map(|i| PlayerSim::new(format!("Seat {i}"), 100.0, 10.0, PolicyKind::Basic.build()))
            .collect();
        let table = BlackjackTableSim::new(players, 1, 1.5, StdRng::seed_from_u64(4)).unwrap();
        let mut game = BlackjackGameSim::new(table, 30, 10);
        let mut outcomes: Vec<RoundOutcome> = Vec::new();

        assert!(game.run(&mut outcomes).is_ok());
        assert_eq!(game.aborted_rounds, 30);
        assert!(outcomes.is_empty());
        for (summary, player) in game.summaries().iter().zip(game.table().players()) {
            assert_eq!(player.credit(), 100.0);
            assert_eq!(summary.final_credit, 100.0);
            assert_eq!(summary.hands_played(), 0);
        }

        // the next run picks up where the failed rounds left off
        assert!(game.run(&mut outcomes).is_ok());
        assert_eq!(game.aborted_rounds, 60);
    }

    #[test]
    fn test_aborted_rounds_leave_no_trace() {
        // 20 seats share one deck, some rounds run dry once the players start hitting
        let players = (1..=20)
            .map(|i| PlayerSim::new(format!("Seat {i}"), 0.0, 10.0, PolicyKind::Basic.build()))
            .collect();
        let table = BlackjackTableSim::new(players, 1, 1.5, StdRng::seed_from_u64(8)).unwrap();
        let mut game = BlackjackGameSim::new(table, 50, 0);
        let mut outcomes: Vec<RoundOutcome> = Vec::new();
        game.run(&mut outcomes).unwrap();

        assert!(game.aborted_rounds > 0);
        assert_eq!(outcomes.len() as u64, (50 - game.aborted_rounds) * 20);
        for player in game.table().players() {
            let sunk: f64 = outcomes
                .iter()
                .filter(|o| o.player == player.name())
                .map(|o| o.total())
                .sum();
            assert!((sunk - player.credit()).abs() < 1e-9);
        }
    }

    #[test]
    fn test_run_continues_round_ids() {
        let mut game = game(5, 3);
        let mut outcomes: Vec<RoundOutcome> = Vec::new();
        game.run(&mut outcomes).unwrap();
        game.run(&mut outcomes).unwrap();
        assert_eq!(outcomes.last().map(|o| o.round_id), Some(10));
    }
}
