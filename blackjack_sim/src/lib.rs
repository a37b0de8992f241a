pub mod game;
pub mod write;

pub use game::prelude::*;

use blackjack_lib::BlackjackGameError;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::path::Path;
use thiserror::Error;
use tracing::info;
use write::OutcomeSink;

pub mod prelude {
    pub use super::{
        game::prelude::*, write::prelude::*, BlackjackSimulator, BlackjackSimulatorConfig,
        BlackjackSimulatorConfigBuilder, PlayerConfig, SimulationError, SimulationSummary,
    };
}

/// Simple struct for recording all of the interesting data points accumulated for one player during a simulation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationSummary {
    pub player: String,
    pub label: String,
    pub wins: u32,
    pub pushes: u32,
    pub losses: u32,
    pub busts: u32,
    pub player_blackjacks: u32,
    pub winnings: f64,
    pub starting_credit: f64,
    pub final_credit: f64,
}

impl SimulationSummary {
    pub fn new(player: &str, label: String, starting_credit: f64) -> Self {
        SimulationSummary {
            player: player.to_string(),
            label,
            wins: 0,
            pushes: 0,
            losses: 0,
            busts: 0,
            player_blackjacks: 0,
            winnings: 0.0,
            starting_credit,
            final_credit: starting_credit,
        }
    }

    /// Adds the hands of one settled round to the tallies.
    pub fn record(&mut self, outcome: &RoundOutcome) {
        for hand_outcome in outcome.outcomes.iter() {
            match hand_outcome {
                HandOutcome::Win => self.wins += 1,
                HandOutcome::Blackjack => {
                    self.wins += 1;
                    self.player_blackjacks += 1;
                }
                HandOutcome::Push => self.pushes += 1,
                HandOutcome::Loss => self.losses += 1,
                HandOutcome::Bust => {
                    self.losses += 1;
                    self.busts += 1;
                }
            }
        }
        self.winnings += outcome.total();
    }

    pub fn hands_played(&self) -> u32 {
        self.wins + self.pushes + self.losses
    }
}

impl Display for SimulationSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const WIDTH: usize = 80;
        const TEXT_WIDTH: usize = "number of player blackjacks".len() + 20;
        const NUM_WIDTH: usize = WIDTH - TEXT_WIDTH;
        let total_hands = self.hands_played().max(1) as f64;
        write!(
            f,
            "{}{} ({})\n\
            {:<TEXT_WIDTH$}{:>NUM_WIDTH$}\n\
            {:<TEXT_WIDTH$}{:>NUM_WIDTH$}\n\
            {:<TEXT_WIDTH$}{:>NUM_WIDTH$}\n\
            {:<TEXT_WIDTH$}{:>NUM_WIDTH$}\n\
            {:<TEXT_WIDTH$}{:>NUM_WIDTH$}\n\
            {:<TEXT_WIDTH$}{:>NUM_WIDTH$}\n\
            {:<TEXT_WIDTH$}{:>NUM_WIDTH$.2}\n\
            {:<TEXT_WIDTH$}{:>NUM_WIDTH$.2}\n\
            {:<TEXT_WIDTH$}{:>NUM_WIDTH$.4}\n\
            {:<TEXT_WIDTH$}{:>NUM_WIDTH$.4}\n",
            "player: ",
            self.player,
            self.label,
            "hands won",
            self.wins,
            "hands pushed",
            self.pushes,
            "hands lost",
            self.losses,
            "hands busted",
            self.busts,
            "number of player blackjacks",
            self.player_blackjacks,
            "total hands played",
            self.hands_played(),
            "winnings",
            self.winnings,
            "final credit",
            self.final_credit,
            "win percentage",
            (self.wins as f64) / total_hands,
            "average winnings per hand",
            self.winnings / total_hands,
        )
    }
}

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    GameError(#[from] BlackjackGameError),
    #[error("failed to write simulation output: {0}")]
    WriteError(#[from] std::io::Error),
    #[error("failed to encode or decode json: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// One seat at the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub name: String,
    #[serde(default)]
    pub policy: PolicyKind,
    #[serde(default)]
    pub starting_credit: f64,
}

impl PlayerConfig {
    pub fn new(name: impl Into<String>, policy: PolicyKind, starting_credit: f64) -> Self {
        PlayerConfig {
            name: name.into(),
            policy,
            starting_credit,
        }
    }
}

/// Struct for configuring a `BlackjackSimulator` object. Can be built with `BlackjackSimulatorConfig::new()` or read from JSON,
/// fields missing from the JSON take their default value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlackjackSimulatorConfig {
    pub players: Vec<PlayerConfig>,
    pub num_decks: usize,
    pub flat_bet: f64,
    pub blackjack_payout: f64,
    pub num_rounds: u64,
    pub report_every: u64,
    pub seed: Option<u64>,
}

impl BlackjackSimulatorConfig {
    /// Associated method for returning a new `BlackjackSimulatorConfigBuilder` object. Allows customization of the simulation
    /// i.e. allows the user to choose the seats at the table, the flat bet, the number of rounds played and how many decks are used.
    pub fn new() -> BlackjackSimulatorConfigBuilder {
        BlackjackSimulatorConfigBuilder::default()
    }

    /// Reads a configuration from a JSON file and validates it.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SimulationError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self, SimulationError> {
        let config: BlackjackSimulatorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configuration describes a playable table.
    pub fn validate(&self) -> Result<(), BlackjackGameError> {
        if self.num_decks == 0 {
            return Err(BlackjackGameError::InvalidDeckCount);
        }
        if self.players.is_empty() {
            return Err(BlackjackGameError::InvalidConfig(
                "at least one player is required".to_string(),
            ));
        }
        let opening_cards = 2 * self.players.len() + 1;
        if opening_cards > 52 * self.num_decks {
            return Err(BlackjackGameError::InvalidConfig(format!(
                "{} players need {} cards for the opening deal, {} deck(s) hold {}",
                self.players.len(),
                opening_cards,
                self.num_decks,
                52 * self.num_decks
            )));
        }
        if !self.flat_bet.is_finite() || self.flat_bet <= 0.0 {
            return Err(BlackjackGameError::InvalidConfig(format!(
                "flat bet must be a positive amount, got {}",
                self.flat_bet
            )));
        }
        if !self.blackjack_payout.is_finite() || self.blackjack_payout < 0.0 {
            return Err(BlackjackGameError::InvalidConfig(format!(
                "blackjack payout must not be negative, got {}",
                self.blackjack_payout
            )));
        }
        Ok(())
    }
}

impl Default for BlackjackSimulatorConfig {
    /// Returns the standard configuration: one basic strategy player, a single deck and a flat bet of 10.
    fn default() -> Self {
        BlackjackSimulatorConfig::new().build()
    }
}

/// Struct to implement builder pattern for `BlackjackSimulatorConfig`
#[derive(Debug, Clone, Default)]
pub struct BlackjackSimulatorConfigBuilder {
    players: Option<Vec<PlayerConfig>>,
    num_decks: Option<usize>,
    flat_bet: Option<f64>,
    blackjack_payout: Option<f64>,
    num_rounds: Option<u64>,
    report_every: Option<u64>,
    seed: Option<u64>,
}

impl BlackjackSimulatorConfigBuilder {
    /// Method for adding a seat to the table, seats are played in the order they are added.
    pub fn player(&mut self, player: PlayerConfig) -> &mut Self {
        self.players.get_or_insert_with(Vec::new).push(player);
        self
    }

    /// Method for seating `n` players that all follow `policy`, named "Player 1" to "Player n".
    pub fn players(&mut self, n: usize, policy: PolicyKind, starting_credit: f64) -> &mut Self {
        let seated = self.players.as_ref().map_or(0, |p| p.len());
        for i in 1..=n {
            self.player(PlayerConfig::new(
                format!("Player {}", seated + i),
                policy,
                starting_credit,
            ));
        }
        self
    }

    /// Method for choosing the number of decks shuffled together for every round
    pub fn num_decks(&mut self, decks: usize) -> &mut Self {
        self.num_decks = Some(decks);
        self
    }

    /// Method for setting the flat bet placed on every hand
    pub fn flat_bet(&mut self, bet: f64) -> &mut Self {
        self.flat_bet = Some(bet);
        self
    }

    /// Method for setting the multiple of the bet won with a blackjack
    pub fn blackjack_payout(&mut self, payout: f64) -> &mut Self {
        self.blackjack_payout = Some(payout);
        self
    }

    /// Method for setting the number of rounds played
    pub fn num_rounds(&mut self, rounds: u64) -> &mut Self {
        self.num_rounds = Some(rounds);
        self
    }

    /// Method for setting how often, in rounds, the players credit is logged. Zero disables the readout.
    pub fn report_every(&mut self, rounds: u64) -> &mut Self {
        self.report_every = Some(rounds);
        self
    }

    /// Method for seeding the random number generator, makes a simulation reproducible
    pub fn seed(&mut self, seed: u64) -> &mut Self {
        self.seed = Some(seed);
        self
    }

    /// Method for building a `BlackjackSimulatorConfig` object from the given `BlackjackSimulatorConfigBuilder` object.
    pub fn build(&mut self) -> BlackjackSimulatorConfig {
        BlackjackSimulatorConfig {
            players: self
                .players
                .take()
                .unwrap_or_else(|| vec![PlayerConfig::new("Player 1", PolicyKind::Basic, 0.0)]),
            num_decks: self.num_decks.unwrap_or(1),
            flat_bet: self.flat_bet.unwrap_or(10.0),
            blackjack_payout: self.blackjack_payout.unwrap_or(1.5),
            num_rounds: self.num_rounds.unwrap_or(1000),
            report_every: self.report_every.unwrap_or(100),
            seed: self.seed,
        }
    }
}

/// Struct for running a simulation described by a `BlackjackSimulatorConfig`. Acts as a wrapper for the table,
/// the players and the game loop so a caller only has to provide a configuration and somewhere to send the round outcomes.
pub struct BlackjackSimulator {
    game: BlackjackGameSim,
    pub config: BlackjackSimulatorConfig,
}

impl BlackjackSimulator {
    /// Validates `config` and seats the configured players at a new table.
    pub fn new(config: BlackjackSimulatorConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let players = config
            .players
            .iter()
            .map(|seat| {
                PlayerSim::new(
                    seat.name.clone(),
                    seat.starting_credit,
                    config.flat_bet,
                    seat.policy.build(),
                )
            })
            .collect();
        let table =
            BlackjackTableSim::new(players, config.num_decks, config.blackjack_payout, rng)?;
        let game = BlackjackGameSim::new(table, config.num_rounds, config.report_every);
        Ok(BlackjackSimulator { game, config })
    }

    /// Plays every configured round, sending each round outcome to `sink`. Returns one summary per player.
    pub fn run(
        &mut self,
        sink: &mut dyn OutcomeSink,
    ) -> Result<Vec<SimulationSummary>, SimulationError> {
        info!(
            players = self.config.players.len(),
            decks = self.config.num_decks,
            rounds = self.config.num_rounds,
            "starting simulation"
        );
        self.game.run(sink)?;
        info!(aborted_rounds = self.game.aborted_rounds, "simulation finished");
        Ok(self.game.summaries().to_vec())
    }

    pub fn aborted_rounds(&self) -> u64 {
        self.game.aborted_rounds
    }
}
