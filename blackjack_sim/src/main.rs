use anyhow::Context;
use blackjack_sim::prelude::*;
use clap::Parser;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Simulates rounds of blackjack and reports how each seat fared",
    long_about = None
)]
struct Args {
    /// JSON configuration file, flags given on the command line override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of rounds to play
    #[arg(short, long)]
    rounds: Option<u64>,

    /// Number of decks shuffled together for every round
    #[arg(short, long)]
    decks: Option<usize>,

    /// Number of players seated at the table, replaces the players of the configuration file
    #[arg(short, long)]
    players: Option<usize>,

    /// Policy followed by the seated players
    #[arg(long, value_enum, default_value_t = PolicyKind::Basic)]
    policy: PolicyKind,

    /// Starting credit of the seated players
    #[arg(long, default_value_t = 0.0)]
    credit: f64,

    /// Flat bet placed on every hand
    #[arg(short, long)]
    bet: Option<f64>,

    /// Multiple of the bet won with a blackjack
    #[arg(long)]
    payout: Option<f64>,

    /// Seed for the random number generator
    #[arg(short, long)]
    seed: Option<u64>,

    /// Log every players credit after this many rounds, zero turns it off
    #[arg(long)]
    report_every: Option<u64>,

    /// Write every round outcome to this file as JSON lines
    #[arg(short, long)]
    outcomes: Option<PathBuf>,

    /// Log every round
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn into_config(self) -> anyhow::Result<BlackjackSimulatorConfig> {
        let mut config = match &self.config {
            Some(path) => BlackjackSimulatorConfig::from_json_file(path)
                .with_context(|| format!("failed to read configuration {}", path.display()))?,
            None => BlackjackSimulatorConfig::default(),
        };
        if let Some(n) = self.players {
            config.players = BlackjackSimulatorConfig::new()
                .players(n, self.policy, self.credit)
                .build()
                .players;
        }
        if let Some(rounds) = self.rounds {
            config.num_rounds = rounds;
        }
        if let Some(decks) = self.decks {
            config.num_decks = decks;
        }
        if let Some(bet) = self.bet {
            config.flat_bet = bet;
        }
        if let Some(payout) = self.payout {
            config.blackjack_payout = payout;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(report_every) = self.report_every {
            config.report_every = report_every;
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    // Parse args
    let args = Args::parse();

    // Create logger
    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let outcomes_path = args.outcomes.clone();
    let config = args.into_config()?;
    let mut simulator =
        BlackjackSimulator::new(config).context("invalid simulation configuration")?;

    let summaries = match outcomes_path {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let mut sink = JsonLinesWriter::new(BufWriter::new(file));
            let summaries = simulator.run(&mut sink).context("simulation failed")?;
            sink.flush()
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("round outcomes written to {}", path.display());
            summaries
        }
        None => simulator.run(&mut Discard).context("simulation failed")?,
    };

    write_summaries(&summaries, std::io::stdout()).context("failed to write summaries")?;
    Ok(())
}
