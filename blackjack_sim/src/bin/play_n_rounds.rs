use blackjack_sim::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() {
    let numb_rounds_result = if let Some(n) = std::env::args().skip(1).next() {
        n.parse::<u64>()
    } else {
        eprintln!("usage: play_n_rounds ROUNDS [SEED]");
        std::process::exit(1);
    };

    let numb_rounds = match numb_rounds_result {
        Ok(n) => n,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    let rng = match std::env::args().nth(2).map(|s| s.parse::<u64>()) {
        Some(Ok(seed)) => StdRng::seed_from_u64(seed),
        Some(Err(e)) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
        None => StdRng::from_entropy(),
    };

    const FLAT_BET: f64 = 10.0;
    let players = vec![
        PlayerSim::new("Basic", 0.0, FLAT_BET, PolicyKind::Basic.build()),
        PlayerSim::new("Mimic", 0.0, FLAT_BET, PolicyKind::Dealer.build()),
    ];
    let mut table = match BlackjackTableSim::new(players, 1, 1.5, rng) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    let mut summaries: Vec<SimulationSummary> = table
        .players()
        .iter()
        .map(|p| SimulationSummary::new(p.name(), p.label(), p.credit()))
        .collect();

    for round_id in 1..=numb_rounds {
        println!("{:-^80}", format!("round {round_id}"));
        let outcomes = match table.play_a_game(round_id) {
            Ok(o) => o,
            Err(e) => {
                eprintln!("error: {e}");
                continue;
            }
        };

        for player in table.players() {
            println!("{}", player);
            println!();
        }
        println!("{}", table.dealer());
        println!();

        for (summary, outcome) in summaries.iter_mut().zip(outcomes.iter()) {
            println!("{}: {:?} {:?}", outcome.player, outcome.outcomes, outcome.gains);
            summary.record(outcome);
        }
        println!();
    }

    for (summary, player) in summaries.iter_mut().zip(table.players()) {
        summary.final_credit = player.credit();
    }

    println!("{:-^80}", "stats");
    if let Err(e) = write_summaries(&summaries, std::io::stdout()) {
        eprintln!("error: {e}");
    }
}
