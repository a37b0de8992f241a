use crate::game::table::RoundOutcome;
use crate::{SimulationError, SimulationSummary};
use std::io::Write;

pub mod prelude {
    pub use super::{write_summaries, Discard, FnSink, JsonLinesWriter, OutcomeSink};
}

/// Trait for anything that consumes the outcome of each round as it is settled.
pub trait OutcomeSink {
    fn record(&mut self, outcome: &RoundOutcome) -> Result<(), SimulationError>;
}

impl OutcomeSink for Vec<RoundOutcome> {
    fn record(&mut self, outcome: &RoundOutcome) -> Result<(), SimulationError> {
        self.push(outcome.clone());
        Ok(())
    }
}

/// Sink that drops every outcome, for runs where only the summaries matter.
#[derive(Debug, Clone, Copy, Default)]
pub struct Discard;

impl OutcomeSink for Discard {
    fn record(&mut self, _outcome: &RoundOutcome) -> Result<(), SimulationError> {
        Ok(())
    }
}

/// Adapts a closure into an `OutcomeSink`.
pub struct FnSink<F>(pub F);

impl<F: FnMut(&RoundOutcome)> OutcomeSink for FnSink<F> {
    fn record(&mut self, outcome: &RoundOutcome) -> Result<(), SimulationError> {
        (self.0)(outcome);
        Ok(())
    }
}

/// Writes every outcome as one JSON object per line.
pub struct JsonLinesWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesWriter<W> {
    pub fn new(writer: W) -> Self {
        JsonLinesWriter { writer }
    }

    pub fn flush(&mut self) -> Result<(), SimulationError> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OutcomeSink for JsonLinesWriter<W> {
    fn record(&mut self, outcome: &RoundOutcome) -> Result<(), SimulationError> {
        serde_json::to_writer(&mut self.writer, outcome)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}

fn format_summaries(summaries: &[SimulationSummary]) -> Vec<String> {
    const WIDTH: usize = 80;
    summaries
        .iter()
        .enumerate()
        .map(|(i, summary)| {
            let seat = format!("seat #{}", i + 1);
            let header = format!("{:-^WIDTH$}\n", seat);
            format!("{}{}{}\n", header, summary, "-".repeat(WIDTH))
        })
        .collect()
}

/// A public function to take the `SimulationSummary` of every player and write them to a writer, in seating order
pub fn write_summaries(
    summaries: &[SimulationSummary],
    mut writer: impl Write,
) -> std::io::Result<()> {
    for formatted in format_summaries(summaries) {
        writer.write_all(formatted.as_bytes())?;
    }
    writer.flush()
}
