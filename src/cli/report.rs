use std::io::{self, Write};

use crate::game::game::Outcome;
use crate::game::log::{ActionEvent, EventSink, GameEvent, RoundSummary};
use crate::types::AgentId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Nothing per event; only the final result.
    Quiet,
    #[default]
    Normal,
    /// Also shows every dice roll.
    Verbose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

pub fn player_label(agent: AgentId) -> String {
    format!("Player {}", agent + 1)
}

/// Writes the action log, round summaries and the final result to `out`.
///
/// Write failures do not interrupt the game; the first one is kept and
/// returned by [`ConsoleReporter::finish`].
pub struct ConsoleReporter<W: Write> {
    out: W,
    format: ReportFormat,
    verbosity: Verbosity,
    error: Option<io::Error>,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout(format: ReportFormat, verbosity: Verbosity) -> Self {
        Self::new(io::stdout(), format, verbosity)
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, format: ReportFormat, verbosity: Verbosity) -> Self {
        Self {
            out,
            format,
            verbosity,
            error: None,
        }
    }

    pub fn finish(mut self) -> io::Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.out.flush()?;
        Ok(self.out)
    }

    fn emit(&mut self, event: GameEvent) {
        if self.error.is_some() {
            return;
        }
        let result = match self.format {
            ReportFormat::Json => serde_json::to_string(&event)
                .map_err(io::Error::from)
                .and_then(|line| writeln!(self.out, "{line}")),
            ReportFormat::Text => self.write_text(&event),
        };
        if let Err(err) = result {
            self.error = Some(err);
        }
    }

    fn write_text(&mut self, event: &GameEvent) -> io::Result<()> {
        let out = &mut self.out;
        match event {
            GameEvent::DiceRolled { round, agent, dice } => writeln!(
                out,
                "[{round}] / [{}]: rolled {} + {} = {}",
                player_label(*agent),
                dice.0,
                dice.1,
                dice.0 + dice.1
            ),
            GameEvent::Action(action) => writeln!(
                out,
                "[{}] / [{}]: {}",
                action.round,
                player_label(action.agent),
                action.message
            ),
            GameEvent::RoundSummary(summary) => {
                writeln!(out, "--- End of round {} ---", summary.round)?;
                for agent in &summary.agents {
                    writeln!(
                        out,
                        "{}: {} VP | Hand: {}",
                        player_label(agent.agent),
                        agent.score,
                        agent.hand
                    )?;
                }
                Ok(())
            }
            GameEvent::Finished(outcome) => write_outcome(out, outcome),
        }
    }

    fn wants(&self, minimum: Verbosity) -> bool {
        match (self.verbosity, minimum) {
            (Verbosity::Verbose, _) => true,
            (Verbosity::Normal, Verbosity::Verbose) => false,
            (Verbosity::Normal, _) => true,
            (Verbosity::Quiet, Verbosity::Quiet) => true,
            (Verbosity::Quiet, _) => false,
        }
    }
}

pub fn write_outcome(out: &mut impl Write, outcome: &Outcome) -> io::Result<()> {
    writeln!(out, "{}", "=".repeat(40))?;
    match outcome.winner {
        Some(winner) => writeln!(
            out,
            "{} wins after {} rounds",
            player_label(winner),
            outcome.rounds_played
        )?,
        None => writeln!(out, "No winner after {} rounds", outcome.rounds_played)?,
    }
    writeln!(out, "Final standings:")?;
    for (rank, standing) in outcome.standings.iter().enumerate() {
        writeln!(
            out,
            "{:>2}. {}: {} VP | Hand: {}",
            rank + 1,
            player_label(standing.agent),
            standing.score,
            standing.hand
        )?;
    }
    Ok(())
}

impl<W: Write> EventSink for ConsoleReporter<W> {
    fn action(&mut self, event: &ActionEvent) {
        if self.wants(Verbosity::Normal) {
            self.emit(GameEvent::Action(event.clone()));
        }
    }

    fn dice_rolled(&mut self, round: u32, agent: AgentId, dice: (u8, u8)) {
        if self.wants(Verbosity::Verbose) {
            self.emit(GameEvent::DiceRolled { round, agent, dice });
        }
    }

    fn round_summary(&mut self, summary: &RoundSummary) {
        if self.wants(Verbosity::Normal) {
            self.emit(GameEvent::RoundSummary(summary.clone()));
        }
    }

    fn finished(&mut self, outcome: &Outcome) {
        if self.wants(Verbosity::Quiet) {
            self.emit(GameEvent::Finished(outcome.clone()));
        }
    }
}
